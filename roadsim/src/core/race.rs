use crate::core::assets::SpriteAtlas;
use crate::core::car::Vehicle;
use crate::core::player::{
    Player, DECOR_COLLISION_WIDTH, MAX_SPEED, OFF_ROAD_DECEL, OFF_ROAD_LIMIT, PLAYER_X_LIMIT,
    POST_COLLISION_SPEED, VEHICLE_COLLISION_WIDTH,
};
use crate::core::state_handler::PlayerAnimation;
use crate::core::track::Track;
use crate::core::track_builder::{build_track, spawn_vehicles};
use crate::interfaces::controls::{ControlSignals, DeviceClass, GamePhase, ViewMode};
use crate::interfaces::gui_interface::HudState;
use crate::post::race_result::RaceResult;
use flume::Sender;
use helpers::general::{accelerate, increase, limit, overlap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};

/// * `tot_no_laps` - Total number of laps in the race
/// * `no_npcs` - Number of NPC vehicles spawned around the ring (the rival comes on top)
/// * `device_class` - Input device class, selects steering rates and camera widening
/// * `view_mode` - Initial point of view
/// * `seed` - Optional seed for NPC spawning and boost jitter (random if not set)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RacePars {
    pub tot_no_laps: u32,
    pub no_npcs: usize,
    pub device_class: DeviceClass,
    pub view_mode: ViewMode,
    pub seed: Option<u64>,
}

impl Default for RacePars {
    fn default() -> Self {
        RacePars {
            tot_no_laps: 1,
            no_npcs: 20,
            device_class: DeviceClass::Pointer,
            view_mode: ViewMode::Third,
            seed: None,
        }
    }
}

/// Race is the simulation actor. It owns the track, the vehicles and the player state and is the
/// only writer of them. Rendering and the minimap only read it.
#[derive(Debug)]
pub struct Race {
    pub atlas: SpriteAtlas,
    pub track: Track,
    pub vehicles: Vec<Vehicle>,
    pub player: Player,
    pub anim: PlayerAnimation,
    pub phase: GamePhase,
    pub device_class: DeviceClass,
    pub view_mode: ViewMode,
    pub cur_racetime: f64,
    pub laptimes: Vec<f64>,
    lap_start_racetime: f64,
    no_npcs: usize,
    tot_no_laps: u32,
    seed: Option<u64>,
    rng: StdRng,
    tx: Option<Sender<HudState>>,
}

impl Race {
    pub fn new(race_pars: &RacePars, atlas: SpriteAtlas) -> Race {
        let rng = match race_pars.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut race = Race {
            atlas,
            track: Track::empty(),
            vehicles: vec![],
            player: Player::new(race_pars.tot_no_laps, race_pars.device_class),
            anim: Default::default(),
            phase: GamePhase::Preparation,
            device_class: race_pars.device_class,
            view_mode: race_pars.view_mode,
            cur_racetime: 0.0,
            laptimes: Vec::with_capacity(race_pars.tot_no_laps as usize),
            lap_start_racetime: 0.0,
            no_npcs: race_pars.no_npcs,
            tot_no_laps: race_pars.tot_no_laps,
            seed: race_pars.seed,
            rng,
            tx: None,
        };

        race.reset();
        race
    }

    /// The method discards track, vehicles and player state and builds a fresh race.
    pub fn reset(&mut self) {
        self.track = build_track(&self.atlas);
        self.vehicles = spawn_vehicles(&mut self.track, self.no_npcs, &mut self.rng);
        self.player = Player::new(self.tot_no_laps, self.device_class);
        self.anim = Default::default();
        self.phase = GamePhase::Preparation;
        self.cur_racetime = 0.0;
        self.laptimes.clear();
        self.lap_start_racetime = 0.0;

        info!(
            "Race reset: {} segments, track length {:.0}, {} vehicles, {} laps",
            self.track.no_segments(),
            self.track.length,
            self.vehicles.len(),
            self.tot_no_laps
        );
    }

    /// set_hud_sender attaches a channel that receives a HUD snapshot after every update step.
    pub fn set_hud_sender(&mut self, tx: Sender<HudState>) {
        self.tx = Some(tx);
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!("Game phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// player_segment_idx returns the segment the player car is located in (which lies
    /// player_z ahead of the camera).
    pub fn player_segment_idx(&self) -> usize {
        self.track
            .segment_idx(self.player.position + self.player.player_z)
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method performs one update step. Execution order:
    /// 1. Clamp dt to [0, 1] s and determine the player segment.
    /// 2. Advance the camera position (not during the countdown).
    /// 3. Steering and centrifugal drift.
    /// 4. Speed and boost integration depending on the game phase.
    /// 5. Off-road deceleration and hard stop against roadside decor.
    /// 6. Clamp lateral offset and speed.
    /// 7. NPC movement, bucket updates, blocking, relocation and animation.
    /// 8. Background scroll, camera depth and look-ahead distance.
    /// 9. Lap check and HUD publication.
    ///
    /// The update step only acts during the countdown and playing phases.
    pub fn update(&mut self, controls: &ControlSignals, dt: f64) {
        if !matches!(self.phase, GamePhase::Countdown | GamePhase::Playing) {
            return;
        }

        let dt = limit(dt, 0.0, 1.0);
        let track_length = self.track.length;
        let player_seg_idx = self.player_segment_idx();
        let player_curve = self.track.segment(player_seg_idx).curve;
        let player_z = self.player.player_z;

        // move (the position stays unwrapped until the lap check at the end of the step)
        let mut position = self.player.position;
        if self.phase != GamePhase::Countdown {
            position += dt * self.player.speed;
        }

        // steer and speed
        let mut next_x = self
            .player
            .steer(controls, self.device_class, player_curve, dt);
        let jitter = self.rng.random::<f64>();
        let (mut next_speed, next_nos) =
            self.player
                .integrate_speed(controls, self.phase, dt, jitter);
        self.player.nos = next_nos;

        // off road
        if !(-1.0..=1.0).contains(&next_x) {
            if next_speed > OFF_ROAD_LIMIT {
                next_speed = accelerate(next_speed, OFF_ROAD_DECEL, dt);
            }

            let seg = self.track.segment(player_seg_idx);
            if seg.sprites.iter().any(|sprite| {
                overlap(
                    next_x,
                    DECOR_COLLISION_WIDTH,
                    sprite.offset,
                    DECOR_COLLISION_WIDTH,
                    1.0,
                )
            }) {
                next_speed = POST_COLLISION_SPEED;
                position = pin_behind(seg.p1.z, player_z);
            }
        }

        next_x = limit(next_x, -PLAYER_X_LIMIT, PLAYER_X_LIMIT);
        next_speed = limit(next_speed, 0.0, MAX_SPEED);

        // traffic
        self.update_vehicles(
            dt,
            player_seg_idx,
            next_x,
            &mut next_speed,
            &mut position,
        );

        // background, camera
        let boosting = controls.boost && self.player.nos > 0.0;
        self.player.update_bg_offset(
            player_curve,
            controls.steer_direction(),
            self.device_class,
            dt,
        );
        let lap_crossed = !self.track.is_empty() && position > track_length - player_z;
        self.player.position = increase(position, 0.0, track_length);
        self.player.x = next_x;
        self.player.speed = next_speed;
        self.player.update_camera(self.device_class, boosting, dt);

        if self.phase == GamePhase::Playing {
            self.cur_racetime += dt;
        }

        if lap_crossed {
            self.handle_lap_transition();
        }
        self.publish_hud();
    }

    // ---------------------------------------------------------------------------------------------
    // UPDATE STEP PARTS ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method moves all vehicles, keeps the segment buckets in sync, lets slower vehicles
    /// block the player, relocates vehicles that fell too far behind and advances their
    /// animation.
    fn update_vehicles(
        &mut self,
        dt: f64,
        player_seg_idx: usize,
        player_x: f64,
        player_speed: &mut f64,
        position: &mut f64,
    ) {
        let track_length = self.track.length;
        let player_z = self.player.player_z;
        let player_lap = self.player.current_lap;

        for (i, vehicle) in self.vehicles.iter_mut().enumerate() {
            let old_idx = self.track.segment_idx(vehicle.z);
            vehicle.advance(dt, track_length);
            let new_idx = self.track.segment_idx(vehicle.z);

            if old_idx != new_idx {
                if let Some(old_seg) = self.track.segments.get_mut(old_idx) {
                    old_seg.cars.retain(|&car| car != i);
                }
                if let Some(new_seg) = self.track.segments.get_mut(new_idx) {
                    new_seg.cars.push(i);
                }
            }

            // blocking
            if new_idx == player_seg_idx
                && overlap(
                    player_x,
                    VEHICLE_COLLISION_WIDTH,
                    vehicle.offset,
                    VEHICLE_COLLISION_WIDTH,
                    1.0,
                )
                && *player_speed > vehicle.speed
            {
                *player_speed = vehicle.speed;
                *position = pin_behind(vehicle.z, player_z);
            }

            // relocation of vehicles that fell more than half a lap behind
            let player_distance =
                *position + player_lap.saturating_sub(1) as f64 * track_length;
            if player_distance - vehicle.race_z(track_length) > track_length / 2.0 {
                vehicle.relocate_ahead(track_length);
            }

            if let Some(period) = vehicle.class.frame_period() {
                let curve = self.track.find_segment(vehicle.z).curve;
                vehicle.anim.tick(dt * 1000.0, curve, period);
            }
        }
    }

    /// The method completes a lap. It is called once the unwrapped camera position passed the
    /// point one look-ahead distance before the track end. The final lap finishes the race.
    fn handle_lap_transition(&mut self) {
        if self.phase == GamePhase::Playing {
            self.laptimes
                .push(self.cur_racetime - self.lap_start_racetime);
            self.lap_start_racetime = self.cur_racetime;
        }

        if self.player.current_lap >= self.player.tot_no_laps {
            self.set_phase(GamePhase::Finished);
            self.player.speed = 0.0;
            info!(
                "Race finished after {:.3}s ({} laps)",
                self.cur_racetime, self.player.tot_no_laps
            );
        } else {
            self.player.current_lap += 1;
            self.player.position = 0.0;
            info!(
                "Lap {} started at race time {:.3}s",
                self.player.current_lap, self.cur_racetime
            );
        }
    }

    pub fn hud(&self) -> HudState {
        HudState {
            speed: (self.player.speed / 100.0).floor() as u32,
            nos: self.player.nos.floor() as u32,
            lap: self.player.current_lap,
            tot_no_laps: self.player.tot_no_laps,
            phase: self.phase,
            racetime: self.cur_racetime,
        }
    }

    fn publish_hud(&mut self) {
        let hud = self.hud();

        if let Some(tx) = &self.tx {
            if tx.send(hud).is_err() {
                debug!("HUD receiver disconnected, stop publishing");
                self.tx = None;
            }
        }
    }

    /// The method advances the player animation statemachines. It runs every frame, independent
    /// of the game phase.
    pub fn tick_animations(&mut self, controls: &ControlSignals, dt: f64) {
        self.anim
            .tick(controls, self.phase, self.player.nos, limit(dt, 0.0, 1.0) * 1000.0);
    }

    pub fn get_race_result(&self) -> RaceResult {
        RaceResult {
            tot_no_laps: self.tot_no_laps,
            laptimes: self.laptimes.to_owned(),
            racetime: self.cur_racetime,
            finished: self.is_finished(),
            seed: self.seed,
        }
    }
}

/// pin_behind returns the camera position that places the player car right behind the world
/// position z. The result never wraps backwards across the start line, otherwise a freshly started
/// lap would be counted again.
pub fn pin_behind(z: f64, player_z: f64) -> f64 {
    (z - player_z).max(0.0)
}
