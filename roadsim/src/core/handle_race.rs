use crate::core::assets::SpriteAtlas;
use crate::core::player::VEHICLE_COLLISION_WIDTH;
use crate::core::race::Race;
use crate::interfaces::controls::{ControlSignals, GamePhase};
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use helpers::general::overlap;
use tracing::{debug, info, warn};

/// Duration of the countdown before the race starts.
pub const COUNTDOWN_DURATION: f64 = 5.0;

const LOOKAHEAD_SEGMENTS: usize = 20;
const AUTOPILOT_LANES: [f64; 3] = [-0.6, 0.0, 0.6];
const AUTOPILOT_TOLERANCE: f64 = 0.05;
const AUTOPILOT_BOOST_RESERVE: f64 = 50.0;

/// Autopilot produces control signals for headless races. It drives flat out, changes lanes to
/// pass slower traffic and boosts on straights.
#[derive(Debug, Default)]
pub struct Autopilot {
    target_x: f64,
}

impl Autopilot {
    pub fn controls(&mut self, race: &Race) -> ControlSignals {
        let player = &race.player;

        if race.phase == GamePhase::Countdown {
            return ControlSignals {
                accelerate: true,
                ..Default::default()
            };
        }

        // pick a free lane if the current target lane is blocked by slower traffic
        let blocked = |lane: f64| Autopilot::lane_blocked(race, lane);
        if blocked(self.target_x) {
            if let Some(&lane) = AUTOPILOT_LANES
                .iter()
                .filter(|&&lane| !blocked(lane))
                .min_by(|a, b| (*a - player.x).abs().total_cmp(&(*b - player.x).abs()))
            {
                self.target_x = lane;
            }
        }

        let err = self.target_x - player.x;
        let curve = race.track.segment(race.player_segment_idx()).curve;

        ControlSignals {
            steer_left: err < -AUTOPILOT_TOLERANCE,
            steer_right: err > AUTOPILOT_TOLERANCE,
            analog_steer: (err * 4.0).clamp(-1.0, 1.0),
            accelerate: true,
            brake: false,
            boost: player.nos > AUTOPILOT_BOOST_RESERVE
                && curve.abs() < 0.5
                && err.abs() <= AUTOPILOT_TOLERANCE,
            toggle_view: false,
        }
    }

    fn lane_blocked(race: &Race, lane: f64) -> bool {
        let n = race.track.no_segments();
        if n == 0 {
            return false;
        }
        let start = race.player_segment_idx();

        (0..LOOKAHEAD_SEGMENTS.min(n)).any(|k| {
            race.track.segment((start + k) % n).cars.iter().any(|&i| {
                race.vehicles.get(i).is_some_and(|v| {
                    v.speed < race.player.speed
                        && overlap(lane, VEHICLE_COLLISION_WIDTH, v.offset, VEHICLE_COLLISION_WIDTH, 1.0)
                })
            })
        })
    }
}

/// handle_race creates a race on the basis of the inserted parameters, drives it headless with
/// the autopilot using a fixed time step, and returns the results for post-processing. The race
/// is aborted once max_racetime is exceeded.
pub fn handle_race(
    sim_pars: &SimPars,
    timestep_size: f64,
    max_racetime: f64,
) -> anyhow::Result<RaceResult> {
    // create the race
    let mut race = Race::new(&sim_pars.race_pars, SpriteAtlas::with_placeholders());
    let mut autopilot = Autopilot::default();

    // COUNTDOWN -----------------------------------------------------------------------------------
    race.set_phase(GamePhase::Countdown);
    let mut t_countdown = 0.0;

    while t_countdown < COUNTDOWN_DURATION {
        let controls = autopilot.controls(&race);
        race.update(&controls, timestep_size);
        race.tick_animations(&controls, timestep_size);
        t_countdown += timestep_size;
    }

    // RACE ----------------------------------------------------------------------------------------
    race.set_phase(GamePhase::Playing);
    let mut t_race_update_print = 0.0;

    while !race.is_finished() {
        let controls = autopilot.controls(&race);
        race.update(&controls, timestep_size);
        race.tick_animations(&controls, timestep_size);

        // print status (with a maximum of 1 Hz)
        if race.cur_racetime > t_race_update_print + 0.9999 {
            debug!(
                "Simulating... race time {:.3}s, lap {}, position {:.0}, speed {}",
                race.cur_racetime,
                race.player.current_lap,
                race.player.position,
                race.hud().speed
            );
            t_race_update_print = race.cur_racetime;
        }

        if race.cur_racetime > max_racetime {
            warn!(
                "Race aborted after exceeding the maximum race time of {:.1}s",
                max_racetime
            );
            break;
        }
    }

    info!(
        "Race done: {} laps in {:.3}s",
        race.laptimes.len(),
        race.cur_racetime
    );

    // return race result
    Ok(race.get_race_result())
}
