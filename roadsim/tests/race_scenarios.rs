use approx::assert_relative_eq;
use proptest::prelude::*;
use roadsim::core::assets::SpriteAtlas;
use roadsim::core::car::{Vehicle, VehicleClass};
use roadsim::core::handle_race::{handle_race, Autopilot};
use roadsim::core::player::{MAX_SPEED, NOS_MAX, PLAYER_X_LIMIT, POST_COLLISION_SPEED};
use roadsim::core::race::{pin_behind, Race, RacePars};
use roadsim::core::track::{SpritePlacement, SEGMENT_LENGTH};
use roadsim::interfaces::controls::{ControlSignals, GamePhase};
use roadsim::pre::read_sim_pars::SimPars;

const DT: f64 = 1.0 / 60.0;

fn race_with_npcs(no_npcs: usize) -> Race {
    let pars = RacePars {
        no_npcs,
        seed: Some(42),
        ..Default::default()
    };
    let mut race = Race::new(&pars, SpriteAtlas::with_placeholders());
    race.set_phase(GamePhase::Playing);
    race
}

/// place_vehicle adds a vehicle to the race and registers it in the bucket of its segment.
fn place_vehicle(race: &mut Race, vehicle: Vehicle) -> usize {
    let idx = race.vehicles.len();
    let seg_idx = race.track.segment_idx(vehicle.z);
    race.vehicles.push(vehicle);
    race.track.segments[seg_idx].cars.push(idx);
    idx
}

#[test]
fn off_road_collision_resets_to_segment_start() {
    let mut race = race_with_npcs(0);
    race.player.position = 20.0 * SEGMENT_LENGTH;
    race.player.x = 1.5;
    race.player.speed = MAX_SPEED / 2.0;

    let seg_idx = race.player_segment_idx();
    let seg_start = race.track.segments[seg_idx].p1.z;
    race.track.segments[seg_idx].sprites = vec![SpritePlacement {
        source: "bench",
        offset: 1.5,
        offset_y: None,
    }];

    race.update(&ControlSignals::default(), DT);

    assert_relative_eq!(race.player.speed, POST_COLLISION_SPEED);
    assert_relative_eq!(
        race.player.position + race.player.player_z,
        seg_start,
        epsilon = 1e-6
    );
}

#[test]
fn final_lap_finishes_race() {
    let mut race = race_with_npcs(0);
    let track_length = race.track.length;
    race.player.position = track_length - race.player.player_z - 10.0;
    race.player.speed = MAX_SPEED / 2.0;

    race.update(&ControlSignals::default(), DT);

    assert_eq!(race.phase, GamePhase::Finished);
    assert_relative_eq!(race.player.speed, 0.0);
    assert_eq!(race.laptimes.len(), 1);

    // further updates do not move the car anymore
    let position = race.player.position;
    race.update(
        &ControlSignals {
            accelerate: true,
            ..Default::default()
        },
        DT,
    );
    assert_relative_eq!(race.player.position, position);
}

#[test]
fn lap_counter_advances_before_final_lap() {
    let pars = RacePars {
        tot_no_laps: 2,
        no_npcs: 0,
        seed: Some(1),
        ..Default::default()
    };
    let mut race = Race::new(&pars, SpriteAtlas::with_placeholders());
    race.set_phase(GamePhase::Playing);
    race.player.position = race.track.length - race.player.player_z - 10.0;
    race.player.speed = MAX_SPEED / 2.0;

    race.update(&ControlSignals::default(), DT);

    assert_eq!(race.phase, GamePhase::Playing);
    assert_eq!(race.player.current_lap, 2);
    assert_eq!(race.hud().lap, 2);
    assert_relative_eq!(race.player.position, 0.0);
}

#[test]
fn npc_far_behind_is_relocated_ahead() {
    let mut race = race_with_npcs(0);
    let track_length = race.track.length;
    race.player.position = 300_000.0;
    race.player.speed = 0.0;

    let rival_idx = race
        .vehicles
        .iter()
        .position(|v| v.is_rival())
        .unwrap();
    let rival = &race.vehicles[rival_idx];
    let expected = rival.race_z(track_length) + rival.speed * DT + track_length;

    race.update(&ControlSignals::default(), DT);

    let rival = &race.vehicles[rival_idx];
    assert_relative_eq!(rival.race_z(track_length), expected, epsilon = 1e-6);
    assert!(rival.race_z(track_length) > race.player.race_distance(track_length));
}

#[test]
fn vehicles_stay_in_their_segment_bucket() {
    let mut race = race_with_npcs(40);
    let mut autopilot = Autopilot::default();

    for _ in 0..300 {
        let controls = autopilot.controls(&race);
        race.update(&controls, DT);

        for (i, vehicle) in race.vehicles.iter().enumerate() {
            let expected = race.track.segment_idx(vehicle.z);
            let buckets: Vec<usize> = race
                .track
                .segments
                .iter()
                .filter(|s| s.cars.contains(&i))
                .map(|s| s.index)
                .collect();
            assert_eq!(buckets, vec![expected]);
        }
    }
}

#[test]
fn boost_resource_monotonicity() {
    let mut race = race_with_npcs(0);
    let boost = ControlSignals {
        accelerate: true,
        boost: true,
        ..Default::default()
    };

    let mut nos = race.player.nos;
    while race.player.nos > 0.0 {
        race.update(&boost, DT);
        assert!(race.player.nos <= nos);
        nos = race.player.nos;
    }

    let gas = ControlSignals {
        accelerate: true,
        ..Default::default()
    };
    for _ in 0..120 {
        race.update(&gas, DT);
        assert!(race.player.nos >= nos);
        assert!(race.player.nos <= NOS_MAX);
        nos = race.player.nos;
    }
}

#[test]
fn headless_race_finishes() {
    let sim_pars = SimPars {
        race_pars: RacePars {
            no_npcs: 10,
            seed: Some(5),
            ..Default::default()
        },
        ..Default::default()
    };

    let result = handle_race(&sim_pars, 1.0 / 30.0, 600.0).unwrap();
    assert!(result.finished);
    assert_eq!(result.laptimes.len(), 1);
    assert_relative_eq!(result.laptimes.iter().sum::<f64>(), result.racetime, epsilon = 1e-6);
}

#[test]
fn coarse_step_across_the_line_finishes_race() {
    let mut race = race_with_npcs(0);
    race.player.position = race.track.length - race.player.player_z - 10.0;
    race.player.speed = MAX_SPEED;

    // the step covers 1200 units, far beyond the look-ahead window before the line
    race.update(
        &ControlSignals {
            accelerate: true,
            ..Default::default()
        },
        0.1,
    );

    assert_eq!(race.phase, GamePhase::Finished);
    assert_eq!(race.laptimes.len(), 1);
    assert!((0.0..race.track.length).contains(&race.player.position));
}

#[test]
fn coarse_step_across_the_line_advances_lap() {
    let pars = RacePars {
        tot_no_laps: 2,
        no_npcs: 0,
        seed: Some(1),
        ..Default::default()
    };
    let mut race = Race::new(&pars, SpriteAtlas::with_placeholders());
    race.set_phase(GamePhase::Playing);
    race.player.position = race.track.length - race.player.player_z - 10.0;
    race.player.speed = MAX_SPEED;

    race.update(&ControlSignals::default(), 0.1);

    assert_eq!(race.phase, GamePhase::Playing);
    assert_eq!(race.player.current_lap, 2);
    assert_eq!(race.laptimes.len(), 1);
    assert_relative_eq!(race.player.position, 0.0);
}

#[test]
fn headless_race_with_coarse_step_finishes() {
    let sim_pars = SimPars {
        race_pars: RacePars {
            no_npcs: 10,
            seed: Some(5),
            ..Default::default()
        },
        ..Default::default()
    };

    let result = handle_race(&sim_pars, 0.1, 600.0).unwrap();
    assert!(result.finished);
    assert_eq!(result.laptimes.len(), 1);
}

#[test]
fn blocking_right_after_the_start_line_keeps_the_lap() {
    let pars = RacePars {
        tot_no_laps: 3,
        no_npcs: 0,
        seed: Some(7),
        ..Default::default()
    };
    let mut race = Race::new(&pars, SpriteAtlas::with_placeholders());
    race.set_phase(GamePhase::Playing);
    race.player.position = 0.0;
    race.player.speed = MAX_SPEED / 2.0;

    // slow truck in the player segment, still closer to the line than the look-ahead distance
    let truck_idx = place_vehicle(
        &mut race,
        Vehicle::new(0.0, 405.0, 600.0, VehicleClass::Truck, 0.0),
    );
    assert_eq!(race.track.segment_idx(405.0), race.player_segment_idx());

    race.update(&ControlSignals::default(), DT);

    assert!(race.vehicles[truck_idx].z < race.player.player_z);
    assert_relative_eq!(race.player.speed, 600.0);
    assert_relative_eq!(race.player.position, 0.0);
    assert_eq!(race.player.current_lap, 1);
    assert!(race.laptimes.is_empty());

    race.update(&ControlSignals::default(), DT);
    assert_eq!(race.player.current_lap, 1);
    assert!(race.laptimes.is_empty());
}

#[test]
fn slower_vehicle_ahead_blocks_player() {
    let mut race = race_with_npcs(0);
    race.player.position = 20.0 * SEGMENT_LENGTH;
    race.player.speed = MAX_SPEED / 2.0;

    let seg_start = race.track.segments[race.player_segment_idx()].p1.z;
    let truck_idx = place_vehicle(
        &mut race,
        Vehicle::new(0.0, seg_start + 50.0, 1000.0, VehicleClass::Truck, 0.0),
    );

    race.update(&ControlSignals::default(), DT);

    let truck = &race.vehicles[truck_idx];
    assert_relative_eq!(race.player.speed, truck.speed);
    assert_relative_eq!(
        race.player.position + race.player.player_z,
        truck.z,
        epsilon = 1e-6
    );
}

#[test]
fn vehicle_beside_player_does_not_block() {
    let mut race = race_with_npcs(0);
    let start = 20.0 * SEGMENT_LENGTH;
    race.player.position = start;
    race.player.speed = MAX_SPEED / 2.0;

    let seg_start = race.track.segments[race.player_segment_idx()].p1.z;
    let truck_idx = place_vehicle(
        &mut race,
        Vehicle::new(0.5, seg_start + 50.0, 1000.0, VehicleClass::Truck, 0.0),
    );

    race.update(&ControlSignals::default(), DT);

    assert!(race.player.speed > race.vehicles[truck_idx].speed);
    assert_relative_eq!(
        race.player.position,
        start + MAX_SPEED / 2.0 * DT,
        epsilon = 1e-6
    );
}

#[test]
fn pin_behind_never_wraps_backwards() {
    assert_relative_eq!(pin_behind(1000.0, 419.5), 580.5);
    assert_relative_eq!(pin_behind(415.0, 419.5), 0.0);
    assert_relative_eq!(pin_behind(0.0, 419.5), 0.0);
}

fn controls_strategy() -> impl Strategy<Value = ControlSignals> {
    (
        any::<bool>(),
        any::<bool>(),
        -1.0f64..1.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(steer_left, steer_right, analog_steer, accelerate, brake, boost)| ControlSignals {
                steer_left,
                steer_right,
                analog_steer,
                accelerate,
                brake,
                boost,
                toggle_view: false,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn update_keeps_state_in_range(
        steps in prop::collection::vec((controls_strategy(), 0.0f64..2.0), 1..40),
        start_x in -3.0f64..3.0,
        start_speed in 0.0f64..MAX_SPEED,
    ) {
        let mut race = race_with_npcs(10);
        race.player.x = start_x;
        race.player.speed = start_speed;

        for (controls, dt) in steps.iter() {
            race.update(controls, *dt);

            prop_assert!((0.0..=MAX_SPEED).contains(&race.player.speed));
            prop_assert!((-PLAYER_X_LIMIT..=PLAYER_X_LIMIT).contains(&race.player.x));
            prop_assert!((0.0..race.track.length).contains(&race.player.position));
            prop_assert!((0.0..=NOS_MAX).contains(&race.player.nos));
        }
    }
}
