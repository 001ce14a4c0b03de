pub mod core {
    pub mod assets;
    pub mod car;
    pub mod handle_race;
    pub mod player;
    pub mod race;
    pub mod state_handler;
    pub mod track;
    pub mod track_builder;
}
pub mod interfaces {
    pub mod controls;
    pub mod gui_interface;
}
pub mod post {
    pub mod race_result;
    pub mod track_export;
}
pub mod pre {
    pub mod check_sim_opts_pars;
    pub mod read_sim_pars;
    pub mod sim_opts;
}
pub mod render {
    pub mod frame;
    pub mod minimap;
    pub mod pipeline;
    pub mod sprites;
}

#[cfg(test)]
mod track_tests {
    use crate::core::track::{ColorBand, Palette, PalettePars, Segment, Track, SEGMENT_LENGTH};
    use crate::interfaces::gui_interface::RgbColor;
    use approx::assert_ulps_eq;

    fn straight_track(n: usize) -> Track {
        Track::new((0..n).map(|i| Segment::new(i, 0.0, 0.0, 0.0)).collect())
    }

    #[test]
    fn test_segment_idx_wraps() {
        let track = straight_track(10);
        assert_ulps_eq!(track.length, 10.0 * SEGMENT_LENGTH);
        assert_eq!(track.segment_idx(0.0), 0);
        assert_eq!(track.segment_idx(450.0), 2);
        assert_eq!(track.segment_idx(2000.0), 0);
        assert_eq!(track.segment_idx(-10.0), 9);
        assert_eq!(track.find_segment(2150.0).index, 0);
    }

    #[test]
    fn test_empty_track_placeholder() {
        let track = Track::empty();
        assert!(track.is_empty());
        assert_eq!(track.segment_idx(1234.0), 0);
        let seg = track.find_segment(1234.0);
        assert_ulps_eq!(seg.curve, 0.0);
        assert!(seg.sprites.is_empty());
        assert_eq!(track.segment(17).index, 0);
    }

    #[test]
    fn test_segment_banding() {
        assert_eq!(Segment::new(0, 0.0, 0.0, 0.0).band, ColorBand::Light);
        assert_eq!(Segment::new(2, 0.0, 0.0, 0.0).band, ColorBand::Light);
        assert_eq!(Segment::new(3, 0.0, 0.0, 0.0).band, ColorBand::Dark);
        assert_eq!(Segment::new(6, 0.0, 0.0, 0.0).band, ColorBand::Light);
        let seg = Segment::new(4, 1.0, 10.0, 20.0);
        assert_ulps_eq!(seg.p1.z, 800.0);
        assert_ulps_eq!(seg.p2.z, 1000.0);
    }

    #[test]
    fn test_palette_from_pars() {
        let palette = Palette::from_pars(&PalettePars::default()).unwrap();
        assert_eq!(palette.light.strip, Some(RgbColor::new(0xfb, 0xbf, 0x24)));
        assert!(palette.dark.strip.is_none());
        assert_eq!(palette.band(ColorBand::Finish).road, RgbColor::new(0, 0, 0));

        let mut pars = PalettePars::default();
        pars.sky = String::from("not a color");
        assert!(Palette::from_pars(&pars).is_err());
    }
}

#[cfg(test)]
mod track_builder_tests {
    use crate::core::assets::SpriteAtlas;
    use crate::core::track::{ColorBand, SEGMENT_LENGTH};
    use crate::core::track_builder::*;
    use approx::{assert_relative_eq, assert_ulps_eq};

    #[test]
    fn test_circuit_closure() {
        let track = TrackBuilder::circuit().finish();
        assert_eq!(track.no_segments(), 2250);
        assert_ulps_eq!(track.length, 2250.0 * SEGMENT_LENGTH);
        assert_ulps_eq!(track.segments[0].p1.y, 0.0);
        assert_ulps_eq!(track.segments[track.no_segments() - 1].p2.y, 0.0);

        // consecutive segments share their boundary elevation
        for pair in track.segments.windows(2) {
            assert_ulps_eq!(pair[0].p2.y, pair[1].p1.y);
        }
    }

    #[test]
    fn test_finish_band() {
        let track = TrackBuilder::circuit().finish();
        let n = track.no_segments();
        assert!(track.segments[n - 3..]
            .iter()
            .all(|s| s.band == ColorBand::Finish));
        assert_ne!(track.segments[n - 4].band, ColorBand::Finish);
    }

    #[test]
    fn test_add_road_reaches_height() {
        let mut builder = TrackBuilder::new();
        builder.add_curve(LENGTH_SHORT, CURVE_HARD, HILL_HIGH);
        assert_eq!(builder.no_segments(), 75);
        assert_ulps_eq!(builder.last_y(), HILL_HIGH * SEGMENT_LENGTH);

        let track = builder.finish();
        assert_ulps_eq!(track.segments[0].curve, 0.0);
        assert_ulps_eq!(track.segments[30].curve, CURVE_HARD);
        assert!(track.segments[74].curve < CURVE_HARD);
    }

    #[test]
    fn test_bumps_and_s_curves() {
        let mut builder = TrackBuilder::new();
        builder.add_bumps();
        assert_eq!(builder.no_segments(), 240);
        assert_relative_eq!(builder.last_y(), 7.0 * SEGMENT_LENGTH, epsilon = 1e-9);

        let mut builder = TrackBuilder::new();
        builder.add_s_curves();
        assert_eq!(builder.no_segments(), 750);
        assert_relative_eq!(builder.last_y(), 20.0 * SEGMENT_LENGTH, epsilon = 1e-9);

        builder.add_downhill_to_end(10);
        assert_ulps_eq!(builder.last_y(), 0.0);
    }

    #[test]
    fn test_build_track_idempotent() {
        let atlas = SpriteAtlas::with_placeholders();
        let a = build_track(&atlas);
        let b = build_track(&atlas);

        assert_eq!(a.no_segments(), b.no_segments());
        for (sa, sb) in a.segments.iter().zip(b.segments.iter()) {
            assert_ulps_eq!(sa.curve, sb.curve);
            assert_ulps_eq!(sa.p1.y, sb.p1.y);
            assert_ulps_eq!(sa.p2.y, sb.p2.y);
            assert_eq!(sa.zebra, sb.zebra);
            assert_eq!(sa.sprites, sb.sprites);
        }
    }

    #[test]
    fn test_decor_requires_atlas_entries() {
        let track = build_track(&SpriteAtlas::new());
        assert!(track.segments.iter().all(|s| s.sprites.is_empty()));
        // intersections do not depend on the assets
        assert!(track.segments.iter().any(|s| s.zebra));
    }

    #[test]
    fn test_decor_layout() {
        let track = build_track(&SpriteAtlas::with_placeholders());
        let names = |idx: usize| -> Vec<&str> {
            track.segments[idx].sprites.iter().map(|s| s.source).collect()
        };

        // first block starts at segment 50 with the left building, right one 5 segments later
        assert!(names(DECOR_START_SEGMENT).contains(&LEFT_BUILDINGS[0]));
        assert!(names(DECOR_START_SEGMENT + 5).contains(&RIGHT_BUILDINGS[0]));

        // block 0 is an intersection: zebra crossing in front of the block and traffic lights
        assert!(track.segments[DECOR_START_SEGMENT - 10].zebra);
        assert_eq!(
            names(DECOR_START_SEGMENT - 10)
                .iter()
                .filter(|&&n| n == "traffic_light")
                .count(),
            2
        );

        // block 1 has a landmark on the right side, i.e. only left trees are planted
        let n = DECOR_START_SEGMENT + BLOCK_LENGTH;
        assert!(is_landmark(RIGHT_BUILDINGS[1]));
        assert!(names(n + 15).contains(&"tree_1"));
        assert!(!names(n + 17).iter().any(|s| s.starts_with("tree_")));

        // street props of block 0 are placed independently of the trees
        assert!(names(DECOR_START_SEGMENT + 20).contains(&"trash_left"));
        assert!(names(DECOR_START_SEGMENT + 18).contains(&"bench"));

        // nothing is placed on the finish straight
        let len = track.no_segments();
        assert!(track.segments[len - 100..]
            .iter()
            .all(|s| s.sprites.is_empty()));
    }

    #[test]
    fn test_is_landmark() {
        assert!(is_landmark("building_l_mcc_1"));
        assert!(is_landmark("building_r_burgerking_2"));
        assert!(!is_landmark("building_l_basmallah"));
    }
}

#[cfg(test)]
mod assets_tests {
    use crate::core::assets::*;
    use crate::interfaces::gui_interface::RgbColor;
    use approx::assert_ulps_eq;

    #[test]
    fn test_lookup_miss_returns_placeholder() {
        let atlas = SpriteAtlas::new();
        let info = atlas.get("cone");
        assert!(info.placeholder);
        assert_ulps_eq!(info.width, PLACEHOLDER_SIZE);
        assert_ulps_eq!(info.height, PLACEHOLDER_SIZE);
        assert_eq!(info.color, RgbColor::new(0xf9, 0x73, 0x16));
        assert_eq!(atlas.get(PLAYER_CAR).color, RgbColor::new(0xef, 0x44, 0x44));
        assert_eq!(atlas.get("taxi_left_1").color, RgbColor::new(0x3b, 0x82, 0xf6));
        assert_eq!(atlas.get("bench").color, RgbColor::new(0x44, 0x44, 0x44));
    }

    #[test]
    fn test_insert_overrides_placeholder() {
        let mut atlas = SpriteAtlas::with_placeholders();
        assert!(atlas.contains(COCKPIT));
        assert_eq!(atlas.len(), catalogue().len());

        atlas.insert(PLAYER_CAR, 320.0, 160.0, RgbColor::new(1, 2, 3));
        let info = atlas.get(PLAYER_CAR);
        assert!(!info.placeholder);
        assert_ulps_eq!(info.width, 320.0);
    }
}



#[cfg(test)]
mod state_handler_tests {
    use crate::core::state_handler::*;
    use crate::interfaces::controls::{ControlSignals, GamePhase};

    #[test]
    fn test_boost_startup_then_loop() {
        let mut anim = BoostAnimation::default();
        assert!(anim.sprite_name().is_none());

        // the first tick enters startup, each further frame duration advances one frame
        for _ in 0..NO_STARTUP_FRAMES {
            anim.tick(true, NOS_FRAME_DURATION);
            assert_eq!(anim.phase(), BoostPhase::Startup);
        }
        anim.tick(true, NOS_FRAME_DURATION);
        assert_eq!(anim.phase(), BoostPhase::Loop);
        assert_eq!(anim.sprite_name(), Some("nos_7"));

        for _ in 0..(3 * NO_LOOP_FRAMES) {
            anim.tick(true, NOS_FRAME_DURATION);
            assert_eq!(anim.phase(), BoostPhase::Loop);
            assert!(anim.frame() < NO_LOOP_FRAMES);
        }
    }

    #[test]
    fn test_boost_ending_and_resume() {
        let mut anim = BoostAnimation::default();
        for _ in 0..20 {
            anim.tick(true, NOS_FRAME_DURATION);
        }

        anim.tick(false, NOS_FRAME_DURATION);
        assert_eq!(anim.phase(), BoostPhase::Ending);
        assert_eq!(anim.sprite_name(), Some("nos_16"));

        // pressing again during the ending skips the startup sequence
        anim.tick(true, NOS_FRAME_DURATION);
        assert_eq!(anim.phase(), BoostPhase::Loop);

        anim.tick(false, NOS_FRAME_DURATION);
        for _ in 0..NO_ENDING_FRAMES {
            anim.tick(false, NOS_FRAME_DURATION);
        }
        assert_eq!(anim.phase(), BoostPhase::Idle);
        assert!(anim.sprite_name().is_none());
    }

    #[test]
    fn test_player_poses() {
        let mut anim = PlayerAnimation::default();
        assert!(anim.pose_sprite().is_none());

        let gas = ControlSignals {
            accelerate: true,
            ..Default::default()
        };
        anim.tick(&gas, GamePhase::Countdown, 100.0, 16.0);
        assert_eq!(anim.pose, PlayerPose::Rev);
        assert_eq!(anim.pose_sprite(), Some("start_1"));

        anim.tick(&gas, GamePhase::Countdown, 100.0, POSE_FRAME_DURATION);
        assert_eq!(anim.pose_sprite(), Some("start_2"));

        let left = ControlSignals {
            accelerate: true,
            steer_left: true,
            ..Default::default()
        };
        anim.tick(&left, GamePhase::Playing, 100.0, 16.0);
        assert_eq!(anim.pose, PlayerPose::Left);
        assert!(anim.is_turning());

        let brake = ControlSignals {
            brake: true,
            steer_left: true,
            ..Default::default()
        };
        anim.tick(&brake, GamePhase::Playing, 100.0, 16.0);
        assert_eq!(anim.pose, PlayerPose::Brake);
        assert!(!anim.is_turning());
    }

    #[test]
    fn test_boost_requires_resource() {
        let mut anim = PlayerAnimation::default();
        let boost = ControlSignals {
            boost: true,
            ..Default::default()
        };
        anim.tick(&boost, GamePhase::Playing, 0.0, 16.0);
        assert_eq!(anim.boost.phase(), BoostPhase::Idle);
        anim.tick(&boost, GamePhase::Playing, 10.0, 16.0);
        assert_eq!(anim.boost.phase(), BoostPhase::Startup);
    }
}

#[cfg(test)]
mod race_tests {
    use crate::core::assets::SpriteAtlas;
    use crate::core::race::{Race, RacePars};
    use crate::interfaces::controls::{ControlSignals, GamePhase, ViewMode};
    use approx::assert_ulps_eq;

    fn race() -> Race {
        let pars = RacePars {
            seed: Some(7),
            ..Default::default()
        };
        Race::new(&pars, SpriteAtlas::with_placeholders())
    }

    #[test]
    fn test_reset() {
        let race = race();
        assert_eq!(race.phase, GamePhase::Preparation);
        assert_eq!(race.vehicles.len(), 21);
        assert_eq!(
            race.track.segments.iter().map(|s| s.cars.len()).sum::<usize>(),
            21
        );
        assert_ulps_eq!(race.player.position, 0.0);
    }

    #[test]
    fn test_update_is_gated_by_phase() {
        let mut race = race();
        let gas = ControlSignals {
            accelerate: true,
            ..Default::default()
        };
        race.update(&gas, 0.1);
        assert_ulps_eq!(race.player.speed, 0.0);

        // no movement during the countdown, only revving
        race.set_phase(GamePhase::Countdown);
        race.update(&gas, 0.1);
        assert!(race.player.speed > 0.0);
        assert_ulps_eq!(race.player.position, 0.0);

        race.set_phase(GamePhase::Playing);
        race.update(&gas, 0.1);
        assert!(race.player.position > 0.0);
        assert!(race.cur_racetime > 0.0);
    }

    #[test]
    fn test_hud_channel() {
        let mut race = race();
        let (tx, rx) = flume::unbounded();
        race.set_hud_sender(tx);
        race.set_phase(GamePhase::Playing);
        race.player.speed = 5000.0;
        race.update(&ControlSignals::default(), 0.01);

        let hud = rx.try_recv().unwrap();
        assert_eq!(hud.lap, 1);
        assert_eq!(hud.tot_no_laps, 1);
        assert_eq!(hud.phase, GamePhase::Playing);
        assert!(hud.speed > 0 && hud.speed <= 50);

        // a dropped receiver does not disturb the race
        drop(rx);
        race.update(&ControlSignals::default(), 0.01);
    }

    #[test]
    fn test_toggle_view_mode() {
        let mut race = race();
        assert_eq!(race.view_mode, ViewMode::Third);
        race.toggle_view_mode();
        assert_eq!(race.view_mode, ViewMode::First);
    }
}

#[cfg(test)]
mod render_tests {
    use crate::core::assets::{SpriteAtlas, COCKPIT, PLAYER_CAR};
    use crate::core::race::{Race, RacePars};
    use crate::core::track::{Palette, PalettePars, Track, TrackPars};
    use crate::interfaces::controls::{ControlSignals, ViewMode};
    use crate::render::frame::{Color, DrawCmd};
    use crate::render::pipeline::Renderer;
    use crate::render::sprites::{place_sprite, world_width_multiplier, ScreenSprite};
    use approx::assert_ulps_eq;
    use helpers::projection::Viewport;

    const VIEWPORT: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };

    fn setup() -> (Race, Renderer) {
        let race = Race::new(
            &RacePars {
                seed: Some(3),
                ..Default::default()
            },
            SpriteAtlas::with_placeholders(),
        );
        let renderer = Renderer::new(
            &TrackPars::default(),
            Palette::from_pars(&PalettePars::default()).unwrap(),
        );
        (race, renderer)
    }

    #[test]
    fn test_empty_track_fills_black() {
        let (mut race, mut renderer) = setup();
        race.track = Track::empty();
        race.vehicles.clear();

        let frame = renderer.render(&race, &ControlSignals::default(), VIEWPORT);
        assert_eq!(frame.cmds, vec![DrawCmd::Fill { color: Color::BLACK }]);
    }

    #[test]
    fn test_third_person_frame() {
        let (race, mut renderer) = setup();
        let frame = renderer.render(&race, &ControlSignals::default(), VIEWPORT);

        assert!(matches!(frame.cmds[0], DrawCmd::Fill { .. }));
        assert_eq!(renderer.projected().len(), TrackPars::default().draw_distance);
        assert!(renderer.projected().iter().any(|p| p.drawn));
        assert!(frame.sprite_names().contains(&PLAYER_CAR));
        assert!(!frame.sprite_names().contains(&COCKPIT));

        // drawn bands always face the camera
        for proj in renderer.projected().iter().filter(|p| p.drawn) {
            assert!(proj.p2.screen.y < proj.p1.screen.y);
        }
    }

    #[test]
    fn test_first_person_overlay() {
        let (mut race, mut renderer) = setup();
        race.view_mode = ViewMode::First;
        let brake = ControlSignals {
            brake: true,
            ..Default::default()
        };
        let frame = renderer.render(&race, &brake, VIEWPORT);

        assert!(!frame.sprite_names().contains(&PLAYER_CAR));
        assert!(matches!(
            frame.cmds.last(),
            Some(DrawCmd::Sprite { name, .. }) if *name == COCKPIT
        ));
        assert!(frame
            .cmds
            .iter()
            .any(|cmd| matches!(cmd, DrawCmd::VerticalGradient { .. })));
    }

    #[test]
    fn test_render_is_deterministic() {
        let (race, mut renderer) = setup();
        let a = renderer.render(&race, &ControlSignals::default(), VIEWPORT);
        let b = renderer.render(&race, &ControlSignals::default(), VIEWPORT);
        assert_eq!(a.cmds, b.cmds);
    }

    #[test]
    fn test_sprite_clipping() {
        let atlas = SpriteAtlas::with_placeholders();
        let mut sprite = ScreenSprite {
            name: "bench",
            scale: 0.0005,
            x: 500.0,
            y: 600.0,
            offset_x: 0.0,
            offset_y: -1.0,
            clip: 0.0,
        };
        let full = place_sprite(&atlas, &VIEWPORT, &sprite).unwrap();
        let full_h = match full {
            DrawCmd::Sprite {
                h,
                visible_fraction,
                ..
            } => {
                assert_ulps_eq!(visible_fraction, 1.0);
                h
            }
            _ => panic!("sprite expected"),
        };

        // half of the sprite hidden behind a crest
        sprite.clip = 600.0 - full_h / 2.0;
        match place_sprite(&atlas, &VIEWPORT, &sprite).unwrap() {
            DrawCmd::Sprite {
                h,
                visible_fraction,
                ..
            } => {
                assert!((h - full_h / 2.0).abs() < 1e-9);
                assert!((visible_fraction - 0.5).abs() < 1e-9);
            }
            _ => panic!("sprite expected"),
        }

        // fully hidden and too far away
        sprite.clip = 600.0 - full_h - 1.0;
        assert!(place_sprite(&atlas, &VIEWPORT, &sprite).is_none());
        sprite.clip = 0.0;
        sprite.scale = 1e-6;
        assert!(place_sprite(&atlas, &VIEWPORT, &sprite).is_none());
    }

    #[test]
    fn test_world_width_multiplier() {
        assert_ulps_eq!(world_width_multiplier("building_l_mcc_1"), 12.0);
        assert_ulps_eq!(world_width_multiplier("tree_3"), 8.0);
        assert_ulps_eq!(world_width_multiplier("truck_left_0"), 1.5);
        assert_ulps_eq!(world_width_multiplier("traffic_light"), 3.0);
        assert_ulps_eq!(world_width_multiplier("van_straight_0"), 0.9);
    }
}
