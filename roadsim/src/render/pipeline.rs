use crate::core::assets::{SpriteAtlas, BACKGROUND, BACKGROUND_TOUCH, COCKPIT, PLAYER_CAR};
use crate::core::player::{extra_parallax, CAMERA_HEIGHT, FIRST_PERSON_CAMERA_HEIGHT};
use crate::core::race::Race;
use crate::core::track::{BandColors, Palette, PalettePars, TrackPars, ROAD_WIDTH, SEGMENT_LENGTH};
use crate::interfaces::controls::{ControlSignals, ViewMode};
use crate::render::frame::{Color, DrawCmd, Frame};
use crate::render::sprites::{place_sprite, ScreenSprite, MIN_SPRITE_SCALE};
use helpers::general::{exponential_fog, interpolate, limit, percent_remaining};
use helpers::projection::{project, Camera, ProjectedPoint, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// GROUND DETAILS ----------------------------------------------------------------------------------
const NO_NOISE_SPECKS: usize = 20;
const NOISE_COLOR: Color = Color::rgba(0, 0, 0, 0.1);
const SIDEWALK_WIDTH_FACTOR: f64 = 0.5;
const CURB_WIDTH_FACTOR: f64 = 0.05;
const NO_ZEBRA_STRIPES: usize = 10;
const LANE_MARKER_WIDTH_FACTOR: f64 = 1.0 / 30.0;

// PLAYER ------------------------------------------------------------------------------------------
/// Screen width the player sprite sizes are designed for.
const PLAYER_REFERENCE_WIDTH: f64 = 1920.0;
const PLAYER_SCALE: f64 = 1.5;
const TURN_CORRECTIVE_SCALE: f64 = 0.84;
const PLAYER_STEER_SHIFT: f64 = 50.0;
const PLAYER_BOTTOM_MARGIN: f64 = 35.0;
const FALLBACK_CAR_SIZE: (f64, f64) = (200.0, 100.0);
const COCKPIT_STEER_SHIFT: f64 = -30.0;
const COCKPIT_VISIBLE_FRACTION: f64 = 0.8;
const BRAKE_GLOW_HEIGHT: f64 = 150.0;
const BRAKE_GLOW: Color = Color::rgba(255, 0, 0, 0.4);

/// ProjectedSegment holds the per-frame projection results of one segment within the draw
/// distance. It lives in the scratch buffer of the renderer such that the track stays untouched.
/// * `idx` - Index of the segment in the track
/// * `p1`/`p2` - Projected near and far boundary
/// * `clip` - Occlusion floor (screen y) at the time the segment was processed
/// * `fog` - Fog factor in [0, 1] (1.0 = no fog)
/// * `drawn` - Flag indicating if the ground band of the segment was drawn
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectedSegment {
    pub idx: usize,
    pub p1: ProjectedPoint,
    pub p2: ProjectedPoint,
    pub clip: f64,
    pub fog: f64,
    pub looped: bool,
    pub drawn: bool,
}

/// Renderer converts the state of a race into a display list. Rendering only reads the race.
#[derive(Debug)]
pub struct Renderer {
    palette: Palette,
    draw_distance: usize,
    fog_density: f64,
    lanes: u32,
    scratch: Vec<ProjectedSegment>,
}

impl Renderer {
    pub fn new(track_pars: &TrackPars, palette: Palette) -> Renderer {
        Renderer {
            palette,
            draw_distance: track_pars.draw_distance,
            fog_density: track_pars.fog_density,
            lanes: track_pars.lanes.max(1),
            scratch: Vec::with_capacity(track_pars.draw_distance),
        }
    }

    pub fn from_pars(track_pars: &TrackPars, palette_pars: &PalettePars) -> anyhow::Result<Renderer> {
        Ok(Renderer::new(track_pars, Palette::from_pars(palette_pars)?))
    }

    /// projected returns the projection results of the last rendered frame, ordered from the
    /// camera to the draw distance.
    pub fn projected(&self) -> &[ProjectedSegment] {
        &self.scratch
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method renders one frame:
    /// 1. Sky and parallax background.
    /// 2. Near-to-far pass projecting the segments and drawing the ground bands with hill
    /// occlusion.
    /// 3. Far-to-near pass drawing decor, vehicles and (third person) the player car.
    /// 4. First person cockpit overlay.
    pub fn render(&mut self, race: &Race, controls: &ControlSignals, viewport: Viewport) -> Frame {
        let mut frame = Frame::new(viewport.width, viewport.height);
        self.scratch.clear();

        let track = &race.track;
        if track.is_empty() {
            frame.push(DrawCmd::Fill {
                color: Color::BLACK,
            });
            return frame;
        }

        frame.push(DrawCmd::Fill {
            color: Color::from(self.palette.sky),
        });
        self.render_background(&mut frame, race, &viewport);

        // PROJECTION AND GROUND -------------------------------------------------------------------
        let player = &race.player;
        let no_segments = track.no_segments();
        let draw_distance = self.draw_distance.min(no_segments);

        let base_idx = track.segment_idx(player.position);
        let base_percent = percent_remaining(player.position, SEGMENT_LENGTH);
        let player_seg_idx = race.player_segment_idx();
        let player_seg = track.segment(player_seg_idx);
        let player_percent = percent_remaining(player.position + player.player_z, SEGMENT_LENGTH);
        let player_y = interpolate(player_seg.p1.y, player_seg.p2.y, player_percent);

        let camera_height = match race.view_mode {
            ViewMode::First => FIRST_PERSON_CAMERA_HEIGHT,
            ViewMode::Third => CAMERA_HEIGHT,
        };

        let mut max_y = viewport.height;
        let mut x = 0.0;
        let mut dx = -track.segment(base_idx).curve * base_percent;

        for n in 0..draw_distance {
            let idx = (base_idx + n) % no_segments;
            let seg = track.segment(idx);
            let looped = idx < base_idx;

            let camera = Camera {
                x: player.x * ROAD_WIDTH - x,
                y: player_y + camera_height,
                z: player.position - if looped { track.length } else { 0.0 },
                depth: player.camera_depth,
            };
            let p1 = project(&seg.p1, &camera, &viewport, ROAD_WIDTH);
            let p2 = project(
                &seg.p2,
                &Camera {
                    x: camera.x - dx,
                    ..camera
                },
                &viewport,
                ROAD_WIDTH,
            );

            x += dx;
            dx += seg.curve;

            let mut proj = ProjectedSegment {
                idx,
                p1,
                p2,
                clip: max_y,
                fog: exponential_fog(n as f64 / draw_distance as f64, self.fog_density),
                looped,
                drawn: false,
            };

            // behind the camera, back-facing or hidden behind a hill crest
            if p1.camera.z <= player.camera_depth
                || p2.screen.y >= p1.screen.y
                || p2.screen.y >= max_y
            {
                self.scratch.push(proj);
                continue;
            }

            self.render_segment(&mut frame, &viewport, &proj, self.palette.band(seg.band), seg.zebra);
            proj.drawn = true;
            max_y = p1.screen.y;
            self.scratch.push(proj);
        }

        // SPRITES ---------------------------------------------------------------------------------
        for proj in self.scratch.iter().skip(1).rev() {
            let seg = track.segment(proj.idx);
            let s1 = &proj.p1.screen;
            let s2 = &proj.p2.screen;

            for decor in seg.sprites.iter() {
                let scale = s1.scale;
                if scale <= MIN_SPRITE_SCALE {
                    continue;
                }
                let sprite = ScreenSprite {
                    name: decor.source,
                    scale,
                    x: s1.x + scale * decor.offset * ROAD_WIDTH * viewport.width / 2.0,
                    y: s1.y,
                    offset_x: if decor.offset < 0.0 { -1.0 } else { 0.0 },
                    offset_y: decor.offset_y.unwrap_or(-1.0),
                    clip: proj.clip,
                };
                if let Some(cmd) = place_sprite(&race.atlas, &viewport, &sprite) {
                    frame.push(cmd);
                }
            }

            for &vehicle_idx in seg.cars.iter() {
                let vehicle = match race.vehicles.get(vehicle_idx) {
                    Some(vehicle) => vehicle,
                    None => continue,
                };
                let scale = interpolate(s1.scale, s2.scale, vehicle.percent);
                if scale <= MIN_SPRITE_SCALE {
                    continue;
                }
                let sprite = ScreenSprite {
                    name: vehicle.sprite_name(),
                    scale,
                    x: interpolate(s1.x, s2.x, vehicle.percent)
                        + scale * vehicle.offset * ROAD_WIDTH * viewport.width / 2.0,
                    y: interpolate(s1.y, s2.y, vehicle.percent),
                    offset_x: if vehicle.offset < 0.0 { -1.0 } else { 0.0 },
                    offset_y: -1.0,
                    clip: proj.clip,
                };
                if let Some(cmd) = place_sprite(&race.atlas, &viewport, &sprite) {
                    frame.push(cmd);
                }
            }

            if proj.idx == player_seg_idx && race.view_mode == ViewMode::Third {
                render_player(&mut frame, race, controls, &viewport);
            }
        }

        // COCKPIT ---------------------------------------------------------------------------------
        if race.view_mode == ViewMode::First {
            render_cockpit(&mut frame, &race.atlas, controls, &viewport);
        }

        frame
    }

    /// The method draws the background layer scaled to cover the viewport (with extra width for
    /// the parallax scroll) and clamps the scroll such that no edge becomes visible.
    fn render_background(&self, frame: &mut Frame, race: &Race, viewport: &Viewport) {
        let name = if race.device_class.is_touch() && race.atlas.contains(BACKGROUND_TOUCH) {
            BACKGROUND_TOUCH
        } else if race.atlas.contains(BACKGROUND) {
            BACKGROUND
        } else {
            return;
        };

        let bg = race.atlas.get(name);
        if bg.width <= 0.0 || bg.height <= 0.0 {
            return;
        }

        let scale_x = viewport.width / bg.width * extra_parallax(race.device_class);
        let scale_y = viewport.height / bg.height;
        let layer_scale = scale_x.max(scale_y);
        let scaled_w = bg.width * layer_scale;
        let scaled_h = bg.height * layer_scale;

        let max_offset = (scaled_w - viewport.width) / 2.0 / scaled_w;
        let bg_offset = limit(race.player.bg_offset, -max_offset, max_offset);

        frame.push(DrawCmd::Sprite {
            name,
            x: (viewport.width - scaled_w) / 2.0 - bg_offset * scaled_w,
            y: (viewport.height - scaled_h) / 2.0,
            w: scaled_w,
            h: scaled_h,
            visible_fraction: 1.0,
            color: Color::from(bg.color),
        });
    }

    /// The method rasterizes the ground band between the projected boundaries of a segment.
    fn render_segment(
        &self,
        frame: &mut Frame,
        viewport: &Viewport,
        proj: &ProjectedSegment,
        colors: &BandColors,
        zebra: bool,
    ) {
        let (x1, y1, w1) = (proj.p1.screen.x, proj.p1.screen.y, proj.p1.screen.w);
        let (x2, y2, w2) = (proj.p2.screen.x, proj.p2.screen.y, proj.p2.screen.w);
        let lanes = self.lanes as f64;
        let r1 = w1 / (2.0 * lanes).max(6.0);
        let r2 = w2 / (2.0 * lanes).max(6.0);

        // grass and dirt noise (stable per segment)
        frame.rect(0.0, y2, viewport.width, y1 - y2, Color::from(colors.grass));

        let mut rng = StdRng::seed_from_u64(proj.idx as u64);
        for _ in 0..NO_NOISE_SPECKS {
            let rx = rng.random::<f64>() * viewport.width;
            let ry = y2 + rng.random::<f64>() * (y1 - y2);
            let rw = 1.0 + rng.random::<f64>() * 3.0;
            frame.rect(rx, ry, rw, 1.0, NOISE_COLOR);
        }

        // rumble strips
        let rumble = Color::from(colors.rumble);
        frame.quad(x1 - w1 - r1, y1, x1 - w1, y1, x2 - w2, y2, x2 - w2 - r2, y2, rumble);
        frame.quad(x1 + w1 + r1, y1, x1 + w1, y1, x2 + w2, y2, x2 + w2 + r2, y2, rumble);

        // sidewalks with curbs at their inner edge
        let (sw1, sw2) = (w1 * SIDEWALK_WIDTH_FACTOR, w2 * SIDEWALK_WIDTH_FACTOR);
        let (cw1, cw2) = (w1 * CURB_WIDTH_FACTOR, w2 * CURB_WIDTH_FACTOR);
        let (e1, e2) = (w1 + r1, w2 + r2);

        let sidewalk = Color::from(colors.sidewalk);
        frame.quad(x1 - e1 - sw1, y1, x1 - e1, y1, x2 - e2, y2, x2 - e2 - sw2, y2, sidewalk);
        frame.quad(x1 + e1 + sw1, y1, x1 + e1, y1, x2 + e2, y2, x2 + e2 + sw2, y2, sidewalk);

        let curb = Color::from(colors.curb);
        frame.quad(x1 - e1 - cw1, y1, x1 - e1, y1, x2 - e2, y2, x2 - e2 - cw2, y2, curb);
        frame.quad(x1 + e1 + cw1, y1, x1 + e1, y1, x2 + e2, y2, x2 + e2 + cw2, y2, curb);

        // road
        frame.trapezoid(x1, y1, w1, x2, y2, w2, Color::from(colors.road));

        if zebra {
            let stripe_w1 = w1 * 2.0 / NO_ZEBRA_STRIPES as f64;
            let stripe_w2 = w2 * 2.0 / NO_ZEBRA_STRIPES as f64;

            for i in (0..NO_ZEBRA_STRIPES).step_by(2) {
                let i = i as f64;
                frame.quad(
                    x1 - w1 + i * stripe_w1,
                    y1,
                    x1 - w1 + (i + 1.0) * stripe_w1,
                    y1,
                    x2 - w2 + (i + 1.0) * stripe_w2,
                    y2,
                    x2 - w2 + i * stripe_w2,
                    y2,
                    Color::WHITE,
                );
            }
        }

        if let Some(strip) = colors.strip {
            let lane_w1 = w1 * 2.0 / lanes;
            let lane_w2 = w2 * 2.0 / lanes;
            let (m1, m2) = (w1 * LANE_MARKER_WIDTH_FACTOR, w2 * LANE_MARKER_WIDTH_FACTOR);

            for i in 1..self.lanes {
                let lx1 = x1 - w1 + i as f64 * lane_w1;
                let lx2 = x2 - w2 + i as f64 * lane_w2;
                frame.quad(lx1 - m1, y1, lx1 + m1, y1, lx2 + m2, y2, lx2 - m2, y2, Color::from(strip));
            }
        }

        // distance fog
        let fog_alpha = 1.0 - limit(proj.fog, 0.0, 1.0);
        if fog_alpha > 1e-3 {
            frame.rect(
                0.0,
                y2,
                viewport.width,
                y1 - y2,
                Color::from(self.palette.fog).with_alpha(fog_alpha),
            );
        }
    }
}

/// render_player draws the third person player car centered at the bottom of the screen, shifted
/// towards the steering direction.
fn render_player(frame: &mut Frame, race: &Race, controls: &ControlSignals, viewport: &Viewport) {
    let atlas = &race.atlas;
    let player_scale = viewport.width / PLAYER_REFERENCE_WIDTH * PLAYER_SCALE;

    let (name, w, h) = match race.anim.boost.sprite_name() {
        // boost frames are always drawn with the size of the plain car
        Some(name) => {
            let (base_w, base_h) = if atlas.contains(PLAYER_CAR) {
                let car = atlas.get(PLAYER_CAR);
                (car.width, car.height)
            } else {
                FALLBACK_CAR_SIZE
            };
            (name, base_w * player_scale, base_h * player_scale)
        }
        None => {
            let name = race.anim.pose_sprite().unwrap_or(PLAYER_CAR);
            let info = atlas.get(name);
            let corrective = if race.anim.is_turning() {
                TURN_CORRECTIVE_SCALE
            } else {
                1.0
            };
            (
                name,
                info.width * player_scale * corrective,
                info.height * player_scale * corrective,
            )
        }
    };

    frame.push(DrawCmd::Sprite {
        name,
        x: viewport.width / 2.0 - w / 2.0 + controls.steer_direction() * PLAYER_STEER_SHIFT,
        y: viewport.height - h - PLAYER_BOTTOM_MARGIN,
        w,
        h,
        visible_fraction: 1.0,
        color: Color::from(atlas.get(name).color),
    });
}

/// render_cockpit draws the first person overlay (and the brake glow below it).
fn render_cockpit(frame: &mut Frame, atlas: &SpriteAtlas, controls: &ControlSignals, viewport: &Viewport) {
    if controls.brake {
        frame.push(DrawCmd::VerticalGradient {
            x: 0.0,
            y: viewport.height - BRAKE_GLOW_HEIGHT,
            w: viewport.width,
            h: BRAKE_GLOW_HEIGHT,
            top: BRAKE_GLOW.with_alpha(0.0),
            bottom: BRAKE_GLOW,
        });
    }

    let cockpit = atlas.get(COCKPIT);
    if cockpit.width <= 0.0 {
        return;
    }
    let w = viewport.width;
    let h = w * cockpit.height / cockpit.width;

    frame.push(DrawCmd::Sprite {
        name: COCKPIT,
        x: controls.steer_direction() * COCKPIT_STEER_SHIFT,
        y: viewport.height - h * COCKPIT_VISIBLE_FRACTION,
        w,
        h,
        visible_fraction: 1.0,
        color: Color::from(cockpit.color),
    });
}
