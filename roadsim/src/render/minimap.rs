use crate::core::race::Race;
use crate::core::track::Track;
use crate::render::frame::{Color, DrawCmd, Frame, TextAlign};
use helpers::geometry::{BoundingBox2d, Point2d, Vector2d};
use std::f64::consts::FRAC_PI_2;

// PANEL -------------------------------------------------------------------------------------------
pub const MINIMAP_WIDTH: f64 = 240.0;
pub const MINIMAP_HEIGHT: f64 = 180.0;
/// Minimum time between two redraws of the panel.
pub const MINIMAP_REFRESH_INTERVAL: f64 = 100.0;

const MARGIN_SIDE: f64 = 15.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 45.0;
const GRID_SPACING: usize = 30;

// POLYLINE ----------------------------------------------------------------------------------------
/// Only every SAMPLE_STEP-th segment contributes a point.
pub const SAMPLE_STEP: usize = 5;
pub const HEADING_PER_CURVE: f64 = 0.012;
pub const POINT_SPACING: f64 = 10.0;
/// Tracks with fewer segments only get the panel chrome.
pub const MIN_NO_SEGMENTS: usize = 10;

const TRACK_GLOW: Color = Color::rgba(0x25, 0x63, 0xeb, 1.0);
const TRACK_CORE: Color = Color::rgba(0x60, 0xa5, 0xfa, 1.0);
const START_GREEN: Color = Color::rgba(0x22, 0xc5, 0x5e, 1.0);
const MARKER_RED: Color = Color::rgba(0xef, 0x44, 0x44, 1.0);
const RIVAL_BLUE: Color = Color::rgba(0x3b, 0x82, 0xf6, 1.0);
const MARKER_RADIUS: f64 = 6.0;

/// build_polyline walks every SAMPLE_STEP-th segment and integrates the heading from the segment
/// curvature. Elevation is ignored.
pub fn build_polyline(track: &Track) -> Vec<Point2d> {
    let mut heading = -FRAC_PI_2;
    let mut pos = Point2d::default();

    track
        .segments
        .iter()
        .step_by(SAMPLE_STEP)
        .map(|seg| {
            heading += seg.curve * HEADING_PER_CURVE;
            pos = pos.shift(&Vector2d::from_heading(heading, POINT_SPACING));
            pos
        })
        .collect()
}

/// player_marker_idx maps the camera position onto the polyline (clamped to its last point).
pub fn player_marker_idx(position: f64, track_length: f64, no_points: usize) -> usize {
    if no_points == 0 || track_length <= 0.0 {
        return 0;
    }
    (((position / track_length) * no_points as f64).floor().max(0.0) as usize).min(no_points - 1)
}

/// rival_marker_idx maps the ring position of a vehicle onto the polyline (wrapped).
pub fn rival_marker_idx(z: f64, track_length: f64, no_points: usize) -> usize {
    if no_points == 0 || track_length <= 0.0 {
        return 0;
    }
    (((z / track_length) * no_points as f64).floor().max(0.0) as usize) % no_points
}

/// MapLayout fits the bounding box of the polyline into the area between header and footer.
#[derive(Debug, Clone, Copy)]
pub struct MapLayout {
    pub scale: f64,
    pub center: Point2d,
}

impl MapLayout {
    pub fn fit(points: &[Point2d]) -> Option<MapLayout> {
        let bb = BoundingBox2d::from_points(points)?;
        let track_w = if bb.width() == 0.0 { 1.0 } else { bb.width() };
        let track_h = if bb.height() == 0.0 { 1.0 } else { bb.height() };

        let avail_w = MINIMAP_WIDTH - 2.0 * MARGIN_SIDE;
        let avail_h = MINIMAP_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        Some(MapLayout {
            scale: (avail_w / track_w).min(avail_h / track_h),
            center: bb.center(),
        })
    }

    /// The method transforms a polyline point into panel pixels.
    pub fn to_panel(&self, p: &Point2d) -> Point2d {
        let avail_h = MINIMAP_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        Point2d {
            x: MINIMAP_WIDTH / 2.0 + (p.x - self.center.x) * self.scale,
            y: MARGIN_TOP + avail_h / 2.0 + (p.y - self.center.y) * self.scale,
        }
    }
}

/// MinimapProjector keeps the panel frame of the radar-style minimap. The polyline is derived
/// from the track once, the panel is redrawn at most every MINIMAP_REFRESH_INTERVAL ms.
#[derive(Debug, Default)]
pub struct MinimapProjector {
    polyline: Vec<Point2d>,
    polyline_no_segments: usize,
    last_update: Option<f64>,
    frame: Frame,
}

impl MinimapProjector {
    pub fn new() -> MinimapProjector {
        MinimapProjector {
            frame: Frame::new(MINIMAP_WIDTH, MINIMAP_HEIGHT),
            ..Default::default()
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn polyline(&self) -> &[Point2d] {
        &self.polyline
    }

    /// The method redraws the panel if more than MINIMAP_REFRESH_INTERVAL ms passed since the
    /// last redraw. `now` is a wall clock time in ms, which also drives the pulse of the player
    /// marker. It returns true if the panel was redrawn.
    pub fn update(&mut self, race: &Race, now: f64) -> bool {
        if let Some(last_update) = self.last_update {
            if now - last_update <= MINIMAP_REFRESH_INTERVAL {
                return false;
            }
        }

        self.last_update = Some(now);
        self.redraw(race, now);
        true
    }

    /// The method unconditionally redraws the panel.
    pub fn redraw(&mut self, race: &Race, now: f64) {
        let mut frame = Frame::new(MINIMAP_WIDTH, MINIMAP_HEIGHT);
        draw_chrome(&mut frame);

        let track = &race.track;
        if track.no_segments() < MIN_NO_SEGMENTS {
            self.frame = frame;
            return;
        }

        if self.polyline_no_segments != track.no_segments() {
            self.polyline = build_polyline(track);
            self.polyline_no_segments = track.no_segments();
        }

        let layout = match MapLayout::fit(&self.polyline) {
            Some(layout) => layout,
            None => {
                self.frame = frame;
                return;
            }
        };
        let pts: Vec<Point2d> = self.polyline.iter().map(|p| layout.to_panel(p)).collect();

        // track
        frame.push(DrawCmd::Polyline {
            pts: pts.clone(),
            width: 6.0,
            color: TRACK_GLOW,
        });
        frame.push(DrawCmd::Polyline {
            pts: pts.clone(),
            width: 2.0,
            color: TRACK_CORE,
        });

        // start and finish
        let start = pts[0];
        let end = pts[pts.len() - 1];

        frame.text(start.x + 14.0, start.y + 3.0, "START", 10.0, Color::WHITE, TextAlign::Left);
        frame.push(DrawCmd::Line {
            from: Point2d { x: start.x - 10.0, y: start.y },
            to: Point2d { x: start.x + 10.0, y: start.y },
            width: 4.0,
            color: START_GREEN,
            dashed: false,
        });
        frame.text(end.x - 18.0, end.y + 3.0, "FINISH", 10.0, Color::WHITE, TextAlign::Right);
        frame.push(DrawCmd::Line {
            from: Point2d { x: end.x - 10.0, y: end.y },
            to: Point2d { x: end.x + 10.0, y: end.y },
            width: 6.0,
            color: MARKER_RED,
            dashed: true,
        });

        // rivals
        for vehicle in race.vehicles.iter().filter(|v| v.is_rival()) {
            let idx = rival_marker_idx(vehicle.z, track.length, pts.len());
            frame.push(DrawCmd::Circle {
                center: pts[idx],
                radius: MARKER_RADIUS,
                fill: RIVAL_BLUE,
                stroke: Some((2.0, Color::WHITE)),
            });
        }

        // player with pulse
        let p = pts[player_marker_idx(race.player.position, track.length, pts.len())];
        let pulse = now.rem_euclid(1000.0) / 1000.0;

        frame.push(DrawCmd::Circle {
            center: p,
            radius: MARKER_RADIUS + pulse * 10.0,
            fill: MARKER_RED.with_alpha(0.5 - pulse * 0.5),
            stroke: None,
        });
        frame.push(DrawCmd::Circle {
            center: p,
            radius: MARKER_RADIUS,
            fill: MARKER_RED,
            stroke: Some((2.0, Color::WHITE)),
        });

        self.frame = frame;
    }
}

/// draw_chrome draws panel background, grid, header and footer.
fn draw_chrome(frame: &mut Frame) {
    frame.push(DrawCmd::Rect {
        x: 0.0,
        y: 0.0,
        w: MINIMAP_WIDTH,
        h: MINIMAP_HEIGHT,
        radius: 20.0,
        color: Color::rgba(10, 15, 25, 0.95),
    });

    let grid = Color::rgba(255, 255, 255, 0.05);
    for x in (0..MINIMAP_WIDTH as usize).step_by(GRID_SPACING) {
        frame.push(grid_line(x as f64, 0.0, x as f64, MINIMAP_HEIGHT, grid));
    }
    for y in (0..MINIMAP_HEIGHT as usize).step_by(GRID_SPACING) {
        frame.push(grid_line(0.0, y as f64, MINIMAP_WIDTH, y as f64, grid));
    }

    let separator = Color::rgba(255, 255, 255, 0.1);
    frame.text(
        MINIMAP_WIDTH / 2.0,
        22.0,
        "SCANNER / ACTIVE",
        10.0,
        Color::rgba(255, 255, 255, 0.4),
        TextAlign::Center,
    );
    frame.push(grid_line(30.0, 30.0, MINIMAP_WIDTH - 30.0, 30.0, separator));

    let footer = Color::rgba(59, 130, 246, 0.6);
    frame.text(
        MINIMAP_WIDTH - 15.0,
        MINIMAP_HEIGHT - 22.0,
        "GPS SIGNAL",
        9.0,
        footer,
        TextAlign::Right,
    );
    frame.text(
        MINIMAP_WIDTH - 15.0,
        MINIMAP_HEIGHT - 12.0,
        "TRACK: ACTIVE",
        9.0,
        footer,
        TextAlign::Right,
    );
    frame.push(grid_line(
        30.0,
        MINIMAP_HEIGHT - 35.0,
        MINIMAP_WIDTH - 30.0,
        MINIMAP_HEIGHT - 35.0,
        separator,
    ));
}

fn grid_line(x1: f64, y1: f64, x2: f64, y2: f64, color: Color) -> DrawCmd {
    DrawCmd::Line {
        from: Point2d { x: x1, y: y1 },
        to: Point2d { x: x2, y: y2 },
        width: 1.0,
        color,
        dashed: false,
    }
}
