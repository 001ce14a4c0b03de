use crate::core::assets::SpriteAtlas;
use crate::core::car::{Vehicle, VehicleClass};
use crate::core::player::MAX_SPEED;
use crate::core::track::{ColorBand, Segment, SpritePlacement, Track, RUMBLE_LENGTH, SEGMENT_LENGTH};
use helpers::general::{ease_in, ease_in_out, increase};
use rand::Rng;
use tracing::debug;

// ROAD SHAPES -------------------------------------------------------------------------------------
pub const LENGTH_SHORT: usize = 25;
pub const LENGTH_MEDIUM: usize = 50;
pub const LENGTH_LONG: usize = 100;

pub const HILL_NONE: f64 = 0.0;
pub const HILL_LOW: f64 = 20.0;
pub const HILL_MEDIUM: f64 = 40.0;
pub const HILL_HIGH: f64 = 60.0;

pub const CURVE_NONE: f64 = 0.0;
pub const CURVE_EASY: f64 = 2.0;
pub const CURVE_MEDIUM: f64 = 4.0;
pub const CURVE_HARD: f64 = 6.0;

/// Number of segments of the closing downhill run.
pub const DOWNHILL_LENGTH: usize = 200;

// DECOR LAYOUT ------------------------------------------------------------------------------------
pub const DECOR_START_SEGMENT: usize = 50;
pub const BLOCK_LENGTH: usize = 60;
/// Segments kept free of decor blocks in front of the finish line.
pub const FINISH_RESERVE: usize = 200;

const BUILDING_OFFSET: f64 = 2.8;
const RIGHT_BUILDING_SHIFT: usize = 5;
const TREE_OFFSET: f64 = 3.5;
const TREE_START: usize = 15;
const TREE_SPACING: usize = 25;
const RIGHT_TREE_SHIFT: usize = 2;
const STREET_PROPS_AT: usize = 15;
const KIOSKS_AT: usize = 30;
const BUSHES_AT: usize = 50;
const CONSTRUCTION_EVERY: usize = 7;
const CONSTRUCTION_BLOCK: usize = 3;
const NO_CONES: usize = 5;
const INTERSECTION_EVERY: usize = 3;
const ZEBRA_LENGTH: usize = 12;
const ZEBRA_LEAD: usize = 10;

pub const LEFT_BUILDINGS: [&str; 13] = [
    "building_l_basmallah",
    "building_l_game",
    "building_l_ganesha",
    "building_l_baliho_1",
    "building_l_lawson",
    "building_l_restaurant",
    "building_l_ruangguru",
    "building_l_ubig",
    "building_l_kemendikbud",
    "building_l_mcc_1",
    "building_l_mcc_3",
    "building_l_bsi_3",
    "building_l_gacoan",
];

pub const RIGHT_BUILDINGS: [&str; 14] = [
    "building_r_basmallah",
    "building_r_lawson",
    "building_r_gramedia",
    "building_r_kaffa",
    "building_r_burgerking",
    "building_r_kemendikbud",
    "building_r_ruangguru",
    "building_r_ubig",
    "building_r_ruangguru_2",
    "building_r_bsi_1",
    "building_r_baliho_2",
    "building_r_mcc_2",
    "building_r_burgerking_2",
    "building_r_gacoan",
];

/// Name fragments of buildings that must never be hidden behind trees.
pub const LANDMARKS: [&str; 11] = [
    "mcc",
    "ubig",
    "ganesha",
    "ruangguru",
    "baliho",
    "kemendikbud",
    "gramedia",
    "bsi",
    "lawson",
    "gacoan",
    "burgerking",
];

pub const TREES: [&str; 4] = ["tree_1", "tree_2", "tree_3", "tree_4"];

pub const PROPS: [&str; 12] = [
    "trash_left",
    "trash_right",
    "bench",
    "vending_left",
    "vending_right",
    "news_left",
    "news_right",
    "bush_left",
    "bush_right",
    "cone",
    "barrier",
    "traffic_light",
];

// VEHICLES ----------------------------------------------------------------------------------------
pub const NPC_LANE_OFFSETS: [f64; 4] = [-0.8, -0.4, 0.4, 0.8];
pub const RIVAL_OFFSET: f64 = -0.4;
pub const RIVAL_START_SEGMENT: usize = 200;
pub const RIVAL_SPEED_FACTOR: f64 = 0.7;

pub fn is_landmark(name: &str) -> bool {
    LANDMARKS.iter().any(|fragment| name.contains(fragment))
}

/// TrackBuilder appends segments in shaped runs. Elevations are given in units of segments, i.e.
/// a height of 20.0 raises the road by 20 * SEGMENT_LENGTH.
#[derive(Debug, Default)]
pub struct TrackBuilder {
    segments: Vec<Segment>,
}

impl TrackBuilder {
    pub fn new() -> TrackBuilder {
        TrackBuilder { segments: vec![] }
    }

    /// circuit returns a builder that contains the road shape of the fixed city circuit: short
    /// straight, curve with low hill, long straight, reverse curve, medium straight, long easy
    /// curve with medium hill, long straight, curve with negative low hill, short straight and a
    /// closing downhill curve back to elevation 0.
    pub fn circuit() -> TrackBuilder {
        let mut builder = TrackBuilder::new();
        builder.add_straight(LENGTH_SHORT);
        builder.add_curve(LENGTH_MEDIUM, CURVE_MEDIUM, HILL_LOW);
        builder.add_straight(LENGTH_LONG);
        builder.add_curve(LENGTH_MEDIUM, -CURVE_MEDIUM, HILL_NONE);
        builder.add_straight(LENGTH_MEDIUM);
        builder.add_curve(LENGTH_LONG, CURVE_EASY, HILL_MEDIUM);
        builder.add_straight(LENGTH_LONG);
        builder.add_curve(LENGTH_MEDIUM, CURVE_MEDIUM, -HILL_LOW);
        builder.add_straight(LENGTH_SHORT);
        builder.add_downhill_to_end(DOWNHILL_LENGTH);
        builder
    }

    pub fn no_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn last_y(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.p2.y)
    }

    /// add_segment appends one segment whose near elevation continues the previous far
    /// elevation.
    pub fn add_segment(&mut self, curve: f64, y: f64) {
        let n = self.segments.len();
        let last_y = self.last_y();
        self.segments.push(Segment::new(n, curve, last_y, y));
    }

    /// add_road appends enter + hold + leave segments. Curvature eases in over `enter`, holds,
    /// and eases out over `leave`; the elevation eases in and out over the whole run and ends
    /// exactly `height` segment lengths above the start.
    pub fn add_road(&mut self, enter: usize, hold: usize, leave: usize, curve: f64, height: f64) {
        let end_y = self.last_y() + height * SEGMENT_LENGTH;
        self.add_road_to(enter, hold, leave, curve, end_y);
    }

    fn add_road_to(&mut self, enter: usize, hold: usize, leave: usize, curve: f64, end_y: f64) {
        let start_y = self.last_y();
        let total = (enter + hold + leave) as f64;
        let y_at = |k: usize| ease_in_out(start_y, end_y, (k + 1) as f64 / total);

        for n in 0..enter {
            self.add_segment(ease_in(0.0, curve, n as f64 / enter as f64), y_at(n));
        }
        for n in 0..hold {
            self.add_segment(curve, y_at(enter + n));
        }
        for n in 0..leave {
            self.add_segment(
                ease_in_out(curve, 0.0, n as f64 / leave as f64),
                y_at(enter + hold + n),
            );
        }

        // the eased elevation must land exactly on the target
        if total > 0.0 {
            if let Some(last) = self.segments.last_mut() {
                last.p2.y = end_y;
            }
        }
    }

    pub fn add_straight(&mut self, num: usize) {
        self.add_road(num, num, num, CURVE_NONE, HILL_NONE);
    }

    pub fn add_curve(&mut self, num: usize, curve: f64, height: f64) {
        self.add_road(num, num, num, curve, height);
    }

    pub fn add_s_curves(&mut self) {
        let m = LENGTH_MEDIUM;
        self.add_road(m, m, m, -CURVE_EASY, HILL_NONE);
        self.add_road(m, m, m, CURVE_MEDIUM, HILL_MEDIUM);
        self.add_road(m, m, m, CURVE_EASY, -HILL_LOW);
        self.add_road(m, m, m, -CURVE_EASY, HILL_MEDIUM);
        self.add_road(m, m, m, -CURVE_MEDIUM, -HILL_MEDIUM);
    }

    pub fn add_bumps(&mut self) {
        for height in [5.0, -2.0, -5.0, 8.0, 5.0, -7.0, 5.0, -2.0] {
            self.add_road(10, 10, 10, CURVE_NONE, height);
        }
    }

    /// add_downhill_to_end appends an easy left curve that brings the elevation back to 0.
    pub fn add_downhill_to_end(&mut self, num: usize) {
        self.add_road_to(num, num, num, -CURVE_EASY, 0.0);
    }

    /// The method colors the last segments with the finish palette and returns the track.
    pub fn finish(mut self) -> Track {
        let len = self.segments.len();
        for seg in self.segments.iter_mut().skip(len.saturating_sub(RUMBLE_LENGTH)) {
            seg.band = ColorBand::Finish;
        }
        Track::new(self.segments)
    }
}

// DECOR -------------------------------------------------------------------------------------------
fn place(track: &mut Track, atlas: &SpriteAtlas, idx: usize, source: &'static str, offset: f64) {
    place_anchored(track, atlas, idx, source, offset, None)
}

fn place_anchored(
    track: &mut Track,
    atlas: &SpriteAtlas,
    idx: usize,
    source: &'static str,
    offset: f64,
    offset_y: Option<f64>,
) {
    if !atlas.contains(source) {
        return;
    }
    if let Some(seg) = track.segments.get_mut(idx) {
        seg.sprites.push(SpritePlacement {
            source,
            offset,
            offset_y,
        });
    }
}

/// populate_decor walks the track in blocks of BLOCK_LENGTH segments and places buildings, trees,
/// street props, construction sites and intersections. Only assets known to the atlas are placed,
/// while the landmark rule depends on the building names alone.
pub fn populate_decor(track: &mut Track, atlas: &SpriteAtlas) {
    let len = track.no_segments();

    for (block, n) in (DECOR_START_SEGMENT..len.saturating_sub(FINISH_RESERVE))
        .step_by(BLOCK_LENGTH)
        .enumerate()
    {
        // buildings
        let left_name = LEFT_BUILDINGS[block % LEFT_BUILDINGS.len()];
        let right_name = RIGHT_BUILDINGS[block % RIGHT_BUILDINGS.len()];

        place_anchored(track, atlas, n, left_name, -BUILDING_OFFSET, Some(-1.0));
        place_anchored(
            track,
            atlas,
            n + RIGHT_BUILDING_SHIFT,
            right_name,
            BUILDING_OFFSET,
            Some(-1.0),
        );

        // trees, skipped on the side of a landmark
        let left_landmark = is_landmark(left_name);
        let right_landmark = is_landmark(right_name);

        for i in (TREE_START..BLOCK_LENGTH).step_by(TREE_SPACING) {
            let seg = n + i;
            if seg >= len {
                break;
            }
            let tree = TREES[(block + i) % TREES.len()];

            if !left_landmark {
                place(track, atlas, seg, tree, -TREE_OFFSET);
            }
            if !right_landmark {
                place(track, atlas, seg + RIGHT_TREE_SHIFT, tree, TREE_OFFSET);
            }
        }

        // street props
        let seg = n + STREET_PROPS_AT;
        place(track, atlas, seg + 5, "trash_left", -1.7);
        place(track, atlas, seg + 7, "trash_right", 1.7);
        place(track, atlas, seg + 3, "bench", 2.0);

        let seg = n + KIOSKS_AT + 5;
        if block % 2 == 0 {
            place(track, atlas, seg, "vending_left", -1.9);
            place(track, atlas, seg, "news_right", 1.9);
        } else {
            place(track, atlas, seg, "news_left", -1.9);
            place(track, atlas, seg, "vending_right", 1.9);
        }

        let seg = n + BUSHES_AT + 5;
        place(track, atlas, seg, "bush_left", -1.8);
        place(track, atlas, seg, "bush_right", 1.8);

        // construction site
        if block % CONSTRUCTION_EVERY == CONSTRUCTION_BLOCK {
            for k in 0..NO_CONES {
                place(track, atlas, n + 20 + k * 2, "cone", -0.9);
            }
            place(track, atlas, n + 24, "barrier", -1.2);
        }

        // intersection
        if block % INTERSECTION_EVERY == 0 {
            let zebra_start = n - ZEBRA_LEAD;
            for seg in track
                .segments
                .iter_mut()
                .skip(zebra_start)
                .take(ZEBRA_LENGTH)
            {
                seg.zebra = true;
            }
            place(track, atlas, zebra_start, "traffic_light", -1.8);
            place(track, atlas, zebra_start, "traffic_light", 1.8);
        }
    }
}

/// build_track creates the fixed city circuit including its decor. The result only depends on
/// the asset names available in the atlas.
pub fn build_track(atlas: &SpriteAtlas) -> Track {
    let mut track = TrackBuilder::circuit().finish();
    populate_decor(&mut track, atlas);

    debug!(
        "Built track with {} segments, length {:.0}, {} decor items",
        track.no_segments(),
        track.length,
        track.segments.iter().map(|s| s.sprites.len()).sum::<usize>()
    );

    track
}

/// spawn_vehicles creates no_npcs NPCs evenly spaced around the ring plus the rival, and inserts
/// every vehicle into the bucket of its segment.
pub fn spawn_vehicles<R: Rng>(track: &mut Track, no_npcs: usize, rng: &mut R) -> Vec<Vehicle> {
    if track.is_empty() {
        return vec![];
    }

    let length = track.length;
    let mut vehicles = Vec::with_capacity(no_npcs + 1);

    for n in 0..no_npcs {
        let z = increase((n + 1) as f64 * length / no_npcs as f64, 0.0, length);
        let offset = NPC_LANE_OFFSETS[rng.random_range(0..NPC_LANE_OFFSETS.len())];
        let speed = MAX_SPEED / 4.0 + rng.random::<f64>() * MAX_SPEED / 2.0;
        let class = VehicleClass::from_quartile(rng.random::<f64>());
        let anim_timer = rng.random::<f64>() * 100.0;

        vehicles.push(Vehicle::new(offset, z, speed, class, anim_timer));
    }

    vehicles.push(Vehicle::new(
        RIVAL_OFFSET,
        increase(RIVAL_START_SEGMENT as f64 * SEGMENT_LENGTH, 0.0, length),
        MAX_SPEED * RIVAL_SPEED_FACTOR,
        VehicleClass::Rival,
        0.0,
    ));

    for (i, vehicle) in vehicles.iter().enumerate() {
        let idx = track.segment_idx(vehicle.z);
        track.segments[idx].cars.push(i);
    }

    vehicles
}
