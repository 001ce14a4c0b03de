use crate::core::track::SEGMENT_LENGTH;
use helpers::general::{increase, percent_remaining};

pub const RIVAL_SPRITE: &str = "car_rival";

/// Animation frames per NPC class, indexed by [class][direction][frame].
pub const VEHICLE_FRAMES: [[[&str; 2]; 3]; 4] = [
    [
        ["truck_straight_0", "truck_straight_1"],
        ["truck_left_0", "truck_left_1"],
        ["truck_right_0", "truck_right_1"],
    ],
    [
        ["van_straight_0", "van_straight_1"],
        ["van_left_0", "van_left_1"],
        ["van_right_0", "van_right_1"],
    ],
    [
        ["novelty_straight_0", "novelty_straight_1"],
        ["novelty_left_0", "novelty_left_1"],
        ["novelty_right_0", "novelty_right_1"],
    ],
    [
        ["taxi_straight_0", "taxi_straight_1"],
        ["taxi_left_0", "taxi_left_1"],
        ["taxi_right_0", "taxi_right_1"],
    ],
];

/// Curvature above which a vehicle shows its turning frames.
const DIRECTION_CURVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Truck,
    DeliveryVan,
    Novelty,
    Taxi,
    Rival,
}

impl VehicleClass {
    /// from_quartile maps a uniform random number in [0, 1) onto the four NPC classes.
    pub fn from_quartile(rnd: f64) -> VehicleClass {
        if rnd < 0.25 {
            VehicleClass::Truck
        } else if rnd < 0.5 {
            VehicleClass::DeliveryVan
        } else if rnd < 0.75 {
            VehicleClass::Novelty
        } else {
            VehicleClass::Taxi
        }
    }

    /// Frame toggle period in ms, None for classes without animation.
    pub fn frame_period(&self) -> Option<f64> {
        match self {
            VehicleClass::DeliveryVan => Some(100.0),
            VehicleClass::Truck | VehicleClass::Novelty | VehicleClass::Taxi => Some(150.0),
            VehicleClass::Rival => None,
        }
    }

    fn frames_idx(&self) -> Option<usize> {
        match self {
            VehicleClass::Truck => Some(0),
            VehicleClass::DeliveryVan => Some(1),
            VehicleClass::Novelty => Some(2),
            VehicleClass::Taxi => Some(3),
            VehicleClass::Rival => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Straight,
    Left,
    Right,
}

impl Direction {
    pub fn from_curve(curve: f64) -> Direction {
        if curve < -DIRECTION_CURVE_THRESHOLD {
            Direction::Left
        } else if curve > DIRECTION_CURVE_THRESHOLD {
            Direction::Right
        } else {
            Direction::Straight
        }
    }

    fn idx(&self) -> usize {
        match self {
            Direction::Straight => 0,
            Direction::Left => 1,
            Direction::Right => 2,
        }
    }
}

/// NpcAnimation is the {straight, left, right} x frame-parity state machine of an NPC.
#[derive(Debug, Clone, Default)]
pub struct NpcAnimation {
    pub timer: f64,
    pub frame: usize,
    pub direction: Direction,
}

impl NpcAnimation {
    /// The method advances the frame timer by dt_ms and selects the direction from the curvature
    /// of the segment the vehicle is located in.
    pub fn tick(&mut self, dt_ms: f64, curve: f64, period: f64) {
        self.timer += dt_ms;
        if self.timer > period {
            self.timer = 0.0;
            self.frame = 1 - self.frame;
        }
        self.direction = Direction::from_curve(curve);
    }
}

/// Vehicle is an NPC driving around the ring.
/// * `offset` - Lateral position in lane units
/// * `z` - Position on the ring, always within [0, track_length)
/// * `lap` - Number of completed passes of the ring (including relocations), such that
/// `z + lap * track_length` is the unwrapped distance of the vehicle
/// * `percent` - Fractional progress within the current segment
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub offset: f64,
    pub z: f64,
    pub lap: u32,
    pub speed: f64,
    pub percent: f64,
    pub class: VehicleClass,
    pub anim: NpcAnimation,
}

impl Vehicle {
    pub fn new(offset: f64, z: f64, speed: f64, class: VehicleClass, anim_timer: f64) -> Vehicle {
        Vehicle {
            offset,
            z,
            lap: 0,
            speed,
            percent: percent_remaining(z, SEGMENT_LENGTH),
            class,
            anim: NpcAnimation {
                timer: anim_timer,
                ..Default::default()
            },
        }
    }

    pub fn is_rival(&self) -> bool {
        self.class == VehicleClass::Rival
    }

    /// race_z returns the unwrapped distance covered by the vehicle.
    pub fn race_z(&self, track_length: f64) -> f64 {
        self.z + self.lap as f64 * track_length
    }

    /// The method moves the vehicle forward by dt seconds and wraps it around the ring.
    pub fn advance(&mut self, dt: f64, track_length: f64) {
        let z_new = increase(self.z, dt * self.speed, track_length);
        if z_new < self.z {
            self.lap += 1;
        }
        self.z = z_new;
        self.percent = percent_remaining(self.z, SEGMENT_LENGTH);
    }

    /// The method moves the vehicle one full lap ahead of its current position.
    pub fn relocate_ahead(&mut self, track_length: f64) {
        self.z = increase(self.z, track_length, track_length);
        self.lap += 1;
    }

    pub fn sprite_name(&self) -> &'static str {
        match self.class.frames_idx() {
            Some(idx) => VEHICLE_FRAMES[idx][self.anim.direction.idx()][self.anim.frame],
            None => RIVAL_SPRITE,
        }
    }
}
