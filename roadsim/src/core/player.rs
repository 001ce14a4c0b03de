use crate::core::track::SEGMENT_LENGTH;
use crate::interfaces::controls::{ControlSignals, DeviceClass, GamePhase};
use helpers::general::{accelerate, limit};

// CONSTANTS ---------------------------------------------------------------------------------------
pub const FPS: f64 = 60.0;
/// Top speed: one segment per frame.
pub const MAX_SPEED: f64 = SEGMENT_LENGTH * FPS;
pub const ACCEL: f64 = MAX_SPEED / 5.0;
pub const BREAKING: f64 = -MAX_SPEED * 2.5;
pub const DECEL: f64 = -MAX_SPEED / 5.0;
pub const OFF_ROAD_DECEL: f64 = -MAX_SPEED / 2.0;
pub const OFF_ROAD_LIMIT: f64 = MAX_SPEED / 4.0;
pub const GAS_LIMIT: f64 = MAX_SPEED * 0.9;
pub const BOOST_LIMIT: f64 = MAX_SPEED * 1.1;
pub const REVVING_LIMIT: f64 = MAX_SPEED * 0.2;
pub const BOOST_ACCEL_FACTOR: f64 = 2.5;
pub const REVVING_ACCEL_FACTOR: f64 = 0.5;
/// Distance below the boost ceiling from which on the top speed flutters.
pub const BOOST_JITTER_BAND: f64 = 300.0;
pub const BOOST_JITTER: f64 = 200.0;

pub const NOS_MAX: f64 = 100.0;
pub const NOS_DRAIN: f64 = 25.0;
pub const NOS_REGEN_DRIVING: f64 = 2.0;
pub const NOS_REGEN_IDLE: f64 = 8.0;

pub const CENTRIFUGAL: f64 = 0.2;
pub const DECOR_COLLISION_WIDTH: f64 = 0.1;
pub const VEHICLE_COLLISION_WIDTH: f64 = 0.4;
pub const POST_COLLISION_SPEED: f64 = MAX_SPEED / 5.0;
pub const PLAYER_X_LIMIT: f64 = 3.0;

pub const FIELD_OF_VIEW: f64 = 100.0;
pub const CAMERA_HEIGHT: f64 = 500.0;
pub const FIRST_PERSON_CAMERA_HEIGHT: f64 = 850.0;
pub const BOOST_DEPTH_FACTOR: f64 = 1.5;
pub const PORTRAIT_DEPTH_FACTOR: f64 = 1.4;
pub const CAMERA_LERP_RATE: f64 = 5.0;

pub const ANALOG_STEER_FACTOR: f64 = 3.0;
pub const TOUCH_STEER_FACTOR: f64 = 2.5;
pub const BG_PARALLAX_RATE: f64 = 0.1;

/// base_camera_depth returns 1 / tan(fov / 2), widened for touch devices in portrait mode.
pub fn base_camera_depth(device_class: DeviceClass) -> f64 {
    let depth = 1.0 / (FIELD_OF_VIEW / 2.0).to_radians().tan();
    if device_class == DeviceClass::TouchPortrait {
        depth * PORTRAIT_DEPTH_FACTOR
    } else {
        depth
    }
}

/// extra_parallax returns the horizontal overscan factor of the background layer.
pub fn extra_parallax(device_class: DeviceClass) -> f64 {
    if device_class.is_touch() {
        1.5
    } else {
        1.3
    }
}

/// Player contains the kinematic state of the player car.
/// * `position` - Camera position along the ring, within [0, track_length)
/// * `x` - Lateral offset in lane units, within [-3, 3]
/// * `speed` - Speed in world units per second, within [0, MAX_SPEED]
/// * `nos` - Boost resource in [0, 100]
/// * `camera_depth` - Current (interpolated) camera depth
/// * `player_z` - Look-ahead distance between camera and car (CAMERA_HEIGHT * camera_depth)
/// * `bg_offset` - Horizontal scroll factor of the background layer
#[derive(Debug, Clone)]
pub struct Player {
    pub position: f64,
    pub x: f64,
    pub speed: f64,
    pub nos: f64,
    pub camera_depth: f64,
    pub player_z: f64,
    pub bg_offset: f64,
    pub current_lap: u32,
    pub tot_no_laps: u32,
}

impl Player {
    pub fn new(tot_no_laps: u32, device_class: DeviceClass) -> Player {
        let camera_depth = base_camera_depth(device_class);

        Player {
            position: 0.0,
            x: 0.0,
            speed: 0.0,
            nos: NOS_MAX,
            camera_depth,
            player_z: CAMERA_HEIGHT * camera_depth,
            bg_offset: 0.0,
            current_lap: 1,
            tot_no_laps,
        }
    }

    pub fn speed_percent(&self) -> f64 {
        self.speed / MAX_SPEED
    }

    /// race_distance returns the unwrapped distance covered by the camera.
    pub fn race_distance(&self, track_length: f64) -> f64 {
        self.position + self.current_lap.saturating_sub(1) as f64 * track_length
    }

    /// The method returns the lateral offset after steering input and centrifugal drift.
    pub fn steer(
        &self,
        controls: &ControlSignals,
        device_class: DeviceClass,
        curve: f64,
        dt: f64,
    ) -> f64 {
        let speed_percent = self.speed_percent();
        let dx = dt * 2.0 * speed_percent;
        let mut x = self.x;

        if device_class == DeviceClass::TouchPortrait {
            x += limit(controls.analog_steer, -1.0, 1.0) * dx * ANALOG_STEER_FACTOR;
        } else {
            let force = if device_class.is_touch() {
                TOUCH_STEER_FACTOR
            } else {
                1.0
            };
            if controls.steer_left {
                x -= dx * force;
            } else if controls.steer_right {
                x += dx * force;
            }
        }

        // centrifugal drift towards the outside of the curve
        x - dx * speed_percent * curve * CENTRIFUGAL
    }

    /// The method returns the new speed and boost resource for the given phase and controls.
    /// `jitter` is a uniform random number in [0, 1) used for the top speed flutter.
    pub fn integrate_speed(
        &self,
        controls: &ControlSignals,
        phase: GamePhase,
        dt: f64,
        jitter: f64,
    ) -> (f64, f64) {
        let speed = self.speed;
        let mut nos = self.nos;

        if phase == GamePhase::Countdown {
            let speed = if controls.accelerate {
                accelerate(speed, ACCEL * REVVING_ACCEL_FACTOR, dt).min(REVVING_LIMIT)
            } else {
                accelerate(speed, DECEL, dt)
            };
            return (speed, nos);
        }

        let next_speed = if controls.brake {
            accelerate(speed, BREAKING, dt)
        } else if controls.boost && nos > 0.0 {
            nos = (nos - dt * NOS_DRAIN).max(0.0);
            let tmp_speed = accelerate(speed, ACCEL * BOOST_ACCEL_FACTOR, dt);

            if tmp_speed >= BOOST_LIMIT - BOOST_JITTER_BAND {
                limit(tmp_speed + (jitter - 0.5) * BOOST_JITTER, 0.0, BOOST_LIMIT)
            } else {
                tmp_speed
            }
        } else if controls.accelerate {
            let tmp_speed = accelerate(speed, ACCEL, dt);

            if tmp_speed > GAS_LIMIT {
                accelerate(tmp_speed, DECEL, dt).max(GAS_LIMIT)
            } else {
                tmp_speed
            }
        } else {
            accelerate(speed, DECEL, dt)
        };

        // regeneration only while neither boosting nor braking
        if !controls.boost && !controls.brake {
            let rate = if controls.accelerate {
                NOS_REGEN_DRIVING
            } else {
                NOS_REGEN_IDLE
            };
            nos = (nos + dt * rate).min(NOS_MAX);
        }

        (next_speed, nos)
    }

    /// The method eases the camera depth towards its target and updates the look-ahead distance.
    pub fn update_camera(&mut self, device_class: DeviceClass, boosting: bool, dt: f64) {
        let base_depth = base_camera_depth(device_class);
        let target_depth = if boosting {
            base_depth * BOOST_DEPTH_FACTOR
        } else {
            base_depth
        };

        let factor = limit(dt * CAMERA_LERP_RATE, 0.0, 1.0);
        self.camera_depth += (target_depth - self.camera_depth) * factor;
        self.player_z = CAMERA_HEIGHT * self.camera_depth;
    }

    /// The method scrolls the background by curvature and steering, clamped such that the
    /// overscanned layer never reveals its edges.
    pub fn update_bg_offset(&mut self, curve: f64, steer: f64, device_class: DeviceClass, dt: f64) {
        let speed_percent = self.speed_percent();
        let curve_factor = curve * speed_percent;
        let steer_factor = steer * speed_percent * 2.0;
        let max_offset = (1.0 - 1.0 / extra_parallax(device_class)) / 2.0;

        self.bg_offset = limit(
            self.bg_offset + (curve_factor + steer_factor) * dt * BG_PARALLAX_RATE,
            -max_offset,
            max_offset,
        );
    }
}
