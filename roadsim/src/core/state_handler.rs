use crate::interfaces::controls::{ControlSignals, GamePhase};

/// Player animation frames: forward, left, right, brake and rev pairs.
pub const PLAYER_FRAMES: [&str; 10] = [
    "forward_1",
    "forward_2",
    "left_1",
    "left_2",
    "right_1",
    "right_2",
    "brake_1",
    "brake_2",
    "start_1",
    "start_2",
];

/// Boost overlay frames: 6 startup, 9 loop and 3 ending frames.
pub const NOS_FRAMES: [&str; 18] = [
    "nos_1", "nos_2", "nos_3", "nos_4", "nos_5", "nos_6", "nos_7", "nos_8", "nos_9", "nos_10",
    "nos_11", "nos_12", "nos_13", "nos_14", "nos_15", "nos_16", "nos_17", "nos_18",
];

pub const NOS_FRAME_DURATION: f64 = 60.0;
pub const NO_STARTUP_FRAMES: usize = 6;
pub const NO_LOOP_FRAMES: usize = 9;
pub const NO_ENDING_FRAMES: usize = 3;
pub const POSE_FRAME_DURATION: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoostPhase {
    #[default]
    Idle,
    Startup,
    Loop,
    Ending,
}

/// BoostAnimation contains the statemachine of the boost overlay.
///
/// Possible statemachine states:
/// * `Idle` -> no overlay is shown
/// * `Startup` -> entered on a fresh press, plays 6 frames once
/// * `Loop` -> cycles through 9 frames as long as the boost stays active
/// * `Ending` -> entered on release, plays 3 frames and returns to `Idle`
///
/// Pressing again during `Ending` jumps straight back into `Loop` so that a flickering input does
/// not restart the startup sequence.
#[derive(Debug, Clone, Default)]
pub struct BoostAnimation {
    phase: BoostPhase,
    frame: usize,
    timer: f64,
    was_active: bool,
}

impl BoostAnimation {
    pub fn phase(&self) -> BoostPhase {
        self.phase
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The method advances the statemachine by dt_ms. `active` is true while boost is pressed
    /// and boost resource is left.
    pub fn tick(&mut self, active: bool, dt_ms: f64) {
        self.timer += dt_ms;

        if active {
            if !self.was_active {
                if self.phase == BoostPhase::Ending {
                    self.phase = BoostPhase::Loop;
                    self.frame = 0;
                } else {
                    self.phase = BoostPhase::Startup;
                    self.frame = 0;
                    self.timer = 0.0;
                }
            }

            match self.phase {
                BoostPhase::Startup => {
                    if self.step_frame() && self.frame >= NO_STARTUP_FRAMES {
                        self.phase = BoostPhase::Loop;
                        self.frame = 0;
                    }
                }
                BoostPhase::Loop => {
                    if self.step_frame() {
                        self.frame %= NO_LOOP_FRAMES;
                    }
                }
                BoostPhase::Idle | BoostPhase::Ending => {}
            }
        } else {
            if self.was_active {
                self.phase = BoostPhase::Ending;
                self.frame = 0;
                self.timer = 0.0;
            }

            if self.phase == BoostPhase::Ending
                && self.step_frame()
                && self.frame >= NO_ENDING_FRAMES
            {
                self.phase = BoostPhase::Idle;
                self.frame = 0;
            }
        }

        self.was_active = active;
    }

    /// step_frame advances the frame counter once the frame duration has elapsed.
    fn step_frame(&mut self) -> bool {
        if self.timer >= NOS_FRAME_DURATION {
            self.timer = 0.0;
            self.frame += 1;
            true
        } else {
            false
        }
    }

    pub fn sprite_name(&self) -> Option<&'static str> {
        let idx = match self.phase {
            BoostPhase::Idle => return None,
            BoostPhase::Startup => self.frame,
            BoostPhase::Loop => NO_STARTUP_FRAMES + self.frame,
            BoostPhase::Ending => NO_STARTUP_FRAMES + NO_LOOP_FRAMES + self.frame,
        };
        NOS_FRAMES.get(idx).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerPose {
    #[default]
    Idle,
    Forward,
    Left,
    Right,
    Brake,
    Rev,
}

/// PlayerAnimation selects the pose of the player car and toggles the two frames of each pose.
/// Rev and brake share one frame timer, the driving poses share another one.
#[derive(Debug, Clone, Default)]
pub struct PlayerAnimation {
    pub pose: PlayerPose,
    rev_timer: f64,
    rev_frame: usize,
    drive_timer: f64,
    drive_frame: usize,
    pub boost: BoostAnimation,
}

impl PlayerAnimation {
    pub fn tick(&mut self, controls: &ControlSignals, phase: GamePhase, nos: f64, dt_ms: f64) {
        let at_start = phase.at_start();

        if (at_start && controls.accelerate) || controls.brake {
            self.rev_timer += dt_ms;
            if self.rev_timer >= POSE_FRAME_DURATION {
                self.rev_timer = 0.0;
                self.rev_frame = 1 - self.rev_frame;
            }
        }

        if !at_start
            && (controls.accelerate || controls.steer_left || controls.steer_right)
            && !controls.brake
        {
            self.drive_timer += dt_ms;
            if self.drive_timer >= POSE_FRAME_DURATION {
                self.drive_timer = 0.0;
                self.drive_frame = 1 - self.drive_frame;
            }
        }

        self.pose = if at_start && controls.accelerate {
            PlayerPose::Rev
        } else if controls.brake {
            PlayerPose::Brake
        } else if controls.steer_left {
            PlayerPose::Left
        } else if controls.steer_right {
            PlayerPose::Right
        } else if controls.accelerate {
            PlayerPose::Forward
        } else {
            PlayerPose::Idle
        };

        self.boost.tick(controls.boost && nos > 0.0, dt_ms);
    }

    /// pose_sprite returns the frame of the current pose, None for the idle car.
    pub fn pose_sprite(&self) -> Option<&'static str> {
        let (pair, frame) = match self.pose {
            PlayerPose::Idle => return None,
            PlayerPose::Forward => (0, self.drive_frame),
            PlayerPose::Left => (1, self.drive_frame),
            PlayerPose::Right => (2, self.drive_frame),
            PlayerPose::Brake => (3, self.rev_frame),
            PlayerPose::Rev => (4, self.rev_frame),
        };
        PLAYER_FRAMES.get(pair * 2 + frame).copied()
    }

    pub fn is_turning(&self) -> bool {
        matches!(self.pose, PlayerPose::Left | PlayerPose::Right)
    }
}
