use serde::Deserialize;

/// ControlSignals are the inputs consumed by the update step. `analog_steer` is only evaluated on
/// touch devices in portrait orientation and lies in [-1, 1]. `toggle_view` is an edge trigger
/// that the host resets after handling it.
#[derive(Debug, Clone, Default)]
pub struct ControlSignals {
    pub steer_left: bool,
    pub steer_right: bool,
    pub analog_steer: f64,
    pub accelerate: bool,
    pub brake: bool,
    pub boost: bool,
    pub toggle_view: bool,
}

impl ControlSignals {
    /// The method returns -1.0 for left, 1.0 for right and 0.0 for straight steering.
    pub fn steer_direction(&self) -> f64 {
        if self.steer_left {
            -1.0
        } else if self.steer_right {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Pointer,
    TouchLandscape,
    TouchPortrait,
}

impl DeviceClass {
    pub fn is_touch(&self) -> bool {
        !matches!(self, DeviceClass::Pointer)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    First,
    #[default]
    Third,
}

impl ViewMode {
    pub fn toggled(&self) -> ViewMode {
        match self {
            ViewMode::First => ViewMode::Third,
            ViewMode::Third => ViewMode::First,
        }
    }
}

/// GamePhase is driven by the phase controller of the host. The race only raises the
/// Playing -> Finished transition itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Preparation,
    Countdown,
    Playing,
    Finished,
}

impl GamePhase {
    pub fn at_start(&self) -> bool {
        matches!(self, GamePhase::Preparation | GamePhase::Countdown)
    }
}
