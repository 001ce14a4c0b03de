use crate::interfaces::controls::GamePhase;
use anyhow::Context;

/// Maximum frequency with which HUD snapshots are sent to a consumer during real-time runs.
pub const MAX_GUI_UPDATE_FREQUENCY: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> RgbColor {
        RgbColor { r, g, b }
    }

    /// from_hex converts a CSS color string (e.g. "#fbbf24") into an RGB color.
    pub fn from_hex(hex: &str) -> anyhow::Result<RgbColor> {
        let tmp_color = hex
            .parse::<css_color_parser::Color>()
            .context(format!("Could not parse hex color {}!", hex))?;

        Ok(RgbColor {
            r: tmp_color.r,
            g: tmp_color.g,
            b: tmp_color.b,
        })
    }
}

/// HudState is the per-frame snapshot published by the update step.
/// * `speed` - Displayed speed (raw speed / 100)
/// * `nos` - Boost resource in [0, 100]
/// * `lap`/`tot_no_laps` - Current lap and total number of laps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub speed: u32,
    pub nos: u32,
    pub lap: u32,
    pub tot_no_laps: u32,
    pub phase: GamePhase,
    pub racetime: f64,
}
