use crate::core::race::RacePars;
use crate::core::track::{PalettePars, TrackPars};
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

/// SimPars is used to store all other parameter structs. Every section is optional in the
/// parameter file and falls back to its defaults.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SimPars {
    pub race_pars: RacePars,
    pub track_pars: TrackPars,
    pub palette_pars: PalettePars,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct. Without a file path the default parameters are returned.
pub fn read_sim_pars(filepath: Option<&Path>) -> anyhow::Result<SimPars> {
    let filepath = match filepath {
        Some(filepath) => filepath,
        None => {
            info!("No parameter file given, using built-in parameters");
            return Ok(SimPars::default());
        }
    };

    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars: SimPars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;

    info!(
        "Loaded parameter file {} (track {})",
        filepath.display(),
        pars.track_pars.name
    );
    Ok(pars)
}
