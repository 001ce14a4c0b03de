use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "RS-ROAD",
    about = "A pseudo-3D endless road racer written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (also settable via RUST_LOG)
    #[arg(short, long)]
    pub debug: bool,

    /// Activate GUI (the race is then driven interactively in real-time)
    #[arg(short, long)]
    pub gui: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of headless simulation runs (must be one in case the GUI is activated)
    #[arg(short, long, default_value_t = 1)]
    pub no_sim_runs: u32,

    /// Set path to the simulation parameter file (built-in defaults are used if omitted)
    #[arg(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set simulation timestep size in seconds for headless runs, should be in the range
    /// [0.001, 1.0]
    #[arg(short, long, default_value_t = 1.0 / 60.0)]
    pub timestep_size: f64,

    /// Set the maximum race time in seconds after which a headless run is aborted
    #[arg(short, long, default_value_t = 600.0)]
    pub max_racetime: f64,

    /// Export the built track segment table to the given CSV file
    #[arg(short, long)]
    pub export_track: Option<PathBuf>,
}
