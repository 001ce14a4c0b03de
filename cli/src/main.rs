use clap::Parser;
use gui::core::gui::run_gui;
use rayon::prelude::*;
use roadsim::core::assets::SpriteAtlas;
use roadsim::core::handle_race::handle_race;
use roadsim::core::track_builder::build_track;
use roadsim::post::race_result::{print_race_time_stats, RaceResult};
use roadsim::post::track_export::export_track_csv;
use roadsim::pre::check_sim_opts_pars::check_sim_opts_pars;
use roadsim::pre::read_sim_pars::read_sim_pars;
use roadsim::pre::sim_opts::SimOpts;
use std::cmp::min;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

// set maximum number of concurrently running jobs in case of running more than a single simulation
const MAX_NO_CONCURRENT_JOBS: u32 = 200;

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments and read simulation parameters
    let sim_opts: SimOpts = SimOpts::parse();
    init_logging(sim_opts.debug);

    let sim_pars = read_sim_pars(sim_opts.parfile_path.as_deref())?;

    // check simulation options and parameters
    check_sim_opts_pars(&sim_opts, &sim_pars)?;

    // export the segment table if requested
    if let Some(export_path) = sim_opts.export_track.as_deref() {
        let track = build_track(&SpriteAtlas::with_placeholders());
        export_track_csv(&track, export_path)?;
        info!(
            "Exported {} segments to {}",
            track.no_segments(),
            export_path.display()
        );
    }

    // EXECUTION -----------------------------------------------------------------------------------
    if sim_opts.gui {
        // GUI CASE --------------------------------------------------------------------------------
        // the race is driven interactively on the UI thread (must be the main thread)
        return run_gui(&sim_pars);
    }

    // NON-GUI CASE --------------------------------------------------------------------------------
    info!(
        "Simulating {} with {} NPCs and a time step size of {:.4}s",
        sim_pars.track_pars.name, sim_pars.race_pars.no_npcs, sim_opts.timestep_size
    );

    // create vector for the race results and simulate race(s)
    let mut race_results: Vec<RaceResult> = Vec::with_capacity(sim_opts.no_sim_runs as usize);
    let t_start = Instant::now();

    if sim_opts.no_sim_runs == 1 {
        // SINGLE THREAD ---------------------------------------------------------------------------
        race_results.push(handle_race(
            &sim_pars,
            sim_opts.timestep_size,
            sim_opts.max_racetime,
        )?);
    } else {
        // MULTIPLE THREADS ------------------------------------------------------------------------
        let mut no_races_left = sim_opts.no_sim_runs;

        while no_races_left > 0 {
            // calculate number of simulation runs to execute in current loop
            let tmp_no_sim_runs = min(no_races_left, MAX_NO_CONCURRENT_JOBS);

            // simulate the races and save the results
            let tmp_results: anyhow::Result<Vec<RaceResult>> = (0..tmp_no_sim_runs)
                .into_par_iter()
                .map(|_| handle_race(&sim_pars, sim_opts.timestep_size, sim_opts.max_racetime))
                .collect();
            race_results.par_extend(tmp_results?);

            // reduce remaining simulation runs
            no_races_left -= tmp_no_sim_runs;
        }
    }

    info!(
        "Execution time (total): {}ms",
        t_start.elapsed().as_millis()
    );

    // POST-PROCESSING -----------------------------------------------------------------------------
    // print results
    if race_results.len() == 1 {
        race_results[0].print_lap_and_race_times();
    } else {
        print_race_time_stats(&race_results);
    }

    Ok(())
}
