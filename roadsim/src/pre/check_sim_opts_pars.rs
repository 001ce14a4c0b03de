use crate::core::track::Palette;
use crate::core::track_builder::TrackBuilder;
use crate::pre::read_sim_pars::SimPars;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::InputValueError;

/// Upper bound for the number of NPC vehicles.
pub const MAX_NO_NPCS: usize = 200;
/// Upper bound for the number of painted lanes.
pub const MAX_NO_LANES: u32 = 8;

/// check_sim_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_sim_opts_pars(sim_opts: &SimOpts, sim_pars: &SimPars) -> anyhow::Result<()> {
    // PART 1: SIMULATION OPTIONS
    if !(0.001 <= sim_opts.timestep_size && sim_opts.timestep_size <= 1.0) {
        return Err(InputValueError).context(format!(
            "timestep_size is {:.3}s, which is not within the reasonable range of [0.001, 1.0]s!",
            sim_opts.timestep_size
        ));
    }

    if sim_opts.no_sim_runs < 1 {
        return Err(InputValueError).context(format!(
            "no_sim_runs must be at least equal to one, but is {}!",
            sim_opts.no_sim_runs
        ));
    }

    if sim_opts.gui && sim_opts.no_sim_runs != 1 {
        return Err(InputValueError)
            .context("If gui is activated, no_sim_runs must be equal to one!");
    }

    if sim_opts.max_racetime <= 0.0 {
        return Err(InputValueError).context(format!(
            "max_racetime must be positive, but is {:.3}s!",
            sim_opts.max_racetime
        ));
    }

    check_sim_pars(sim_pars)
}

/// check_sim_pars checks the parameter file content only (used by the GUI path as well).
pub fn check_sim_pars(sim_pars: &SimPars) -> anyhow::Result<()> {
    // RACE ----------------------------------------------------------------------------------------
    if sim_pars.race_pars.tot_no_laps < 1 {
        return Err(InputValueError).context("tot_no_laps must be at least equal to one!");
    }

    if sim_pars.race_pars.no_npcs > MAX_NO_NPCS {
        return Err(InputValueError).context(format!(
            "no_npcs is {}, which is above the limit of {}!",
            sim_pars.race_pars.no_npcs, MAX_NO_NPCS
        ));
    }

    // TRACK ---------------------------------------------------------------------------------------
    let no_segments = TrackBuilder::circuit().no_segments();

    if !(1 <= sim_pars.track_pars.draw_distance && sim_pars.track_pars.draw_distance <= no_segments)
    {
        return Err(InputValueError).context(format!(
            "draw_distance is {}, which is not within the required range [1, {}]!",
            sim_pars.track_pars.draw_distance, no_segments
        ));
    }

    if !(1 <= sim_pars.track_pars.lanes && sim_pars.track_pars.lanes <= MAX_NO_LANES) {
        return Err(InputValueError).context(format!(
            "lanes is {}, which is not within the required range [1, {}]!",
            sim_pars.track_pars.lanes, MAX_NO_LANES
        ));
    }

    if !(sim_pars.track_pars.fog_density >= 0.0) {
        return Err(InputValueError).context("fog_density must not be negative!");
    }

    // PALETTE -------------------------------------------------------------------------------------
    Palette::from_pars(&sim_pars.palette_pars).context("The color palette is invalid!")?;

    Ok(())
}
