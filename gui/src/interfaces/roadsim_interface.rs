use flume::Receiver;
use roadsim::interfaces::gui_interface::{HudState, MAX_GUI_UPDATE_FREQUENCY};
use std::time::{Duration, Instant};

/// RoadsimInterface receives the HUD snapshots published by the race. The displayed snapshot is
/// refreshed at most with MAX_GUI_UPDATE_FREQUENCY, phase changes are shown immediately.
#[derive(Debug)]
pub struct RoadsimInterface {
    pub rx: Receiver<HudState>,
    pub hud_state: HudState,
    last_refresh: Option<Instant>,
}

impl RoadsimInterface {
    pub fn new(rx: Receiver<HudState>) -> RoadsimInterface {
        RoadsimInterface {
            rx,
            hud_state: Default::default(),
            last_refresh: None,
        }
    }

    pub fn update(&mut self, now: Instant) {
        // loop to obtain the latest HUD state in the channel
        let message = self.rx.try_iter().last();

        let Some(hud_state) = message else {
            return;
        };

        let min_interval = Duration::from_secs_f64(1.0 / MAX_GUI_UPDATE_FREQUENCY);
        let refresh_due = match self.last_refresh {
            Some(last_refresh) => now.duration_since(last_refresh) >= min_interval,
            None => true,
        };

        if refresh_due || hud_state.phase != self.hud_state.phase {
            self.hud_state = hud_state;
            self.last_refresh = Some(now);
        }
    }
}
