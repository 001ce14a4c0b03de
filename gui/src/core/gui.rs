use crate::core::painter::paint_frame;
use crate::interfaces::roadsim_interface::RoadsimInterface;
use eframe::egui;
use egui::{Align2, Color32, FontId, Key, Vec2};
use flume::Receiver;
use helpers::buffer::RingBuffer;
use helpers::projection::Viewport;
use roadsim::core::assets::SpriteAtlas;
use roadsim::core::race::Race;
use roadsim::interfaces::controls::{ControlSignals, GamePhase};
use roadsim::interfaces::gui_interface::HudState;
use roadsim::pre::read_sim_pars::SimPars;
use roadsim::render::minimap::{MinimapProjector, MINIMAP_WIDTH};
use roadsim::render::pipeline::Renderer;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of countdown steps before the race starts.
pub const COUNTDOWN_START: u32 = 5;
/// Duration of one countdown step in seconds.
pub const COUNTDOWN_STEP: f64 = 1.0;

const WINDOW_SIZE: [f32; 2] = [1280.0, 720.0];
const PANEL_MARGIN: f32 = 20.0;

/// PhaseController drives the lifecycle preparation -> countdown -> playing -> finished. Only the
/// playing -> finished transition is raised by the race itself.
#[derive(Debug, Default)]
pub struct PhaseController {
    pub countdown: u32,
    timer: f64,
}

impl PhaseController {
    /// The method starts the countdown if the race is still in preparation.
    pub fn start(&mut self, race: &mut Race) {
        if race.phase == GamePhase::Preparation {
            self.countdown = COUNTDOWN_START;
            self.timer = 0.0;
            race.set_phase(GamePhase::Countdown);
        }
    }

    /// The method decrements the countdown once per COUNTDOWN_STEP and releases the race when it
    /// reaches zero.
    pub fn tick(&mut self, race: &mut Race, dt: f64) {
        if race.phase != GamePhase::Countdown {
            return;
        }

        self.timer += dt;

        while self.timer >= COUNTDOWN_STEP && self.countdown > 0 {
            self.timer -= COUNTDOWN_STEP;
            self.countdown -= 1;
            debug!("Countdown {}", self.countdown);
        }

        if self.countdown == 0 {
            race.set_phase(GamePhase::Playing);
            info!("Race started");
        }
    }
}

/// read_controls maps the keyboard state onto the control signals of the update step.
fn read_controls(ctx: &egui::Context) -> ControlSignals {
    ctx.input(|i| ControlSignals {
        steer_left: i.key_down(Key::ArrowLeft) || i.key_down(Key::A),
        steer_right: i.key_down(Key::ArrowRight) || i.key_down(Key::D),
        analog_steer: 0.0,
        accelerate: i.key_down(Key::ArrowUp) || i.key_down(Key::W),
        brake: i.key_down(Key::ArrowDown) || i.key_down(Key::S),
        boost: i.key_down(Key::Space),
        toggle_view: i.key_pressed(Key::T),
    })
}

#[derive(Debug)]
pub struct RoadApp {
    pub race: Race,
    pub renderer: Renderer,
    pub minimap: MinimapProjector,
    pub roadsim_interface: RoadsimInterface,
    pub phase_controller: PhaseController,
    pub controls: ControlSignals,
    pub t_start: Instant,
    pub prev_update: Instant,
    pub prev_update_durations: RingBuffer<u32>,
}

impl RoadApp {
    pub fn new(race: Race, renderer: Renderer, rx: Receiver<HudState>) -> RoadApp {
        RoadApp {
            race,
            renderer,
            minimap: MinimapProjector::new(),
            roadsim_interface: RoadsimInterface::new(rx),
            phase_controller: Default::default(),
            controls: Default::default(),
            t_start: Instant::now(),
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(30),
        }
    }

    /// The method handles the keys that act on the game lifecycle. It returns true if the window
    /// should be closed.
    fn handle_lifecycle_keys(&mut self, ctx: &egui::Context) -> bool {
        let (enter, escape) = ctx.input(|i| (i.key_pressed(Key::Enter), i.key_pressed(Key::Escape)));

        if self.controls.toggle_view {
            self.race.toggle_view_mode();
        }

        if enter {
            match self.race.phase {
                GamePhase::Preparation => self.phase_controller.start(&mut self.race),
                GamePhase::Finished => return true,
                _ => (),
            }
        }

        escape
    }

    fn hud_text(&self) -> String {
        let hud = &self.roadsim_interface.hud_state;
        let mut text = format!(
            "Speed: {} km/h\nNOS: {}%\nLap: {}/{}\nRace time: {:.2}s\nPhase: {:?}",
            hud.speed,
            hud.nos,
            hud.lap.max(1),
            hud.tot_no_laps.max(1),
            hud.racetime,
            hud.phase
        );

        if let Some(avg) = self.prev_update_durations.get_avg() {
            if avg > 0.0 {
                text.push_str(&format!("\nGUI update frequency: {:.0} Hz", 1000.0 / avg));
            }
        }

        text
    }

    fn overlay_text(&self) -> Option<String> {
        match self.race.phase {
            GamePhase::Preparation => Some(String::from("PRESS ENTER TO START")),
            GamePhase::Countdown => Some(format!("{}", self.phase_controller.countdown.max(1))),
            GamePhase::Playing => None,
            GamePhase::Finished => Some(format!(
                "FINISHED IN {:.3}s\nPRESS ENTER TO LEAVE",
                self.race.cur_racetime
            )),
        }
    }

    pub fn set_ui_content(&mut self, ui: &mut egui::Ui) -> egui::Response {
        // get UI handles
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;

        // ROAD ------------------------------------------------------------------------------------
        let viewport = Viewport {
            width: rect.width() as f64,
            height: rect.height() as f64,
        };
        let frame = self.renderer.render(&self.race, &self.controls, viewport);
        paint_frame(&painter, &frame, rect.min.to_vec2());

        // MINIMAP ---------------------------------------------------------------------------------
        let now = self.t_start.elapsed().as_secs_f64() * 1000.0;
        self.minimap.update(&self.race, now);

        let minimap_offset = Vec2 {
            x: rect.right() - MINIMAP_WIDTH as f32 - PANEL_MARGIN,
            y: rect.top() + PANEL_MARGIN,
        };
        paint_frame(&painter, self.minimap.frame(), minimap_offset);

        // HUD -------------------------------------------------------------------------------------
        painter.text(
            rect.left_top() + Vec2::splat(PANEL_MARGIN),
            Align2::LEFT_TOP,
            self.hud_text(),
            FontId::monospace(16.0),
            Color32::WHITE,
        );

        if let Some(overlay) = self.overlay_text() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                overlay,
                FontId::proportional(48.0),
                Color32::WHITE,
            );
        }

        response
    }
}

impl eframe::App for RoadApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // calculate current UI update duration, append it to the buffer, and set update time
        let now = Instant::now();
        let dt = now.duration_since(self.prev_update).as_secs_f64();
        self.prev_update_durations
            .push(now.duration_since(self.prev_update).as_millis() as u32);
        self.prev_update = now;

        if dt > 1.0 && self.race.phase == GamePhase::Playing {
            warn!("Frame took {:.3}s, the update step is clamped to 1s", dt);
        }

        // input and lifecycle
        self.controls = read_controls(ctx);
        if self.handle_lifecycle_keys(ctx) {
            info!("Closing GUI");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.phase_controller.tick(&mut self.race, dt);

        // simulation step (the race itself ignores the other phases)
        self.race.update(&self.controls, dt.min(1.0));
        self.race.tick_animations(&self.controls, dt);
        self.roadsim_interface.update(now);

        // update UI content
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.set_ui_content(ui);
            });

        // request repaint of the UI
        ctx.request_repaint();
    }
}

/// run_gui creates the race and the renderer from the inserted parameters and runs the window
/// until it is closed. The simulation runs on the UI thread.
pub fn run_gui(sim_pars: &SimPars) -> anyhow::Result<()> {
    // create channel for the HUD snapshots
    let (tx, rx) = flume::unbounded();

    let mut race = Race::new(&sim_pars.race_pars, SpriteAtlas::with_placeholders());
    race.set_hud_sender(tx);
    let renderer = Renderer::from_pars(&sim_pars.track_pars, &sim_pars.palette_pars)?;

    let app = RoadApp::new(race, renderer, rx);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("RS-ROAD - {}", sim_pars.track_pars.name))
            .with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };

    info!("Starting GUI for track {}", sim_pars.track_pars.name);

    eframe::run_native(
        "RS-ROAD",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("GUI terminated with an error: {}", e))
}
