//! metronome-rs - a desktop metronome
//!
//! Pick a tempo between 40 and 220 BPM and press Start to hear a short
//! 1 kHz click on every beat.
//!
//! ## Layout
//! - `tempo`: bounded BPM value
//! - `metronome`: tempo/playback state owned by the UI
//! - `scheduler`: repeating timers and the click scheduler
//! - `audio`: tone synthesis and the cpal output

use eframe::egui;

mod audio;
mod metronome;
mod scheduler;
mod tempo;

use audio::{CpalHost, SoundEmitter};
use metronome::Metronome;
use scheduler::ThreadTimer;
use tempo::Tempo;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting metronome-rs");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([320.0, 200.0])
            .with_title("metronome-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "metronome-rs",
        options,
        Box::new(|cc| Ok(Box::new(MetronomeApp::new(cc)))),
    )
}

/// Main application state
struct MetronomeApp {
    metronome: Metronome<ThreadTimer, SoundEmitter<CpalHost>>,
    /// Slider position, copied into the metronome when it changes
    bpm: u16,
}

impl MetronomeApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let metronome = Metronome::new(ThreadTimer::new(), SoundEmitter::new(CpalHost::new()));
        let bpm = metronome.tempo().bpm();

        Self { metronome, bpm }
    }

    fn status(&self) -> String {
        if let Some(error) = self.metronome.emitter().output_error() {
            return format!("No audio: {}", error);
        }
        if self.metronome.is_playing() {
            format!("Playing at {}", self.metronome.tempo())
        } else {
            "Stopped".to_string()
        }
    }
}

impl eframe::App for MetronomeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Metronome");
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("BPM:");
                ui.strong(self.bpm.to_string());
            });

            if ui
                .add(
                    egui::Slider::new(&mut self.bpm, Tempo::range())
                        .step_by(1.0)
                        .show_value(false),
                )
                .changed()
            {
                self.metronome.set_tempo(Tempo::new(self.bpm));
            }

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("▶ Start").clicked() {
                    self.metronome.start();
                }
                if ui.button("⏹ Stop").clicked() {
                    self.metronome.stop();
                }
            });

            ui.separator();
            ui.small(self.status());
        });
    }
}
