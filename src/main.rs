//! Entry point for the egui-based wavelane viewer.
use std::path::PathBuf;

use eframe::egui;
use wavelane::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use wavelane::{logging, options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
        if let Err(err) = logging::init_stdout_only() {
            eprintln!("Console logging disabled: {err}");
        }
    }

    let options = options::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default waveform options: {err}");
        options::WaveOptions::default()
    });
    let path = std::env::args_os().nth(1).map(PathBuf::from);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 360.0])
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Wavelane",
        native_options,
        Box::new(move |_cc| match EguiApp::new(options, path) {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => Ok(Box::new(LaunchError { message: err })),
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start wavelane");
                ui.label(&self.message);
            });
        });
    }
}
