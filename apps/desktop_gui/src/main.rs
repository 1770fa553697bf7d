use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use client_core::config::{load_settings, load_settings_from};
use eframe::egui;

mod backend_bridge;
mod ui;

use ui::AskApp;

#[derive(Parser, Debug)]
struct Args {
    /// Host of the answering service.
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(host) = args.host {
        settings.service_host = host;
    }
    if let Some(port) = args.port {
        settings.service_port = port;
    }

    let backend = backend_bridge::runtime::launch()?;
    let handle = backend.handle();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF Pilot")
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([520.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "PDF Pilot",
        options,
        Box::new(move |cc| {
            let app = AskApp::new(&cc.egui_ctx, &settings, handle)
                .map_err(|err| -> Box<dyn std::error::Error + Send + Sync> { err.into() })?;
            Ok(Box::new(app))
        }),
    );
    // Runtime shuts down after the window closes.
    drop(backend);
    result.map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
