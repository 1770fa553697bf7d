use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings, load_settings_from},
    controller_from_settings, Document, NoopTrigger, SettleOutcome,
};
use tokio::runtime::Handle;

/// Ask one question about a document and print the answer.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    file: PathBuf,
    #[arg(long, default_value = "")]
    question: String,
    /// Host of the answering service.
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Settings file; defaults to ./askpdf.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the settled state as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
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

    let document = Document::load(&args.file)
        .with_context(|| format!("failed to read document {}", args.file.display()))?;
    let controller = controller_from_settings(&settings, Arc::new(NoopTrigger), Handle::current())?;
    controller.set_question(args.question);
    controller.set_file(document);

    let task = controller
        .submit()
        .context("submission was not accepted")?;
    let outcome = task.await.context("submission task panicked")?;

    let state = controller.snapshot();
    if args.json {
        let payload = serde_json::json!({
            "answered": matches!(outcome, SettleOutcome::Answered { .. }),
            "answer": state.answer(),
            "viewer_url": state.viewer().map(|viewer| viewer.viewer_url()),
            "page": state.viewer().map(|viewer| viewer.page.get()),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Answer: {}", state.answer().unwrap_or_default());
    if let Some(viewer) = state.viewer() {
        println!("Highlighted document (page {}): {}", viewer.page, viewer.viewer_url());
    }
    Ok(())
}
