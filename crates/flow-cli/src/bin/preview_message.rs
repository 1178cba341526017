//! Render the Discord notification for a flow measure without sending it.
//!
//! Reads a measure from a JSON file, or falls back to a built-in sample.

use clap::Parser;
use flow_cli::sample::sample_measure;
use flow_core::enums::FlowMeasureStatus;
use flow_core::message::NotificationMessage;
use flow_core::models::FlowMeasure;
use std::path::PathBuf;

/// Preview the webhook payload for a flow measure
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Status transition to render: notified, active, withdrawn, or expired
    #[arg(long, default_value = "notified")]
    status: String,

    /// Path to a measure JSON file (defaults to a built-in sample)
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let status: FlowMeasureStatus = serde_json::from_value(serde_json::json!(args.status))
        .map_err(|_| anyhow::anyhow!("Unknown status: {}", args.status))?;

    let measure: FlowMeasure = match &args.file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => sample_measure(),
    };

    let message = NotificationMessage::for_status(&measure, status);
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}
