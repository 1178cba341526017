//! Submit a flow measure draft to a running flow server.

use chrono::{Duration, Utc};
use clap::Parser;
use flow_cli::client::FlowApiClient;
use serde_json::Value;
use std::path::PathBuf;

/// Post a flow measure draft to the admin API
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Flow server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// API bearer token
    #[arg(long)]
    token: String,

    /// Owning flight information region id (used when no draft file is given)
    #[arg(long)]
    fir: Option<String>,

    /// Path to a draft JSON file
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = FlowApiClient::new(&args.url, &args.token);

    let draft: Value = match &args.file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => {
            let fir = args
                .fir
                .ok_or_else(|| anyhow::anyhow!("--fir is required without --file"))?;
            let now = Utc::now();
            serde_json::json!({
                "type": "minimum_departure_interval",
                "reason": "Controller capacity",
                "start_time": (now + Duration::hours(1)).to_rfc3339(),
                "end_time": (now + Duration::hours(3)).to_rfc3339(),
                "minutes": 2,
                "seconds": 0,
                "flight_information_region_id": fir,
            })
        }
    };

    let created = client.post("/v1/flow-measures", &draft)?;
    println!(
        "Created measure {} ({})",
        created["identifier"].as_str().unwrap_or("?"),
        created["status"].as_str().unwrap_or("?")
    );
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}
