//! `gc-runtime <session.json> [config.toml]`

use anyhow::{Context, Result};
use gc_invite_list::InviteListConfig;
use gc_runtime::{replay, Session};
use gc_telemetry::{init_logging, TelemetryConfig};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const RESULT_WAIT: Duration = Duration::from_secs(5);

fn load_config(path: Option<String>) -> Result<InviteListConfig> {
    let Some(path) = path else {
        let config = InviteListConfig::from_env();
        config.validate()?;
        return Ok(config);
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {path}"))?;
    let config = InviteListConfig::from_toml_str(&text)?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "metrics")]
fn dump_metrics() -> Result<()> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    eprint!("{}", String::from_utf8_lossy(&buffer));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env())?;

    let mut args = std::env::args().skip(1);
    let session_path = args
        .next()
        .context("usage: gc-runtime <session.json> [config.toml]")?;
    let config = load_config(args.next())?;
    let session = Session::load(Path::new(&session_path))?;
    info!(session = %session_path, steps = session.steps.len(), "Session loaded");

    let records = tokio::select! {
        records = replay(session, config, RESULT_WAIT) => records?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping replay");
            return Ok(());
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        writeln!(out, "{record}")?;
    }

    #[cfg(feature = "metrics")]
    dump_metrics()?;

    Ok(())
}
