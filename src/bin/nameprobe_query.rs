//! One-shot lookup without the TUI.
//!
//! Runs a single name through the same aggregator the form uses and prints
//! the result.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin nameprobe_query -- <name> [--json]
//! ```
//!
//! Exit status is 0 on success and 1 on failure or bad usage. Logs go to
//! stderr (default level `warn`, override with `RUST_LOG`).

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nameprobe::adapters::sanitize::SanitizingMakeWriter;
use nameprobe::application::lookup_once;
use nameprobe::tui::format::{report, report_json};
use nameprobe::{OperationOutcome, ProviderConfig};

const USAGE: &str = "Usage: nameprobe_query <name> [--json]";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let mut name: Option<String> = None;
    let mut json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(ExitCode::SUCCESS);
            }
            _ if name.is_none() => name = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let Some(name) = name else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(std::io::stderr)),
        )
        .init();

    let config = ProviderConfig::from_env()?;

    let outcome = match lookup_once(config, &name).await {
        Ok(outcome) => outcome,
        Err(nameprobe::NameprobeError::Query(e)) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        OperationOutcome::Success(result) => {
            if json {
                println!("{}", report_json(&name, &result)?);
            } else {
                print!("{}", report(&name, &result));
            }
            Ok(ExitCode::SUCCESS)
        }
        OperationOutcome::Failure(reason) => {
            eprintln!("{reason}");
            Ok(ExitCode::FAILURE)
        }
    }
}
