//! GCP Principals
//!
//! Lists every principal in a Google Cloud project together with the IAM
//! roles granted to it. The policy is read through `gcloud`, so whatever
//! account gcloud is logged in as must be allowed to read it.
//!
//! # Usage
//! ```bash
//! gcp-principals my-project
//!
//! # Machine-readable output
//! gcp-principals my-project --format json
//!
//! # Use a specific SDK install
//! GCLOUD_BIN=/opt/google-cloud-sdk/bin/gcloud gcp-principals my-project
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use gcp_principals::gcloud::DEFAULT_GCLOUD_BIN;
use gcp_principals::{list_principals, render, render_json, GcloudCli, OutputFormat};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "gcp-principals")]
#[command(about = "List each principal in a GCP project with the roles granted to it", long_about = None)]
#[command(version)]
struct Cli {
    /// GCP project ID whose IAM policy is read
    #[arg(value_name = "PROJECT_ID")]
    project: String,

    /// gcloud executable used to fetch the policy
    #[arg(long, env = "GCLOUD_BIN", default_value = DEFAULT_GCLOUD_BIN)]
    gcloud_bin: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,
}

// ============================================================
// Main Entry Point
// ============================================================

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Nowhere left to report a failed write of the usage text
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run(cli: Cli) -> Result<()> {
    let source = GcloudCli::new(cli.gcloud_bin);
    debug!(gcloud = %source.program(), "Using policy tool");

    let mapping = list_principals(&source, &cli.project).await?;

    match cli.format {
        OutputFormat::Text => {
            for line in render(&mapping) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json(&mapping))?);
        }
    }

    Ok(())
}
