//! Generate a static Prometheus targets file
//!
//! Each hostname expands into a DCGM exporter group (port 9400) and a node
//! exporter group (port 9100).

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use prometheus_http_sd::generator::{generate_targets, write_targets_file, DEFAULT_OUTPUT};
use prometheus_http_sd::Result;

/// Generate Prometheus targets.json file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hostnames to generate targets for
    #[arg(required = true, num_args = 1.., value_name = "HOSTNAME")]
    hostnames: Vec<String>,

    /// Output file path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let groups = generate_targets(&args.hostnames);
    write_targets_file(&args.output, &groups)?;

    println!("Targets written to {}", args.output.display());
    Ok(())
}
