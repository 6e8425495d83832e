//! sealroll-verify: check a saved export the way a client does.
//!
//! Reads an encoded `UserList`, recomputes every email digest, verifies the
//! signatures against the public key inside the export, and prints the
//! records that pass as JSON.
//!
//! Usage:
//!   sealroll-verify users.bin [--summary]

use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sealroll::verify_export_parallel;

#[derive(Parser, Debug)]
#[command(name = "sealroll-verify")]
#[command(about = "Verify the signed records in a Sealroll export")]
#[command(version)]
struct Args {
    /// Export file produced by the panel
    export: PathBuf,

    /// Print only the total and trusted counts
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let bytes = tokio::fs::read(&args.export)
        .await
        .with_context(|| format!("reading {}", args.export.display()))?;
    let view = verify_export_parallel(Bytes::from(bytes))
        .await
        .context("decoding export")?;

    if args.summary {
        println!("{} of {} records trusted", view.trusted(), view.total);
    } else {
        println!("{}", serde_json::to_string_pretty(&view.users)?);
    }
    Ok(())
}
