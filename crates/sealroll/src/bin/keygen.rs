//! sealroll-keygen: provision the signing keypair.
//!
//! Writes a 2048-bit RSA keypair as `private.pem` (PKCS#8) and `public.pem`
//! (SPKI). Paths default to the panel configuration, so
//! `SEALROLL_PRIVATE_KEY` and `SEALROLL_PUBLIC_KEY` (or a `.env` file) apply.
//!
//! Usage:
//!   sealroll-keygen [--dir keys] [--force]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sealroll::{KeyPaths, Keypair, PanelConfig};

#[derive(Parser, Debug)]
#[command(name = "sealroll-keygen")]
#[command(about = "Generate the RSA keypair used to sign user records")]
#[command(version)]
struct Args {
    /// Directory for private.pem and public.pem (overrides the configured paths)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Replace existing key files
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let paths = match args.dir {
        Some(dir) => KeyPaths::in_dir(dir),
        None => PanelConfig::from_env()?.keys,
    };

    if paths.any_exists() && !args.force {
        bail!(
            "key files already exist at {} / {}; pass --force to replace them",
            paths.private_key.display(),
            paths.public_key.display()
        );
    }

    info!("generating RSA keypair");
    let keypair = Keypair::generate().context("generating keypair")?;
    keypair.write_to(&paths).context("writing key files")?;

    info!(
        private_key = %paths.private_key.display(),
        public_key = %paths.public_key.display(),
        "keypair written"
    );
    Ok(())
}
