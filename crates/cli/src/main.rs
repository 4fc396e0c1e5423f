//! # metasync: Profile Retrieval CLI
//!
//! Thin entry point for the `metasync` binary. All logic lives in the
//! `metasync_cli` library crate.

use anyhow::Result;
use clap::Parser;
use metasync_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Pick up a local `.env`, if any.
    dotenvy::dotenv().ok();

    // 2. Setup logging
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("metasync=info".parse()?))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run the command and handle the final result
    if let Err(e) = run(cli).await {
        eprintln!("[metasync error] {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
