//! Headless runner (default binary).
//!
//! Plays the game without a display: commands arrive on stdin (or from
//! `--script`), and the final board is printed as text or JSON.
//!
//! ```text
//! blockfall [--seed N] [--config PATH] [--frame-ms N] [--max-frames N]
//!           [--games N] [--script CMDS] [--json]
//! ```
//!
//! Logging goes to stderr and honors `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use blockfall::core::ShapeCatalog;
use blockfall::runner::{parse_args, run};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    ShapeCatalog::try_standard().context("built-in shape catalog is malformed")?;

    run(options)?;
    Ok(())
}
