use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments accepted by the terminal front-end.
#[derive(Parser, Debug, Default)]
#[command(name = "tile-merge", about = "Slide and merge numbered tiles in the terminal.")]
pub(crate) struct Args {
    /// Optional TOML settings file; flags given here override its values.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Number of cells along each edge of the grid (default 4).
    #[arg(long)]
    pub(crate) size: Option<u32>,
    /// Seed for tile placement; omitted means a fresh seed from entropy.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Probability that a spawned tile is a four (default 0.1).
    #[arg(long)]
    pub(crate) four_probability: Option<f64>,
    /// Play transitions out in real time instead of completing them at once.
    #[arg(long)]
    pub(crate) animate: bool,
    /// Disable ANSI colors.
    #[arg(long)]
    pub(crate) no_color: bool,
    /// Log filter used when RUST_LOG is unset, e.g. "info", "debug".
    #[arg(long, default_value = "warn")]
    pub(crate) log_level: String,
}
