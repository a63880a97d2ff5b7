//! Desktop viewer for Parquet, CSV and TXT files.
//!
//! With a subcommand the binary works from the command line. Without one it
//! opens the egui window, which requires the `gui` feature.

#[cfg(feature = "gui")]
mod app;

use clap::Parser;
use parquet_viewer::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(command) => cli::run(command),
        None => launch_gui(),
    }
}

#[cfg(feature = "gui")]
fn launch_gui() -> anyhow::Result<()> {
    app::run()
}

#[cfg(not(feature = "gui"))]
fn launch_gui() -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature, pass a subcommand (see --help)")
}
