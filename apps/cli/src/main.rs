//! CourseGen CLI — AI-assisted academic course design pipeline.
//!
//! Turns a course topic into learning objectives, a structured curriculum,
//! and detailed weekly content, one persisted JSON artifact per stage.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
