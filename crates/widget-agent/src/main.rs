//! Widget agent host - exposes the widget compiler as named tools.
//!
//! The calling agent writes one JSON request per line on stdin and reads one
//! JSON reply per line from stdout. Logs go to stderr.

mod config;
mod host;
mod picker;
mod protocol;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use widget_compiler::{ToolRegistry, WidgetCompiler};

use crate::config::AgentConfig;
use crate::host::Host;

#[derive(Parser, Debug)]
#[command(name = "widget-agent")]
#[command(about = "Serves the widget compiler tools over line-delimited JSON on stdio")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AgentConfig::load(args.config.as_deref())?;
    let instructions = config.instructions()?;

    let options = config.compile_options();
    match &options.widget_dir {
        Some(dir) => tracing::info!("Writing widgets to {}", dir.display()),
        None => tracing::warn!("No widgets folder available, every save goes through the picker"),
    }

    let compiler = Arc::new(WidgetCompiler::new(options));
    let picker = picker::from_config(config.picker_command.as_deref());
    let registry = ToolRegistry::with_default_tools(compiler, picker);
    tracing::info!("Starting widget agent host with tools: {:?}", registry.tool_names());

    Host::new(registry, instructions)
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}
