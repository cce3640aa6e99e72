//! Knowledge Garden Daemon
//!
//! A local text-to-network analysis engine with a persisted knowledge graph.
//!
//! # Usage
//!
//! ```bash
//! garden-daemon analyze "machine learning algorithms machine learning"
//! garden-daemon note add "Ownership moves values" --tags rust
//! garden-daemon import notes.md
//! garden-daemon clusters --min-size 3
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/knowledge-garden/config.toml)
//! 3. Environment variables (GARDEN_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use garden_daemon::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
