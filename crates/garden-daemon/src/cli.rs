//! CLI argument parsing for the garden daemon.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Knowledge Garden Daemon
///
/// A local text-to-network analysis engine with a persisted knowledge graph.
#[derive(Parser, Debug)]
#[command(name = "garden-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides ~/.config/knowledge-garden/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the data directory holding the graph snapshot
    #[arg(long, global = true)]
    pub data_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze text into a concept network (reads stdin when no text given)
    Analyze {
        /// Text to analyze
        text: Option<String>,
    },

    /// Manage atomic notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Import a .txt/.md/.csv file as notes
    Import {
        /// File to import
        file: std::path::PathBuf,
    },

    /// Show store counters
    Stats,

    /// Group persisted concepts into clusters
    Clusters {
        /// Minimum cluster size
        #[arg(long, default_value = "3")]
        min_size: usize,
    },

    /// Detect weakly connected cluster pairs
    Gaps,

    /// Rank concepts by centrality
    Centrality,

    /// Find concepts with similar neighborhoods
    Similar {
        /// Concept label pattern
        label: String,

        /// Maximum results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Strongest paths between two concept labels
    Paths {
        /// Source label pattern
        source: String,

        /// Target label pattern
        target: String,
    },

    /// Expand the neighborhood around a concept
    Neighborhood {
        /// Concept label pattern
        label: String,

        /// Expansion depth
        #[arg(short, long, default_value = "2")]
        depth: usize,
    },

    /// Bucket concept creation over time
    Evolution {
        /// Bucket width: day, week or month
        #[arg(long, default_value = "week")]
        timeframe: String,
    },

    /// Recompute and store persisted-graph communities
    AssignCommunities,

    /// Export the graph with display attributes
    Export,

    /// Whole-graph insight summary
    Insights,
}

/// Note subcommands
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a note
    Add {
        /// Note content
        content: String,

        /// Tags to attach
        #[arg(short, long)]
        tags: Vec<String>,
    },

    /// Link two notes
    Link {
        /// First note id
        note_a: String,

        /// Second note id
        note_b: String,
    },

    /// List notes, newest first
    List,

    /// Search note content
    Search {
        /// Query string
        query: String,
    },

    /// Suggest connections for a note
    Suggest {
        /// Note id
        note_id: String,
    },
}
