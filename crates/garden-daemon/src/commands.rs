//! Command implementations for the garden daemon.
//!
//! Every command loads settings, opens the store (load-from-disk), runs one
//! operation through the service layer, and flushes the snapshot before
//! exiting so the debounce window cannot drop the final writes.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use garden_service::GardenService;
use garden_store::GraphStore;
use garden_types::{Settings, Timeframe};

use crate::cli::{Cli, Commands, NoteCommands};

/// Initialize tracing from settings, honoring `RUST_LOG` when set.
fn init_tracing(settings: &Settings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Load layered settings and apply CLI overrides.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    if let Some(data_path) = &cli.data_path {
        settings.data_path = data_path.clone();
    }
    Ok(settings)
}

/// Print any serializable value as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read all of stdin as a string.
fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

/// Entry point for all commands.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_tracing(&settings);

    let store = Arc::new(GraphStore::open(
        settings.snapshot_path(),
        Duration::from_millis(settings.debounce_ms),
    ));
    let service = GardenService::new(Arc::clone(&store), &settings);

    dispatch(&cli.command, &service).await?;

    // One-shot process: write pending state before exit.
    store.flush().await.context("failed to flush graph snapshot")?;
    Ok(())
}

async fn dispatch(command: &Commands, service: &GardenService) -> Result<()> {
    match command {
        Commands::Analyze { text } => {
            let text = match text {
                Some(text) => text.clone(),
                None => read_stdin()?,
            };
            let (analysis, _stored) = service.analyze_and_store(&text).await;
            print_json(&analysis)?;
        }
        Commands::Note { command } => {
            dispatch_note(command, service).await?;
        }
        Commands::Import { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let name = file_name(file);
            let notes = service.import_file(&content, &name).await;
            info!(count = notes.len(), "import complete");
            print_json(&notes)?;
        }
        Commands::Stats => {
            print_json(&service.store().stats().await)?;
        }
        Commands::Clusters { min_size } => {
            print_json(&service.store().get_concept_clusters(*min_size).await)?;
        }
        Commands::Gaps => {
            print_json(&service.store().detect_knowledge_gaps().await)?;
        }
        Commands::Centrality => {
            print_json(&service.store().get_concept_centrality().await)?;
        }
        Commands::Similar { label, limit } => {
            print_json(&service.store().find_similar_concepts(label, *limit).await)?;
        }
        Commands::Paths { source, target } => {
            print_json(&service.store().get_knowledge_paths(source, target).await)?;
        }
        Commands::Neighborhood { label, depth } => {
            print_json(&service.store().get_concept_neighborhood(label, *depth).await)?;
        }
        Commands::Evolution { timeframe } => {
            let timeframe: Timeframe = timeframe.parse()?;
            print_json(&service.store().get_temporal_evolution(timeframe).await)?;
        }
        Commands::AssignCommunities => {
            let count = service.store().assign_communities().await;
            println!("{count} communities assigned");
        }
        Commands::Export => {
            print_json(&service.store().export_for_visualization().await)?;
        }
        Commands::Insights => {
            print_json(&service.knowledge_insights().await)?;
        }
    }
    Ok(())
}

async fn dispatch_note(command: &NoteCommands, service: &GardenService) -> Result<()> {
    match command {
        NoteCommands::Add { content, tags } => {
            let note = service.create_note(content, tags).await;
            print_json(&note)?;
        }
        NoteCommands::Link { note_a, note_b } => match service.link_notes(note_a, note_b).await {
            Some(edge) => print_json(&edge)?,
            None => println!("one or both notes not found"),
        },
        NoteCommands::List => {
            print_json(&service.all_notes().await)?;
        }
        NoteCommands::Search { query } => {
            print_json(&service.search_notes(query).await)?;
        }
        NoteCommands::Suggest { note_id } => {
            print_json(&service.suggest_related_notes(note_id).await)?;
        }
    }
    Ok(())
}

fn file_name(path: &PathBuf) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::parse_from(["garden-daemon", "analyze", "some text"]);
        assert!(matches!(
            cli.command,
            Commands::Analyze { text: Some(ref t) } if t == "some text"
        ));
    }

    #[test]
    fn test_cli_parses_note_add_with_tags() {
        let cli = Cli::parse_from([
            "garden-daemon",
            "note",
            "add",
            "content here",
            "--tags",
            "rust",
        ]);
        match cli.command {
            Commands::Note {
                command: NoteCommands::Add { content, tags },
            } => {
                assert_eq!(content, "content here");
                assert_eq!(tags, vec!["rust"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "garden-daemon",
            "--log-level",
            "debug",
            "--data-path",
            "/tmp/garden",
            "stats",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.data_path.as_deref(), Some("/tmp/garden"));
    }

    #[test]
    fn test_cli_clusters_default_min_size() {
        let cli = Cli::parse_from(["garden-daemon", "clusters"]);
        assert!(matches!(cli.command, Commands::Clusters { min_size: 3 }));
    }

    #[test]
    fn test_file_name_extraction() {
        assert_eq!(file_name(&PathBuf::from("/tmp/dir/notes.md")), "notes.md");
    }
}
