//! styledb CLI - builds the writing-style database from a YAML style guide

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use styledb::config::{self, LoadOverrides, StyledbConfig};
use styledb::output::{emit_error, emit_success, OutputMode};
use styledb::storage::{SqliteStore, DEFAULT_SCHEMA};
use styledb::ui::{self, Icons};
use styledb::{pipeline, ResolutionMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "styledb")]
#[command(version)]
#[command(about = "Writing-style vocabulary loader - YAML style guide in, linked SQLite database out")]
#[command(long_about = r#"
styledb reads a YAML style guide (a list of words and phrases with their
class, description, usage recommendation, type and cross-references) and
rebuilds a SQLite database from it:
  • one `item` row per entry
  • one `reference` row per resolved cross-reference

Running `styledb` without a subcommand performs `styledb load` with the
default files: style-guide.yaml, db_schema.sql, writing_style.db.

Example usage:
  styledb
  styledb load --source guide.yaml --mode strict
  styledb show utilize
  styledb stats --json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to styledb.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database from the style guide (the default command)
    Load {
        /// Path to the YAML style guide
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Path to the DDL script applied to the new database
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Path to the database file (replaced on every run)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// How to treat references to unknown or duplicated names
        #[arg(short, long, value_enum)]
        mode: Option<ResolutionMode>,
    },

    /// Show statistics about a built database
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show every entry with the given name and its references
    Show {
        /// Entry name (exact match)
        name: String,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a styledb.toml with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = OutputMode::from_json_flag(cli.json);
    let command = cli.command.unwrap_or(Commands::Load {
        source: None,
        schema: None,
        database: None,
        mode: None,
    });
    let name = command.name();

    match dispatch(command, cli.config, output_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if output_mode.is_human() {
                ui::error(&format!("{:#}", e));
            } else if let Err(emit) = emit_error(output_mode, name, &format!("{:#}", e)) {
                tracing::error!("Failed to write error envelope: {}", emit);
            }
            ExitCode::FAILURE
        }
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Load { .. } => "load",
            Commands::Stats { .. } => "stats",
            Commands::Show { .. } => "show",
            Commands::Init { .. } => "init",
        }
    }
}

fn dispatch(
    command: Commands,
    config_path: Option<PathBuf>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let file_config = || config::load_config(config_path.as_deref());

    match command {
        Commands::Load { source, schema, database, mode } => {
            let overrides = LoadOverrides { source, schema, database, mode };
            run_load(output_mode, overrides, file_config()?.as_ref())
        }
        Commands::Stats { database } => {
            let database = config::resolve_database(database, file_config()?.as_ref());
            run_stats(output_mode, database)
        }
        Commands::Show { name, database } => {
            let database = config::resolve_database(database, file_config()?.as_ref());
            run_show(output_mode, database, name)
        }
        Commands::Init { force } => run_init(output_mode, config_path.clone(), force),
    }
}

fn run_load(
    output_mode: OutputMode,
    overrides: LoadOverrides,
    file_config: Option<&StyledbConfig>,
) -> anyhow::Result<()> {
    let (paths, options) = config::resolve_load(overrides, file_config);
    tracing::info!("Loading {} into {}", paths.source.display(), paths.database.display());

    if output_mode.is_human() {
        ui::header("Building writing-style database");
        ui::status(Icons::FILE, "Source", &paths.source.display().to_string());
        ui::status(Icons::GEAR, "Schema", &paths.schema.display().to_string());
        ui::status(Icons::DATABASE, "Database", &paths.database.display().to_string());
        ui::status(Icons::LINK, "Mode", options.mode.as_str());
    }

    let started = Instant::now();
    let spinner = output_mode.is_human().then(|| {
        ui::phase("Inserting entries and linking references");
        ui::Spinner::new("Loading...")
    });
    let result = pipeline::run(&paths, &options);
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if output_mode.is_human() && e.is_resolution() {
                ui::warn("Use `--mode lenient` to drop unknown names and link every duplicate.");
            }
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to build {}", paths.database.display())));
        }
    };

    if output_mode.is_human() {
        ui::section("References");
        println!("{}", ui::link_table(&summary));
        if summary.links.unresolved > 0 {
            ui::warn(&format!(
                "{} referenced names matched no entry and were skipped (run with --verbose to list them)",
                summary.links.unresolved
            ));
        }
        ui::finish_with_summary(started.elapsed(), &summary);
    } else {
        let data = json!({
            "items": summary.entries_loaded,
            "refers": summary.sources_with_references,
            "database": paths.database,
            "mode": options.mode,
            "links": summary.links,
        });
        emit_success(output_mode, "load", data)?;
    }

    Ok(())
}

fn run_stats(output_mode: OutputMode, database: PathBuf) -> anyhow::Result<()> {
    let store = SqliteStore::open(&database)
        .with_context(|| format!("Cannot open database {}", database.display()))?;
    let stats = store.stats()?;

    if output_mode.is_human() {
        println!("{} styledb Statistics ({})", Icons::STATS, database.display());
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

fn run_show(output_mode: OutputMode, database: PathBuf, name: String) -> anyhow::Result<()> {
    let store = SqliteStore::open(&database)
        .with_context(|| format!("Cannot open database {}", database.display()))?;
    let entries = store.find_entries_by_name(&name)?;

    if entries.is_empty() {
        if output_mode.is_human() {
            let similar = store.find_entries_by_name_pattern(&format!("%{}%", name))?;
            if !similar.is_empty() {
                ui::section("Similar entries");
                for entry in similar.iter().take(10) {
                    ui::summary_row(Icons::INFO, &entry.short_description());
                }
            }
        }
        return Err(styledb::Error::EntryNotFound(name).into());
    }

    let mut shown = Vec::with_capacity(entries.len());
    for entry in entries {
        let refers_to = store.references_from(entry.id)?;
        let referred_by = store.references_to(entry.id)?;

        if output_mode.is_human() {
            println!();
            ui::entry_card(&entry);
            if !refers_to.is_empty() {
                ui::summary_row("refers to:", "");
                for target in &refers_to {
                    ui::entry_link(Icons::RIGHT, target);
                }
            }
            if !referred_by.is_empty() {
                ui::summary_row("referred by:", "");
                for source in &referred_by {
                    ui::entry_link(Icons::LEFT, source);
                }
            }
        }

        shown.push(json!({
            "entry": entry,
            "refers_to": refers_to,
            "referred_by": referred_by,
        }));
    }

    if !output_mode.is_human() {
        emit_success(output_mode, "show", json!(shown))?;
    }
    Ok(())
}

fn run_init(output_mode: OutputMode, config_path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    config::write_config(&path, &StyledbConfig::with_defaults(), force)?;

    let schema_path = PathBuf::from(config::DEFAULT_SCHEMA_FILE);
    let wrote_schema = if schema_path.exists() {
        false
    } else {
        std::fs::write(&schema_path, DEFAULT_SCHEMA)?;
        true
    };

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
        if wrote_schema {
            ui::success(&format!("Wrote {}", schema_path.display()));
        } else {
            ui::info("Kept existing schema", &schema_path.display().to_string());
        }
    } else {
        let data = json!({
            "config": path,
            "schema": schema_path,
            "schema_written": wrote_schema,
        });
        emit_success(output_mode, "init", data)?;
    }
    Ok(())
}
