use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::app::{Dashboard, LoadOutcome};
use crate::cli::abbrev;
use crate::cli::error::{user_error, validate_non_empty, validate_row_number, validate_status};
use crate::cli::output::{
    format_counts, format_dashboard, format_schema, format_sources, get_terminal_width, is_tty,
};
use crate::config::Settings;
use crate::error::DashError;
use crate::filter::parse_selection;
use crate::models::{Schema, Status};
use crate::pipeline::FilterOptions;
use crate::render::{StatusCounts, EMPTY_SOURCE_MESSAGE};
use crate::sources::{load_source_list, SourceList};
use crate::store::RowStore;

#[derive(Parser)]
#[command(name = "sheetdash")]
#[command(about = "Sheetdash - browse, filter and update spreadsheet-backed task lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Source (sheet tab) to use, by name or label
    #[arg(long, global = true)]
    pub source: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List selectable sources
    Sources {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the task table, filter controls and counters
    List {
        /// Filter arguments (e.g., "group=Sales status=done assignee=Bob")
        #[arg(value_name = "FILTER")]
        filter: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Set the status of a task
    Set {
        /// Row number as shown in the # column of `list`
        row: String,
        /// New status (PAS FAIT, EN COURS, FAIT, or todo/doing/done)
        status: String,
        /// Filters the row number refers to (same as `list`)
        #[arg(value_name = "FILTER")]
        filter: Vec<String>,
    },
    /// Show detected columns and filter options
    Schema {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show status counters
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
    let _ = enable_ansi_support::enable_ansi_support();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Expand command abbreviations before processing
    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let clap_args = std::iter::once("sheetdash".to_string()).chain(args);
    let cli = Cli::try_parse_from(clap_args).unwrap_or_else(|e| e.exit());

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    let Cli { source, command } = cli;
    let settings = Settings::load()?;
    let sources = load_source_list(&settings.sources);

    match command {
        Commands::Sources { json } => {
            let selected = resolve_source(source.as_deref(), &settings, &sources).ok();
            handle_sources(&sources, selected.as_deref(), json)
        }
        Commands::List { filter, json } => {
            let (dashboard, _store) = open_dashboard(&settings, &sources, source.as_deref(), &filter)?;
            handle_list(&dashboard, json)
        }
        Commands::Set { row, status, filter } => {
            let row = validate_row_number(&row).unwrap_or_else(|e| user_error(&e));
            let status = validate_status(&status).unwrap_or_else(|e| user_error(&e));
            let (mut dashboard, store) = open_dashboard(&settings, &sources, source.as_deref(), &filter)?;
            handle_set(&mut dashboard, store.as_ref(), row, status)
        }
        Commands::Schema { json } => {
            let (dashboard, _store) = open_dashboard(&settings, &sources, source.as_deref(), &[])?;
            handle_schema(&dashboard, json)
        }
        Commands::Stats { json } => {
            let (dashboard, _store) = open_dashboard(&settings, &sources, source.as_deref(), &[])?;
            handle_stats(&dashboard, json)
        }
    }
}

/// Pick the source: `--source`, then `source.default`, then the first listed
///
/// Names are matched against the list by value or label; an unlisted name is
/// used as-is so any tab of the sheet can be opened.
fn resolve_source(
    requested: Option<&str>,
    settings: &Settings,
    sources: &SourceList,
) -> Result<String, DashError> {
    if let Some(name) = requested.or(settings.default_source.as_deref()) {
        if let Err(e) = validate_non_empty(name, "Source") {
            user_error(&e);
        }
        let value = sources
            .find(name)
            .map(|e| e.value.clone())
            .unwrap_or_else(|| name.to_string());
        return Ok(value);
    }

    sources
        .first()
        .map(|e| e.value.clone())
        .ok_or(DashError::NoSourceSelected)
}

fn open_dashboard(
    settings: &Settings,
    sources: &SourceList,
    requested: Option<&str>,
    filter: &[String],
) -> Result<(Dashboard, Box<dyn RowStore>)> {
    let selection = parse_selection(filter).unwrap_or_else(|e| user_error(&e));
    let source = resolve_source(requested, settings, sources)?;
    let store = settings.open_store()?;

    let mut dashboard = Dashboard::new();
    dashboard.select_source(&source);
    dashboard.set_selection(selection);

    match dashboard.load(store.as_ref())? {
        LoadOutcome::Loaded { rows, shown } => {
            log::debug!("Loaded {} rows from \"{}\", {} shown", rows, source, shown);
        }
        LoadOutcome::Empty => log::debug!("Source \"{}\" is empty", source),
        LoadOutcome::Stale => {}
    }

    Ok((dashboard, store))
}

#[derive(Serialize)]
struct SourcesReport<'a> {
    selected: Option<&'a str>,
    #[serde(flatten)]
    list: &'a SourceList,
}

fn handle_sources(sources: &SourceList, selected: Option<&str>, json: bool) -> Result<()> {
    if json {
        let report = SourcesReport { selected, list: sources };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_sources(sources, selected));
    }
    Ok(())
}

fn handle_list(dashboard: &Dashboard, json: bool) -> Result<()> {
    let view = dashboard.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", format_dashboard(&view, is_tty(), get_terminal_width()));
    }
    Ok(())
}

fn handle_set(
    dashboard: &mut Dashboard,
    store: &dyn RowStore,
    row: usize,
    status: Status,
) -> Result<()> {
    if dashboard.state().schema.is_none() {
        let sheet = dashboard.source().unwrap_or_default().to_string();
        return Err(DashError::EmptySource { sheet }.into());
    }

    let position = dashboard.task_position(row)?;
    let outcome = dashboard.set_status(store, position, status)?;
    println!("Set \"{}\" to {}.", outcome.description, outcome.status);
    println!();
    print!("{}", format_dashboard(&dashboard.view(), is_tty(), get_terminal_width()));
    Ok(())
}

#[derive(Serialize)]
struct SchemaReport<'a> {
    source: Option<&'a str>,
    schema: Option<&'a Schema>,
    visible: &'a [String],
    options: &'a FilterOptions,
}

fn handle_schema(dashboard: &Dashboard, json: bool) -> Result<()> {
    let state = dashboard.state();
    if json {
        let report = SchemaReport {
            source: dashboard.source(),
            schema: state.schema.as_ref(),
            visible: &state.visible,
            options: &state.options,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &state.schema {
        Some(schema) => print!("{}", format_schema(schema, &state.visible, &state.options)),
        None => println!("{}", EMPTY_SOURCE_MESSAGE),
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsReport<'a> {
    source: Option<&'a str>,
    #[serde(flatten)]
    counts: StatusCounts,
    total: usize,
}

fn handle_stats(dashboard: &Dashboard, json: bool) -> Result<()> {
    let counts = dashboard.counts();
    if json {
        let report = StatsReport {
            source: dashboard.source(),
            counts,
            total: counts.total(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_counts(&counts, is_tty()));
    }
    Ok(())
}
