// Entry point and high-level CLI flow.
//
// - With no subcommand (or `interactive`) a menu loop runs: search a
//   property, re-sort the room table, export, exit.
// - `search` runs one search non-interactively.
mod cli;

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use tracing::error;
use tracing_subscriber::EnvFilter;

use hotel_intel::export::export_file_stem;
use hotel_intel::output;
use hotel_intel::session::Session;
use hotel_intel::sort::{SortDirection, SortKey};
use hotel_intel::source::{FileSource, GeminiClient, ReportSource};
use hotel_intel::types::HotelQuery;

use crate::cli::{Cli, Commands, GlobalArgs, SearchArgs};

// The report on screen and its sort state live for the whole run so the
// menu can re-sort or export without searching again.
static APP_STATE: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::default()));

fn session() -> MutexGuard<'static, Session> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let source = build_source(&cli.global)?;

    match cli.command {
        None | Some(Commands::Interactive) => {
            run_interactive(source.as_ref(), &cli.global.out_dir);
            Ok(())
        }
        Some(Commands::Search(args)) => run_search(source.as_ref(), &cli.global.out_dir, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_source(args: &GlobalArgs) -> Result<Box<dyn ReportSource>> {
    if let Some(path) = &args.input {
        return Ok(Box::new(FileSource::new(path)));
    }
    let client = GeminiClient::new(args.service_config()).context("failed to build HTTP client")?;
    Ok(Box::new(client))
}

fn run_search(source: &dyn ReportSource, out_dir: &Path, args: SearchArgs) -> Result<()> {
    let query = HotelQuery::new(&args.hotel, &args.city)
        .context("both --hotel and --city must be non-empty")?;

    let mut state = session();
    if let Err(err) = state.search(source, query) {
        println!("{}", err.user_message());
        return Err(err).context("report search failed");
    }
    for key in args.sort {
        state.request_sort(key.into());
    }
    print_report(&state);
    if args.export {
        export_current(&state, out_dir)?;
    }
    Ok(())
}

/// Read a single line of input after printing `label`.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn print_report(state: &Session) {
    if let Some(report) = &state.report {
        println!();
        output::render_report(report, &state.sorted_categories(), &state.sources);
    }
}

fn export_current(state: &Session, out_dir: &Path) -> Result<()> {
    let (Some(report), Some(workbook)) = (&state.report, state.workbook()) else {
        println!("Error: No report loaded. Search for a property first (option 1).\n");
        return Ok(());
    };
    let stem = export_file_stem(&report.basic_info.hotel_name);
    let written = output::write_workbook(out_dir, &stem, &workbook, state.query.as_ref(), &state.sources)
        .context("failed to export report")?;
    println!("Outputs saved:");
    for path in written {
        println!("  {}", path.display());
    }
    println!();
    Ok(())
}

/// Handle option [1]: ask for a property and run the search.
fn handle_search(source: &dyn ReportSource) {
    let hotel = prompt("Hotel name: ");
    let city = prompt("City: ");
    let Some(query) = HotelQuery::new(&hotel, &city) else {
        println!("Both hotel name and city are required.\n");
        return;
    };

    println!("Scouting {} in {}...", query.hotel_name, query.city);
    let mut state = session();
    match state.search(source, query) {
        Ok(()) => print_report(&state),
        Err(err) => println!("{}\n", err.user_message()),
    }
}

/// Handle options [2] and [3]: re-sort the room table.
fn handle_sort(key: SortKey) {
    let mut state = session();
    if state.report.is_none() {
        println!("Error: No report loaded. Search for a property first (option 1).\n");
        return;
    }
    let config = state.request_sort(key);
    let arrow = match config.direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    };
    println!("Room inventory sorted by {:?} ({})\n", config.key, arrow);
    output::preview_table_rows(&output::room_rows(&state.sorted_categories()));
}

fn handle_export(out_dir: &Path) {
    let state = session();
    if let Err(err) = export_current(&state, out_dir) {
        error!(error = %err, "export failed");
        eprintln!("Write error: {:#}\n", err);
    }
}

fn run_interactive(source: &dyn ReportSource, out_dir: &Path) {
    loop {
        println!("Select Action:");
        println!("[1] Search a property");
        println!("[2] Sort rooms by name");
        println!("[3] Sort rooms by size");
        println!("[4] Export report");
        println!("[5] Exit\n");
        match prompt("Enter choice: ").as_str() {
            "1" => handle_search(source),
            "2" => handle_sort(SortKey::Name),
            "3" => handle_sort(SortKey::Size),
            "4" => handle_export(out_dir),
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-5.\n"),
        }
    }
}
