//! Application entry point — AuditPro.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the [`GeminiAnalyzer`] and the [`QueueStore`].
//! 6. Stage files given on the command line (one read task per file).
//! 7. Either process everything headless and print the reports, or run
//!    [`eframe::run_native`], which blocks until the window is closed.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use auditpro::{
    analysis::GeminiAnalyzer,
    app::AuditApp,
    config::AppConfig,
    queue::{intake::spawn_file_loads, QueueStore},
    report::{parse_sections, render_plain},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Call-center transcript audits backed by a hosted Gemini model.
#[derive(Debug, Parser)]
#[command(name = "auditpro", version)]
struct Cli {
    /// Transcript files (.txt / .md) to stage on startup.
    files: Vec<PathBuf>,

    /// Analyze every staged transcript without opening a window and print
    /// the reports to stdout. Reads a transcript from stdin when no files
    /// are given.
    #[arg(long)]
    headless: bool,

    /// Settings file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> AppConfig {
    let loaded = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e:#}); using defaults");
        AppConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

/// Process all staged transcripts sequentially and print each report.
///
/// Returns `false` when at least one transcript failed.
async fn run_headless(store: QueueStore) -> bool {
    let summary = store.process_all_pending().await;

    // Oldest first reads naturally on a terminal.
    for entry in store.snapshot().entries.iter().rev() {
        if let Some(result) = entry.result() {
            let sections = parse_sections(result);
            println!("{}", render_plain(&entry.name, Local::now(), &sections));
        } else if let Some(message) = entry.error() {
            eprintln!("{}: {message}", entry.name);
        }
    }

    log::info!(
        "headless run finished: {} completed, {} failed",
        summary.completed,
        summary.failed
    );
    summary.failed == 0
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading transcript from stdin")?;
    Ok(text)
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("AuditPro")
        .with_inner_size([width, height])
        .with_min_inner_size([720.0, 480.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();
    log::info!("AuditPro starting up");

    // 3. Configuration
    let config = load_config(cli.config.as_ref());

    // 4. Tokio runtime (UI thread stays free; analysis + file reads run here)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Analyzer + queue
    let analyzer = Arc::new(GeminiAnalyzer::from_config(&config.analysis));
    let store = QueueStore::new(analyzer);

    // 6. Files from the command line
    let loads = spawn_file_loads(rt.handle(), &store, cli.files.clone());

    // 7a. Headless
    if cli.headless {
        let ok = rt.block_on(async {
            for load in loads {
                if let Err(e) = load.await {
                    log::warn!("file load task failed: {e}");
                }
            }
            if cli.files.is_empty() {
                store.add_from_text(&read_stdin()?);
            }
            if store.snapshot().is_empty() {
                anyhow::bail!("no transcript staged (pass .txt/.md files or pipe text on stdin)");
            }
            Ok::<bool, anyhow::Error>(run_headless(store).await)
        })?;

        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    // 7b. Window (blocks until closed)
    let handle = rt.handle().clone();
    let options = native_options(&config);

    eframe::run_native(
        "AuditPro",
        options,
        Box::new(move |cc| Ok(Box::new(AuditApp::new(cc, store, handle, config)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
