//! Batch image search and download for flashcard terms.
//!
//! Reads a term file (one term per line, tab-separated segments), renders a
//! search query per term from a template, and downloads every match. The
//! results can be copied into an output directory or summarized as JSON.

use std::path::PathBuf;

use clap::Parser;
use imgdeck::{EngineConfig, EngineRegistry};
use imgdeck_engine::{CancelFlag, DownloadOptions, RunReport, Session};
use tracing::{info, warn};

/// Search images for a list of terms and download the results.
#[derive(Parser, Debug)]
#[command(name = "imgdeck")]
#[command(version, about, long_about = None)]
struct Args {
    /// File with one search term per line (tabs separate segments)
    #[arg(required_unless_present = "list_engines")]
    terms: Option<PathBuf>,

    /// Query template: %0 is the whole term, %1, %2, ... its tab segments
    #[arg(short, long, default_value = "%0")]
    template: String,

    /// Search engine to use
    #[arg(short, long, default_value = "DuckDuckGo")]
    engine: String,

    /// Cap the number of results per term
    #[arg(short, long)]
    max: Option<usize>,

    /// Copy downloaded images into this directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Emit the run report as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Download in-process instead of through the system curl helper
    #[arg(long, default_value_t = false)]
    no_helper: bool,

    /// List available search engines and exit
    #[arg(long, default_value_t = false)]
    list_engines: bool,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let registry = EngineRegistry::with_builtin();

    if args.list_engines {
        for title in registry.titles() {
            let engine = registry.create(title, &EngineConfig::default())?;
            match engine.legend() {
                Some(legend) => println!("{title}: {legend}"),
                None => println!("{title}"),
            }
        }
        return Ok(());
    }

    let Some(terms_path) = &args.terms else {
        return Err("a terms file is required".into());
    };

    let config = EngineConfig {
        max_results: args.max,
        ..EngineConfig::default()
    };
    let engine = registry.create(&args.engine, &config)?;

    let options = DownloadOptions {
        use_external_helper: !args.no_helper,
        ..DownloadOptions::default()
    };
    let mut session = Session::with_options(engine, &options);
    session.load_terms_file(terms_path)?;

    info!(
        terms = session.terms().len(),
        engine = %args.engine,
        template = %args.template,
        "starting run"
    );

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping at the next checkpoint");
                cancel.cancel();
            }
        });
    }

    let report = session.run(&args.template, &cancel).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(out) = &args.out {
        std::fs::create_dir_all(out)?;
        let mut copied = 0usize;
        for term in session.terms() {
            for m in &term.matches {
                let Some(file) = m.file() else { continue };
                let Some(name) = file.file_name() else {
                    continue;
                };
                std::fs::copy(file, out.join(name))?;
                copied += 1;
            }
        }
        println!("Copied {} images to {}", copied, out.display());
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "Searched {} terms, {} matches, {} downloaded, {} skipped",
        report.searched,
        report.matches_found,
        report.downloaded,
        report.skipped_count()
    );
    if report.cancelled {
        println!("Run was cancelled before completing.");
    }
    if !report.skipped.is_empty() {
        println!("Skipped downloads:");
        for (term, skipped) in &report.skipped {
            println!("  {term}:");
            for s in skipped {
                println!("    {} ({})", s.url, s.reason);
            }
        }
    }
}
