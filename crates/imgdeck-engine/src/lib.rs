//! The term-to-image pipeline on top of the [`imgdeck`] search backends.
//!
//! While `imgdeck` provides the search backends themselves, `imgdeck-engine`
//! drives them through a complete batch: render a query per term from a
//! template, search, download every match with a browser-grade fallback
//! chain, and hand the surviving selections to content generation.
//!
//! # Quick Start
//!
//! ```no_run
//! use imgdeck::{EngineConfig, EngineRegistry};
//! use imgdeck_engine::{CancelFlag, Session};
//!
//! # async fn example() -> imgdeck_engine::Result<()> {
//! let registry = EngineRegistry::with_builtin();
//! let engine = registry.create("DuckDuckGo", &EngineConfig::default())?;
//!
//! let mut session = Session::new(engine);
//! session.load_terms("Ailurus fulgens\tred panda\ngiraffe\n");
//!
//! let report = session.run("%2 photo", &CancelFlag::new()).await?;
//! println!(
//!     "{} searched, {} downloaded, {} skipped",
//!     report.searched,
//!     report.downloaded,
//!     report.skipped_count()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Lifetimes of downloaded files
//!
//! Downloads land in a temporary directory owned by the [`Session`]. Each
//! [`Session::run`] purges the previous run's directory, and dropping the
//! session removes it entirely. Callers that need the images afterwards
//! must copy them out before the next run.

mod error;

pub mod download;
pub mod report;
pub mod session;
pub mod term;

pub use error::{Error, Result};

pub use download::{DownloadOptions, Downloader, FetchError};
pub use report::{GenerationPlan, RunReport, SkippedDownload, TermSelection, scale_to_fit};
pub use session::{CancelFlag, Session};
pub use term::{Term, parse_terms, render_query};

// Re-export imgdeck types for convenience
pub use imgdeck::{EngineConfig, EngineRegistry, Match, SearchEngine};
