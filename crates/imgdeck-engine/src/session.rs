//! The search-and-download session.
//!
//! A [`Session`] owns one search backend, the current list of terms, and a
//! run-scoped temporary directory holding the downloaded images. Starting a
//! new run (or resetting the session) purges the previous directory, so
//! downloaded files are only valid until the next run.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use imgdeck::SearchEngine;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::download::{DownloadOptions, Downloader};
use crate::error::Result;
use crate::report::{GenerationPlan, RunReport, SkippedDownload, TermSelection};
use crate::term::{Term, parse_terms};

/// A shared, flippable cancellation signal.
///
/// Cancellation is cooperative: the run checks the flag between searches
/// and between downloads, finishes cleanly, and marks the report as
/// cancelled instead of returning an error.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation at the next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One batch of terms worked against one search backend.
pub struct Session {
    engine: Box<dyn SearchEngine>,
    terms: Vec<Term>,
    downloader: Downloader,
    work_dir: Option<TempDir>,
}

impl Session {
    /// Create a session with default download settings.
    pub fn new(engine: Box<dyn SearchEngine>) -> Self {
        Self::with_options(engine, &DownloadOptions::default())
    }

    /// Create a session with explicit download settings.
    pub fn with_options(engine: Box<dyn SearchEngine>, options: &DownloadOptions) -> Self {
        Self {
            engine,
            terms: Vec::new(),
            downloader: Downloader::new(options),
            work_dir: None,
        }
    }

    /// The backend this session searches with.
    pub fn engine(&self) -> &dyn SearchEngine {
        self.engine.as_ref()
    }

    /// The current terms, in input order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Mutable access to the terms, for marking selections.
    pub fn terms_mut(&mut self) -> &mut [Term] {
        &mut self.terms
    }

    /// Replace the term list from newline-separated text.
    ///
    /// Lines are trimmed; blank lines are dropped. Any previous results
    /// and downloaded files are discarded.
    pub fn load_terms(&mut self, text: &str) {
        self.reset();
        self.terms = parse_terms(text);
    }

    /// Replace the term list from a UTF-8 text file, one term per line.
    pub fn load_terms_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.load_terms(&text);
        Ok(())
    }

    /// Drop all terms, results, and downloaded files.
    pub fn reset(&mut self) {
        self.terms.clear();
        self.work_dir = None;
    }

    /// The queries a run would send, paired with their terms.
    pub fn preview(&self, template: &str) -> Vec<(&str, String)> {
        self.terms
            .iter()
            .map(|t| (t.text(), t.query(template)))
            .collect()
    }

    /// Search every term and download its matches.
    ///
    /// Runs in two phases. The search phase queries the backend once per
    /// term; a backend malfunction aborts the run before any download is
    /// attempted. The download phase then fetches each match, dropping
    /// matches whose download failed and recording them in the report's
    /// skip list. Matches that survive carry a file in a fresh temporary
    /// directory; files from the previous run are purged up front.
    pub async fn run(&mut self, template: &str, cancel: &CancelFlag) -> Result<RunReport> {
        self.work_dir = None;
        let work_dir = TempDir::new()?;
        let mut report = RunReport::default();

        for term in &mut self.terms {
            if cancel.is_cancelled() {
                info!("run cancelled during search phase");
                report.cancelled = true;
                self.work_dir = Some(work_dir);
                return Ok(report);
            }
            let query = term.query(template);
            debug!(term = term.text(), %query, "searching");
            term.matches = self.engine.search(&query).await?;
            report.searched += 1;
            report.matches_found += term.matches.len();
        }

        'download: for term in &mut self.terms {
            let mut kept = Vec::new();
            let mut skipped = Vec::new();
            for mut m in std::mem::take(&mut term.matches) {
                if cancel.is_cancelled() {
                    info!("run cancelled during download phase");
                    report.cancelled = true;
                    term.matches = kept;
                    break 'download;
                }
                match self.downloader.fetch(&m.url, work_dir.path()).await {
                    Ok(path) => {
                        m.set_file(path);
                        kept.push(m);
                        report.downloaded += 1;
                    }
                    Err(e) => {
                        debug!(url = %m.url, error = %e, "download skipped");
                        skipped.push(SkippedDownload {
                            url: m.url,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            term.matches = kept;
            if !skipped.is_empty() {
                report.skipped.insert(term.text().to_string(), skipped);
            }
        }

        info!(
            searched = report.searched,
            downloaded = report.downloaded,
            skipped = report.skipped_count(),
            cancelled = report.cancelled,
            "run finished"
        );
        self.work_dir = Some(work_dir);
        Ok(report)
    }

    /// Collect the selected, file-backed matches for content generation.
    ///
    /// Each match is probed for its on-disk dimensions while the session
    /// directory still exists. Terms without any usable selection are
    /// listed as skipped.
    pub fn generation_plan(&mut self) -> GenerationPlan {
        let mut plan = GenerationPlan::default();
        for term in &mut self.terms {
            let mut selected = Vec::new();
            for m in &mut term.matches {
                if m.selected && m.file().is_some() {
                    m.dimensions();
                    selected.push(m.clone());
                }
            }
            if selected.is_empty() {
                plan.skipped_terms.push(term.text().to_string());
            } else {
                plan.selections.push(TermSelection {
                    term: term.text().to_string(),
                    matches: selected,
                });
            }
        }
        plan
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine.title())
            .field("terms", &self.terms.len())
            .field("work_dir", &self.work_dir.as_ref().map(TempDir::path))
            .finish()
    }
}
