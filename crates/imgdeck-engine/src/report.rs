//! Run reports and the downstream generation plan.

use std::collections::BTreeMap;

use imgdeck::Match;
use serde::Serialize;

/// Outcome of one [`Session::run`](crate::Session::run).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Terms for which a search completed.
    pub searched: usize,
    /// Matches reported across all searches.
    pub matches_found: usize,
    /// Matches that ended up with a local file.
    pub downloaded: usize,
    /// Whether the run stopped early at a cancellation point.
    pub cancelled: bool,
    /// Failed downloads, keyed by term text.
    pub skipped: BTreeMap<String, Vec<SkippedDownload>>,
}

impl RunReport {
    /// Total number of skipped downloads across all terms.
    pub fn skipped_count(&self) -> usize {
        self.skipped.values().map(Vec::len).sum()
    }
}

/// One download that failed and was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDownload {
    /// Source URL of the match.
    pub url: String,
    /// Status code or transfer error, as display text.
    pub reason: String,
}

/// File-backed selections handed to content generation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationPlan {
    /// Terms with at least one selected, file-backed match.
    pub selections: Vec<TermSelection>,
    /// Terms that contributed nothing, in input order.
    pub skipped_terms: Vec<String>,
}

/// The selected matches for one term.
#[derive(Debug, Clone, Serialize)]
pub struct TermSelection {
    /// The raw term line.
    pub term: String,
    /// Selected matches; every one has a downloaded file.
    pub matches: Vec<Match>,
}

/// Compute dimensions that fit `(width, height)` inside the given bounds,
/// preserving aspect ratio.
///
/// Returns `None` when the image already fits (including when both bounds
/// are unset); otherwise the scaled-down dimensions.
pub fn scale_to_fit(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Option<(u32, u32)> {
    let fits_w = max_width.is_none_or(|max| width <= max);
    let fits_h = max_height.is_none_or(|max| height <= max);
    if fits_w && fits_h {
        return None;
    }

    let ratio_w = max_width.map_or(f64::INFINITY, |max| f64::from(max) / f64::from(width));
    let ratio_h = max_height.map_or(f64::INFINITY, |max| f64::from(max) / f64::from(height));
    let ratio = ratio_w.min(ratio_h);

    let scaled_w = (f64::from(width) * ratio).round() as u32;
    let scaled_h = (f64::from(height) * ratio).round() as u32;
    Some((scaled_w.max(1), scaled_h.max(1)))
}
