//! The match record produced by a search.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// One candidate image result for a query.
///
/// A `Match` starts out as provider metadata only (title, source URL,
/// reported dimensions). The download step attaches a local file with
/// [`Match::set_file`], and the caller flips [`Match::selected`] while
/// reviewing results. A match that never received a file must not be
/// offered for content generation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Match {
    /// Display name, when the provider supplied one.
    pub title: Option<String>,
    /// Source location of the image.
    pub url: String,
    /// Pixel width, from the provider or probed from the file.
    pub width: Option<u32>,
    /// Pixel height, from the provider or probed from the file.
    pub height: Option<u32>,
    /// User decision; defaults to unset.
    pub selected: bool,
    file: Option<PathBuf>,
    #[serde(skip)]
    probed: Option<PathBuf>,
}

impl Match {
    /// Create a match for a source URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the provider-reported pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// The locally downloaded file, if the download succeeded.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Attach the downloaded file backing this match.
    ///
    /// Provider-reported dimensions stay in place as a fallback, but the
    /// next [`Match::dimensions`] call re-probes the file: the actual
    /// bytes on disk win over what the provider claimed.
    pub fn set_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
        self.probed = None;
    }

    /// Pixel dimensions of this match, probing the downloaded file on
    /// demand.
    ///
    /// The probe runs at most once per file path; changing the file via
    /// [`Match::set_file`] invalidates the previous probe. When no file
    /// is attached, or the file cannot be decoded, the provider-reported
    /// dimensions (if any) are returned.
    pub fn dimensions(&mut self) -> Option<(u32, u32)> {
        if let Some(file) = &self.file {
            if self.probed.as_deref() != Some(file.as_path()) {
                match image::image_dimensions(file) {
                    Ok((w, h)) => {
                        self.width = Some(w);
                        self.height = Some(h);
                    }
                    Err(e) => {
                        tracing::warn!(file = %file.display(), error = %e, "could not probe image dimensions");
                    }
                }
                self.probed = Some(file.clone());
            }
        }
        self.width.zip(self.height)
    }
}
