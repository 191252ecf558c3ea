//! Image downloads with an external-helper fallback chain.
//!
//! Some image hosts reject clients that do not look like a browser. The
//! downloader therefore prefers driving the system `curl` binary (when one
//! is on `PATH`), whose TLS fingerprint most hosts accept, and falls back
//! to an in-process HTTP client with a browser user agent and TLS 1.2+.
//!
//! A failed download is a [`FetchError`], never a crate-level error: the
//! caller records it and moves on to the next match.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::Builder;
use tracing::{debug, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.114 Safari/537.36";

/// File-name prefix for downloaded images in the session directory.
const FILE_PREFIX: &str = "match-";

/// Extension used when the downloaded bytes cannot be sniffed.
const FALLBACK_EXTENSION: &str = "jpg";

/// Settings for the download step.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Connection timeout for both the helper and the in-process client.
    pub connect_timeout: Duration,
    /// Overall per-download timeout for the in-process client.
    pub timeout: Duration,
    /// Whether to look for a `curl` binary on `PATH` and prefer it.
    pub use_external_helper: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            use_external_helper: true,
        }
    }
}

/// Why a single download was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    Status(u16),
    /// The transfer failed before a status was known, or the file could
    /// not be written.
    Transfer(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "{}", code),
            FetchError::Transfer(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Downloads match URLs into a session directory.
pub struct Downloader {
    client: reqwest::Client,
    helper: Option<PathBuf>,
    connect_timeout: Duration,
}

impl Downloader {
    /// Create a downloader; probes `PATH` for `curl` once, up front.
    pub fn new(options: &DownloadOptions) -> Self {
        let helper = if options.use_external_helper {
            which::which("curl").ok()
        } else {
            None
        };
        if let Some(helper) = &helper {
            debug!(helper = %helper.display(), "using external download helper");
        }

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            helper,
            connect_timeout: options.connect_timeout,
        }
    }

    /// Download `url` into `dir`, returning the path of the stored file.
    ///
    /// The file name carries an extension sniffed from the image bytes,
    /// defaulting to `.jpg` when the format is unrecognized.
    pub async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf, FetchError> {
        match &self.helper {
            Some(helper) => self.fetch_with_helper(helper, url, dir).await,
            None => self.fetch_in_process(url, dir).await,
        }
    }

    async fn fetch_with_helper(
        &self,
        helper: &Path,
        url: &str,
        dir: &Path,
    ) -> Result<PathBuf, FetchError> {
        let path = new_session_file(dir, FALLBACK_EXTENSION)?;

        let output = tokio::process::Command::new(helper)
            .arg("-H")
            .arg(format!("User-Agent: {}", BROWSER_USER_AGENT))
            .arg("-L")
            .arg("-s")
            .arg("-w")
            .arg("%{http_code}")
            .arg("--connect-timeout")
            .arg(self.connect_timeout.as_secs().to_string())
            .arg("-o")
            .arg(&path)
            .arg(url)
            .output()
            .await
            .map_err(|e| FetchError::Transfer(e.to_string()))?;

        // The helper prints the final status on stdout; anything
        // unparseable is treated as a generic client error.
        let status: u16 = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(400);
        if status != 200 {
            let _ = std::fs::remove_file(&path);
            return Err(FetchError::Status(status));
        }

        rename_for_content(&path)
    }

    async fn fetch_in_process(&self, url: &str, dir: &Path) -> Result<PathBuf, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "image/avif,image/webp,*/*")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| FetchError::Transfer(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transfer(e.to_string()))?;

        let path = new_session_file(dir, sniff_extension(&bytes))?;
        std::fs::write(&path, &bytes).map_err(|e| FetchError::Transfer(e.to_string()))?;
        Ok(path)
    }
}

/// Create a uniquely named, persistent file in the session directory.
fn new_session_file(dir: &Path, extension: &str) -> Result<PathBuf, FetchError> {
    let file = Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)
        .map_err(|e| FetchError::Transfer(e.to_string()))?;
    let (_, path) = file
        .keep()
        .map_err(|e| FetchError::Transfer(e.to_string()))?;
    Ok(path)
}

/// Sniff the image format from leading bytes; unknown content keeps the
/// fallback extension.
fn sniff_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(format) => format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or(FALLBACK_EXTENSION),
        Err(_) => {
            warn!("unrecognized image content, keeping fallback extension");
            FALLBACK_EXTENSION
        }
    }
}

/// Re-extension a helper-written file based on its actual content.
fn rename_for_content(path: &Path) -> Result<PathBuf, FetchError> {
    let mut head = [0u8; 64];
    let read = std::fs::File::open(path)
        .and_then(|mut f| f.read(&mut head))
        .map_err(|e| FetchError::Transfer(e.to_string()))?;

    let extension = sniff_extension(&head[..read]);
    let renamed = path.with_extension(extension);
    if renamed != path {
        std::fs::rename(path, &renamed).map_err(|e| FetchError::Transfer(e.to_string()))?;
    }
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bytes_sniff_to_png() {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(1, 1)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        assert_eq!(sniff_extension(buf.get_ref()), "png");
    }

    #[test]
    fn unknown_bytes_keep_the_fallback_extension() {
        assert_eq!(sniff_extension(b"<html>not an image</html>"), "jpg");
    }

    #[test]
    fn session_files_are_unique_and_persistent() {
        let dir = tempfile::tempdir().unwrap();
        let a = new_session_file(dir.path(), "jpg").unwrap();
        let b = new_session_file(dir.path(), "jpg").unwrap();
        assert_ne!(a, b);
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn helper_files_are_renamed_for_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_session_file(dir.path(), "jpg").unwrap();
        image::RgbaImage::new(1, 1)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let renamed = rename_for_content(&path).unwrap();
        assert_eq!(renamed.extension().unwrap(), "png");
        assert!(renamed.exists());
        assert!(!path.exists());
    }
}
