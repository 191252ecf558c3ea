//! Error types for imgdeck-engine.
//!
//! Errors from pipeline runs fall into two categories:
//!
//! 1. **Search errors**: Wrapped from the underlying [`imgdeck::Error`] type
//! 2. **Pipeline errors**: Specific to the run itself (e.g., an unreadable
//!    term file)
//!
//! Individual download failures are *not* errors at this level; they are
//! recorded per match in the run report so the rest of the batch proceeds.
//!
//! # Example
//!
//! ```no_run
//! use imgdeck::{EngineConfig, EngineRegistry};
//! use imgdeck_engine::{Error, Session};
//!
//! # async fn example() {
//! let registry = EngineRegistry::with_builtin();
//! let engine = registry
//!     .create("DuckDuckGo", &EngineConfig::default())
//!     .unwrap();
//! let mut session = Session::new(engine);
//!
//! match session.load_terms_file("terms.txt".as_ref()) {
//!     Ok(()) => {}
//!     Err(Error::Io(e)) => eprintln!("cannot read term file: {}", e),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! # }
//! ```

use std::fmt;

/// Result type for imgdeck-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a pipeline run.
#[derive(Debug)]
pub enum Error {
    /// An error from the underlying search backend.
    Search(imgdeck::Error),

    /// An I/O error occurred.
    Io(std::io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Search(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Search(e) => write!(f, "{}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<imgdeck::Error> for Error {
    fn from(err: imgdeck::Error) -> Self {
        Error::Search(err)
    }
}
