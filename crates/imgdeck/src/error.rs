//! Error types for the imgdeck crate.
//!
//! # Error Handling
//!
//! The most common errors you'll encounter are:
//!
//! - [`Error::Http`]: the provider could not be reached
//! - [`Error::Backend`]: the provider answered, but not with usable results
//! - [`Error::UnknownEngine`]: a registry lookup for an unregistered title
//!
//! # Example
//!
//! ```no_run
//! use imgdeck::{EngineConfig, EngineRegistry, Error};
//!
//! # async fn example() {
//! let registry = EngineRegistry::with_builtin();
//! let engine = registry
//!     .create("DuckDuckGo", &EngineConfig::default())
//!     .unwrap();
//!
//! match engine.search("red panda").await {
//!     Ok(matches) => println!("{} matches", matches.len()),
//!     Err(Error::Backend(msg)) => eprintln!("backend broken: {}", msg),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! # }
//! ```

use thiserror::Error;

/// The error type for search operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP/network error from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider response could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend malfunctioned: the provider answered with something
    /// other than a result list.
    ///
    /// Distinct from a successful search with zero matches, which is
    /// `Ok(vec![])`.
    #[error("search backend malfunction: {0}")]
    Backend(String),

    /// No engine with the given title is registered.
    #[error("unknown search engine: {0}")]
    UnknownEngine(String),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, Error>;
