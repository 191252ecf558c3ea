//! Pluggable image search backends with a uniform match contract.
//!
//! This crate provides the search layer of the imgdeck workspace: a
//! [`SearchEngine`] trait every backend implements, an explicit
//! [`EngineRegistry`] for discovering and constructing backends by title,
//! and the [`Match`] record a search produces.
//!
//! # Quick Start
//!
//! ```no_run
//! use imgdeck::{EngineConfig, EngineRegistry};
//!
//! # async fn example() -> imgdeck::Result<()> {
//! let registry = EngineRegistry::with_builtin();
//! let config = EngineConfig::default();
//!
//! let engine = registry.create("DuckDuckGo", &config)?;
//! let matches = engine.search("red panda").await?;
//! for m in &matches {
//!     println!("{}: {}", m.title.as_deref().unwrap_or("(untitled)"), m.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! Built-in backends are enabled by default. Disable with:
//!
//! ```toml
//! [dependencies]
//! imgdeck = { version = "0.1", default-features = false, features = ["duckduckgo"] }
//! ```
//!
//! Available features:
//! - `duckduckgo` - DuckDuckGo image API backend
//! - `google` - Google Images HTML scrape backend
//!
//! # Error Contract
//!
//! A backend that malfunctions (cannot obtain or parse provider results)
//! returns an [`Error`], never an empty list. An empty `Vec<Match>` always
//! means the provider answered with zero results for the query.

mod engine;
mod error;
mod types;

pub mod engines;

pub use engine::{EngineConfig, EngineFactory, EngineRegistry, SearchEngine};
pub use error::{Error, Result};
pub use types::Match;
