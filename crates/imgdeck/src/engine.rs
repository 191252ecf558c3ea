//! The search engine contract and the explicit backend registry.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::Match;

/// Default timeout for provider requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The contract every search backend implements.
///
/// Backends are synchronous from the caller's point of view: one blocking
/// (awaited) call per query, returning the complete ordered result list.
///
/// `search` returning an [`Error`] signals a backend malfunction and must
/// be treated as fatal for the run; `Ok(vec![])` means the provider
/// genuinely found nothing.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Stable display title, also the registry key.
    fn title(&self) -> &'static str;

    /// Short query-syntax hint for display next to the query input.
    fn legend(&self) -> Option<&'static str> {
        None
    }

    /// Longer help text for the query input; may contain HTML.
    fn tooltip(&self) -> Option<&'static str> {
        None
    }

    /// Run a rendered query against the provider.
    async fn search(&self, query: &str) -> Result<Vec<Match>>;
}

/// Settings a backend is constructed with.
///
/// The caller treats its own configuration store as opaque key/value
/// input; whatever subset applies to searching is carried here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Override the provider endpoint. Used by tests to point a backend
    /// at a local mock server.
    pub base_url: Option<String>,
    /// Cap on results per query. A `maxn:` query modifier takes
    /// precedence.
    pub max_results: Option<usize>,
    /// Timeout for each provider request.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            max_results: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Constructor for a backend.
pub type EngineFactory = fn(&EngineConfig) -> Box<dyn SearchEngine>;

/// Explicit registry of available search backends.
///
/// Maps each backend's title to its constructor so a caller can select
/// one by configuration. There is no implicit global state: a registry is
/// a plain value with its own lifecycle, which keeps tests independent.
///
/// # Example
///
/// ```
/// use imgdeck::{EngineConfig, EngineRegistry};
///
/// let registry = EngineRegistry::with_builtin();
/// assert!(registry.titles().contains(&"DuckDuckGo"));
///
/// let engine = registry.create("DuckDuckGo", &EngineConfig::default()).unwrap();
/// assert_eq!(engine.title(), "DuckDuckGo");
/// ```
#[derive(Default)]
pub struct EngineRegistry {
    factories: BTreeMap<&'static str, EngineFactory>,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all compiled-in backends registered.
    pub fn with_builtin() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "duckduckgo")]
        registry.register(crate::engines::duckduckgo::TITLE, |config| {
            Box::new(crate::engines::duckduckgo::DuckDuckGo::new(config))
        });

        #[cfg(feature = "google")]
        registry.register(crate::engines::google::TITLE, |config| {
            Box::new(crate::engines::google::Google::new(config))
        });

        registry
    }

    /// Register a backend under its title.
    ///
    /// A later registration under the same title replaces the earlier
    /// one.
    pub fn register(&mut self, title: &'static str, factory: EngineFactory) {
        self.factories.insert(title, factory);
    }

    /// Titles of all registered backends, in sorted order.
    pub fn titles(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Construct the backend registered under `title`.
    pub fn create(&self, title: &str, config: &EngineConfig) -> Result<Box<dyn SearchEngine>> {
        let factory = self
            .factories
            .get(title)
            .ok_or_else(|| Error::UnknownEngine(title.to_string()))?;
        Ok(factory(config))
    }
}

impl std::fmt::Debug for dyn SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("title", &self.title())
            .finish()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("titles", &self.titles())
            .finish()
    }
}
