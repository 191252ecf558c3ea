//! Built-in search backend implementations.
//!
//! Each backend lives in its own module behind a default-on feature flag
//! and registers itself through [`EngineRegistry::with_builtin`]. External
//! backends implement [`SearchEngine`] and register with
//! [`EngineRegistry::register`].
//!
//! [`EngineRegistry`]: crate::EngineRegistry
//! [`EngineRegistry::with_builtin`]: crate::EngineRegistry::with_builtin
//! [`EngineRegistry::register`]: crate::EngineRegistry::register
//! [`SearchEngine`]: crate::SearchEngine

#[cfg(feature = "duckduckgo")]
pub mod duckduckgo;

#[cfg(feature = "google")]
pub mod google;

/// Desktop browser signature used for provider requests; plain library
/// user agents tend to get fingerprinted and blocked.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.114 Safari/537.36";

/// Split a `maxn:<n>` modifier out of a query.
///
/// Returns the query with the modifier token removed and the parsed cap,
/// if present. The modifier is only recognized as a whole
/// whitespace-separated token.
pub(crate) fn take_maxn(query: &str) -> (String, Option<usize>) {
    let mut maxn = None;
    let mut kept: Vec<&str> = Vec::new();
    for token in query.split_whitespace() {
        if let Some(rest) = token.strip_prefix("maxn:") {
            if let Ok(n) = rest.parse::<usize>() {
                maxn = Some(n);
                continue;
            }
        }
        kept.push(token);
    }
    (kept.join(" "), maxn)
}
