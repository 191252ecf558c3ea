//! Google Images backend.
//!
//! Scrapes the image results page: the result data is embedded in
//! `AF_initDataCallback` script payloads as `(url, height, width)` triples
//! interleaved with quoted title entries.

use regex_lite::Regex;
use tracing::debug;

use crate::engine::{EngineConfig, SearchEngine};
use crate::engines::{BROWSER_USER_AGENT, take_maxn};
use crate::error::Result;
use crate::types::Match;

/// Registry title for this backend.
pub const TITLE: &str = "Google";

const DEFAULT_BASE_URL: &str = "https://www.google.com";

/// Google image search backend.
pub struct Google {
    client: reqwest::Client,
    base_url: String,
    max_results: Option<usize>,
}

impl Google {
    /// Create a backend from engine settings.
    pub fn new(config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_results: config.max_results,
        }
    }
}

/// Decode a JSON-escaped string fragment (no surrounding quotes).
fn decode_json_fragment(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

/// True for Google's own thumbnail hosts, which are not source images.
fn is_thumbnail_host(url: &str) -> bool {
    let host_re = Regex::new(r"^[a-z+]+://([^/]+)").unwrap();
    host_re
        .captures(url)
        .and_then(|c| c.get(1))
        .is_some_and(|host| host.as_str().ends_with("gstatic.com"))
}

/// Pull matches out of the result page body.
fn parse_results(body: &str, cap: Option<usize>) -> Vec<Match> {
    let script_re = Regex::new(r"AF_initDataCallback\(([^<]+)\);").unwrap();
    let triple_re = Regex::new(r#""(https?://[^"]+)"\s*,\s*(\d+|"[^"]+")\s*,\s*(\d+|null)"#).unwrap();

    let mut matches: Vec<Match> = Vec::new();
    'scripts: for script in script_re.captures_iter(body) {
        let Some(payload) = script.get(1) else {
            continue;
        };
        for triple in triple_re.captures_iter(payload.as_str()) {
            let (Some(url), Some(second), Some(third)) =
                (triple.get(1), triple.get(2), triple.get(3))
            else {
                continue;
            };

            if let (Ok(height), Ok(width)) = (
                second.as_str().parse::<u32>(),
                third.as_str().parse::<u32>(),
            ) {
                let url = decode_json_fragment(url.as_str());
                if is_thumbnail_host(&url) {
                    continue;
                }
                matches.push(Match::new(url).with_dimensions(width, height));
            } else if let Some(quoted) = second
                .as_str()
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
            {
                // A quoted entry carries the title for the image row
                // pushed just before it.
                if let Some(last) = matches.last_mut() {
                    if last.title.is_none() {
                        last.title = Some(decode_json_fragment(quoted));
                    }
                }
                if cap.is_some_and(|n| matches.len() >= n) {
                    break 'scripts;
                }
            }
        }
    }

    if let Some(n) = cap {
        matches.truncate(n);
    }
    matches
}

#[async_trait::async_trait]
impl SearchEngine for Google {
    fn title(&self) -> &'static str {
        TITLE
    }

    fn legend(&self) -> Option<&'static str> {
        Some("\"[exact term]\", +/-[term], site:[url], maxn:[max results]")
    }

    fn tooltip(&self) -> Option<&'static str> {
        Some(
            "<b>SEARCH ENGINE SYNTAX</b>\
             <ul><li><code>cats dogs</code>: cats or dogs in results</li>\
             <li><code>\"cats and dogs\"</code>: exact term \"cats and dogs\" in results</li>\
             <li><code>cats -dogs</code>: fewer dogs in results</li>\
             <li><code>cats +dogs</code>: more dogs in results</li>\
             <li><code>site:commons.wikimedia.org</code>: only results from that site</li>\
             <li><code>maxn:10</code>: only first 10 results (default all)</li></ul>",
        )
    }

    async fn search(&self, query: &str) -> Result<Vec<Match>> {
        let (query, maxn) = take_maxn(query);
        let cap = maxn.or(self.max_results);

        let body = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query.as_str()),
                ("tbm", "isch"),
                ("hl", "en"),
                ("gl", "us"),
                ("ijn", "0"),
            ])
            .header("cookie", "CONSENT=YES+")
            .send()
            .await?
            .text()
            .await?;

        let matches = parse_results(&body, cap);
        debug!(%query, count = matches.len(), "Google results parsed");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_hosts_are_rejected() {
        assert!(is_thumbnail_host(
            "https://encrypted-tbn0.gstatic.com/images?q=x"
        ));
        assert!(!is_thumbnail_host("https://commons.wikimedia.org/a.jpg"));
    }

    #[test]
    fn json_fragments_are_unescaped() {
        assert_eq!(
            decode_json_fragment("https://a.example/\\u0026x"),
            "https://a.example/&x"
        );
        assert_eq!(decode_json_fragment("plain"), "plain");
    }

    #[test]
    fn triples_and_titles_are_paired() {
        let body = concat!(
            "<script>AF_initDataCallback({data:[",
            r#"["https://a.example/one.jpg", 480, 640],"#,
            r#"["https://pages.example/one", "First title", null],"#,
            r#"["https://encrypted-tbn0.gstatic.com/t.jpg", 100, 100],"#,
            r#"["https://b.example/two.png", 200, 300]"#,
            "]});</script>"
        );
        let matches = parse_results(body, None);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].url, "https://a.example/one.jpg");
        assert_eq!(matches[0].title.as_deref(), Some("First title"));
        assert_eq!(matches[0].width, Some(640));
        assert_eq!(matches[0].height, Some(480));
        assert_eq!(matches[1].url, "https://b.example/two.png");
        assert!(matches[1].title.is_none());
    }

    #[test]
    fn cap_truncates_results() {
        let body = concat!(
            "<script>AF_initDataCallback({data:[",
            r#"["https://a.example/1.jpg", 10, 10],"#,
            r#"["https://a.example/2.jpg", 10, 10],"#,
            r#"["https://a.example/3.jpg", 10, 10]"#,
            "]});</script>"
        );
        let matches = parse_results(body, Some(2));
        assert_eq!(matches.len(), 2);
    }
}
