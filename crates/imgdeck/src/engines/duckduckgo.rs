//! DuckDuckGo image search backend.
//!
//! Uses the same two-phase flow as the duckduckgo.com front end: fetch the
//! search page to obtain a `vqd` session token, then page through the
//! `i.js` JSON endpoint with that token.

use std::time::Duration;

use regex_lite::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::engine::{EngineConfig, SearchEngine};
use crate::engines::{BROWSER_USER_AGENT, take_maxn};
use crate::error::{Error, Result};
use crate::types::Match;

/// Registry title for this backend.
pub const TITLE: &str = "DuckDuckGo";

const DEFAULT_BASE_URL: &str = "https://duckduckgo.com";

/// Attempts at decoding one result page before declaring a malfunction.
const PAGE_ATTEMPTS: u32 = 3;

/// Pause between page decode attempts.
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// DuckDuckGo image search backend.
pub struct DuckDuckGo {
    client: reqwest::Client,
    base_url: String,
    max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    results: Vec<ResultItem>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultItem {
    #[serde(default)]
    title: Option<String>,
    image: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

impl DuckDuckGo {
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

    /// Fetch the front page for the query and extract the `vqd` token.
    async fn fetch_token(&self, query: &str) -> Result<String> {
        let body = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("va", "f"),
                ("t", "hg"),
                ("q", query),
                ("iax", "images"),
                ("ia", "images"),
            ])
            .header("referer", format!("{}/", self.base_url))
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await?
            .text()
            .await?;

        let token_re = Regex::new(r#"vqd=['"]?([^'"&\s]+)"#).unwrap();
        token_re
            .captures(&body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                Error::Backend(format!("DuckDuckGo returned no vqd token for \"{query}\""))
            })
    }

    /// Fetch one result page, retrying malformed bodies.
    async fn fetch_page(&self, url: &str, query: &str, vqd: &str) -> Result<ResultPage> {
        let params = [
            ("l", "wt-wt"),
            ("o", "json"),
            ("q", query),
            ("vqd", vqd),
            ("f", ",,,"),
            ("p", "-1"),
        ];

        let mut last_err = String::new();
        for attempt in 1..=PAGE_ATTEMPTS {
            let body = self
                .client
                .get(url)
                .query(&params)
                .header("accept", "application/json, text/javascript, */*; q=0.01")
                .header("referer", format!("{}/", self.base_url))
                .header("x-requested-with", "XMLHttpRequest")
                .send()
                .await?
                .text()
                .await?;

            match serde_json::from_str::<ResultPage>(&body) {
                Ok(page) => return Ok(page),
                Err(e) => {
                    warn!(attempt, error = %e, "DuckDuckGo result page did not decode");
                    last_err = e.to_string();
                    if attempt < PAGE_ATTEMPTS {
                        tokio::time::sleep(RETRY_PAUSE).await;
                    }
                }
            }
        }

        Err(Error::Backend(format!(
            "DuckDuckGo returned undecodable results for \"{query}\": {last_err}"
        )))
    }
}

#[async_trait::async_trait]
impl SearchEngine for DuckDuckGo {
    fn title(&self) -> &'static str {
        TITLE
    }

    fn legend(&self) -> Option<&'static str> {
        Some("\"[exact term]\", +/-[term], site:[url], maxn:[max results]")
    }

    fn tooltip(&self) -> Option<&'static str> {
        Some(
            "<b>SEARCH ENGINE SYNTAX</b>\
             <ul><li><code>dogs cats</code>: dogs or cats in results</li>\
             <li><code>\"dogs and cats\"</code>: exact term \"dogs and cats\" in results</li>\
             <li><code>+dogs cats</code>: more dogs in results</li>\
             <li><code>dogs -cats</code>: fewer cats in results</li>\
             <li><code>site:commons.wikimedia.org</code>: only results from that site</li>\
             <li><code>maxn:10</code>: only first 10 results (default all)</li></ul>",
        )
    }

    async fn search(&self, query: &str) -> Result<Vec<Match>> {
        let (query, maxn) = take_maxn(query);
        let cap = maxn.or(self.max_results);

        let vqd = self.fetch_token(&query).await?;
        debug!(%query, vqd, "DuckDuckGo session token obtained");

        let mut matches = Vec::new();
        let mut page_url = format!("{}/i.js", self.base_url);

        loop {
            let page = self.fetch_page(&page_url, &query, &vqd).await?;

            for item in page.results {
                let mut m = Match::new(item.image);
                m.title = item.title;
                m.width = item.width;
                m.height = item.height;
                matches.push(m);

                if cap.is_some_and(|n| matches.len() >= n) {
                    return Ok(matches);
                }
            }

            match page.next {
                Some(next) => {
                    page_url = format!("{}/{}", self.base_url, next.trim_start_matches('/'));
                }
                None => break,
            }
        }

        Ok(matches)
    }
}
