//! Web search tools for querying the internet.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::ToolError;
use crate::tool::Tool;

/// Generic web search tool with configurable backend.
#[derive(Debug, Clone, Copy)]
pub struct WebSearchTool {
    /// Maximum number of results to return.
    pub max_results: usize,
    /// Search engine to use.
    pub engine: SearchEngine,
}

/// Supported search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SearchEngine {
    /// DuckDuckGo Lite HTML interface (default).
    #[default]
    DuckDuckGo,
    /// Bing RSS feed.
    Bing,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self {
            max_results: 10,
            engine: SearchEngine::default(),
        }
    }
}

/// Arguments for web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct WebSearchArgs {
    /// The search query to perform.
    pub query: String,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title of the result.
    pub title: String,
    /// URL of the result.
    pub link: String,
    /// Description/snippet of the result.
    pub description: String,
}

static DDG_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="result-link"[^>]*href="([^"]+)"[^>]*>([^<]+)</a>"#).expect("valid regex")
});
static DDG_SNIPPET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="result-snippet"[^>]*>([^<]+)"#).expect("valid regex"));
static RSS_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<item>.*?<title>([^<]*)</title>.*?<link>([^<]*)</link>.*?<description>([^<]*)</description>.*?</item>",
    )
    .expect("valid regex")
});

impl WebSearchTool {
    /// Create a new web search tool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum results.
    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set search engine.
    #[must_use]
    pub const fn with_engine(mut self, engine: SearchEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Format results into markdown.
    fn format_results(results: &[SearchResult]) -> String {
        if results.is_empty() {
            return "No results found.".to_string();
        }

        let mut output = String::from("## Search Results\n\n");
        for result in results {
            output.push_str(&format!(
                "[{}]({})\n{}\n\n",
                result.title, result.link, result.description
            ));
        }
        output
    }

    /// Perform `DuckDuckGo` search using the Lite HTML interface.
    async fn search_duckduckgo(&self, query: &str) -> Result<Vec<SearchResult>, ToolError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ToolError::execution(e.to_string()))?;

        let url = Url::parse_with_params("https://lite.duckduckgo.com/lite/", &[("q", query)])
            .map_err(|e| ToolError::invalid_args(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::execution(format!("Request failed: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| ToolError::execution(format!("Failed to read response: {e}")))?;

        let results = Self::parse_duckduckgo_html(&html);

        Ok(results.into_iter().take(self.max_results).collect())
    }

    /// Parse the `DuckDuckGo` Lite HTML response.
    fn parse_duckduckgo_html(html: &str) -> Vec<SearchResult> {
        let links: Vec<_> = DDG_LINK_RE.captures_iter(html).collect();
        let snippets: Vec<_> = DDG_SNIPPET_RE.captures_iter(html).collect();

        let mut results = Vec::new();
        for (i, link_cap) in links.iter().enumerate() {
            let url = link_cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            let title = link_cap.get(2).map(|m| m.as_str()).unwrap_or_default();
            let description = snippets
                .get(i)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default();

            if !url.is_empty() && !title.is_empty() {
                results.push(SearchResult {
                    title: title.trim().to_string(),
                    link: url.to_string(),
                    description: description.trim().to_string(),
                });
            }
        }

        results
    }

    /// Perform Bing search using the RSS feed.
    async fn search_bing(&self, query: &str) -> Result<Vec<SearchResult>, ToolError> {
        let client = reqwest::Client::new();
        let url = Url::parse_with_params(
            "https://www.bing.com/search",
            &[("q", query), ("format", "rss")],
        )
        .map_err(|e| ToolError::invalid_args(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::execution(format!("Request failed: {e}")))?;

        let xml = response
            .text()
            .await
            .map_err(|e| ToolError::execution(format!("Failed to read response: {e}")))?;

        let results = Self::parse_rss_xml(&xml);

        Ok(results.into_iter().take(self.max_results).collect())
    }

    /// Parse an RSS XML response into results.
    fn parse_rss_xml(xml: &str) -> Vec<SearchResult> {
        RSS_ITEM_RE
            .captures_iter(xml)
            .map(|cap| SearchResult {
                title: cap
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                link: cap
                    .get(2)
                    .map(|m| m.as_str())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                description: cap
                    .get(3)
                    .map(|m| m.as_str())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    const NAME: &'static str = "web_search";
    type Args = WebSearchArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Performs a web search for a query and returns the top search results formatted as markdown.".to_string()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to perform"
                }
            },
            "required": ["query"]
        })
    }

    fn output_type(&self) -> &'static str {
        "string"
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let results = match self.engine {
            SearchEngine::DuckDuckGo => self.search_duckduckgo(&args.query).await?,
            SearchEngine::Bing => self.search_bing(&args.query).await?,
        };

        if results.is_empty() {
            return Err(ToolError::execution(
                "No results found! Try a less restrictive/shorter query.",
            ));
        }

        Ok(Self::format_results(&results))
    }
}

/// DuckDuckGo-specific search tool.
pub type DuckDuckGoSearchTool = WebSearchTool;
