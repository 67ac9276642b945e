//! Tool for extracting readable text content from a webpage.
//!
//! The tool strips scripts, styles, and markup and returns the plain visible
//! text, suitable for feeding into summarization or analysis steps. Failures
//! are reported as data rather than errors so the LLM can read the failure
//! message and decide how to proceed.

use crate::error::ToolError;
use crate::tool::Tool;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Default maximum length of extracted text, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 3000;

/// Tool for fetching a webpage and extracting its visible text.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ExtractContentTool {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExtractContentTool {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Arguments for extracting webpage content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ExtractContentArgs {
    /// The URL of the webpage to extract content from.
    pub url: String,

    /// Maximum length of the returned text in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

const fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

/// The outcome of a content extraction.
///
/// Serializes as `{"text": ...}` on success or `{"error": ...}` on failure,
/// never both. Failures are ordinary values so the model can inspect the
/// message and retry with a different URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchResult {
    /// Extraction succeeded with the given text.
    Success {
        /// The extracted visible text.
        text: String,
    },
    /// Extraction failed with a human-readable message.
    Failure {
        /// Description of what went wrong.
        #[serde(rename = "error")]
        message: String,
    },
}

impl FetchResult {
    /// Create a successful result.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    /// Create a failed result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a successful result.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// Pre-compiled regex patterns for HTML to text conversion
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));
static NOSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<noscript[^>]*>.*?</noscript>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

impl ExtractContentTool {
    /// Create a new content extractor tool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check that the URL parses and carries both a scheme and a host.
    ///
    /// Runs before any network I/O so malformed URLs never cost a request.
    fn is_valid_url(url: &str) -> bool {
        match url::Url::parse(url) {
            Ok(parsed) => !parsed.scheme().is_empty() && parsed.host_str().is_some(),
            Err(_) => false,
        }
    }

    /// Strip HTML down to its visible text.
    ///
    /// Removes script, style and noscript blocks, replaces remaining tags
    /// with spaces, decodes common entities and collapses all whitespace
    /// runs into single spaces.
    fn html_to_text(html: &str) -> String {
        let text = SCRIPT_RE.replace_all(html, "");
        let text = STYLE_RE.replace_all(&text, "");
        let text = NOSCRIPT_RE.replace_all(&text, "");

        // Tags become spaces so adjacent elements don't fuse into one word
        let mut text = TAG_RE.replace_all(&text, " ").into_owned();

        // Decode common HTML entities
        text = text
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&nbsp;", " ")
            .replace("&#39;", "'");

        let text = WHITESPACE_RE.replace_all(&text, " ");
        text.trim().to_string()
    }

    /// Truncate text to `max_length` characters, appending `...` when cut.
    ///
    /// Counts characters rather than bytes so multi-byte text is never
    /// split mid-codepoint. Text exactly at the limit is returned as-is.
    fn truncate(text: &str, max_length: usize) -> String {
        if text.chars().count() <= max_length {
            text.to_string()
        } else {
            let mut truncated: String = text.chars().take(max_length).collect();
            truncated.push_str("...");
            truncated
        }
    }

    /// Fetch the URL and extract its text, mapping every failure into a
    /// [`FetchResult::Failure`].
    async fn fetch(&self, url: &str, max_length: usize) -> FetchResult {
        let client = match reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; KumoBot/1.0)")
            .build()
        {
            Ok(client) => client,
            Err(e) => return FetchResult::failure(format!("Unexpected error: {e}")),
        };

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::failure(format!("Request error: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failure(format!("Request error: HTTP {status} for {url}"));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return FetchResult::failure(format!("Request error: {e}")),
        };

        let text = Self::html_to_text(&html);
        FetchResult::success(Self::truncate(&text, max_length))
    }
}

#[async_trait]
impl Tool for ExtractContentTool {
    const NAME: &'static str = "extract_content";
    type Args = ExtractContentArgs;
    type Output = FetchResult;
    type Error = ToolError;

    fn description(&self) -> String {
        "Fetches a webpage at the given URL and extracts its visible text content, \
         stripped of all HTML markup. Returns the text on success or an error \
         message describing why the fetch failed."
            .to_string()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "format": "uri",
                    "description": "The URL of the webpage to extract content from"
                },
                "max_length": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum length of the returned text in characters (default 3000)"
                }
            },
            "required": ["url"]
        })
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        // Reject malformed URLs before any network I/O happens
        if !Self::is_valid_url(&args.url) {
            return Ok(FetchResult::failure("Invalid URL."));
        }

        Ok(self.fetch(&args.url, args.max_length).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod url_validation {
        use super::*;

        #[test]
        fn accepts_http_and_https() {
            assert!(ExtractContentTool::is_valid_url("http://example.com"));
            assert!(ExtractContentTool::is_valid_url("https://example.com/path?q=1"));
        }

        #[test]
        fn rejects_missing_scheme() {
            assert!(!ExtractContentTool::is_valid_url("example.com"));
            assert!(!ExtractContentTool::is_valid_url("www.example.com/page"));
        }

        #[test]
        fn rejects_missing_host() {
            assert!(!ExtractContentTool::is_valid_url("file:///etc/hosts"));
            assert!(!ExtractContentTool::is_valid_url("mailto:user@example.com"));
        }

        #[test]
        fn rejects_garbage() {
            assert!(!ExtractContentTool::is_valid_url(""));
            assert!(!ExtractContentTool::is_valid_url("not a url at all"));
            assert!(!ExtractContentTool::is_valid_url("://missing"));
        }

        #[tokio::test]
        async fn invalid_url_fails_without_network() {
            // The hostname is unresolvable, so any network attempt would
            // produce a request error rather than this exact message.
            let tool = ExtractContentTool::new();
            let result = tool
                .call(ExtractContentArgs {
                    url: "no-scheme-here".to_string(),
                    max_length: DEFAULT_MAX_LENGTH,
                })
                .await
                .unwrap();
            assert_eq!(result, FetchResult::failure("Invalid URL."));
        }
    }

    mod html_to_text {
        use super::*;

        #[test]
        fn strips_tags_and_scripts() {
            let html = "<html><script>x</script><body>Hello <b>World</b></body></html>";
            assert_eq!(ExtractContentTool::html_to_text(html), "Hello World");
        }

        #[test]
        fn removes_style_and_noscript_blocks() {
            let html = concat!(
                "<style>body { color: red; }</style>",
                "<noscript>enable js</noscript>",
                "<p>Visible</p>"
            );
            assert_eq!(ExtractContentTool::html_to_text(html), "Visible");
        }

        #[test]
        fn removes_multiline_script() {
            let html = "<script type=\"text/javascript\">\nvar x = 1;\nalert(x);\n</script>Text";
            assert_eq!(ExtractContentTool::html_to_text(html), "Text");
        }

        #[test]
        fn decodes_entities() {
            let html = "<p>Fish &amp; Chips &lt;3&gt; &quot;quoted&quot; it&#39;s</p>";
            assert_eq!(
                ExtractContentTool::html_to_text(html),
                "Fish & Chips <3> \"quoted\" it's"
            );
        }

        #[test]
        fn collapses_whitespace() {
            let html = "<div>  lots \n\n of \t\t space  </div>";
            assert_eq!(ExtractContentTool::html_to_text(html), "lots of space");
        }

        #[test]
        fn adjacent_elements_do_not_fuse() {
            let html = "<td>one</td><td>two</td>";
            assert_eq!(ExtractContentTool::html_to_text(html), "one two");
        }

        #[test]
        fn empty_body_yields_empty_text() {
            let html = "<html><head><title>t</title></head><body></body></html>";
            assert_eq!(ExtractContentTool::html_to_text(html), "t");
        }
    }

    mod truncation {
        use super::*;

        #[test]
        fn appends_marker_past_limit() {
            assert_eq!(ExtractContentTool::truncate("Hello World", 5), "Hello...");
        }

        #[test]
        fn exact_length_has_no_marker() {
            assert_eq!(ExtractContentTool::truncate("Hello", 5), "Hello");
        }

        #[test]
        fn one_past_limit_gets_marker() {
            assert_eq!(ExtractContentTool::truncate("Hello!", 5), "Hello...");
        }

        #[test]
        fn short_text_unchanged() {
            assert_eq!(ExtractContentTool::truncate("Hi", 5), "Hi");
        }

        #[test]
        fn counts_characters_not_bytes() {
            // Four characters, twelve bytes
            assert_eq!(ExtractContentTool::truncate("日本語で", 4), "日本語で");
            assert_eq!(ExtractContentTool::truncate("日本語です", 4), "日本語で...");
        }
    }

    mod fetch_result {
        use super::*;

        #[test]
        fn success_serializes_with_text_key() {
            let json = serde_json::to_value(FetchResult::success("hello")).unwrap();
            assert_eq!(json, serde_json::json!({"text": "hello"}));
        }

        #[test]
        fn failure_serializes_with_error_key() {
            let json = serde_json::to_value(FetchResult::failure("Invalid URL.")).unwrap();
            assert_eq!(json, serde_json::json!({"error": "Invalid URL."}));
        }

        #[test]
        fn deserializes_both_shapes() {
            let ok: FetchResult = serde_json::from_value(serde_json::json!({"text": "t"})).unwrap();
            assert!(ok.is_success());
            let err: FetchResult =
                serde_json::from_value(serde_json::json!({"error": "e"})).unwrap();
            assert!(!err.is_success());
        }
    }

    mod tool_surface {
        use super::*;

        #[test]
        fn default_timeout_is_ten_seconds() {
            assert_eq!(ExtractContentTool::new().timeout_secs, 10);
        }

        #[test]
        fn max_length_defaults_when_omitted() {
            let args: ExtractContentArgs =
                serde_json::from_value(serde_json::json!({"url": "https://example.com"})).unwrap();
            assert_eq!(args.max_length, DEFAULT_MAX_LENGTH);
        }

        #[test]
        fn definition_has_expected_shape() {
            let def = ExtractContentTool::new().definition();
            assert_eq!(def.name, "extract_content");
            assert_eq!(def.parameters["required"], serde_json::json!(["url"]));
            assert!(
                def.parameters["properties"]["max_length"]["description"]
                    .as_str()
                    .unwrap()
                    .contains("3000")
            );
        }
    }
}
