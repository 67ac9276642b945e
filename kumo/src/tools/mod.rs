//! Built-in tools for common agent tasks.
//!
//! Every type here implements the [`Tool`](crate::tool::Tool) trait and can
//! be handed to an agent directly:
//!
//! - [`WebSearchTool`]: web search via DuckDuckGo Lite or Bing RSS.
//! - [`ExtractContentTool`]: fetch a webpage and return its visible text.
//! - [`ThinkTool`]: scratchpad for intermediate reasoning.
//! - [`FinalAnswerTool`]: terminal tool that passes the answer through.
//! - [`UserInputTool`]: ask the user a question on stdin.
//!
//! # Example
//!
//! ```ignore
//! use kumo::prelude::*;
//! use kumo::tools::{ThinkTool, WebSearchTool};
//!
//! let agent = Agent::new("researcher")
//!     .provider(provider)
//!     .tool(Box::new(WebSearchTool::new()))
//!     .tool(Box::new(ThinkTool));
//! ```

mod extract_content;
mod final_answer;
mod think;
mod user_input;
mod web_search;

pub use extract_content::{
    DEFAULT_MAX_LENGTH, ExtractContentArgs, ExtractContentTool, FetchResult,
};
pub use final_answer::{FinalAnswerArgs, FinalAnswerTool};
pub use think::{ThinkArgs, ThinkTool};
pub use user_input::{UserInputArgs, UserInputTool};
pub use web_search::{
    DuckDuckGoSearchTool, SearchEngine, SearchResult, WebSearchArgs, WebSearchTool,
};
