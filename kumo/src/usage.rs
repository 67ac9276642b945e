//! Token usage tracking for LLM requests.
//!
//! This module provides types for tracking token consumption across
//! LLM calls, including:
//! - Input (prompt) and output (candidate) token counts
//! - Cached-content tokens served from the provider's context cache
//! - Reasoning ("thought") tokens for models that think before answering
//!
//! The `Usage` struct deserializes directly from Gemini's `usageMetadata`
//! object via field aliases, and accumulates across steps with `+`.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Token usage statistics for a single request or an accumulated run.
///
/// # JSON Format
///
/// ```json
/// {
///     "promptTokenCount": 100,
///     "candidatesTokenCount": 50,
///     "totalTokenCount": 170,
///     "cachedContentTokenCount": 80,
///     "thoughtsTokenCount": 20
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt (input).
    #[serde(default, alias = "promptTokenCount")]
    pub input_tokens: u32,

    /// Tokens in the generated candidates (output).
    #[serde(default, alias = "candidatesTokenCount")]
    pub output_tokens: u32,

    /// Total tokens consumed, including reasoning tokens.
    #[serde(default, alias = "totalTokenCount")]
    pub total_tokens: u32,

    /// Prompt tokens served from the provider's context cache.
    #[serde(
        default,
        alias = "cachedContentTokenCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub cached_tokens: Option<u32>,

    /// Tokens the model spent thinking before producing the answer.
    #[serde(
        default,
        alias = "thoughtsTokenCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub reasoning_tokens: Option<u32>,
}

impl Usage {
    /// Creates usage with input and output token counts.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cached_tokens: None,
            reasoning_tokens: None,
        }
    }

    /// Creates empty usage.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Sets the cached token count.
    #[must_use]
    pub const fn with_cached(mut self, cached_tokens: u32) -> Self {
        self.cached_tokens = Some(cached_tokens);
        self
    }

    /// Sets the reasoning token count and folds it into the total.
    #[must_use]
    pub const fn with_reasoning(mut self, reasoning_tokens: u32) -> Self {
        self.reasoning_tokens = Some(reasoning_tokens);
        self.total_tokens = self.input_tokens + self.output_tokens + reasoning_tokens;
        self
    }

    /// Returns `true` when no tokens were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_tokens == 0
    }

    /// Cached prompt tokens, zero when the provider reported none.
    #[must_use]
    pub const fn cached(&self) -> u32 {
        match self.cached_tokens {
            Some(c) => c,
            None => 0,
        }
    }

    /// Reasoning tokens, zero when the provider reported none.
    #[must_use]
    pub const fn reasoning(&self) -> u32 {
        match self.reasoning_tokens {
            Some(r) => r,
            None => 0,
        }
    }

    /// Prompt tokens that were not served from cache.
    #[must_use]
    pub const fn uncached_input_tokens(&self) -> u32 {
        self.input_tokens.saturating_sub(self.cached())
    }
}

fn merge(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
    }
}

impl Add for Usage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
            cached_tokens: merge(self.cached_tokens, rhs.cached_tokens),
            reasoning_tokens: merge(self.reasoning_tokens, rhs.reasoning_tokens),
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Usage(in: {}, out: {}, total: {})",
            self.input_tokens, self.output_tokens, self.total_tokens
        )?;
        if self.cached() > 0 {
            write!(f, " [cached: {}]", self.cached())?;
        }
        if self.reasoning() > 0 {
            write!(f, " [reasoning: {}]", self.reasoning())?;
        }
        Ok(())
    }
}

/// Accumulates usage across multiple requests.
///
/// # Example
///
/// ```rust
/// use kumo::usage::{Usage, UsageTracker};
///
/// let mut tracker = UsageTracker::new();
/// tracker.add(Usage::new(100, 50));
/// tracker.add(Usage::new(200, 80));
/// assert_eq!(tracker.total().input_tokens, 300);
/// assert_eq!(tracker.count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageTracker {
    /// Total accumulated usage.
    total: Usage,
    /// Number of requests tracked.
    count: usize,
}

impl UsageTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total: Usage::zero(),
            count: 0,
        }
    }

    /// Records the usage of one request.
    pub fn add(&mut self, usage: Usage) {
        self.total += usage;
        self.count += 1;
    }

    /// Get the total accumulated usage.
    #[must_use]
    pub const fn total(&self) -> Usage {
        self.total
    }

    /// Number of requests recorded.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Average usage per request, `None` when nothing was recorded.
    #[must_use]
    pub fn average(&self) -> Option<Usage> {
        if self.count == 0 {
            return None;
        }
        let count = u32::try_from(self.count).unwrap_or(u32::MAX);
        Some(Usage {
            input_tokens: self.total.input_tokens / count,
            output_tokens: self.total.output_tokens / count,
            total_tokens: self.total.total_tokens / count,
            cached_tokens: self.total.cached_tokens.map(|c| c / count),
            reasoning_tokens: self.total.reasoning_tokens.map(|r| r / count),
        })
    }

    /// Clears the tracker.
    pub fn reset(&mut self) {
        self.total = Usage::zero();
        self.count = 0;
    }
}
