//! LLM backend implementations.
//!
//! This module contains implementations for LLM providers. Each backend is
//! organized into its own submodule.
//!
//! # Available Backends
//!
//! - [`gemini`] - Google Gemini API (gemini-2.5-flash, gemini-2.5-pro, etc.)

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{Gemini, GeminiConfig};
