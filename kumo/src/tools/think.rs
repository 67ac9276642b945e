//! Scratchpad tool for intermediate reasoning.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;
use crate::tool::Tool;

/// Tool that gives the model a place to write down intermediate reasoning.
///
/// The thought is echoed back verbatim and lands in the message history as a
/// tool result, letting later steps build on it without changing any state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThinkTool;

/// Arguments for the think tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ThinkArgs {
    /// The thought to record.
    pub thought: String,
}

#[async_trait]
impl Tool for ThinkTool {
    const NAME: &'static str = "think";
    type Args = ThinkArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Use this tool to think about something. It will not obtain new \
         information or change anything, but the thought is saved so you can \
         refer back to it in later steps."
            .to_string()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "thought": {
                    "type": "string",
                    "description": "A thought to think about"
                }
            },
            "required": ["thought"]
        })
    }

    fn output_type(&self) -> &'static str {
        "string"
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        Ok(args.thought)
    }
}
