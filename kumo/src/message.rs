//! Chat message types shared by providers, agents and sessions.
//!
//! A conversation is a `Vec<Message>`. Each [`Message`] carries a [`Role`],
//! optional [`Content`] (plain text or multi-part), and, for assistant
//! messages, the tool calls requested by the model. Tool results flow back
//! as messages with [`Role::Tool`] and a `tool_call_id` linking them to the
//! originating call.
//!
//! # Example
//!
//! ```rust
//! use kumo::message::Message;
//!
//! let history = vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("What is the capital of France?"),
//!     Message::assistant("Paris."),
//! ];
//! assert_eq!(history[2].text().as_deref(), Some("Paris."));
//! ```

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions, placed first in the conversation.
    System,
    /// End-user input.
    #[default]
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// A tool result, linked to a call via `tool_call_id`.
    Tool,
}

impl Role {
    /// Returns the wire-format name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multi-part message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text {
        /// The text itself.
        text: String,
    },
    /// An inline image, base64-encoded.
    InlineImage {
        /// IANA media type, e.g. `image/png`.
        mime_type: String,
        /// Base64-encoded image bytes.
        data: String,
    },
}

impl ContentPart {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an inline image part from base64 data.
    pub fn inline_image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineImage {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Message body: plain text or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// A plain text body.
    Text(String),
    /// A multi-part body (text and images).
    Parts(Vec<ContentPart>),
}

impl Content {
    /// Creates a plain text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a multi-part body.
    #[must_use]
    pub const fn parts(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }

    /// Returns the textual content, concatenating text parts with newlines.
    ///
    /// Returns `None` when the body contains no text at all.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Parts(parts) => {
                let texts: Vec<&str> = parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text.as_str()),
                        ContentPart::InlineImage { .. } => None,
                    })
                    .collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join("\n"))
                }
            }
        }
    }
}

impl<S: Into<String>> From<S> for Content {
    fn from(text: S) -> Self {
        Self::Text(text.into())
    }
}

/// The function invocation inside a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments string.
    pub arguments: String,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call, echoed back in the tool result.
    pub id: String,
    /// Call type. Currently always `"function"`.
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    /// The function being called.
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_owned()
}

impl ToolCall {
    /// Creates a function tool call.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub role: Role,
    /// The body. `None` for assistant messages that only carry tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Tool calls requested by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For [`Role::Tool`] messages, the id of the call being answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Optional author name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model reasoning attached to the message, when the provider emits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl Message {
    /// Creates a message with a role and content.
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    /// Creates a user message with multi-part content.
    #[must_use]
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(Role::User, Content::Parts(parts))
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    /// Creates an assistant message that only carries tool calls.
    #[must_use]
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            tool_calls: Some(tool_calls),
            ..Self::default()
        }
    }

    /// Creates a tool-result message answering the call with the given id.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(Content::text(content)),
            tool_call_id: Some(tool_call_id.into()),
            ..Self::default()
        }
    }

    /// Sets the author name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the textual content of the message, if any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(Content::as_text)
    }

    /// Returns `true` when the message carries at least one tool call.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod role {
        use super::*;

        #[test]
        fn as_str_values() {
            assert_eq!(Role::System.as_str(), "system");
            assert_eq!(Role::User.as_str(), "user");
            assert_eq!(Role::Assistant.as_str(), "assistant");
            assert_eq!(Role::Tool.as_str(), "tool");
        }

        #[test]
        fn display_matches_as_str() {
            assert_eq!(Role::Assistant.to_string(), "assistant");
        }

        #[test]
        fn serde_lowercase() {
            let json = serde_json::to_string(&Role::Tool).unwrap();
            assert_eq!(json, r#""tool""#);
            let role: Role = serde_json::from_str(r#""system""#).unwrap();
            assert_eq!(role, Role::System);
        }

        #[test]
        fn default_is_user() {
            assert_eq!(Role::default(), Role::User);
        }
    }

    mod content {
        use super::*;

        #[test]
        fn text_round_trip() {
            let content = Content::text("hello");
            assert_eq!(content.as_text().unwrap(), "hello");
        }

        #[test]
        fn from_str_is_text() {
            let content: Content = "hi".into();
            assert!(matches!(content, Content::Text(ref t) if t == "hi"));
        }

        #[test]
        fn parts_join_text() {
            let content = Content::parts(vec![
                ContentPart::text("first"),
                ContentPart::inline_image("image/png", "aGk="),
                ContentPart::text("second"),
            ]);
            assert_eq!(content.as_text().unwrap(), "first\nsecond");
        }

        #[test]
        fn image_only_parts_have_no_text() {
            let content = Content::parts(vec![ContentPart::inline_image("image/png", "aGk=")]);
            assert!(content.as_text().is_none());
        }

        #[test]
        fn plain_text_serializes_as_string() {
            let json = serde_json::to_value(Content::text("hi")).unwrap();
            assert_eq!(json, serde_json::json!("hi"));
        }

        #[test]
        fn parts_serialize_tagged() {
            let json = serde_json::to_value(Content::parts(vec![ContentPart::text("hi")])).unwrap();
            assert_eq!(json[0]["type"], "text");
            assert_eq!(json[0]["text"], "hi");
        }
    }

    mod tool_call {
        use super::*;

        #[test]
        fn function_constructor() {
            let call = ToolCall::function("call-1", "search", r#"{"query":"rust"}"#);
            assert_eq!(call.id, "call-1");
            assert_eq!(call.call_type, "function");
            assert_eq!(call.function.name, "search");
            assert_eq!(call.function.arguments, r#"{"query":"rust"}"#);
        }

        #[test]
        fn serde_uses_type_key() {
            let call = ToolCall::function("id", "f", "{}");
            let json = serde_json::to_value(&call).unwrap();
            assert_eq!(json["type"], "function");
            let back: ToolCall = serde_json::from_value(json).unwrap();
            assert_eq!(back, call);
        }

        #[test]
        fn type_defaults_on_deserialize() {
            let call: ToolCall = serde_json::from_value(serde_json::json!({
                "id": "id",
                "function": {"name": "f", "arguments": "{}"}
            }))
            .unwrap();
            assert_eq!(call.call_type, "function");
        }
    }

    mod message {
        use super::*;

        #[test]
        fn constructors_set_roles() {
            assert_eq!(Message::system("s").role, Role::System);
            assert_eq!(Message::user("u").role, Role::User);
            assert_eq!(Message::assistant("a").role, Role::Assistant);
            assert_eq!(Message::tool("id", "out").role, Role::Tool);
        }

        #[test]
        fn text_accessor() {
            let msg = Message::user("hello");
            assert_eq!(msg.text().unwrap(), "hello");
        }

        #[test]
        fn tool_message_links_call_id() {
            let msg = Message::tool("call-7", "result");
            assert_eq!(msg.tool_call_id.as_deref(), Some("call-7"));
            assert_eq!(msg.text().unwrap(), "result");
        }

        #[test]
        fn assistant_tool_calls_has_no_content() {
            let msg = Message::assistant_tool_calls(vec![ToolCall::function("1", "f", "{}")]);
            assert!(msg.content.is_none());
            assert!(msg.has_tool_calls());
        }

        #[test]
        fn empty_tool_calls_vec_is_not_a_call() {
            let msg = Message::assistant_tool_calls(vec![]);
            assert!(!msg.has_tool_calls());
        }

        #[test]
        fn with_name() {
            let msg = Message::user("hi").with_name("alice");
            assert_eq!(msg.name.as_deref(), Some("alice"));
        }

        #[test]
        fn none_fields_are_skipped_in_json() {
            let json = serde_json::to_value(Message::user("hi")).unwrap();
            assert_eq!(json["role"], "user");
            assert_eq!(json["content"], "hi");
            assert!(json.get("tool_calls").is_none());
            assert!(json.get("tool_call_id").is_none());
            assert!(json.get("name").is_none());
        }

        #[test]
        fn serde_round_trip() {
            let msg = Message {
                role: Role::Assistant,
                content: Some(Content::text("thinking done")),
                tool_calls: Some(vec![ToolCall::function("1", "f", "{}")]),
                tool_call_id: None,
                name: Some("bot".to_owned()),
                reasoning_content: Some("step by step".to_owned()),
            };
            let json = serde_json::to_string(&msg).unwrap();
            let back: Message = serde_json::from_str(&json).unwrap();
            assert_eq!(back, msg);
        }

        #[test]
        fn default_is_empty_user() {
            let msg = Message::default();
            assert_eq!(msg.role, Role::User);
            assert!(msg.content.is_none());
            assert!(!msg.has_tool_calls());
        }
    }
}
