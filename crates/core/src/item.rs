//! Transcript items: the front agent's record of a voice conversation.
//!
//! User speaks → front agent answers or delegates → supervisor answer is
//! relayed. Every step leaves a [`ConversationItem`] behind, in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The front agent
    Assistant,
    /// System instructions
    System,
}

/// What a transcript record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Message,
    FunctionCall,
    FunctionCallOutput,
    /// Anything else a realtime session may record (audio buffers, handoffs…)
    #[serde(other)]
    Other,
}

/// A single transcript record.
///
/// Only `message` items are forwarded to the supervisor as context.
///
/// Also accepts the realtime session's history shape: `itemId`, `content` as
/// a list of parts, and extra fields like `status`, which are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationItem {
    /// Unique item ID
    #[serde(default = "new_item_id", alias = "itemId")]
    pub item_id: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Unrecognized roles read as `None`
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_role")]
    pub role: Option<Role>,

    /// Message text (empty for non-message items)
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "content_text")]
    pub content: String,

    /// Function name, for function_call items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Correlates a function_call with its function_call_output
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "callId")]
    pub call_id: Option<String>,

    /// Raw JSON arguments, for function_call items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,

    /// Raw JSON output, for function_call_output items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A plain string, or a list of parts whose `text` (or `transcript`, for
/// audio) is joined with newlines. Null reads as empty.
fn content_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Null => Ok(String::new()),
        Value::Array(parts) => Ok(parts
            .iter()
            .filter_map(|part| {
                part.get("text")
                    .or_else(|| part.get("transcript"))
                    .and_then(Value::as_str)
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(serde::de::Error::custom(format!(
            "message content must be a string or a list of parts, got {other}"
        ))),
    }
}

impl ConversationItem {
    fn message(role: Role, content: impl Into<String>) -> Self {
        Self {
            item_id: new_item_id(),
            kind: ItemKind::Message,
            role: Some(role),
            content: content.into(),
            name: None,
            call_id: None,
            arguments: None,
            output: None,
            created_at: Utc::now(),
        }
    }

    /// A user utterance.
    pub fn user(content: impl Into<String>) -> Self {
        Self::message(Role::User, content)
    }

    /// Something the front agent said.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::message(Role::Assistant, content)
    }

    /// A tool call made by the front agent.
    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            item_id: new_item_id(),
            kind: ItemKind::FunctionCall,
            role: None,
            content: String::new(),
            name: Some(name.into()),
            call_id: Some(call_id.into()),
            arguments: Some(arguments.into()),
            output: None,
            created_at: Utc::now(),
        }
    }

    /// The result of a front-agent tool call.
    pub fn function_call_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            item_id: new_item_id(),
            kind: ItemKind::FunctionCallOutput,
            role: None,
            content: String::new(),
            name: None,
            call_id: Some(call_id.into()),
            arguments: None,
            output: Some(output.into()),
            created_at: Utc::now(),
        }
    }

    pub fn is_message(&self) -> bool {
        self.kind == ItemKind::Message
    }
}

/// Keep only the message items of a transcript, in order.
pub fn messages_only(items: &[ConversationItem]) -> Vec<&ConversationItem> {
    items.iter().filter(|item| item.is_message()).collect()
}
