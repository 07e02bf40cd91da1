//! Supervisor trait: the abstraction over the remote completion endpoint.
//!
//! A supervisor client knows how to send the accumulated delegation request to
//! a model and get back either a final message or a batch of tool calls.
//!
//! The item types mirror the Responses wire format so they can be serialized
//! as-is; implementations only add the envelope (model, tools, flags).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SupervisorError;
use crate::item::Role;

/// A tool definition sent to the supervisor so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,

    /// Whether the model must follow the schema exactly
    #[serde(default)]
    pub strict: bool,
}

/// One entry of the request's `input` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: Role,
        content: String,
    },
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

/// A tool call requested by the supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque identifier chosen by the remote model
    pub call_id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a raw JSON string
    pub arguments: String,
}

/// The local result for one [`ToolCallRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallResult {
    call_id: String,
    output: serde_json::Value,
}

impl ToolCallResult {
    /// Pair an output with the call that produced it.
    ///
    /// This is the only constructor, so a result always carries the call_id
    /// of an issued request.
    pub fn new(call: &ToolCallRequest, output: serde_json::Value) -> Self {
        Self {
            call_id: call.call_id.clone(),
            output,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn output(&self) -> &serde_json::Value {
        &self.output
    }
}

/// The accumulated request for one delegation.
///
/// Owned by a single loop invocation. The system and user blocks are fixed at
/// construction; only tool exchanges are appended afterwards.
#[derive(Debug, Clone)]
pub struct SupervisorRequest {
    pub model: String,
    pub instructions: String,
    pub context: String,
    pub tools: Vec<ToolDefinition>,
    exchanged: Vec<InputItem>,
}

impl SupervisorRequest {
    pub fn new(
        model: impl Into<String>,
        instructions: impl Into<String>,
        context: impl Into<String>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            context: context.into(),
            tools,
            exchanged: Vec::new(),
        }
    }

    /// Append a resolved call: the function_call echo, then its output.
    pub fn push_exchange(&mut self, call: &ToolCallRequest, result: &ToolCallResult) {
        debug_assert_eq!(call.call_id, result.call_id);
        self.exchanged.push(InputItem::FunctionCall {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        });
        self.exchanged.push(InputItem::FunctionCallOutput {
            call_id: result.call_id.clone(),
            output: result.output.to_string(),
        });
    }

    /// Tool calls and outputs appended so far.
    pub fn exchanged(&self) -> &[InputItem] {
        &self.exchanged
    }

    /// The full `input` sequence: system block, user block, then exchanges.
    pub fn input(&self) -> Vec<InputItem> {
        let mut input = Vec::with_capacity(self.exchanged.len() + 2);
        input.push(InputItem::Message {
            role: Role::System,
            content: self.instructions.clone(),
        });
        input.push(InputItem::Message {
            role: Role::User,
            content: self.context.clone(),
        });
        input.extend(self.exchanged.iter().cloned());
        input
    }
}

/// A piece of message content in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    OutputText {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// One entry of the response's `output` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    /// Reasoning traces, web search calls, and anything else we ignore
    #[serde(other)]
    Other,
}

impl OutputItem {
    /// A message item with a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        OutputItem::Message {
            content: vec![ContentPart::OutputText { text: text.into() }],
        }
    }

    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        OutputItem::FunctionCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A successful response from the supervisor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupervisorResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl SupervisorResponse {
    pub fn new(output: Vec<OutputItem>) -> Self {
        Self { output }
    }

    /// All function calls, in the order received.
    pub fn function_calls(&self) -> Vec<ToolCallRequest> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => Some(ToolCallRequest {
                    call_id: call_id.clone(),
                    name: name.clone(),
                    arguments: arguments.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// The final answer: text parts of a message joined with `""`,
    /// messages joined with `"\n"`.
    pub fn final_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(
                    content
                        .iter()
                        .filter_map(|part| match part {
                            ContentPart::OutputText { text } => Some(text.as_str()),
                            ContentPart::Other => None,
                        })
                        .collect::<String>(),
                ),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The core supervisor trait.
///
/// One call is one network round-trip. Implementations must not retry and
/// must ask the remote model for sequential (non-parallel) tool calls.
#[async_trait]
pub trait SupervisorClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai-responses").
    fn name(&self) -> &str;

    /// Send the accumulated request and get the next response.
    async fn send(
        &self,
        request: &SupervisorRequest,
    ) -> std::result::Result<SupervisorResponse, SupervisorError>;
}
