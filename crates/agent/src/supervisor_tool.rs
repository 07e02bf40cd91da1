//! `getNextResponseFromSupervisor`, the single tool the front agent may call.
//!
//! Every delegation failure collapses to `{"error": "Something went wrong."}`
//! here; the detailed cause is only logged.

use std::sync::Arc;

use avatarline_core::item::ConversationItem;
use avatarline_core::supervisor::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::delegation::{DelegationLoop, Observer};

pub const TOOL_NAME: &str = "getNextResponseFromSupervisor";
pub const GENERIC_ERROR: &str = "Something went wrong.";

/// Schema advertised to realtime front-agent sessions.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.into(),
        description: "Determines the next response whenever the agent faces a non-trivial decision, produced by a highly intelligent supervisor agent. Returns a message describing what to do next.".into(),
        parameters: json!({
            "type": "object",
            "properties": {
                "relevantContextFromLastUserMessage": {
                    "type": "string",
                    "description": "Key information from the user described in their most recent message. This is critical to provide as the supervisor agent with full context as the last message might not be available. Okay to omit if the user message didn't add any new information.",
                }
            },
            "required": ["relevantContextFromLastUserMessage"],
            "additionalProperties": false,
        }),
        strict: true,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorToolInput {
    #[serde(default)]
    pub relevant_context_from_last_user_message: String,
}

impl SupervisorToolInput {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            relevant_context_from_last_user_message: context.into(),
        }
    }
}

/// What the front agent gets back: an answer to read verbatim, or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupervisorToolOutput {
    Answer {
        #[serde(rename = "nextResponse")]
        next_response: String,
    },
    Failure {
        error: String,
    },
}

impl SupervisorToolOutput {
    pub fn failure() -> Self {
        Self::Failure {
            error: GENERIC_ERROR.into(),
        }
    }

    pub fn next_response(&self) -> Option<&str> {
        match self {
            Self::Answer { next_response } => Some(next_response),
            Self::Failure { .. } => None,
        }
    }
}

/// Executes the front-agent tool by running a delegation.
#[derive(Clone)]
pub struct SupervisorHandoff {
    delegation: Arc<DelegationLoop>,
}

impl SupervisorHandoff {
    pub fn new(delegation: Arc<DelegationLoop>) -> Self {
        Self { delegation }
    }

    pub async fn invoke(
        &self,
        history: &[ConversationItem],
        input: &SupervisorToolInput,
        observer: Option<&Observer<'_>>,
    ) -> SupervisorToolOutput {
        match self
            .delegation
            .run(history, &input.relevant_context_from_last_user_message, observer)
            .await
        {
            Ok(outcome) => SupervisorToolOutput::Answer {
                next_response: outcome.text,
            },
            Err(e) => {
                error!(error = %e, "Supervisor delegation failed");
                SupervisorToolOutput::failure()
            }
        }
    }
}
