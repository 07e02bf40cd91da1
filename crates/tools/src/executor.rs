//! Supervisor tool execution.
//!
//! Tool names arriving from the model are parsed into a closed set of
//! [`SupervisorTool`] variants with typed arguments. Names outside the set
//! become [`SupervisorTool::Unknown`] and answer with a `{"result": true}`
//! sentinel so the delegation loop never stalls on them.

use std::sync::Arc;

use avatarline_core::error::ToolError;
use avatarline_core::knowledge::KnowledgeProvider;
use avatarline_core::supervisor::{ToolCallRequest, ToolDefinition};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::catalog::{self, FIND_IMPLEMENTATION_PATH, GET_BUSINESS_REQUIREMENTS, LOOKUP_AI_SOLUTIONS};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupAiSolutionsArgs {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BusinessRequirementsArgs {
    #[serde(default)]
    pub business_context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImplementationPathArgs {
    #[serde(default)]
    pub solution_type: Option<String>,
}

/// A tool call the supervisor may make, with decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorTool {
    LookupAiSolutions(LookupAiSolutionsArgs),
    GetBusinessRequirements(BusinessRequirementsArgs),
    FindImplementationPath(ImplementationPathArgs),
    Unknown(String),
}

impl SupervisorTool {
    /// Parse a tool name and its decoded argument object.
    ///
    /// Missing fields default to `None`; a field of the wrong type is an error.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self, ToolError> {
        Ok(match name {
            LOOKUP_AI_SOLUTIONS => Self::LookupAiSolutions(typed(name, arguments)?),
            GET_BUSINESS_REQUIREMENTS => Self::GetBusinessRequirements(typed(name, arguments)?),
            FIND_IMPLEMENTATION_PATH => Self::FindImplementationPath(typed(name, arguments)?),
            other => Self::Unknown(other.to_string()),
        })
    }
}

fn typed<T: DeserializeOwned + Default>(name: &str, arguments: &Value) -> Result<T, ToolError> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    T::deserialize(arguments).map_err(|e| ToolError::InvalidArguments {
        tool_name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a raw argument payload. An empty payload decodes as `{}`.
pub fn decode_arguments(name: &str, raw: &str) -> Result<Value, ToolError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
        tool_name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves supervisor tool calls against a knowledge provider.
#[derive(Clone)]
pub struct ToolExecutor {
    knowledge: Arc<dyn KnowledgeProvider>,
}

impl ToolExecutor {
    pub fn new(knowledge: Arc<dyn KnowledgeProvider>) -> Self {
        Self { knowledge }
    }

    /// Tool definitions to advertise to the supervisor.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        catalog::supervisor_tools()
    }

    /// Execute one call. Lookups themselves cannot fail; only argument
    /// decoding can.
    pub fn execute(&self, call: &ToolCallRequest) -> Result<Value, ToolError> {
        let arguments = decode_arguments(&call.name, &call.arguments)?;
        self.execute_decoded(&call.name, &arguments)
    }

    /// Execute with arguments the caller already decoded.
    pub fn execute_decoded(&self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let tool = SupervisorTool::parse(name, arguments)?;
        Ok(self.run(&tool))
    }

    pub fn run(&self, tool: &SupervisorTool) -> Value {
        match tool {
            SupervisorTool::LookupAiSolutions(args) => {
                json!(self.knowledge.find_solutions(args.topic.as_deref()))
            }
            SupervisorTool::GetBusinessRequirements(args) => {
                debug!(business_context = ?args.business_context, "Requirements profile requested");
                json!(self.knowledge.requirements_profile())
            }
            SupervisorTool::FindImplementationPath(args) => {
                json!(self.knowledge.find_implementation_path(args.solution_type.as_deref()))
            }
            SupervisorTool::Unknown(name) => {
                debug!(tool = %name, "Unknown supervisor tool, answering with sentinel");
                json!({ "result": true })
            }
        }
    }
}
