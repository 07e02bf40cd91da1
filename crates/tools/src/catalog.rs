//! Tool schema catalog sent to the supervisor model.

use avatarline_core::supervisor::ToolDefinition;
use serde_json::json;

pub const LOOKUP_AI_SOLUTIONS: &str = "lookupAISolutions";
pub const GET_BUSINESS_REQUIREMENTS: &str = "getBusinessRequirements";
pub const FIND_IMPLEMENTATION_PATH: &str = "findImplementationPath";

/// Strict object schema with a single required string field.
fn single_string_schema(field: &str, description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            field: {
                "type": "string",
                "description": description,
            }
        },
        "required": [field],
        "additionalProperties": false,
    })
}

/// The three supervisor-only tools.
pub fn supervisor_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: LOOKUP_AI_SOLUTIONS.into(),
            description: "Tool to look up information about Cocoa AI's solutions, services, and implementation strategies by topic or keyword.".into(),
            parameters: single_string_schema(
                "topic",
                "The AI solution topic, use case, or industry to search for (e.g., 'customer service', 'data analysis', 'process automation').",
            ),
            strict: true,
        },
        ToolDefinition {
            name: GET_BUSINESS_REQUIREMENTS.into(),
            description: "Tool to gather and analyze business requirements for AI implementation. This helps understand the client's current state and challenges.".into(),
            parameters: single_string_schema(
                "business_context",
                "Description of the business domain, industry, or specific challenges. MUST be provided by the user.",
            ),
            strict: true,
        },
        ToolDefinition {
            name: FIND_IMPLEMENTATION_PATH.into(),
            description: "Tool to determine the recommended implementation approach and timeline for AI solutions based on business needs.".into(),
            parameters: single_string_schema(
                "solution_type",
                "The type of AI solution needed (e.g., 'conversational AI', 'automation', 'analytics').",
            ),
            strict: true,
        },
    ]
}
