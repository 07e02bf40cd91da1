//! Error types for the Avatarline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Avatarline operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Supervisor endpoint errors ---
    #[error("Supervisor error: {0}")]
    Supervisor(#[from] SupervisorError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Delegation loop errors ---
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),

    // --- Avatar vendor errors ---
    #[error("Avatar vendor error: {0}")]
    Avatar(#[from] AvatarError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of a single round-trip to the completion endpoint.
///
/// Every variant is a transport failure from the loop's point of view:
/// none of them is retried.
#[derive(Debug, Clone, Error)]
pub enum SupervisorError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Supervisor not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },
}

/// Why a delegation loop ended in the FAILED state.
#[derive(Debug, Clone, Error)]
pub enum DelegationError {
    #[error("transport failure: {0}")]
    Transport(#[from] SupervisorError),

    #[error("malformed tool arguments: {0}")]
    MalformedToolArguments(#[from] ToolError),

    #[error("supervisor still requested tools after {rounds} rounds")]
    RoundLimitExceeded { rounds: u32 },
}

#[derive(Debug, Clone, Error)]
pub enum AvatarError {
    #[error("HeyGen API key not configured")]
    NotConfigured,

    #[error("Vendor returned status {status}: {message}")]
    Vendor { status: u16, message: String },

    #[error("Invalid vendor response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_error_displays_correctly() {
        let err = Error::Supervisor(SupervisorError::ApiError {
            status_code: 502,
            message: "Bad gateway".into(),
        });
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn delegation_error_wraps_transport() {
        let err: DelegationError = SupervisorError::Network("connection refused".into()).into();
        assert!(matches!(err, DelegationError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn round_limit_mentions_rounds() {
        let err = DelegationError::RoundLimitExceeded { rounds: 8 };
        assert!(err.to_string().contains('8'));
    }
}
