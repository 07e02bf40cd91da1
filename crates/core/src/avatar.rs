//! Avatar vendor trait: the streaming-avatar service the browser renders.
//!
//! The server only mints session tokens and lists avatars; everything that
//! happens after the browser holds a token is the vendor SDK's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AvatarError;

/// A short-lived token the browser uses to open a streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarToken {
    pub token: String,
}

/// One avatar the vendor offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    pub avatar_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_preview: Option<String>,

    /// Vendor fields we pass through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The vendor's avatar list response, envelope fields (`code`, `message`…)
/// included, so it can be relayed to the browser unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarList {
    #[serde(default)]
    pub data: Vec<AvatarDescriptor>,

    #[serde(flatten)]
    pub envelope: serde_json::Map<String, serde_json::Value>,
}

impl AvatarList {
    pub fn new(data: Vec<AvatarDescriptor>) -> Self {
        Self {
            data,
            envelope: serde_json::Map::new(),
        }
    }
}

#[async_trait]
pub trait AvatarVendor: Send + Sync {
    fn name(&self) -> &str;

    /// Mint a streaming session token.
    async fn create_token(&self) -> std::result::Result<AvatarToken, AvatarError>;

    /// List the avatars available to this account.
    async fn list_avatars(&self) -> std::result::Result<AvatarList, AvatarError>;
}
