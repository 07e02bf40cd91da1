//! Mocks shared by the router tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use avatarline_config::AppConfig;
use avatarline_core::avatar::{AvatarDescriptor, AvatarList, AvatarToken, AvatarVendor};
use avatarline_core::error::{AvatarError, SupervisorError};
use avatarline_core::supervisor::{
    OutputItem, SupervisorClient, SupervisorRequest, SupervisorResponse,
};
use avatarline_tools::StaticKnowledgeBase;

use crate::{GatewayState, SharedState};

/// Replays scripted supervisor results in order.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<SupervisorResponse, SupervisorError>>>,
}

#[async_trait::async_trait]
impl SupervisorClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, _request: &SupervisorRequest) -> Result<SupervisorResponse, SupervisorError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SupervisorError::Network("script exhausted".into())))
    }
}

/// Avatar vendor that either succeeds with fixed data or fails with one error.
#[derive(Default)]
pub struct MockVendor {
    failure: Option<AvatarError>,
}

impl MockVendor {
    pub fn failing(err: AvatarError) -> Self {
        Self { failure: Some(err) }
    }

    fn check(&self) -> Result<(), AvatarError> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait::async_trait]
impl AvatarVendor for MockVendor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_token(&self) -> Result<AvatarToken, AvatarError> {
        self.check()?;
        Ok(AvatarToken {
            token: "tok_test".into(),
        })
    }

    async fn list_avatars(&self) -> Result<AvatarList, AvatarError> {
        self.check()?;
        let mut extra = serde_json::Map::new();
        extra.insert("is_public".into(), serde_json::Value::Bool(true));
        let mut list = AvatarList::new(vec![AvatarDescriptor {
            avatar_id: "Anna_public_3".into(),
            pose_name: Some("Anna in Brown".into()),
            normal_preview: None,
            extra,
        }]);
        list.envelope.insert("code".into(), 100.into());
        list.envelope.insert("message".into(), "Success".into());
        Ok(list)
    }
}

pub fn text_response(text: &str) -> SupervisorResponse {
    SupervisorResponse::new(vec![OutputItem::text(text)])
}

pub fn call_response(call_id: &str, name: &str, args: &str) -> SupervisorResponse {
    SupervisorResponse::new(vec![OutputItem::function_call(call_id, name, args)])
}

pub fn test_state(
    script: Vec<Result<SupervisorResponse, SupervisorError>>,
    vendor: MockVendor,
) -> SharedState {
    let client = Arc::new(ScriptedClient {
        script: Mutex::new(script.into()),
    });
    Arc::new(GatewayState::new(
        AppConfig::default(),
        client,
        Arc::new(vendor),
        Arc::new(StaticKnowledgeBase::builtin()),
    ))
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
