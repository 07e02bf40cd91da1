//! Shared test helpers for delegation and front-agent tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use avatarline_core::error::SupervisorError;
use avatarline_core::event::EventBus;
use avatarline_core::supervisor::{
    InputItem, OutputItem, SupervisorClient, SupervisorRequest, SupervisorResponse,
};
use avatarline_tools::{StaticKnowledgeBase, ToolExecutor};

use crate::delegation::DelegationLoop;

/// A supervisor that replays scripted results and records every request.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedSupervisor {
    script: Mutex<VecDeque<Result<SupervisorResponse, SupervisorError>>>,
    requests: Mutex<Vec<Vec<InputItem>>>,
}

impl ScriptedSupervisor {
    pub fn new(script: Vec<Result<SupervisorResponse, SupervisorError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The `input` sequence of every request sent, in order.
    pub fn requests(&self) -> Vec<Vec<InputItem>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SupervisorClient for ScriptedSupervisor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, request: &SupervisorRequest) -> Result<SupervisorResponse, SupervisorError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.input());
        let call = requests.len();
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedSupervisor: no more responses (call #{call})"))
    }
}

pub fn text_response(text: &str) -> SupervisorResponse {
    SupervisorResponse::new(vec![OutputItem::text(text)])
}

/// A response holding only function calls: `(call_id, name, raw arguments)`.
pub fn call_response(calls: Vec<(&str, &str, &str)>) -> SupervisorResponse {
    SupervisorResponse::new(
        calls
            .into_iter()
            .map(|(id, name, args)| OutputItem::function_call(id, name, args))
            .collect(),
    )
}

pub fn executor() -> ToolExecutor {
    ToolExecutor::new(Arc::new(StaticKnowledgeBase::builtin()))
}

pub fn delegation_loop(client: Arc<ScriptedSupervisor>) -> DelegationLoop {
    DelegationLoop::new(
        client,
        executor(),
        "gpt-4.1",
        "You are the supervisor.",
        Arc::new(EventBus::default()),
    )
}
