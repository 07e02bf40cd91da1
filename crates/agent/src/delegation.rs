//! The supervisor delegation loop.
//!
//! One invocation drives a [`SupervisorClient`] and a [`ToolExecutor`] until
//! the supervisor answers without tool calls:
//!
//! 1. **Build** the request: system instructions + conversation context
//! 2. **Send** it (one round-trip)
//! 3. **If tool calls**: execute each in order, append call + output, resend
//! 4. **If no tool calls**: join the message text and return it
//!
//! Any send failure, malformed tool arguments, or running past `max_rounds`
//! ends the loop in failure. Nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use avatarline_config::AppConfig;
use avatarline_core::error::{DelegationError, ToolError};
use avatarline_core::event::{DomainEvent, EventBus};
use avatarline_core::item::{ConversationItem, messages_only};
use avatarline_core::supervisor::{
    SupervisorClient, SupervisorRequest, ToolCallRequest, ToolCallResult,
};
use avatarline_tools::{ToolExecutor, decode_arguments};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::prompts;

/// Synchronous progress callback: a title and optional JSON payload.
///
/// Called twice per executed tool, with the decoded arguments and then the
/// result. It cannot influence the loop.
pub type Observer<'a> = dyn Fn(&str, Option<&Value>) + Send + Sync + 'a;

pub const DEFAULT_MAX_ROUNDS: u32 = 8;

/// A completed delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationOutcome {
    /// The supervisor's final answer, to be relayed verbatim
    pub text: String,
    /// Round-trips made to the supervisor
    pub rounds: u32,
    /// Tool calls executed along the way
    pub tool_calls: usize,
}

#[derive(Debug, Default)]
struct Progress {
    rounds: u32,
    tool_calls: usize,
}

pub struct DelegationLoop {
    client: Arc<dyn SupervisorClient>,
    executor: ToolExecutor,
    model: String,
    instructions: String,
    max_rounds: u32,
    event_bus: Arc<EventBus>,
}

impl DelegationLoop {
    pub fn new(
        client: Arc<dyn SupervisorClient>,
        executor: ToolExecutor,
        model: impl Into<String>,
        instructions: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            client,
            executor,
            model: model.into(),
            instructions: instructions.into(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            event_bus,
        }
    }

    /// Model, round bound, and instructions taken from config.
    pub fn from_config(
        config: &AppConfig,
        client: Arc<dyn SupervisorClient>,
        executor: ToolExecutor,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self::new(
            client,
            executor,
            config.supervisor.model.clone(),
            prompts::supervisor_instructions(&config.front),
            event_bus,
        )
        .with_max_rounds(config.supervisor.max_rounds)
    }

    /// Set the maximum number of supervisor round-trips per delegation.
    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// The user block: message-only history as pretty JSON, then the
    /// extracted context.
    pub fn build_context(history: &[ConversationItem], relevant_context: &str) -> String {
        let messages = messages_only(history);
        let history_json =
            serde_json::to_string_pretty(&messages).unwrap_or_else(|_| "[]".to_string());
        format!(
            "==== Conversation History ====\n{history_json}\n\n==== Relevant Context From Last User Message ===\n{relevant_context}"
        )
    }

    /// Run one delegation to completion.
    pub async fn run(
        &self,
        history: &[ConversationItem],
        relevant_context: &str,
        observer: Option<&Observer<'_>>,
    ) -> Result<DelegationOutcome, DelegationError> {
        let history_messages = history.iter().filter(|i| i.is_message()).count();
        info!(
            history_messages,
            context_chars = relevant_context.len(),
            "Delegating to supervisor"
        );
        self.event_bus.publish(DomainEvent::DelegationStarted {
            relevant_context: relevant_context.to_string(),
            history_messages,
            timestamp: chrono::Utc::now(),
        });

        let request = SupervisorRequest::new(
            self.model.clone(),
            self.instructions.clone(),
            Self::build_context(history, relevant_context),
            self.executor.definitions(),
        );

        let mut progress = Progress::default();
        match self.drive(request, &mut progress, observer).await {
            Ok(text) => {
                info!(
                    rounds = progress.rounds,
                    tool_calls = progress.tool_calls,
                    "Supervisor answered"
                );
                self.event_bus.publish(DomainEvent::DelegationCompleted {
                    rounds: progress.rounds,
                    answer_chars: text.len(),
                    timestamp: chrono::Utc::now(),
                });
                Ok(DelegationOutcome {
                    text,
                    rounds: progress.rounds,
                    tool_calls: progress.tool_calls,
                })
            }
            Err(e) => {
                warn!(rounds = progress.rounds, error = %e, "Delegation failed");
                self.event_bus.publish(DomainEvent::DelegationFailed {
                    rounds: progress.rounds,
                    error_message: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        mut request: SupervisorRequest,
        progress: &mut Progress,
        observer: Option<&Observer<'_>>,
    ) -> Result<String, DelegationError> {
        loop {
            progress.rounds += 1;
            let response = self.client.send(&request).await?;
            let calls = response.function_calls();

            debug!(
                round = progress.rounds,
                tool_calls = calls.len(),
                "Supervisor round complete"
            );
            self.event_bus.publish(DomainEvent::SupervisorResponded {
                round: progress.rounds,
                tool_calls: calls.len(),
                timestamp: chrono::Utc::now(),
            });

            if calls.is_empty() {
                return Ok(response.final_text());
            }

            if progress.rounds >= self.max_rounds {
                return Err(DelegationError::RoundLimitExceeded {
                    rounds: progress.rounds,
                });
            }

            for call in &calls {
                let result = self.resolve(call, observer)?;
                request.push_exchange(call, &result);
                progress.tool_calls += 1;
            }
        }
    }

    fn resolve(
        &self,
        call: &ToolCallRequest,
        observer: Option<&Observer<'_>>,
    ) -> Result<ToolCallResult, ToolError> {
        let arguments = decode_arguments(&call.name, &call.arguments)?;

        let start = Instant::now();
        let output = self.executor.execute_decoded(&call.name, &arguments)?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if let Some(observe) = observer {
            observe(
                &format!("[supervisorAgent] function call: {}", call.name),
                Some(&arguments),
            );
            observe(
                &format!("[supervisorAgent] function call result: {}", call.name),
                Some(&output),
            );
        }

        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: call.name.clone(),
            call_id: call.call_id.clone(),
            duration_ms,
            timestamp: chrono::Utc::now(),
        });

        Ok(ToolCallResult::new(call, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedSupervisor, call_response, delegation_loop, text_response};
    use avatarline_core::error::SupervisorError;
    use avatarline_core::item::Role;
    use avatarline_core::supervisor::{InputItem, OutputItem, SupervisorResponse};
    use serde_json::json;
    use std::sync::Mutex;

    fn history() -> Vec<ConversationItem> {
        vec![
            ConversationItem::assistant("Hi, I'm Mario from Cocoa AI. How can I help you with your AI needs today?"),
            ConversationItem::user("What AI solutions do you offer?"),
            ConversationItem::function_call("fc_1", "getNextResponseFromSupervisor", "{}"),
        ]
    }

    fn user_block(input: &[InputItem]) -> String {
        match &input[1] {
            InputItem::Message { role: Role::User, content } => content.clone(),
            other => panic!("expected user block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn answer_without_tools_takes_one_round() {
        let client = Arc::new(ScriptedSupervisor::new(vec![Ok(text_response("We offer several solutions."))]));
        let delegation = delegation_loop(client.clone());

        let outcome = delegation.run(&history(), "Wants solutions", None).await.unwrap();
        assert_eq!(outcome.text, "We offer several solutions.");
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.tool_calls, 0);
        assert_eq!(client.call_count(), 1);

        let sent = client.requests();
        assert_eq!(sent[0].len(), 2);
        assert!(matches!(&sent[0][0], InputItem::Message { role: Role::System, .. }));
    }

    #[tokio::test]
    async fn context_block_holds_messages_only() {
        let client = Arc::new(ScriptedSupervisor::new(vec![Ok(text_response("ok"))]));
        delegation_loop(client.clone())
            .run(&history(), "Wants solutions", None)
            .await
            .unwrap();

        let block = user_block(&client.requests()[0]);
        assert!(block.starts_with("==== Conversation History ====\n["));
        assert!(block.ends_with(
            "\n\n==== Relevant Context From Last User Message ===\nWants solutions"
        ));
        assert!(block.contains("What AI solutions do you offer?"));
        assert!(!block.contains("getNextResponseFromSupervisor"));

        let json_part = block
            .trim_start_matches("==== Conversation History ====\n")
            .split("\n\n==== Relevant Context")
            .next()
            .unwrap();
        let items: Vec<serde_json::Value> = serde_json::from_str(json_part).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i["type"] == "message"));
    }

    #[tokio::test]
    async fn empty_context_still_renders_block() {
        let block = DelegationLoop::build_context(&[], "");
        assert_eq!(
            block,
            "==== Conversation History ====\n[]\n\n==== Relevant Context From Last User Message ===\n"
        );
    }

    #[tokio::test]
    async fn tool_round_appends_call_and_output() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![("call_a", "lookupAISolutions", r#"{"topic":"customer service"}"#)])),
            Ok(text_response("Chatbots cut response times [Conversational AI Solutions](ID-010).")),
        ]));
        let outcome = delegation_loop(client.clone())
            .run(&history(), "customer service", None)
            .await
            .unwrap();
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.tool_calls, 1);

        let second = &client.requests()[1];
        assert_eq!(second.len(), 4);
        match (&second[2], &second[3]) {
            (
                InputItem::FunctionCall { call_id, name, arguments },
                InputItem::FunctionCallOutput { call_id: out_id, output },
            ) => {
                assert_eq!(call_id, "call_a");
                assert_eq!(name, "lookupAISolutions");
                assert_eq!(arguments, r#"{"topic":"customer service"}"#);
                assert_eq!(out_id, "call_a");
                let records: Vec<serde_json::Value> = serde_json::from_str(output).unwrap();
                assert_eq!(records[0]["id"], "ID-010");
            }
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[tokio::test]
    async fn n_calls_append_two_n_items_in_order() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![
                ("c1", "lookupAISolutions", r#"{"topic":"automation"}"#),
                ("c2", "getBusinessRequirements", r#"{"business_context":"retail"}"#),
                ("c3", "findImplementationPath", r#"{"solution_type":"analytics"}"#),
            ])),
            Ok(text_response("done")),
        ]));
        delegation_loop(client.clone()).run(&[], "", None).await.unwrap();

        let second = &client.requests()[1];
        assert_eq!(second.len(), 2 + 6);
        let ids: Vec<&str> = second[2..]
            .iter()
            .map(|item| match item {
                InputItem::FunctionCall { call_id, .. } => call_id.as_str(),
                InputItem::FunctionCallOutput { call_id, .. } => call_id.as_str(),
                InputItem::Message { .. } => panic!("no messages after the user block"),
            })
            .collect();
        assert_eq!(ids, vec!["c1", "c1", "c2", "c2", "c3", "c3"]);
    }

    #[tokio::test]
    async fn observer_sees_args_then_result() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![("c1", "findImplementationPath", r#"{"solution_type":"process"}"#)])),
            Ok(text_response("Ten to sixteen weeks.")),
        ]));
        let seen: Mutex<Vec<(String, Option<serde_json::Value>)>> = Mutex::new(Vec::new());
        let observer = |title: &str, data: Option<&serde_json::Value>| {
            seen.lock().unwrap().push((title.to_string(), data.cloned()));
        };

        delegation_loop(client).run(&[], "timeline", Some(&observer)).await.unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "[supervisorAgent] function call: findImplementationPath");
        assert_eq!(seen[0].1, Some(json!({"solution_type": "process"})));
        assert_eq!(seen[1].0, "[supervisorAgent] function call result: findImplementationPath");
        assert_eq!(seen[1].1.as_ref().unwrap()["timeline"], "10-16 weeks");
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let client = Arc::new(ScriptedSupervisor::new(vec![Err(SupervisorError::ApiError {
            status_code: 500,
            message: "upstream down".into(),
        })]));
        let err = delegation_loop(client.clone()).run(&[], "", None).await.unwrap_err();
        assert!(matches!(err, DelegationError::Transport(_)));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_after_tool_round_stops_loop() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![("c1", "lookupAISolutions", "{}")])),
            Err(SupervisorError::Network("connection reset".into())),
        ]));
        let err = delegation_loop(client.clone()).run(&[], "", None).await.unwrap_err();
        assert!(matches!(err, DelegationError::Transport(SupervisorError::Network(_))));
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn round_limit_ends_runaway_loop() {
        let runaway: Vec<_> = (0..5)
            .map(|i| {
                let id = format!("c{i}");
                Ok(SupervisorResponse::new(vec![OutputItem::function_call(id, "lookupAISolutions", "{}")]))
            })
            .collect();
        let client = Arc::new(ScriptedSupervisor::new(runaway));
        let delegation = delegation_loop(client.clone()).with_max_rounds(3);

        let err = delegation.run(&[], "", None).await.unwrap_err();
        assert!(matches!(err, DelegationError::RoundLimitExceeded { rounds: 3 }));
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn malformed_arguments_fail_the_turn() {
        let client = Arc::new(ScriptedSupervisor::new(vec![Ok(call_response(vec![(
            "c1",
            "lookupAISolutions",
            "{\"topic\": ",
        )]))]));
        let err = delegation_loop(client.clone()).run(&[], "", None).await.unwrap_err();
        assert!(matches!(err, DelegationError::MalformedToolArguments(_)));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_gets_sentinel_output() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![("c1", "scheduleMeeting", r#"{"when":"tomorrow"}"#)])),
            Ok(text_response("Booked.")),
        ]));
        let outcome = delegation_loop(client.clone()).run(&[], "", None).await.unwrap();
        assert_eq!(outcome.text, "Booked.");
        match &client.requests()[1][3] {
            InputItem::FunctionCallOutput { output, .. } => assert_eq!(output, r#"{"result":true}"#),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_output_is_empty_answer() {
        let client = Arc::new(ScriptedSupervisor::new(vec![Ok(SupervisorResponse::default())]));
        let outcome = delegation_loop(client).run(&[], "", None).await.unwrap();
        assert_eq!(outcome.text, "");
    }

    #[tokio::test]
    async fn events_bracket_the_delegation() {
        let client = Arc::new(ScriptedSupervisor::new(vec![
            Ok(call_response(vec![("c1", "getBusinessRequirements", "{}")])),
            Ok(text_response("answer")),
        ]));
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let delegation = DelegationLoop::new(
            client,
            crate::test_helpers::executor(),
            "gpt-4.1",
            "instructions",
            bus,
        );
        delegation.run(&[], "", None).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event.as_ref() {
                DomainEvent::DelegationStarted { .. } => "started",
                DomainEvent::SupervisorResponded { .. } => "responded",
                DomainEvent::ToolExecuted { .. } => "tool",
                DomainEvent::DelegationCompleted { .. } => "completed",
                DomainEvent::DelegationFailed { .. } => "failed",
            });
        }
        assert_eq!(kinds, vec!["started", "responded", "tool", "responded", "completed"]);
    }

    #[test]
    fn zero_rounds_clamped_to_one() {
        let client = Arc::new(ScriptedSupervisor::new(vec![]));
        assert_eq!(delegation_loop(client).with_max_rounds(0).max_rounds(), 1);
    }
}
