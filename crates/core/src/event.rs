//! Domain event system: decoupled observation of delegation activity.
//!
//! Events are published when something interesting happens in a turn.
//! Other components (logs, the gateway, tests) can subscribe without
//! touching the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The front agent delegated a turn to the supervisor
    DelegationStarted {
        relevant_context: String,
        history_messages: usize,
        timestamp: DateTime<Utc>,
    },

    /// One round-trip to the supervisor finished
    SupervisorResponded {
        round: u32,
        tool_calls: usize,
        timestamp: DateTime<Utc>,
    },

    /// A supervisor tool was executed locally
    ToolExecuted {
        tool_name: String,
        call_id: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The loop produced a final answer
    DelegationCompleted {
        rounds: u32,
        answer_chars: usize,
        timestamp: DateTime<Utc>,
    },

    /// The loop ended in the FAILED state
    DelegationFailed {
        rounds: u32,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
