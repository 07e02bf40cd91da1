//! # Avatarline Core
//!
//! Domain types, traits, and error definitions for the Avatarline runtime.
//! This crate has **zero framework dependencies**. It defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here: the supervisor completion
//! endpoint, the knowledge base, and the avatar vendor. Implementations live
//! in their respective crates. This enables:
//! - Swapping the static knowledge base for a real backing store
//! - Scripted supervisors in tests
//! - Clean dependency graph (all crates depend inward on core)

pub mod avatar;
pub mod error;
pub mod event;
pub mod item;
pub mod knowledge;
pub mod supervisor;

// Re-export key types at crate root for ergonomics
pub use avatar::{AvatarDescriptor, AvatarList, AvatarToken, AvatarVendor};
pub use error::{AvatarError, DelegationError, Error, Result, SupervisorError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use item::{ConversationItem, ItemKind, Role};
pub use knowledge::{ImplementationPath, KnowledgeProvider, RequirementsProfile, Solution};
pub use supervisor::{
    ContentPart, InputItem, OutputItem, SupervisorClient, SupervisorRequest, SupervisorResponse,
    ToolCallRequest, ToolCallResult, ToolDefinition,
};
