//! Supervisor tools for Avatarline.
//!
//! The supervisor model can call three knowledge-base lookups. This crate
//! holds their schemas, the executor that dispatches calls, and the static
//! knowledge base behind them.

pub mod catalog;
pub mod executor;
pub mod fixtures;
pub mod knowledge;

pub use catalog::{
    FIND_IMPLEMENTATION_PATH, GET_BUSINESS_REQUIREMENTS, LOOKUP_AI_SOLUTIONS, supervisor_tools,
};
pub use executor::{SupervisorTool, ToolExecutor, decode_arguments};
pub use knowledge::{FixtureSet, StaticKnowledgeBase};
