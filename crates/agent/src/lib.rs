//! The conversational core of Avatarline.
//!
//! A fast front agent talks to the user and delegates anything non-trivial
//! to a slower, tool-using supervisor:
//!
//! 1. **Classify** the utterance against the allow-list ([`FrontAgentPolicy`])
//! 2. **Answer directly** for greetings, chitchat, repeats, and context questions
//! 3. **Otherwise** speak one filler phrase and call `getNextResponseFromSupervisor`
//! 4. **Delegate** ([`DelegationLoop`]): supervisor round-trips and local tool
//!    calls until a final answer
//! 5. **Relay** the answer verbatim, or escalate on failure

pub mod citations;
pub mod delegation;
pub mod front;
pub mod policy;
pub mod prompts;
pub mod supervisor_tool;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use citations::Citation;
pub use delegation::{DEFAULT_MAX_ROUNDS, DelegationLoop, DelegationOutcome, Observer};
pub use front::{FillerRotation, FrontAgent};
pub use policy::{
    FrontAgentPolicy, Intent, PolicyState, PolicyViolation, TurnRecord, Utterance, UtteranceKind,
};
pub use supervisor_tool::{SupervisorHandoff, SupervisorToolInput, SupervisorToolOutput};
