//! Remote service clients for Avatarline.
//!
//! [`ResponsesClient`] implements `avatarline_core::SupervisorClient` over the
//! OpenAI Responses API. [`HeyGenClient`] implements
//! `avatarline_core::AvatarVendor` for HeyGen streaming avatars.

pub mod heygen;
pub mod responses;

pub use heygen::HeyGenClient;
pub use responses::ResponsesClient;
