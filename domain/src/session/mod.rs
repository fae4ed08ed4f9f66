//! Conversation domain.
//!
//! - [`entities::ConversationHistory`]: the append-only transcript sent to
//!   the decision engine every turn
//! - [`response::LlmResponse`]: what the decision engine sends back

pub mod entities;
pub mod response;
