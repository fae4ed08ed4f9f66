//! Decision engine providers
//!
//! Each provider implements the [`LlmGateway`](workbench_application::LlmGateway)
//! port on top of a vendor API.

pub mod gemini;
