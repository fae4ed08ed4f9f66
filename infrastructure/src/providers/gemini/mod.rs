//! Google Gemini provider (`generateContent` REST API)
//!
//! The API is stateless: every call carries the system instruction, the
//! whole conversation and the function declarations.
//!
//! - [`gateway`]: HTTP client setup and session creation
//! - [`session`]: one request/response round trip per turn
//! - [`types`]: wire format and conversions to and from domain types

pub mod gateway;
pub mod session;
pub mod types;

pub use gateway::GeminiLlmGateway;
pub use session::GeminiSession;
