//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: decision engine model identifiers
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe truncation helpers

pub mod error;
pub mod model;
pub mod string;
