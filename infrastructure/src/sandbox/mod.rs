//! Sandbox containment
//!
//! Every path a tool touches is resolved through [`PathGuard`] against the
//! single [`SandboxRoot`] before any I/O happens.
//!
//! ```text
//! "src/../main.py" ──join──▶ <root>/src/../main.py
//!                  ──normalize──▶ <root>/main.py
//!                  ──canonicalize existing prefix──▶ /real/root/main.py
//!                  ──starts_with(root)?──▶ Ok | ContainmentError
//! ```

mod guard;
mod root;

pub use guard::{ContainmentError, PathGuard};
pub use root::SandboxRoot;
