//! Output formatting for agent results

pub mod console;
pub mod formatter;
