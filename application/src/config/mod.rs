//! Application-level configuration.
//!
//! - [`ExecutionParams`]: execution loop control (turn budget, tool concurrency)

pub mod execution_params;

pub use execution_params::ExecutionParams;
