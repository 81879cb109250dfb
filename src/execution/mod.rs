//! Command resolution and subprocess execution
//!
//! `templates` turns command templates plus bindings into concrete shell
//! commands; `executor` runs them through `sh -c` and reports the outcome.

pub mod executor;
pub mod templates;

pub use executor::ShellExecutor;
