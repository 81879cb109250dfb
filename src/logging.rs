//! Structured logging setup
//!
//! JSON or pretty output, level from CLI flags falling back to the
//! `RUST_LOG` environment filter, and span helpers that tag log lines with
//! the project or stage being worked on.

use tracing::{info_span, Span};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

use crate::types::Result;

/// Create a project context span for scaffold operations
pub fn project_span(project_name: &str) -> Span {
    info_span!("project", project_name = project_name)
}

/// Create a stage context span for test-execution operations
pub fn stage_span(stage: &str) -> Span {
    info_span!("stage", stage = stage)
}

/// Log level enum values as strings for configuration
pub mod level {
    pub const TRACE: &str = "trace";
    pub const DEBUG: &str = "debug";
    pub const INFO: &str = "info";
    pub const WARN: &str = "warn";
    pub const ERROR: &str = "error";
}

/// Log format enum values as strings for configuration
pub mod format {
    pub const JSON: &str = "json";
    pub const PRETTY: &str = "pretty";
}

/// Initialize the global tracing subscriber
///
/// CLI overrides win; otherwise `RUST_LOG` applies, and `info`/`pretty` are
/// the defaults.
pub fn init(log_level_override: Option<&str>, log_format_override: Option<&str>) -> Result<()> {
    let log_level = log_level_override.unwrap_or(level::INFO);
    let log_format = log_format_override.unwrap_or(format::PRETTY);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    match log_format {
        format::JSON => {
            tracing_subscriber::fmt()
                .json()
                .with_timer(timer)
                .with_env_filter(env_filter)
                .with_target(false)
                .with_current_span(true)
                .with_span_list(false)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_timer(timer)
                .with_env_filter(env_filter)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_span_creation() {
        let span = project_span("demo");
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), "project");
        }
        let _guard = span.enter();
    }

    #[test]
    fn test_stage_span_creation() {
        let span = stage_span("unit");
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), "stage");
        }
        let _guard = span.enter();
    }

    #[test]
    fn test_level_constants() {
        assert_eq!(level::TRACE, "trace");
        assert_eq!(level::DEBUG, "debug");
        assert_eq!(level::INFO, "info");
        assert_eq!(level::WARN, "warn");
        assert_eq!(level::ERROR, "error");
    }

    #[test]
    fn test_format_constants() {
        assert_eq!(format::JSON, "json");
        assert_eq!(format::PRETTY, "pretty");
    }
}
