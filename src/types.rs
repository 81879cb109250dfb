use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Template resolution error: {0}")]
    Template(#[from] TemplateError),

    #[error("Config store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scaffold error: {0}")]
    Scaffold(#[from] ScaffoldError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Catalog lookup errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown language: {name}")]
    UnknownLanguage { name: String },

    #[error("Unknown test framework '{framework}' for language '{language}'")]
    UnknownFramework { language: String, framework: String },
}

/// Template resolution errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unbound placeholder '${{{name}}}' in template: {template}")]
    UnboundPlaceholder { name: String, template: String },

    #[error("Unsafe value for placeholder '{placeholder}': {value}")]
    UnsafeValue { placeholder: String, value: String },
}

/// Config store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No codelab config found at {path}")]
    NotFound { path: String },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scaffolding errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Template clone failed for '{template}' into {dest}: {detail}")]
    CloneFailed {
        template: String,
        dest: String,
        detail: String,
    },

    #[error("Init command '{command}' exited with code {code}")]
    InitFailed { command: String, code: i32 },
}

/// Subprocess execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command '{command}' could not be started: {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' timed out after {timeout}s")]
    Timeout { command: String, timeout: u64 },
}

/// Type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a completed subprocess run
///
/// A non-zero exit code is data, not an error: only launch failures and
/// timeouts surface as `ExecutionError`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stdout: String, // Truncated to reasonable size
    pub stderr: String, // Truncated to reasonable size
    pub duration_ms: u64,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let catalog_error = CatalogError::UnknownLanguage {
            name: "Cobol".to_string(),
        };
        let main_error: Error = catalog_error.into();

        match main_error {
            Error::Catalog(CatalogError::UnknownLanguage { name }) => {
                assert_eq!(name, "Cobol");
            }
            _ => panic!("Error conversion failed"),
        }
    }

    #[test]
    fn test_command_outcome_success() {
        let outcome = CommandOutcome {
            command: "true".to_string(),
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 1,
        };
        assert!(outcome.success());

        let failed = CommandOutcome {
            exit_code: Some(1),
            ..outcome.clone()
        };
        assert!(!failed.success());

        let killed = CommandOutcome {
            exit_code: None,
            ..outcome
        };
        assert!(!killed.success());
    }

    #[test]
    fn test_unbound_placeholder_display() {
        let err = TemplateError::UnboundPlaceholder {
            name: "name".to_string(),
            template: "go mod init ${name}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("${name}"));
        assert!(msg.contains("go mod init"));
    }
}
