//! Persisted codelab configuration
//!
//! One JSON record at a well-known path is the durable handoff between the
//! scaffold flow and the stage executor:
//!
//! ```json
//! { "testing": { "command": "go test -run \"^\"" } }
//! ```
//!
//! The store owns the on-disk representation. Writes replace the record
//! wholesale and are atomic (temp file in the target directory, then rename),
//! so a concurrent reader sees either the old record or the new one, never a
//! torn one. Reads always hit the disk; nothing is cached across requests.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{Result, StoreError};

/// Default record location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "codelab.config.json";

/// The persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodelabConfig {
    pub testing: TestingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestingConfig {
    /// Test-invocation command template, stored verbatim with its `^` marker
    pub command: String,
}

impl CodelabConfig {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            testing: TestingConfig {
                command: command.into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replace the record wholesale
    pub fn write(&self, config: &CodelabConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).map_err(StoreError::Parse)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(StoreError::Io)?;
        tmp.write_all(json.as_bytes()).map_err(StoreError::Io)?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;

        info!(path = %self.path.display(), "Wrote codelab config");
        Ok(())
    }

    /// Read a fresh snapshot of the record
    pub fn read(&self) -> Result<CodelabConfig> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(StoreError::Io(e).into()),
        };

        let config: CodelabConfig =
            serde_json::from_str(&raw).map_err(StoreError::Parse)?;

        debug!(
            path = %self.path.display(),
            command = %config.testing.command,
            "Read codelab config"
        );
        Ok(config)
    }
}
