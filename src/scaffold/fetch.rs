//! Remote template materialization
//!
//! The clone mechanism is an external collaborator: given a template
//! identifier and a destination path, it either materializes a project
//! directory or fails. `GitFetcher` shells out to `git clone` in argument
//! form (no shell interpretation of the identifier or destination).

use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::types::{Result, ScaffoldError};

/// Starlight site template cloned for every new codelab
pub const DEFAULT_TEMPLATE: &str = "withastro/starlight";

pub trait TemplateFetcher {
    fn fetch(&self, template: &str, dest: &Path) -> Result<()>;
}

/// Fetches templates with a shallow `git clone`
pub struct GitFetcher;

impl GitFetcher {
    /// Expand a `owner/repo` shorthand to a clone URL; full URLs pass through
    fn clone_url(template: &str) -> String {
        if template.starts_with("http://")
            || template.starts_with("https://")
            || template.starts_with("git@")
        {
            template.to_string()
        } else {
            format!("https://github.com/{template}.git")
        }
    }
}

impl TemplateFetcher for GitFetcher {
    fn fetch(&self, template: &str, dest: &Path) -> Result<()> {
        let url = Self::clone_url(template);
        info!(template = %template, dest = %dest.display(), "Cloning project template");

        let clone_failed = |detail: String| ScaffoldError::CloneFailed {
            template: template.to_string(),
            dest: dest.display().to_string(),
            detail,
        };

        let output = Command::new("git")
            .args(["clone", "--depth", "1"])
            .arg(&url)
            .arg(dest)
            .output()
            .map_err(|e| clone_failed(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(clone_failed(stderr.trim().to_string()).into());
        }

        Ok(())
    }
}
