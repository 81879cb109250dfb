//! Scaffold orchestration
//!
//! Turns three selections (language, test framework, project name) into a
//! materialized project directory and a persisted codelab config. The
//! checkpoints, in order: selections, template clone, init-command
//! resolution, init-command execution, config write. Clone and resolution
//! failures abort before anything is persisted; a failed init command is a
//! warning by policy (opt into strictness with `fail_on_init_error`).

pub mod fetch;
pub mod prompt;

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog::{self, FrameworkProfile, LanguageProfile};
use crate::execution::{templates, ShellExecutor};
use crate::state::{CodelabConfig, ConfigStore};
use crate::types::{Error, Result, ScaffoldError};

use fetch::TemplateFetcher;
use prompt::SelectionPrompt;

/// The three scaffold inputs
#[derive(Debug, Clone)]
pub struct Selection {
    pub language: &'static LanguageProfile,
    pub framework: &'static FrameworkProfile,
    pub name: String,
}

impl Selection {
    /// Collect the selections interactively
    pub fn from_prompt(prompt: &dyn SelectionPrompt) -> Result<Self> {
        let language = prompt.select_language(catalog::languages())?;
        let framework = prompt.select_framework(language)?;
        let name = prompt.project_name()?;
        Ok(Self {
            language,
            framework,
            name,
        })
    }

    /// Build the selections from names; a missing framework picks the
    /// language's default.
    pub fn from_names(language: &str, framework: Option<&str>, name: &str) -> Result<Self> {
        let language = catalog::lookup(language)?;
        let framework = match framework {
            Some(framework) => language.framework(framework)?,
            None => language.default_framework(),
        };
        Ok(Self {
            language,
            framework,
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Template identifier handed to the fetcher
    pub template: String,
    /// Directory the project is created under
    pub base_dir: PathBuf,
    /// Treat a non-zero init exit as fatal instead of a warning
    pub fail_on_init_error: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            template: fetch::DEFAULT_TEMPLATE.to_string(),
            base_dir: PathBuf::from("/"),
            fail_on_init_error: false,
        }
    }
}

pub struct Scaffolder<F: TemplateFetcher> {
    fetcher: F,
    store: ConfigStore,
    executor: ShellExecutor,
    options: ScaffoldOptions,
}

impl<F: TemplateFetcher> Scaffolder<F> {
    pub fn new(
        fetcher: F,
        store: ConfigStore,
        executor: ShellExecutor,
        options: ScaffoldOptions,
    ) -> Self {
        Self {
            fetcher,
            store,
            executor,
            options,
        }
    }

    /// Run the full scaffold and return the created project path
    pub async fn run(&self, selection: &Selection) -> Result<PathBuf> {
        if selection.name.is_empty() {
            return Err(Error::Validation {
                field: "name".to_string(),
                message: "project name cannot be empty".to_string(),
            });
        }

        // Clone and resolution are synchronous; the span guard is dropped
        // before the init command is awaited.
        let (dest, init_command) = {
            let _span = crate::logging::project_span(&selection.name).entered();
            info!(
                language = %selection.language.name,
                framework = %selection.framework.name,
                "Scaffolding new codelab"
            );

            let dest = self.options.base_dir.join(&selection.name);
            self.fetcher.fetch(&self.options.template, &dest)?;

            let bindings = HashMap::from([("name".to_string(), selection.name.clone())]);
            let init_command = templates::resolve(selection.language.init_command, &bindings)?;
            (dest, init_command)
        };

        info!(command = %init_command, "Running init command");
        let outcome = self.executor.run(&init_command).await?;
        if outcome.success() {
            info!(
                duration_ms = outcome.duration_ms,
                "Init command completed"
            );
        } else {
            warn!(
                exit_code = ?outcome.exit_code,
                stderr = %outcome.stderr,
                "Init command failed"
            );
            if self.options.fail_on_init_error {
                return Err(ScaffoldError::InitFailed {
                    command: init_command,
                    code: outcome.exit_code.unwrap_or(-1),
                }
                .into());
            }
            info!("Continuing scaffold despite init failure");
        }

        // The framework's raw template goes into the store; the `^` marker is
        // resolved only at stage-execution time.
        self.store
            .write(&CodelabConfig::new(selection.framework.command))?;

        info!(path = %dest.display(), "Codelab created");
        Ok(dest)
    }
}
