//! Interactive selection prompt
//!
//! The prompt UI is an external collaborator: the orchestrator only needs
//! three opaque selections back. `TerminalPrompt` is the production
//! implementation; tests supply their own.

use std::io::{BufRead, Write};

use crate::catalog::{FrameworkProfile, LanguageProfile};
use crate::types::{Error, Result};

/// Default project name offered by the interactive prompt
pub const DEFAULT_PROJECT_NAME: &str = "my-feature";

/// Collects the three scaffold selections from the operator
pub trait SelectionPrompt {
    fn select_language(
        &self,
        languages: &'static [LanguageProfile],
    ) -> Result<&'static LanguageProfile>;

    fn select_framework(
        &self,
        language: &'static LanguageProfile,
    ) -> Result<&'static FrameworkProfile>;

    fn project_name(&self) -> Result<String>;
}

/// Numbered-menu prompt on stdin/stdout
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Print a numbered menu and read a 1-based choice; empty input picks the
    /// first entry.
    fn choose(&self, message: &str, titles: &[&str]) -> Result<usize> {
        println!("{message}");
        for (i, title) in titles.iter().enumerate() {
            println!("  {}) {}", i + 1, title);
        }
        print!("> ");
        std::io::stdout().flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            return Ok(0);
        }

        match input.parse::<usize>() {
            Ok(n) if (1..=titles.len()).contains(&n) => Ok(n - 1),
            _ => Err(Error::Validation {
                field: "selection".to_string(),
                message: format!("expected a number between 1 and {}", titles.len()),
            }),
        }
    }
}

impl SelectionPrompt for TerminalPrompt {
    fn select_language(
        &self,
        languages: &'static [LanguageProfile],
    ) -> Result<&'static LanguageProfile> {
        let titles: Vec<&str> = languages.iter().map(|l| l.name).collect();
        let index = self.choose("Choose your programming language", &titles)?;
        Ok(&languages[index])
    }

    fn select_framework(
        &self,
        language: &'static LanguageProfile,
    ) -> Result<&'static FrameworkProfile> {
        let titles: Vec<&str> = language.frameworks.iter().map(|f| f.name).collect();
        let index = self.choose("Choose your testing framework", &titles)?;
        Ok(&language.frameworks[index])
    }

    fn project_name(&self) -> Result<String> {
        print!("Name of CodeLab [{DEFAULT_PROJECT_NAME}]: ");
        std::io::stdout().flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            Ok(DEFAULT_PROJECT_NAME.to_string())
        } else {
            Ok(input)
        }
    }
}
