use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::signal;
use tracing::info;

use crate::catalog;
use crate::execution::{templates, ShellExecutor};
use crate::http::handlers::AppState;
use crate::scaffold::{
    fetch::{GitFetcher, DEFAULT_TEMPLATE},
    prompt::TerminalPrompt,
    ScaffoldOptions, Scaffolder, Selection,
};
use crate::state::{ConfigStore, DEFAULT_CONFIG_PATH};
use crate::types::Result;

/// Default timeout for shelled-out commands, in seconds
const DEFAULT_COMMAND_TIMEOUT: u64 = 300;

/// Headroom the HTTP request timeout keeps over the command timeout
const REQUEST_TIMEOUT_MARGIN: u64 = 30;

#[derive(Parser)]
#[command(name = "codelab")]
#[command(about = "Scaffold codelab projects and run their staged tests")]
#[command(long_about = "
Scaffolds a new codelab project from a remote site template, persists the
selected test framework's invocation command, and serves an HTTP endpoint
that runs that command for a named test stage.
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Codelab config record path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Scaffold a new codelab project (default if no subcommand given)
    New(NewArgs),
    /// Run the stage-execution HTTP server
    Serve(ServeArgs),
    /// Check the catalog and any persisted config
    Validate,
    /// Show version information
    Version,
}

#[derive(Args, Clone)]
pub struct NewArgs {
    /// Language name; skips the interactive prompt
    #[arg(long)]
    pub language: Option<String>,

    /// Test framework name (defaults to the language's first framework)
    #[arg(long, requires = "language")]
    pub framework: Option<String>,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// Site template to clone ("owner/repo" shorthand or a full URL)
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Directory the project is created under
    #[arg(long, default_value = "/")]
    pub dest: PathBuf,

    /// Abort the scaffold if the init command exits non-zero
    #[arg(long)]
    pub fail_on_init_error: bool,
}

impl Default for NewArgs {
    fn default() -> Self {
        Self {
            language: None,
            framework: None,
            name: None,
            template: DEFAULT_TEMPLATE.to_string(),
            dest: PathBuf::from("/"),
            fail_on_init_error: false,
        }
    }
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen address (format: "host:port")
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub listen: String,

    /// Timeout for the shelled-out test command, in seconds
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT)]
    pub command_timeout: u64,

    /// Set log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Get effective log level considering verbose/quiet flags
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Error
        } else {
            self.log_level.clone().unwrap_or(LogLevel::Info)
        }
    }

    /// Convert LogLevel enum to string for the logging module
    pub fn log_level_to_str(&self) -> &'static str {
        match self.effective_log_level() {
            LogLevel::Trace => crate::logging::level::TRACE,
            LogLevel::Debug => crate::logging::level::DEBUG,
            LogLevel::Info => crate::logging::level::INFO,
            LogLevel::Warn => crate::logging::level::WARN,
            LogLevel::Error => crate::logging::level::ERROR,
        }
    }

    /// Get log format override from CLI arguments
    pub fn log_format_override(&self) -> Option<&'static str> {
        match &self.command {
            Some(Commands::Serve(args)) => args.log_format.as_ref().map(|fmt| match fmt {
                LogFormat::Json => crate::logging::format::JSON,
                LogFormat::Pretty => crate::logging::format::PRETTY,
            }),
            _ => None,
        }
    }
}

/// Scaffold a new codelab project
pub async fn run_scaffold(cli: &Cli, args: NewArgs) -> Result<()> {
    let selection = match &args.language {
        Some(language) => Selection::from_names(
            language,
            args.framework.as_deref(),
            args.name
                .as_deref()
                .unwrap_or(crate::scaffold::prompt::DEFAULT_PROJECT_NAME),
        )?,
        None => Selection::from_prompt(&TerminalPrompt)?,
    };

    let scaffolder = Scaffolder::new(
        GitFetcher,
        ConfigStore::new(&cli.config),
        ShellExecutor::new(Duration::from_secs(DEFAULT_COMMAND_TIMEOUT)),
        ScaffoldOptions {
            template: args.template,
            base_dir: args.dest,
            fail_on_init_error: args.fail_on_init_error,
        },
    );

    let dest = scaffolder.run(&selection).await?;
    println!("Created {}", dest.display());
    Ok(())
}

/// Run the stage-execution HTTP server
pub async fn run_server(cli: &Cli, args: ServeArgs) -> Result<()> {
    let state = AppState {
        store: ConfigStore::new(&cli.config),
        executor: ShellExecutor::new(Duration::from_secs(args.command_timeout)),
        start_time: SystemTime::now(),
    };

    info!(
        listen = %args.listen,
        config = %cli.config.display(),
        command_timeout = args.command_timeout,
        "Starting stage executor"
    );

    let request_timeout = Duration::from_secs(args.command_timeout + REQUEST_TIMEOUT_MARGIN);
    crate::http::start_server(&args.listen, state, request_timeout, setup_shutdown_signal()).await
}

/// Check that every catalog template resolves and the config record parses
pub async fn validate(cli: &Cli) -> Result<()> {
    info!("Validating catalog...");

    let bindings = HashMap::from([("name".to_string(), "sample".to_string())]);
    let mut framework_count = 0;
    for language in catalog::languages() {
        templates::resolve(language.init_command, &bindings)?;
        for framework in language.frameworks {
            templates::resolve_marker(framework.command, "stage_sample_")?;
            framework_count += 1;
        }
    }
    info!(
        languages = catalog::languages().len(),
        frameworks = framework_count,
        "Catalog templates all resolve"
    );

    let store = ConfigStore::new(&cli.config);
    if store.exists() {
        let config = store.read()?;
        info!(
            config_path = %cli.config.display(),
            command = %config.testing.command,
            "Persisted config is valid"
        );
    } else {
        info!(
            config_path = %cli.config.display(),
            "No persisted config yet (run `codelab new` first)"
        );
    }

    info!("All checks passed");
    Ok(())
}

/// Show version and build information
pub async fn show_version() -> Result<()> {
    println!("codelab {}", env!("CARGO_PKG_VERSION"));
    println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!();

    println!("Build Information:");
    println!(
        "  Build Profile: {}",
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    );
    println!("  Architecture: {}", std::env::consts::ARCH);

    Ok(())
}

/// Set up graceful shutdown signal handling
pub async fn setup_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["codelab"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_new_flags() {
        let cli = Cli::parse_from([
            "codelab",
            "new",
            "--language",
            "Go",
            "--framework",
            "Testify",
            "--name",
            "demo",
            "--dest",
            "/tmp",
        ]);
        match cli.command {
            Some(Commands::New(args)) => {
                assert_eq!(args.language.as_deref(), Some("Go"));
                assert_eq!(args.framework.as_deref(), Some("Testify"));
                assert_eq!(args.name.as_deref(), Some("demo"));
                assert_eq!(args.dest, PathBuf::from("/tmp"));
                assert_eq!(args.template, DEFAULT_TEMPLATE);
                assert!(!args.fail_on_init_error);
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_framework_flag_requires_language() {
        assert!(Cli::try_parse_from(["codelab", "new", "--framework", "Jest"]).is_err());
    }

    #[test]
    fn test_cli_parses_serve_flags() {
        let cli = Cli::parse_from([
            "codelab",
            "serve",
            "--listen",
            "0.0.0.0:9000",
            "--command-timeout",
            "60",
        ]);
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.listen, "0.0.0.0:9000");
                assert_eq!(args.command_timeout, 60);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_effective_log_level() {
        let cli = Cli::parse_from(["codelab", "-v"]);
        assert!(matches!(cli.effective_log_level(), LogLevel::Debug));

        let cli = Cli::parse_from(["codelab", "-q"]);
        assert!(matches!(cli.effective_log_level(), LogLevel::Error));

        let cli = Cli::parse_from(["codelab"]);
        assert!(matches!(cli.effective_log_level(), LogLevel::Info));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["codelab", "-v", "-q"]).is_err());
    }
}
