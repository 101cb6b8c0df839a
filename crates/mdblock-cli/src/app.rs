//! The `mdblock` application.
//!
//! Owns the loaded configuration and dispatches parsed commands to their
//! handlers.

use mdblock_core::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::MdblockConfig;
use crate::{block_handlers, config_handlers};

const APP_NAME: &str = "mdblock";

// ============================================================================
// App
// ============================================================================

/// CLI application state.
pub struct App {
    config: MdblockConfig,
    version: String,
}

impl App {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = MdblockConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    pub fn new(config: MdblockConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn config(&self) -> &MdblockConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    /// Library crates log through `log`; the subscriber picks those records up.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);
        debug!(config = ?self.config, "Loaded configuration");

        match args.command {
            Some(Command::Preview(preview)) => {
                block_handlers::handle_preview(&self.config, &preview)
            }
            Some(Command::Fields) => block_handlers::handle_fields(),
            Some(Command::Extensions) => block_handlers::handle_extensions(),
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            Some(Command::Version) => {
                println!("{APP_NAME} {}", self.version);
                Ok(())
            }
            None => {
                println!("{APP_NAME} {}: use --help for usage", self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn app() -> App {
        App::new(MdblockConfig::default())
    }

    #[test]
    fn test_app_new() {
        let app = app();
        assert_eq!(app.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(app.config().resources.base_url, "/static");
    }

    #[test]
    fn test_app_with_version() {
        let app = app().with_version("1.2.3");
        assert_eq!(app.version, "1.2.3");
    }

    #[test]
    fn test_app_from_args_with_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resources]\nbase_url = \"/xblock\"\n").unwrap();

        let args = CliArgs::parse_from(["mdblock", "--config", path.to_str().unwrap()]);
        let app = App::from_args(&args).unwrap();
        assert_eq!(app.config().resources.base_url, "/xblock");
    }

    #[test]
    fn test_run_version_command() {
        let args = CliArgs::parse_from(["mdblock", "version"]);
        assert!(app().with_version("0.1.0").run(args).is_ok());
    }

    #[test]
    fn test_run_no_command() {
        let args = CliArgs::parse_from(["mdblock"]);
        assert!(app().run(args).is_ok());
    }

    #[test]
    fn test_run_fields_and_extensions() {
        assert!(app().run(CliArgs::parse_from(["mdblock", "fields"])).is_ok());
        assert!(app().run(CliArgs::parse_from(["mdblock", "extensions"])).is_ok());
    }

    #[test]
    fn test_run_preview_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("demo.html");
        let args = CliArgs::parse_from([
            "mdblock",
            "--quiet",
            "preview",
            "--output",
            out.to_str().unwrap(),
        ]);
        app().run(args).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().contains("Markdown demo"));
    }

    #[test]
    fn test_run_preview_bad_extensions_fails() {
        let args = CliArgs::parse_from(["mdblock", "preview", "-e", "nope"]);
        assert!(app().run(args).is_err());
    }

    #[test]
    fn test_run_config_init() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let args = CliArgs::parse_from([
            "mdblock",
            "config",
            "init",
            "--file",
            path.to_str().unwrap(),
        ]);
        app().run(args).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_logging_default() {
        app().init_logging(false, false);
    }

    #[test]
    fn test_init_logging_verbose() {
        app().init_logging(true, false);
    }

    #[test]
    fn test_init_logging_quiet() {
        app().init_logging(false, true);
    }
}
