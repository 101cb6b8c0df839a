//! CLI argument parsing and command definitions.
//!
//! Provides the `mdblock` command structure: global configuration and
//! verbosity flags, block preview, schema listing, and config management.

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "mdblock", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "MDBLOCK_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a block to HTML.
    Preview(PreviewArgs),

    /// Print the editable field schema as JSON.
    Fields,

    /// List the available Markdown extensions.
    Extensions,

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Options for `mdblock preview`.
#[derive(Args, Debug, Default)]
pub struct PreviewArgs {
    /// Load the block from an XML markup file.
    #[arg(long, conflicts_with = "markdown")]
    pub xml: Option<String>,

    /// Use a Markdown file as the block's inline content.
    #[arg(long)]
    pub markdown: Option<String>,

    /// Course id used to resolve `--filename` against the asset root.
    #[arg(long)]
    pub course: Option<String>,

    /// Read content from this course asset path.
    #[arg(long)]
    pub filename: Option<String>,

    /// Comma-separated extensions, replacing the block's own set.
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Embed the highlighting stylesheet instead of linking it.
    #[arg(long)]
    pub inline_css: bool,

    /// Print the fragment as JSON instead of an HTML page.
    #[arg(long)]
    pub json: bool,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "render.course_id").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "resources.base_url").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
