//! Configuration for the `mdblock` preview tool.
//!
//! Provides the [`MdblockConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `MDBLOCK_CONFIG` environment variable
//! 3. XDG default: `~/.config/mdblock/config.toml`
//! 4. Built-in defaults
//!
//! `MDBLOCK_<SECTION>_<KEY>` environment variables overlay file values.

use std::path::PathBuf;

use confyg::{Confygery, env};
use mdblock_content::ExtensionSet;
use mdblock_core::util::paths::expand_tilde;
use mdblock_core::{Error, Result};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "MDBLOCK";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MdblockConfig {
    /// Course asset store.
    pub assets: AssetsConfig,

    /// Packaged resource URLs.
    pub resources: ResourcesConfig,

    /// Preview rendering defaults.
    pub render: RenderConfig,
}

/// Course asset store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding one subdirectory per course.
    pub root: Option<String>,
}

/// Packaged resource configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// URL prefix under which packaged resources are served.
    pub base_url: String,
}

/// Preview rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Course id used when a preview does not name one.
    pub course_id: Option<String>,

    /// Comma-separated extensions applied to Markdown-file previews.
    pub extensions: String,

    /// Embed the highlighting stylesheet instead of linking it.
    pub inline_css: bool,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            base_url: "/static".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            course_id: None,
            extensions: ExtensionSet::default().names().join(","),
            inline_css: false,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl MdblockConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("assets");
        env_opts.add_section("resources");
        env_opts.add_section("render");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("MDBLOCK_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mdblock").join("config.toml"))
    }

    /// The asset root with `~` expanded, if configured.
    pub fn asset_root(&self) -> Option<PathBuf> {
        self.assets.root.as_deref().map(expand_tilde)
    }

    /// The configured default extension set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the list names an unknown extension.
    pub fn extension_set(&self) -> Result<ExtensionSet> {
        ExtensionSet::parse_csv(&self.render.extensions)
            .map_err(|e| Error::config(format!("render.extensions: {e}")))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `MDBLOCK_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
