//! Command-line preview tooling for mdblock content blocks.
//!
//! # Key Abstractions
//!
//! - [`App`]: loads configuration and dispatches commands
//! - [`CliArgs`]: the `mdblock` argument tree
//! - [`MdblockConfig`]: file, environment, and default configuration

#![doc = include_str!("../README.md")]

pub mod app;
pub mod block_handlers;
pub mod cli;
pub mod config;
pub mod config_handlers;

pub use app::App;
pub use cli::{CliArgs, Command, ConfigAction, PreviewArgs};
pub use config::MdblockConfig;
