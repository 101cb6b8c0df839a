//! Shared types, collaborator traits, errors, and utilities for mdblock.
//!
//! This crate provides the foundational types used across all mdblock crates.
//! It has no internal mdblock dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Collaborator traits the host implements
//! - [`assets`]: Course keys, asset locations, and reference asset stores
//! - [`state`]: Shared host collaborator container
//! - [`util`]: Path and text utilities

#![doc = include_str!("../README.md")]

pub mod assets;
pub mod error;
pub mod state;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use assets::{AssetLocation, CourseKey, FsAssetStore, MemoryAssetStore, StaticResourceLocator};
pub use error::{Error, Result};
pub use state::HostState;
pub use traits::{AssetLookup, AssetStore, ResourceLocator};

// Convenience re-exports from util
pub use util::text::{dedent, normalize_markup_body};
