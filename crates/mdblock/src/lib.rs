//! Markdown content blocks for course authoring.
//!
//! This crate re-exports the mdblock components so hosts can depend on a
//! single crate.
//!
//! | Module | Crate |
//! |--------|-------|
//! | [`core`] | `mdblock-core` |
//! | [`content`] | `mdblock-content` |
//! | [`block`] | `mdblock-block` |
//! | `cli` | `mdblock-cli` (feature `cli`) |

#![doc = include_str!("../README.md")]

pub use mdblock_block as block;
pub use mdblock_content as content;
pub use mdblock_core as core;

#[cfg(feature = "cli")]
pub use mdblock_cli as cli;

pub use mdblock_block::{BlockRuntime, ContentBlock, Fragment, ViewContext};
pub use mdblock_content::{Extension, ExtensionSet, MarkdownConverter, PulldownConverter};
pub use mdblock_core::{
    AssetLookup, AssetStore, Error, FsAssetStore, HostState, MemoryAssetStore, ResourceLocator,
    Result, StaticResourceLocator,
};
