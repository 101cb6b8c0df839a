//! Markdown dialect and conversion for mdblock.
//!
//! This crate turns the Markdown a block stores into HTML, honouring the
//! block's selected dialect extensions.
//!
//! # Features
//!
//! - [`Extension`] and [`ExtensionSet`] for per-block dialect selection
//! - [`MarkdownConverter`], the conversion seam, and its pulldown-cmark
//!   implementation [`PulldownConverter`]
//! - Span extensions (highlight, quotes, superscript, bare-URL links) and
//!   dialect switches applied on the parsed event stream

#![doc = include_str!("../README.md")]

pub mod converter;
pub mod extensions;
mod rewrite;
mod spans;

pub use converter::{MarkdownConverter, PulldownConverter};
pub use extensions::{Extension, ExtensionSet};
