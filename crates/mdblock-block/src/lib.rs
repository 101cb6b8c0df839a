//! The mdblock content block.
//!
//! A [`ContentBlock`] holds four editable fields (title, asset path, inline
//! Markdown, and extension set), loads itself from course markup, and
//! renders a [`Fragment`] through a [`BlockRuntime`].
//!
//! # Modules
//!
//! - [`block`]: The block, its markup loader, authoring edits, and render
//! - [`fields`]: Editable field schema for the authoring UI
//! - [`markup`]: XML element parsing that keeps body whitespace
//! - [`fragment`]: Body HTML plus stylesheet and script references
//! - [`resources`]: Packaged templates and static files
//! - [`runtime`]: Render machinery and per-view context
//! - [`demo`]: Canned preview content

#![doc = include_str!("../README.md")]

pub mod block;
pub mod demo;
pub mod fields;
pub mod fragment;
pub mod markup;
pub mod resources;
pub mod runtime;

pub use block::{ContentBlock, DEFAULT_TITLE};
pub use fields::{FieldInfo, FieldKind, FieldScope, field_schema};
pub use fragment::{Fragment, FragmentResource, Placement, ResourceKind};
pub use markup::MarkupNode;
pub use resources::{HIGHLIGHT_STYLESHEET, TemplateLoader};
pub use runtime::{BLOCK_TYPE, BlockRuntime, ViewContext};
