//! Utility modules for path handling and text normalization.
//!
//! # Modules
//!
//! - [`paths`]: Path helpers (tilde expansion)
//! - [`text`]: Whitespace normalization for markup bodies

pub mod paths;
pub mod text;
