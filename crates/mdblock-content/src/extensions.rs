//! Markdown dialect extensions.
//!
//! [`Extension`] is the closed list of dialect features a block can switch
//! on; [`ExtensionSet`] is the per-block selection. Only membership matters,
//! so the set is ordered and serializes deterministically.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use mdblock_core::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Extension
// ============================================================================

/// A single Markdown dialect feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extension {
    /// Pipe tables.
    Tables,
    /// Fenced code blocks.
    FencedCode,
    /// Footnote references and definitions.
    Footnotes,
    /// Bare URLs and e-mail addresses become links.
    Autolink,
    /// `~~text~~` strikethrough.
    Strikethrough,
    /// `_text_` renders underlined.
    Underline,
    /// `==text==` highlight.
    Highlight,
    /// `"text"` renders as an inline quotation.
    Quote,
    /// `^word` and `^(text)` superscript.
    Superscript,
    /// `$$…$$` math.
    Math,
    /// No emphasis in the middle of words.
    NoIntraEmphasis,
    /// ATX headings require a space after `#`.
    SpaceHeaders,
    /// `$…$` is inline math, `$$…$$` is always block math.
    MathExplicit,
    /// Indented code blocks are not recognised.
    DisableIndentedCode,
}

impl Extension {
    /// Every extension, in choice-list order.
    pub const ALL: [Extension; 14] = [
        Self::Tables,
        Self::FencedCode,
        Self::Footnotes,
        Self::Autolink,
        Self::Strikethrough,
        Self::Underline,
        Self::Highlight,
        Self::Quote,
        Self::Superscript,
        Self::Math,
        Self::NoIntraEmphasis,
        Self::SpaceHeaders,
        Self::MathExplicit,
        Self::DisableIndentedCode,
    ];

    /// Persisted name, e.g. `"fenced-code"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::FencedCode => "fenced-code",
            Self::Footnotes => "footnotes",
            Self::Autolink => "autolink",
            Self::Strikethrough => "strikethrough",
            Self::Underline => "underline",
            Self::Highlight => "highlight",
            Self::Quote => "quote",
            Self::Superscript => "superscript",
            Self::Math => "math",
            Self::NoIntraEmphasis => "no-intra-emphasis",
            Self::SpaceHeaders => "space-headers",
            Self::MathExplicit => "math-explicit",
            Self::DisableIndentedCode => "disable-indented-code",
        }
    }

    /// Label shown in the authoring UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Tables => "Tables",
            Self::FencedCode => "Fenced Code Blocks",
            Self::Footnotes => "Footnotes",
            Self::Autolink => "Autolinks",
            Self::Strikethrough => "Strikethrough",
            Self::Underline => "Underline",
            Self::Highlight => "Highlight",
            Self::Quote => "Quotes",
            Self::Superscript => "Superscript",
            Self::Math => "Math",
            Self::NoIntraEmphasis => "No Intra Emphasis",
            Self::SpaceHeaders => "Space Headers",
            Self::MathExplicit => "Math Explicit",
            Self::DisableIndentedCode => "Disable Indented Code",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str() == s)
            .ok_or_else(|| Error::invalid_data(format!("unknown Markdown extension '{s}'")))
    }
}

// ============================================================================
// ExtensionSet
// ============================================================================

/// The extensions enabled for one block.
///
/// # Example
///
/// ```
/// use mdblock_content::{Extension, ExtensionSet};
///
/// let set = ExtensionSet::parse_list(r#"["math", "tables", "math"]"#).unwrap();
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(Extension::Tables));
/// assert_eq!(set.to_json(), r#"["tables","math"]"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionSet(BTreeSet<Extension>);

impl ExtensionSet {
    /// The extensions a new block starts with.
    pub const DEFAULTS: [Extension; 6] = [
        Extension::Tables,
        Extension::FencedCode,
        Extension::Footnotes,
        Extension::Autolink,
        Extension::Strikethrough,
        Extension::Math,
    ];

    /// An empty set.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Every available extension.
    pub fn all() -> Self {
        Extension::ALL.into_iter().collect()
    }

    /// Parse the persisted form: a JSON array of extension names.
    ///
    /// Duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if `raw` is not a JSON array of strings
    /// or names an unknown extension.
    pub fn parse_list(raw: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| Error::invalid_data(format!("extension list must be a JSON array: {e}")))?;
        names.iter().map(|name| name.parse::<Extension>()).collect()
    }

    /// Parse a comma-separated list, e.g. `"tables, fenced-code"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an unknown extension name.
    pub fn parse_csv(raw: &str) -> Result<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<Extension>)
            .collect()
    }

    /// Serialize to the persisted JSON array form.
    pub fn to_json(&self) -> String {
        let names: Vec<&str> = self.names();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Names of the enabled extensions, in enumeration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|ext| ext.as_str()).collect()
    }

    /// Whether `ext` is enabled.
    pub fn contains(&self, ext: Extension) -> bool {
        self.0.contains(&ext)
    }

    /// Enable `ext`. Returns false if it was already enabled.
    pub fn insert(&mut self, ext: Extension) -> bool {
        self.0.insert(ext)
    }

    /// Disable `ext`. Returns false if it was not enabled.
    pub fn remove(&mut self, ext: Extension) -> bool {
        self.0.remove(&ext)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, ext: Extension) -> Self {
        self.0.insert(ext);
        self
    }

    /// Iterate over enabled extensions in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = Extension> + '_ {
        self.0.iter().copied()
    }

    /// Number of enabled extensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no extension is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::DEFAULTS.into_iter().collect()
    }
}

impl FromIterator<Extension> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Extension> for ExtensionSet {
    fn extend<I: IntoIterator<Item = Extension>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
