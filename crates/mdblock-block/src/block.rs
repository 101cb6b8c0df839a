//! The Markdown content block.

use std::borrow::Cow;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use mdblock_content::{Extension, ExtensionSet};
use mdblock_core::{AssetLookup, Error, Result, normalize_markup_body};

use crate::fields::{
    FIELD_CONTENT, FIELD_DISPLAY_NAME, FIELD_EXTRAS, FIELD_FILENAME, is_editable_field,
};
use crate::fragment::Fragment;
use crate::markup::MarkupNode;
use crate::resources::HIGHLIGHT_STYLESHEET;
use crate::runtime::{BLOCK_TYPE, ViewContext};

/// Title of a new block.
pub const DEFAULT_TITLE: &str = "Markdown";

/// Displays Markdown, stored inline or in a course asset, as HTML.
///
/// Serialized field names follow the persisted schema (`display_name`,
/// `filename`, `content`, `extras`).
///
/// # Example
///
/// ```
/// use mdblock_block::{BlockRuntime, ContentBlock, ViewContext};
/// use mdblock_core::{HostState, MemoryAssetStore, StaticResourceLocator};
///
/// let runtime = BlockRuntime::new(HostState::new(
///     MemoryAssetStore::new(),
///     StaticResourceLocator::default(),
/// ))
/// .unwrap();
///
/// let block = ContentBlock::from_xml("<markdown>\n  # Hello\n</markdown>").unwrap();
/// let fragment = block.render(&ViewContext::new(&runtime)).unwrap();
/// assert!(fragment.content().contains("<h1>Hello</h1>"));
/// assert_eq!(fragment.css_urls(), ["/static/markdown/public/css/highlight.css"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    /// Label shown in course navigation.
    #[serde(rename = "display_name")]
    pub title: String,
    /// Relative path of a Markdown asset; empty means use `content`.
    #[serde(rename = "filename")]
    pub source_path: String,
    /// Inline Markdown.
    pub content: String,
    /// Enabled dialect extensions.
    #[serde(rename = "extras")]
    pub extensions: ExtensionSet,
}

impl Default for ContentBlock {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            source_path: String::new(),
            content: String::new(),
            extensions: ExtensionSet::default(),
        }
    }
}

impl ContentBlock {
    /// A block with default fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style inline content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder-style asset path.
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = path.into();
        self
    }

    /// Builder-style extension set.
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    // ------------------------------------------------------------------------
    // Markup
    // ------------------------------------------------------------------------

    /// Build a block from a markup node.
    ///
    /// Attributes naming editable fields are parsed by field type; others
    /// are ignored. A value that does not parse leaves the field at its
    /// default. A non-blank text body, normalized for indentation, becomes
    /// the inline content.
    pub fn from_markup(node: &MarkupNode) -> Self {
        let mut block = Self::default();

        for (name, value) in &node.attributes {
            if !is_editable_field(name) {
                debug!("Ignoring unknown attribute '{name}' on <{}>", node.tag);
                continue;
            }
            if let Err(e) = block.update_field(name, value) {
                warn!("Keeping default for '{name}': {e}");
            }
        }

        if let Some(text) = &node.text {
            let text = normalize_markup_body(text);
            if !text.is_empty() {
                block.content = text;
            }
        }

        block
    }

    /// Parse an XML element and build a block from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] if `xml` is not well-formed.
    pub fn from_xml(xml: &str) -> Result<Self> {
        MarkupNode::parse(xml).map(|node| Self::from_markup(&node))
    }

    /// Serialize to a markup node.
    ///
    /// Content is written on its own lines so that [`from_markup`](Self::from_markup)
    /// reads back the same text for already-normalized content.
    pub fn to_markup(&self) -> MarkupNode {
        let mut node = MarkupNode::new(BLOCK_TYPE)
            .with_attribute(FIELD_DISPLAY_NAME, &self.title)
            .with_attribute(FIELD_FILENAME, &self.source_path)
            .with_attribute(FIELD_EXTRAS, self.extensions.to_json());
        if !self.content.is_empty() {
            node = node.with_text(format!("\n{}\n", self.content));
        }
        node
    }

    // ------------------------------------------------------------------------
    // Authoring
    // ------------------------------------------------------------------------

    /// Apply an authoring edit to the field persisted as `name`.
    ///
    /// String fields take `raw` verbatim; `extras` takes a JSON array of
    /// extension names. On error the field is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown field and
    /// [`Error::InvalidData`] for a value that does not parse.
    pub fn update_field(&mut self, name: &str, raw: &str) -> Result<()> {
        match name {
            FIELD_DISPLAY_NAME => self.title = raw.to_string(),
            FIELD_FILENAME => self.source_path = raw.to_string(),
            FIELD_CONTENT => self.content = raw.to_string(),
            FIELD_EXTRAS => self.extensions = ExtensionSet::parse_list(raw)?,
            other => return Err(Error::not_found(format!("no editable field '{other}'"))),
        }
        Ok(())
    }

    /// Current value of each editable field, keyed by persisted name.
    pub fn field_values(&self) -> Value {
        json!({
            FIELD_DISPLAY_NAME: self.title,
            FIELD_FILENAME: self.source_path,
            FIELD_CONTENT: self.content,
            FIELD_EXTRAS: self.extensions.names(),
        })
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Render the student view.
    ///
    /// An asset that cannot be found, or cannot be addressed, renders as
    /// empty content.
    ///
    /// # Errors
    ///
    /// Propagates asset store backend failures, conversion failures, and
    /// template failures.
    pub fn render(&self, ctx: &ViewContext<'_>) -> Result<Fragment> {
        let runtime = ctx.runtime();
        let markdown = self.resolve_source(ctx)?;

        let html = if markdown.is_empty() {
            String::new()
        } else {
            runtime.converter().to_html(&markdown, &self.extensions)?
        };

        let mut fragment = Fragment::new(runtime.templates().render_main(&html)?);
        if self.extensions.contains(Extension::FencedCode) {
            fragment.add_css_url(runtime.resource_url(HIGHLIGHT_STYLESHEET));
        }

        debug!(
            "Rendered '{}': {} byte(s) of Markdown, {} resource(s)",
            self.title,
            markdown.len(),
            fragment.resources().len()
        );
        Ok(fragment)
    }

    fn resolve_source<'s>(&'s self, ctx: &ViewContext<'_>) -> Result<Cow<'s, str>> {
        if self.source_path.is_empty() {
            return Ok(Cow::Borrowed(&self.content));
        }

        let Some(course_id) = ctx.course_id() else {
            warn!(
                "Cannot resolve '{}' without a course; rendering empty content",
                self.source_path
            );
            return Ok(Cow::Borrowed(""));
        };

        match ctx.runtime().host().assets().find(course_id, &self.source_path)? {
            AssetLookup::Found(bytes) => {
                debug!(
                    "Loaded '{}' from {course_id} ({} bytes)",
                    self.source_path,
                    bytes.len()
                );
                Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
            }
            AssetLookup::NotFound => {
                warn!(
                    "Asset '{}' not found in {course_id}; rendering empty content",
                    self.source_path
                );
                Ok(Cow::Borrowed(""))
            }
            AssetLookup::InvalidReference(reason) => {
                warn!(
                    "Invalid asset reference '{}' in {course_id}: {reason}; rendering empty",
                    self.source_path
                );
                Ok(Cow::Borrowed(""))
            }
        }
    }
}
