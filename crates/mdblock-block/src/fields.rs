//! Editable field schema.
//!
//! The authoring UI builds its editor from [`field_schema`]: one entry per
//! editable field, in display order.

use serde::Serialize;
use serde_json::{Value, json};

use mdblock_content::{Extension, ExtensionSet};

use crate::block::DEFAULT_TITLE;

/// Persisted name of the title field.
pub const FIELD_DISPLAY_NAME: &str = "display_name";
/// Persisted name of the asset path field.
pub const FIELD_FILENAME: &str = "filename";
/// Persisted name of the inline Markdown field.
pub const FIELD_CONTENT: &str = "content";
/// Persisted name of the extension set field.
pub const FIELD_EXTRAS: &str = "extras";

/// Editable fields, in editor order.
pub const EDITABLE_FIELDS: [&str; 4] = [
    FIELD_DISPLAY_NAME,
    FIELD_FILENAME,
    FIELD_CONTENT,
    FIELD_EXTRAS,
];

/// Storage scope of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldScope {
    /// Per-block presentation settings.
    Settings,
    /// Block content.
    Content,
}

/// One entry of a list field's choice list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldChoice {
    pub display_name: &'static str,
    pub value: &'static str,
}

/// Value type of a field, as the editor needs to know it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// A string; `multiline` selects a text area.
    String { multiline: bool },
    /// A list drawn from `choices`. Set-style lists ignore order and
    /// duplicates.
    List {
        list_style: &'static str,
        choices: Vec<FieldChoice>,
    },
}

/// Schema entry for one editable field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub help: &'static str,
    pub scope: FieldScope,
    pub kind: FieldKind,
    pub default: Value,
}

/// The editable fields of a content block, in editor order.
///
/// # Example
///
/// ```
/// use mdblock_block::fields::{EDITABLE_FIELDS, field_schema};
///
/// let names: Vec<_> = field_schema().iter().map(|f| f.name).collect();
/// assert_eq!(names, EDITABLE_FIELDS);
/// ```
pub fn field_schema() -> Vec<FieldInfo> {
    vec![
        FieldInfo {
            name: FIELD_DISPLAY_NAME,
            help: "This name appears in the horizontal navigation at the top of the page.",
            scope: FieldScope::Settings,
            kind: FieldKind::String { multiline: false },
            default: json!(DEFAULT_TITLE),
        },
        FieldInfo {
            name: FIELD_FILENAME,
            help: "Relative path to a Markdown file uploaded to the static store. \
                   For example, \"markdown_file.md\".",
            scope: FieldScope::Content,
            kind: FieldKind::String { multiline: false },
            default: json!(""),
        },
        FieldInfo {
            name: FIELD_CONTENT,
            help: "Markdown content to display for this module.",
            scope: FieldScope::Content,
            kind: FieldKind::String { multiline: true },
            default: json!(""),
        },
        FieldInfo {
            name: FIELD_EXTRAS,
            help: "Markdown extensions to turn on for the instance.",
            scope: FieldScope::Content,
            kind: FieldKind::List {
                list_style: "set",
                choices: extension_choices(),
            },
            default: json!(ExtensionSet::default().names()),
        },
    ]
}

/// Look up the schema entry for `name`.
pub fn field_info(name: &str) -> Option<FieldInfo> {
    field_schema().into_iter().find(|field| field.name == name)
}

/// Whether `name` is an editable field.
pub fn is_editable_field(name: &str) -> bool {
    EDITABLE_FIELDS.contains(&name)
}

fn extension_choices() -> Vec<FieldChoice> {
    Extension::ALL
        .into_iter()
        .map(|ext| FieldChoice {
            display_name: ext.display_name(),
            value: ext.as_str(),
        })
        .collect()
}
