//! Collaborator traits supplied by the embedding host.
//!
//! A content block never talks to the platform directly. The host hands it
//! an [`AssetStore`] for course-uploaded files and a [`ResourceLocator`] for
//! the block's own packaged static files.

use crate::Result;

/// Outcome of looking up a course asset.
///
/// Missing assets and malformed references are ordinary outcomes, not
/// errors: callers decide how to degrade. Only unexpected backend failures
/// travel through the surrounding `Result`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetLookup {
    /// The asset exists; raw bytes as stored.
    Found(Vec<u8>),
    /// The reference is well formed but nothing is stored under it.
    NotFound,
    /// The course id or relative path cannot address an asset.
    InvalidReference(String),
}

impl AssetLookup {
    /// Returns the asset bytes for [`AssetLookup::Found`].
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Found(bytes) => Some(bytes),
            Self::NotFound | Self::InvalidReference(_) => None,
        }
    }

    /// Returns true if the asset was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Read-only access to a course's static-asset store.
///
/// # Bounds
///
/// - `Send + Sync`: one store serves every concurrent render
///
/// # Example
///
/// ```
/// use mdblock_core::traits::{AssetLookup, AssetStore};
/// use mdblock_core::Result;
///
/// struct Empty;
///
/// impl AssetStore for Empty {
///     fn find(&self, _course_id: &str, _path: &str) -> Result<AssetLookup> {
///         Ok(AssetLookup::NotFound)
///     }
/// }
///
/// let store = Empty;
/// assert_eq!(
///     store.find("course-v1:Org+CS101+2026", "notes.md").unwrap(),
///     AssetLookup::NotFound
/// );
/// ```
pub trait AssetStore: Send + Sync {
    /// Look up the asset stored at `path` for the course `course_id`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend itself fails (for example an
    /// unreadable file). Absent assets and bad references are reported as
    /// [`AssetLookup::NotFound`] and [`AssetLookup::InvalidReference`].
    fn find(&self, course_id: &str, path: &str) -> Result<AssetLookup>;
}

/// Maps a block's packaged resources to URLs the browser can fetch.
pub trait ResourceLocator: Send + Sync {
    /// URL of `resource` (e.g. `"public/css/highlight.css"`) packaged with
    /// blocks of type `block_type`.
    fn resource_url(&self, block_type: &str, resource: &str) -> String;
}
