//! Course asset addressing and reference asset stores.
//!
//! Assets are addressed by a course key and a relative path. The platform's
//! static store is flat: `/` in a relative path becomes `_` in the stored
//! asset name, so `"week1/intro.md"` is stored as `"week1_intro.md"`.
//!
//! Two [`AssetStore`] implementations live here:
//!
//! - [`FsAssetStore`]: one directory per course under a root directory
//! - [`MemoryAssetStore`]: an in-memory map, used for previews and tests

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::traits::{AssetLookup, AssetStore, ResourceLocator};
use crate::{Error, Result};

// ============================================================================
// Course keys
// ============================================================================

const COURSE_KEY_PREFIX: &str = "course-v1:";

/// A parsed course identifier.
///
/// Accepts the current form `course-v1:Org+Course+Run` and the legacy
/// slash form `Org/Course/Run`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CourseKey {
    org: String,
    course: String,
    run: String,
    legacy: bool,
}

impl CourseKey {
    /// Parse a course id string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] if the id is not one of the two
    /// accepted forms or a part contains characters outside
    /// alphanumerics, `-`, `_`, `.`, `~`.
    pub fn parse(course_id: &str) -> Result<Self> {
        let (parts, legacy): (Vec<&str>, bool) =
            match course_id.strip_prefix(COURSE_KEY_PREFIX) {
                Some(rest) => (rest.split('+').collect(), false),
                None => (course_id.split('/').collect(), true),
            };

        let [org, course, run] = parts.as_slice() else {
            return Err(Error::invalid_reference(format!(
                "course id '{course_id}' must have exactly three parts"
            )));
        };

        for part in [org, course, run] {
            if !is_valid_key_part(part) {
                return Err(Error::invalid_reference(format!(
                    "course id '{course_id}' has an invalid part '{part}'"
                )));
            }
        }

        Ok(Self {
            org: (*org).to_string(),
            course: (*course).to_string(),
            run: (*run).to_string(),
            legacy,
        })
    }

    /// Organization part.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Course part.
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Run part.
    pub fn run(&self) -> &str {
        &self.run
    }

    /// Whether the key was written in the legacy slash form.
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Directory name used by [`FsAssetStore`]: `Org+Course+Run`.
    pub fn dir_name(&self) -> String {
        format!("{}+{}+{}", self.org, self.course, self.run)
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.legacy {
            write!(f, "{}/{}/{}", self.org, self.course, self.run)
        } else {
            write!(
                f,
                "{COURSE_KEY_PREFIX}{}+{}+{}",
                self.org, self.course, self.run
            )
        }
    }
}

fn is_valid_key_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}

// ============================================================================
// Asset locations
// ============================================================================

/// The resolved address of one course asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetLocation {
    course: CourseKey,
    name: String,
}

impl AssetLocation {
    /// Compute the location of `path` within the course `course_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] for a malformed course id, or a
    /// path that is empty, absolute, contains a backslash, or has a `..`
    /// segment.
    ///
    /// # Example
    ///
    /// ```
    /// use mdblock_core::assets::AssetLocation;
    ///
    /// let loc = AssetLocation::compute("course-v1:Org+CS101+2026", "week1/intro.md").unwrap();
    /// assert_eq!(loc.name(), "week1_intro.md");
    /// assert_eq!(
    ///     loc.asset_key(),
    ///     "asset-v1:Org+CS101+2026+type@asset+block@week1_intro.md"
    /// );
    /// ```
    pub fn compute(course_id: &str, path: &str) -> Result<Self> {
        let course = CourseKey::parse(course_id)?;

        if path.trim().is_empty() {
            return Err(Error::invalid_reference("asset path is empty"));
        }
        if path.starts_with('/') || path.contains('\\') {
            return Err(Error::invalid_reference(format!(
                "asset path '{path}' must be relative"
            )));
        }
        if path.split('/').any(|segment| segment == "..") {
            return Err(Error::invalid_reference(format!(
                "asset path '{path}' may not leave the course store"
            )));
        }

        Ok(Self {
            course,
            name: path.replace('/', "_"),
        })
    }

    /// The owning course.
    pub fn course(&self) -> &CourseKey {
        &self.course
    }

    /// Flat asset name inside the course store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical string key of the asset.
    pub fn asset_key(&self) -> String {
        if self.course.is_legacy() {
            format!(
                "/c4x/{}/{}/asset/{}",
                self.course.org(),
                self.course.course(),
                self.name
            )
        } else {
            format!(
                "asset-v1:{}+{}+{}+type@asset+block@{}",
                self.course.org(),
                self.course.course(),
                self.course.run(),
                self.name
            )
        }
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Asset store backed by a directory tree: `<root>/<Org+Course+Run>/<name>`.
#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an asset location maps to.
    pub fn path_for(&self, location: &AssetLocation) -> PathBuf {
        self.root
            .join(location.course().dir_name())
            .join(location.name())
    }
}

impl AssetStore for FsAssetStore {
    fn find(&self, course_id: &str, path: &str) -> Result<AssetLookup> {
        let location = match AssetLocation::compute(course_id, path) {
            Ok(location) => location,
            Err(err) => return Ok(AssetLookup::InvalidReference(err.to_string())),
        };

        let file = self.path_for(&location);
        debug!("Reading asset {} from {}", location.asset_key(), file.display());

        if !file.is_file() {
            return Ok(AssetLookup::NotFound);
        }
        match std::fs::read(&file) {
            Ok(bytes) => Ok(AssetLookup::Found(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AssetLookup::NotFound),
            Err(err) => Err(Error::io_with_path(err, &file)),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Asset store holding its assets in memory.
///
/// Built up front and then shared read-only.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<AssetLocation, Vec<u8>>,
}

impl MemoryAssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `path` for the course `course_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] if the location is malformed.
    pub fn insert(
        &mut self,
        course_id: &str,
        path: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let location = AssetLocation::compute(course_id, path)?;
        self.assets.insert(location, bytes.into());
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_asset(
        mut self,
        course_id: &str,
        path: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        self.insert(course_id, path, bytes)?;
        Ok(self)
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn find(&self, course_id: &str, path: &str) -> Result<AssetLookup> {
        let location = match AssetLocation::compute(course_id, path) {
            Ok(location) => location,
            Err(err) => return Ok(AssetLookup::InvalidReference(err.to_string())),
        };
        Ok(match self.assets.get(&location) {
            Some(bytes) => AssetLookup::Found(bytes.clone()),
            None => AssetLookup::NotFound,
        })
    }
}

// ============================================================================
// Static resource locator
// ============================================================================

/// Serves packaged resources from `<base_url>/<block_type>/<resource>`.
#[derive(Clone, Debug)]
pub struct StaticResourceLocator {
    base_url: String,
}

impl StaticResourceLocator {
    /// Create a locator under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The base URL, as configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for StaticResourceLocator {
    fn default() -> Self {
        Self::new("/static")
    }
}

impl ResourceLocator for StaticResourceLocator {
    fn resource_url(&self, block_type: &str, resource: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            block_type.trim_matches('/'),
            resource.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
