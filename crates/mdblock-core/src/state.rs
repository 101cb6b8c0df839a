//! Host collaborator container.
//!
//! Provides [`HostState`], a cheaply cloneable bundle of the collaborators
//! the embedding platform supplies: the course [`AssetStore`] and the
//! [`ResourceLocator`] for packaged static files.
//!
//! # Example
//!
//! ```
//! use mdblock_core::assets::{MemoryAssetStore, StaticResourceLocator};
//! use mdblock_core::HostState;
//!
//! let host = HostState::new(MemoryAssetStore::new(), StaticResourceLocator::default());
//! assert_eq!(
//!     host.resources().resource_url("markdown", "public/css/highlight.css"),
//!     "/static/markdown/public/css/highlight.css"
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use crate::traits::{AssetStore, ResourceLocator};

/// Thread-safe handle on the host's collaborators.
///
/// Cloning is cheap (two `Arc` clones). Multiple renders can share the same
/// state concurrently since both collaborators are read-only.
#[derive(Clone)]
pub struct HostState {
    assets: Arc<dyn AssetStore>,
    resources: Arc<dyn ResourceLocator>,
}

impl HostState {
    /// Create a new state owning the given collaborators.
    pub fn new(
        assets: impl AssetStore + 'static,
        resources: impl ResourceLocator + 'static,
    ) -> Self {
        Self {
            assets: Arc::new(assets),
            resources: Arc::new(resources),
        }
    }

    /// Create a state from collaborators that are already shared elsewhere.
    pub fn from_arcs(assets: Arc<dyn AssetStore>, resources: Arc<dyn ResourceLocator>) -> Self {
        Self { assets, resources }
    }

    /// The course asset store.
    pub fn assets(&self) -> &dyn AssetStore {
        self.assets.as_ref()
    }

    /// The packaged-resource locator.
    pub fn resources(&self) -> &dyn ResourceLocator {
        self.resources.as_ref()
    }

    /// A shareable handle to the asset store.
    pub fn assets_arc(&self) -> Arc<dyn AssetStore> {
        Arc::clone(&self.assets)
    }
}

impl fmt::Debug for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostState").finish_non_exhaustive()
    }
}
