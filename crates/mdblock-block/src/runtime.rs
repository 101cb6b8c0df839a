//! Block runtime and per-view context.
//!
//! A [`BlockRuntime`] is built once per host and holds everything a render
//! needs besides the block itself: the host collaborators, the Markdown
//! converter, and the compiled templates. A [`ViewContext`] carries the
//! per-request facts, currently the course the block is viewed in.

use std::fmt;
use std::sync::Arc;

use mdblock_content::{MarkdownConverter, PulldownConverter};
use mdblock_core::{HostState, Result};

use crate::resources::TemplateLoader;

/// Block type used when resolving packaged resource URLs.
pub const BLOCK_TYPE: &str = "markdown";

/// Shared, read-only render machinery.
#[derive(Clone)]
pub struct BlockRuntime {
    host: HostState,
    converter: Arc<dyn MarkdownConverter>,
    templates: Arc<TemplateLoader>,
}

impl BlockRuntime {
    /// Create a runtime with the built-in converter.
    pub fn new(host: HostState) -> Result<Self> {
        Ok(Self {
            host,
            converter: Arc::new(PulldownConverter::new()?),
            templates: Arc::new(TemplateLoader::new()?),
        })
    }

    /// Replace the Markdown converter.
    pub fn with_converter(mut self, converter: impl MarkdownConverter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    pub fn host(&self) -> &HostState {
        &self.host
    }

    pub fn converter(&self) -> &dyn MarkdownConverter {
        self.converter.as_ref()
    }

    pub fn templates(&self) -> &TemplateLoader {
        &self.templates
    }

    /// URL of a packaged resource of this block type.
    pub fn resource_url(&self, resource: &str) -> String {
        self.host.resources().resource_url(BLOCK_TYPE, resource)
    }
}

impl fmt::Debug for BlockRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRuntime")
            .field("host", &self.host)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

/// Per-render context.
#[derive(Clone, Debug)]
pub struct ViewContext<'a> {
    runtime: &'a BlockRuntime,
    course_id: Option<String>,
}

impl<'a> ViewContext<'a> {
    /// A context with no course.
    pub fn new(runtime: &'a BlockRuntime) -> Self {
        Self {
            runtime,
            course_id: None,
        }
    }

    /// Set the course the block is viewed in.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn runtime(&self) -> &'a BlockRuntime {
        self.runtime
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref()
    }
}
