//! Handler functions for block commands.
//!
//! Implements `mdblock preview`, `mdblock fields`, and `mdblock extensions`.

use std::path::Path;
use std::sync::Arc;

use mdblock_block::demo::DEMO_XML;
use mdblock_block::fragment::{MIMETYPE_CSS, ResourceKind};
use mdblock_block::resources::resource_text;
use mdblock_block::{
    BlockRuntime, ContentBlock, Fragment, HIGHLIGHT_STYLESHEET, ViewContext, field_schema,
};
use mdblock_content::{Extension, ExtensionSet};
use mdblock_core::{
    AssetStore, Error, FsAssetStore, HostState, MemoryAssetStore, ResourceLocator, Result,
    StaticResourceLocator,
};
use tracing::{debug, info};

use crate::cli::PreviewArgs;
use crate::config::MdblockConfig;

// ============================================================================
// preview
// ============================================================================

/// Render a preview and write it to `--output` or stdout.
pub fn handle_preview(config: &MdblockConfig, args: &PreviewArgs) -> Result<()> {
    let rendered = render_preview(config, args)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| Error::io_with_path(e, path))?;
            info!("Wrote preview to {path}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Build the block described by `args`, render it, and format the result.
pub fn render_preview(config: &MdblockConfig, args: &PreviewArgs) -> Result<String> {
    let block = load_block(config, args)?;
    let runtime = BlockRuntime::new(host_state(config))?;

    let mut ctx = ViewContext::new(&runtime);
    if let Some(course) = args.course.as_ref().or(config.render.course_id.as_ref()) {
        ctx = ctx.with_course(course.as_str());
    }

    let mut fragment = block.render(&ctx)?;
    if args.inline_css || config.render.inline_css {
        fragment = inline_stylesheet(&fragment, &runtime);
    }

    if args.json {
        fragment.to_json()
    } else {
        Ok(fragment.to_page(&block.title))
    }
}

fn load_block(config: &MdblockConfig, args: &PreviewArgs) -> Result<ContentBlock> {
    let mut block = match (&args.xml, &args.markdown) {
        (Some(path), _) => ContentBlock::from_xml(&read_file(path)?)?,
        (None, Some(path)) => ContentBlock::new()
            .with_content(read_file(path)?)
            .with_extensions(config.extension_set()?),
        (None, None) => {
            debug!("No input given; previewing the demo block");
            ContentBlock::from_xml(DEMO_XML)?
        }
    };

    if let Some(filename) = &args.filename {
        block.source_path = filename.clone();
    }
    if let Some(extensions) = &args.extensions {
        block.extensions = ExtensionSet::parse_csv(extensions)?;
    }
    Ok(block)
}

fn host_state(config: &MdblockConfig) -> HostState {
    let assets: Arc<dyn AssetStore> = match config.asset_root() {
        Some(root) => {
            debug!("Serving course assets from {}", root.display());
            Arc::new(FsAssetStore::new(root))
        }
        None => Arc::new(MemoryAssetStore::new()),
    };
    let resources: Arc<dyn ResourceLocator> =
        Arc::new(StaticResourceLocator::new(config.resources.base_url.clone()));
    HostState::from_arcs(assets, resources)
}

/// Replace the linked highlighting stylesheet with its packaged text.
fn inline_stylesheet(fragment: &Fragment, runtime: &BlockRuntime) -> Fragment {
    let linked = runtime.resource_url(HIGHLIGHT_STYLESHEET);
    let mut inlined = Fragment::new(fragment.content());
    for resource in fragment.resources() {
        let is_highlight = resource.kind == ResourceKind::Url
            && resource.mimetype == MIMETYPE_CSS
            && resource.data == linked;
        match resource_text(HIGHLIGHT_STYLESHEET).filter(|_| is_highlight) {
            Some(css) => inlined.add_css(css),
            None => inlined.add_resource(
                resource.kind,
                resource.data.clone(),
                resource.mimetype.clone(),
                resource.placement,
            ),
        }
    }
    inlined
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, Path::new(path)))
}

// ============================================================================
// fields / extensions
// ============================================================================

/// Print the editable field schema as JSON.
pub fn handle_fields() -> Result<()> {
    let json = serde_json::to_string_pretty(&field_schema())
        .map_err(|e| Error::serialization(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Print the available extensions, marking the defaults.
pub fn handle_extensions() -> Result<()> {
    for line in extension_lines() {
        println!("{line}");
    }
    Ok(())
}

fn extension_lines() -> Vec<String> {
    let defaults = ExtensionSet::default();
    Extension::ALL
        .into_iter()
        .map(|ext| {
            let marker = if defaults.contains(ext) { "*" } else { " " };
            format!("{marker} {:<22} {}", ext.as_str(), ext.display_name())
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
