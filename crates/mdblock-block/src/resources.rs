//! Packaged templates and static resources.

use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;

use mdblock_core::{Error, Result};

/// Template wrapping the converted HTML.
pub const MAIN_TEMPLATE: &str = "templates/main.html";

/// Stylesheet attached when fenced code is enabled.
pub const HIGHLIGHT_STYLESHEET: &str = "public/css/highlight.css";

const MAIN_TEMPLATE_SOURCE: &str = include_str!("../templates/main.html");
const HIGHLIGHT_STYLESHEET_SOURCE: &str = include_str!("../public/css/highlight.css");

/// Text of a packaged static resource, by its resource path.
pub fn resource_text(path: &str) -> Option<&'static str> {
    match path {
        HIGHLIGHT_STYLESHEET => Some(HIGHLIGHT_STYLESHEET_SOURCE),
        _ => None,
    }
}

/// Renders the packaged templates.
///
/// Templates are compiled once at construction. Undefined variables are an
/// error, and `.html` templates autoescape, so pre-rendered HTML must be
/// marked `|safe` in the template.
#[derive(Debug)]
pub struct TemplateLoader {
    env: Environment<'static>,
}

impl TemplateLoader {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(MAIN_TEMPLATE, MAIN_TEMPLATE_SOURCE)
            .map_err(|e| Error::template(format!("failed to load {MAIN_TEMPLATE}: {e}")))?;
        Ok(Self { env })
    }

    /// Render the template `name` with `ctx`.
    pub fn render(&self, name: &str, ctx: impl Serialize) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| Error::template(format!("unknown template {name}: {e}")))?;
        template
            .render(ctx)
            .map_err(|e| Error::template(format!("failed to render {name}: {e}")))
    }

    /// Wrap converted HTML in the block's container.
    pub fn render_main(&self, content: &str) -> Result<String> {
        self.render(MAIN_TEMPLATE, context! { content => content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_main_embeds_html_verbatim() {
        let loader = TemplateLoader::new().unwrap();
        let html = loader.render_main("<p>a &amp; <b>b</b></p>").unwrap();
        assert_eq!(
            html,
            "<div class=\"markdown-block\">\n<p>a &amp; <b>b</b></p>\n</div>"
        );
    }

    #[test]
    fn test_render_main_empty() {
        let loader = TemplateLoader::new().unwrap();
        assert_eq!(
            loader.render_main("").unwrap(),
            "<div class=\"markdown-block\">\n\n</div>"
        );
    }

    #[test]
    fn test_render_missing_variable_fails() {
        let loader = TemplateLoader::new().unwrap();
        let err = loader.render(MAIN_TEMPLATE, context! {}).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_render_unknown_template() {
        let loader = TemplateLoader::new().unwrap();
        let err = loader.render("templates/other.html", context! {}).unwrap_err();
        assert!(err.to_string().contains("templates/other.html"));
    }

    #[test]
    fn test_resource_text() {
        let css = resource_text(HIGHLIGHT_STYLESHEET).unwrap();
        assert!(css.contains(".markdown-block pre"));
        assert!(resource_text("public/css/missing.css").is_none());
    }
}
