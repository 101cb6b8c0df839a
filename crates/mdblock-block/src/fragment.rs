//! Renderable HTML fragments.
//!
//! A [`Fragment`] is what a view returns to the host: body HTML plus the
//! stylesheets and scripts the body needs. The host decides where the
//! resources go; [`Fragment::to_page`] is a standalone rendering for
//! previews.

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use mdblock_core::{Error, Result};

pub const MIMETYPE_CSS: &str = "text/css";
pub const MIMETYPE_JAVASCRIPT: &str = "application/javascript";

/// Whether a resource is a reference or inline text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Url,
    Text,
}

/// Where on the page a resource belongs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Head,
    Foot,
}

/// A stylesheet or script attached to a fragment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentResource {
    pub kind: ResourceKind,
    pub data: String,
    pub mimetype: String,
    pub placement: Placement,
}

impl FragmentResource {
    /// Render as the HTML tag that loads or embeds this resource.
    pub fn to_html(&self) -> String {
        match (self.kind, self.mimetype.as_str()) {
            (ResourceKind::Url, MIMETYPE_CSS) => format!(
                "<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\">",
                escape(self.data.as_str())
            ),
            (ResourceKind::Text, MIMETYPE_CSS) => {
                format!("<style type=\"text/css\">\n{}\n</style>", self.data)
            }
            (ResourceKind::Url, mimetype) => format!(
                "<script src=\"{}\" type=\"{}\"></script>",
                escape(self.data.as_str()),
                escape(mimetype)
            ),
            (ResourceKind::Text, mimetype) => format!(
                "<script type=\"{}\">\n{}\n</script>",
                escape(mimetype),
                self.data
            ),
        }
    }
}

/// Body HTML plus attached resources, in attachment order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    content: String,
    resources: Vec<FragmentResource>,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            resources: Vec::new(),
        }
    }

    /// The body HTML.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn resources(&self) -> &[FragmentResource] {
        &self.resources
    }

    pub fn add_resource(
        &mut self,
        kind: ResourceKind,
        data: impl Into<String>,
        mimetype: impl Into<String>,
        placement: Placement,
    ) {
        self.resources.push(FragmentResource {
            kind,
            data: data.into(),
            mimetype: mimetype.into(),
            placement,
        });
    }

    /// Attach a stylesheet by URL.
    pub fn add_css_url(&mut self, url: impl Into<String>) {
        self.add_resource(ResourceKind::Url, url, MIMETYPE_CSS, Placement::Head);
    }

    /// Attach stylesheet text inline.
    pub fn add_css(&mut self, css: impl Into<String>) {
        self.add_resource(ResourceKind::Text, css, MIMETYPE_CSS, Placement::Head);
    }

    /// Attach a script by URL, loaded at the end of the body.
    pub fn add_javascript_url(&mut self, url: impl Into<String>) {
        self.add_resource(ResourceKind::Url, url, MIMETYPE_JAVASCRIPT, Placement::Foot);
    }

    /// URLs of attached stylesheets.
    pub fn css_urls(&self) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|r| r.kind == ResourceKind::Url && r.mimetype == MIMETYPE_CSS)
            .map(|r| r.data.as_str())
            .collect()
    }

    /// Tags for resources placed in the page head, one per line.
    pub fn head_html(&self) -> String {
        self.placed_html(Placement::Head)
    }

    /// Tags for resources placed at the end of the body, one per line.
    pub fn foot_html(&self) -> String {
        self.placed_html(Placement::Foot)
    }

    /// A complete standalone HTML page.
    pub fn to_page(&self, title: &str) -> String {
        format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
                "<title>{}</title>\n{}</head>\n<body>\n{}\n{}</body>\n</html>\n",
            ),
            escape(title),
            self.head_html(),
            self.content,
            self.foot_html()
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::serialization(e.to_string()))
    }

    fn placed_html(&self, placement: Placement) -> String {
        self.resources
            .iter()
            .filter(|r| r.placement == placement)
            .map(|r| r.to_html() + "\n")
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Fragment {
        let mut fragment = Fragment::new("<p>hi</p>");
        fragment.add_css_url("/static/markdown/public/css/highlight.css");
        fragment.add_css("pre { color: red; }");
        fragment.add_javascript_url("/static/app.js?a=1&b=2");
        fragment
    }

    #[test]
    fn test_fragment_new_is_empty() {
        let fragment = Fragment::new("");
        assert_eq!(fragment.content(), "");
        assert!(fragment.resources().is_empty());
        assert_eq!(fragment.head_html(), "");
        assert_eq!(fragment.foot_html(), "");
    }

    #[test]
    fn test_css_urls_only_lists_stylesheet_urls() {
        assert_eq!(
            sample().css_urls(),
            vec!["/static/markdown/public/css/highlight.css"]
        );
    }

    #[test]
    fn test_resource_placement() {
        let fragment = sample();
        let placements: Vec<_> = fragment.resources().iter().map(|r| r.placement).collect();
        assert_eq!(
            placements,
            vec![Placement::Head, Placement::Head, Placement::Foot]
        );
    }

    #[test]
    fn test_head_html() {
        assert_eq!(
            sample().head_html(),
            "<link rel=\"stylesheet\" href=\"/static/markdown/public/css/highlight.css\" type=\"text/css\">\n\
             <style type=\"text/css\">\npre { color: red; }\n</style>\n"
        );
    }

    #[test]
    fn test_foot_html_escapes_url() {
        assert_eq!(
            sample().foot_html(),
            "<script src=\"/static/app.js?a=1&amp;b=2\" type=\"application/javascript\"></script>\n"
        );
    }

    #[test]
    fn test_to_page() {
        let page = sample().to_page("Notes & More");
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains("<title>Notes &amp; More</title>"));
        assert!(page.contains("<body>\n<p>hi</p>\n<script"));
        let head_end = page.find("</head>").unwrap();
        assert!(page.find("highlight.css").unwrap() < head_end);
        assert!(page.find("app.js").unwrap() > head_end);
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["content"], "<p>hi</p>");
        assert_eq!(value["resources"][0]["kind"], "url");
        assert_eq!(value["resources"][0]["mimetype"], "text/css");
        assert_eq!(value["resources"][2]["placement"], "foot");

        let back: Fragment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
