//! Markdown-to-HTML conversion.
//!
//! [`MarkdownConverter`] is the seam a host can replace; [`PulldownConverter`]
//! is the built-in implementation on top of pulldown-cmark.

use std::borrow::Cow;

use log::debug;
use pulldown_cmark::{Options, Parser, html};

use crate::extensions::{Extension, ExtensionSet};
use crate::rewrite::{Rewriter, relax_atx_headings};
use crate::spans::SpanPatterns;
use mdblock_core::Result;

/// Converts Markdown source into an HTML fragment.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` with the dialect described by `extensions`.
    ///
    /// # Errors
    ///
    /// Returns [`mdblock_core::Error::Conversion`] if the converter cannot
    /// produce HTML for the input.
    fn to_html(&self, markdown: &str, extensions: &ExtensionSet) -> Result<String>;
}

/// The built-in converter.
///
/// # Example
///
/// ```
/// use mdblock_content::{ExtensionSet, MarkdownConverter, PulldownConverter};
///
/// let converter = PulldownConverter::new().unwrap();
/// let html = converter.to_html("# Title", &ExtensionSet::default()).unwrap();
/// assert_eq!(html, "<h1>Title</h1>\n");
/// ```
#[derive(Debug)]
pub struct PulldownConverter {
    spans: SpanPatterns,
}

impl PulldownConverter {
    /// Create a converter, compiling the span patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            spans: SpanPatterns::new()?,
        })
    }
}

impl MarkdownConverter for PulldownConverter {
    fn to_html(&self, markdown: &str, extensions: &ExtensionSet) -> Result<String> {
        let source = prepare_source(markdown, extensions);
        let events: Vec<_> = Parser::new_ext(&source, parser_options(extensions))
            .into_offset_iter()
            .collect();
        let events = Rewriter::new(&source, extensions, &self.spans).rewrite(events);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        debug!(
            "Converted {} bytes of Markdown to {} bytes of HTML ({extensions})",
            markdown.len(),
            out.len()
        );
        Ok(out)
    }
}

/// Apply the source-level dialect switches before parsing.
pub(crate) fn prepare_source<'a>(markdown: &'a str, extensions: &ExtensionSet) -> Cow<'a, str> {
    if extensions.contains(Extension::SpaceHeaders) {
        Cow::Borrowed(markdown)
    } else {
        relax_atx_headings(markdown)
    }
}

pub(crate) fn parser_options(extensions: &ExtensionSet) -> Options {
    let mut options = Options::empty();
    if extensions.contains(Extension::Tables) {
        options.insert(Options::ENABLE_TABLES);
    }
    if extensions.contains(Extension::Footnotes) {
        options.insert(Options::ENABLE_FOOTNOTES);
    }
    if extensions.contains(Extension::Strikethrough) {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if extensions.contains(Extension::Math) {
        options.insert(Options::ENABLE_MATH);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(markdown: &str, extensions: &[Extension]) -> String {
        let set: ExtensionSet = extensions.iter().copied().collect();
        PulldownConverter::new()
            .unwrap()
            .to_html(markdown, &set)
            .unwrap()
    }

    fn convert_default(markdown: &str) -> String {
        PulldownConverter::new()
            .unwrap()
            .to_html(markdown, &ExtensionSet::default())
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Core Markdown
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_input() {
        assert_eq!(convert_default(""), "");
    }

    #[test]
    fn test_paragraph_and_emphasis() {
        assert_eq!(
            convert("Some *emphasis* and **strong**.", &[]),
            "<p>Some <em>emphasis</em> and <strong>strong</strong>.</p>\n"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = convert("<div class=\"x\">hi</div>\n", &[]);
        assert!(html.starts_with("<div class=\"x\">hi</div>"));
    }

    #[test]
    fn test_converter_is_object_safe() {
        let converter: Box<dyn MarkdownConverter> = Box::new(PulldownConverter::new().unwrap());
        assert_eq!(
            converter.to_html("x", &ExtensionSet::empty()).unwrap(),
            "<p>x</p>\n"
        );
    }

    // ------------------------------------------------------------------------
    // Block extensions
    // ------------------------------------------------------------------------

    #[test]
    fn test_tables_enabled() {
        let html = convert("| a | b |\n|---|---|\n| 1 | 2 |", &[Extension::Tables]);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_tables_disabled() {
        let html = convert("| a | b |\n|---|---|\n| 1 | 2 |", &[]);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_fenced_code_enabled() {
        let html = convert("```python\nprint(1)\n```", &[Extension::FencedCode]);
        assert_eq!(
            html,
            "<pre><code class=\"language-python\">print(1)\n</code></pre>\n"
        );
    }

    #[test]
    fn test_fenced_code_disabled_renders_inline() {
        let html = convert("```\nx = 1\n```", &[]);
        assert_eq!(html, "<p><code>x = 1</code></p>\n");
    }

    #[test]
    fn test_fenced_code_disabled_keeps_info_string() {
        let html = convert("```python\nprint(1)\n```", &[]);
        assert_eq!(html, "<p><code>python\nprint(1)</code></p>\n");
    }

    #[test]
    fn test_fenced_code_text_not_span_expanded() {
        let html = convert(
            "```\n==x== https://example.com\n```",
            &[Extension::FencedCode, Extension::Highlight, Extension::Autolink],
        );
        assert!(!html.contains("<mark>"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_indented_code_default() {
        let html = convert("para\n\n    code here", &[]);
        assert!(html.contains("<pre><code>code here"));
    }

    #[test]
    fn test_disable_indented_code() {
        let html = convert("para\n\n    not code", &[Extension::DisableIndentedCode]);
        assert_eq!(html, "<p>para</p>\n<p>not code</p>\n");
    }

    #[test]
    fn test_disable_indented_code_parses_inline_markdown() {
        let html = convert(
            "para\n\n    *em* and [l](http://x)",
            &[Extension::DisableIndentedCode],
        );
        assert_eq!(
            html,
            "<p>para</p>\n<p><em>em</em> and <a href=\"http://x\">l</a></p>\n"
        );
    }

    #[test]
    fn test_disable_indented_code_applies_span_extensions() {
        let html = convert(
            "    a ==mark==\n\n    #Title",
            &[Extension::DisableIndentedCode, Extension::Highlight],
        );
        assert_eq!(html, "<p>a <mark>mark</mark></p>\n<h1>Title</h1>\n");
    }

    #[test]
    fn test_footnotes() {
        let html = convert("Text[^1].\n\n[^1]: Note.", &[Extension::Footnotes]);
        assert!(html.contains("footnote-reference"));
        assert!(html.contains("footnote-definition"));
    }

    #[test]
    fn test_footnotes_disabled() {
        let html = convert("Text[^1].\n\n[^1]: Note.", &[]);
        assert!(!html.contains("footnote-reference"));
    }

    // ------------------------------------------------------------------------
    // Headings
    // ------------------------------------------------------------------------

    #[test]
    fn test_headings_without_space_by_default() {
        assert_eq!(convert("#Title", &[]), "<h1>Title</h1>\n");
    }

    #[test]
    fn test_space_headers_requires_space() {
        assert_eq!(
            convert("#Title", &[Extension::SpaceHeaders]),
            "<p>#Title</p>\n"
        );
        assert_eq!(
            convert("# Title", &[Extension::SpaceHeaders]),
            "<h1>Title</h1>\n"
        );
    }

    #[test]
    fn test_headings_without_space_in_blockquote() {
        assert_eq!(
            convert("> #quoted", &[]),
            "<blockquote>\n<h1>quoted</h1>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_headings_not_relaxed_in_html_block() {
        let html = convert("<div>\n#notheading\n</div>", &[]);
        assert!(html.contains("\n#notheading\n"));
        assert!(!html.contains("<h1>"));
    }

    // ------------------------------------------------------------------------
    // Span extensions
    // ------------------------------------------------------------------------

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            convert("~~gone~~", &[Extension::Strikethrough]),
            "<p><del>gone</del></p>\n"
        );
        assert_eq!(convert("~~gone~~", &[]), "<p>~~gone~~</p>\n");
    }

    #[test]
    fn test_underline() {
        assert_eq!(
            convert("_under_ and *em*", &[Extension::Underline]),
            "<p><u>under</u> and <em>em</em></p>\n"
        );
        assert_eq!(convert("_em_", &[]), "<p><em>em</em></p>\n");
    }

    #[test]
    fn test_highlight() {
        assert_eq!(
            convert("a ==marked== b", &[Extension::Highlight]),
            "<p>a <mark>marked</mark> b</p>\n"
        );
        assert_eq!(convert("==x==", &[]), "<p>==x==</p>\n");
    }

    #[test]
    fn test_escaped_highlight_stays_literal() {
        assert_eq!(
            convert("\\==x==", &[Extension::Highlight]),
            "<p>==x==</p>\n"
        );
        assert_eq!(
            convert("\\==a== ==b==", &[Extension::Highlight]),
            "<p>==a== <mark>b</mark></p>\n"
        );
    }

    #[test]
    fn test_escaped_quote_stays_literal() {
        let html = convert("say \\\"hi\\\"", &[Extension::Quote]);
        assert!(!html.contains("<q>"));
        assert!(html.contains("hi"));
    }

    #[test]
    fn test_quote() {
        assert_eq!(
            convert("He said \"hi\".", &[Extension::Quote]),
            "<p>He said <q>hi</q>.</p>\n"
        );
    }

    #[test]
    fn test_superscript() {
        assert_eq!(
            convert("x^2 + y^(n-1)", &[Extension::Superscript]),
            "<p>x<sup>2</sup> + y<sup>n-1</sup></p>\n"
        );
    }

    #[test]
    fn test_autolink_bare_url() {
        assert_eq!(
            convert("Visit https://example.com now", &[Extension::Autolink]),
            "<p>Visit <a href=\"https://example.com\">https://example.com</a> now</p>\n"
        );
        assert_eq!(
            convert("Visit https://example.com now", &[]),
            "<p>Visit https://example.com now</p>\n"
        );
    }

    #[test]
    fn test_autolink_not_inside_links() {
        let html = convert("[https://a.example](https://b.example)", &[Extension::Autolink]);
        assert_eq!(
            html,
            "<p><a href=\"https://b.example\">https://a.example</a></p>\n"
        );
    }

    #[test]
    fn test_spans_not_inside_inline_code() {
        assert_eq!(
            convert("`==x==`", &[Extension::Highlight]),
            "<p><code>==x==</code></p>\n"
        );
    }

    #[test]
    fn test_no_intra_emphasis() {
        assert_eq!(
            convert("snake*case*word", &[Extension::NoIntraEmphasis]),
            "<p>snake*case*word</p>\n"
        );
        assert_eq!(
            convert("snake*case*word", &[]),
            "<p>snake<em>case</em>word</p>\n"
        );
        assert_eq!(
            convert("a *real* one", &[Extension::NoIntraEmphasis]),
            "<p>a <em>real</em> one</p>\n"
        );
    }

    // ------------------------------------------------------------------------
    // Math
    // ------------------------------------------------------------------------

    #[test]
    fn test_math_display_alone() {
        assert_eq!(convert("$$x^2$$", &[Extension::Math]), "<p>\\[x^2\\]</p>\n");
    }

    #[test]
    fn test_math_display_in_text_is_inline() {
        assert_eq!(
            convert("where $$x$$ holds", &[Extension::Math]),
            "<p>where \\(x\\) holds</p>\n"
        );
    }

    #[test]
    fn test_math_single_dollar_literal_without_explicit() {
        assert_eq!(
            convert("costs $5 and $6", &[Extension::Math]),
            "<p>costs $5 and $6</p>\n"
        );
    }

    #[test]
    fn test_math_explicit() {
        let exts = [Extension::Math, Extension::MathExplicit];
        assert_eq!(convert("so $a+b$ ok", &exts), "<p>so \\(a+b\\) ok</p>\n");
        assert_eq!(
            convert("where $$x$$ holds", &exts),
            "<p>where \\[x\\] holds</p>\n"
        );
    }

    #[test]
    fn test_math_disabled_keeps_dollars() {
        assert_eq!(convert("$$x$$", &[]), "<p>$$x$$</p>\n");
    }

    // ------------------------------------------------------------------------
    // Defaults
    // ------------------------------------------------------------------------

    #[test]
    fn test_default_extensions_document() {
        let html = convert_default("# Notes\n\n```rust\nfn main() {}\n```\n\nSee www.example.org.");
        assert!(html.starts_with("<h1>Notes</h1>\n"));
        assert!(html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("<a href=\"http://www.example.org\">www.example.org</a>."));
    }
}
