//! Event-level rewriting that turns CommonMark into the block's dialect.
//!
//! pulldown-cmark parses a fixed CommonMark core plus a few options. The
//! remaining dialect switches (underline, intra-word emphasis, disabled
//! fences or indented code, math delimiters, span extensions) are applied
//! here, on the offset-annotated event stream, before HTML is written.

use std::borrow::Cow;
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use crate::converter::{parser_options, prepare_source};
use crate::extensions::{Extension, ExtensionSet};
use crate::spans::SpanPatterns;

/// How an open emphasis or strong span is being rendered.
#[derive(Debug)]
enum SpanMode {
    Keep,
    Underline,
    Literal(String),
}

/// How the currently open code block is being rendered.
#[derive(Debug)]
enum CodeMode {
    Keep,
    InlineCode(String),
    Paragraph(String),
}

pub(crate) struct Rewriter<'s, 'p> {
    source: &'s str,
    extensions: &'p ExtensionSet,
    spans: &'p SpanPatterns,
    out: Vec<Event<'s>>,
    pending_text: String,
    escaped: Vec<usize>,
    link_depth: usize,
    emphasis: Vec<SpanMode>,
    strong: Vec<SpanMode>,
    code: Option<CodeMode>,
}

impl<'s, 'p> Rewriter<'s, 'p> {
    pub(crate) fn new(
        source: &'s str,
        extensions: &'p ExtensionSet,
        spans: &'p SpanPatterns,
    ) -> Self {
        Self {
            source,
            extensions,
            spans,
            out: Vec::new(),
            pending_text: String::new(),
            escaped: Vec::new(),
            link_depth: 0,
            emphasis: Vec::new(),
            strong: Vec::new(),
            code: None,
        }
    }

    pub(crate) fn rewrite(mut self, events: Vec<(Event<'s>, Range<usize>)>) -> Vec<Event<'s>> {
        for index in 0..events.len() {
            let (event, range) = &events[index];
            match event {
                Event::Text(text) => self.text(text, range),
                Event::Start(Tag::Emphasis) => self.open_span(range, 1, false),
                Event::End(TagEnd::Emphasis) => self.close_span(false),
                Event::Start(Tag::Strong) => self.open_span(range, 2, true),
                Event::End(TagEnd::Strong) => self.close_span(true),
                Event::Start(Tag::CodeBlock(kind)) => self.open_code(kind),
                Event::End(TagEnd::CodeBlock) => self.close_code(),
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                    self.emit(event.clone());
                    self.link_depth += 1;
                }
                Event::End(TagEnd::Link | TagEnd::Image) => {
                    self.emit(event.clone());
                    self.link_depth = self.link_depth.saturating_sub(1);
                }
                Event::InlineMath(math) => {
                    let math = self.inline_math(math);
                    self.emit(math);
                }
                Event::DisplayMath(math) => {
                    let alone = is_alone_in_paragraph(&events, index);
                    let math = self.display_math(math, alone);
                    self.emit(math);
                }
                other => self.emit(other.clone()),
            }
        }
        self.flush_text();
        self.out
    }

    // ------------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------------

    fn text(&mut self, text: &str, range: &Range<usize>) {
        match self.code.as_mut() {
            Some(CodeMode::InlineCode(buf) | CodeMode::Paragraph(buf)) => buf.push_str(text),
            // Code text is emitted verbatim, never span-expanded.
            Some(CodeMode::Keep) => self.out.push(Event::Text(CowStr::from(text.to_string()))),
            None => {
                if starts_with_escape(self.source, range, text) {
                    self.escaped.push(self.pending_text.len());
                }
                self.pending_text.push_str(text);
            }
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        let escaped = std::mem::take(&mut self.escaped);
        let expanded = if self.link_depth == 0 {
            self.spans.expand(&text, self.extensions, &escaped)
        } else {
            None
        };
        match expanded {
            Some(events) => self.out.extend(events),
            None => self.out.push(Event::Text(CowStr::from(text))),
        }
    }

    fn emit(&mut self, event: Event<'s>) {
        self.flush_text();
        self.out.push(event);
    }

    // ------------------------------------------------------------------------
    // Emphasis
    // ------------------------------------------------------------------------

    fn open_span(&mut self, range: &Range<usize>, width: usize, strong: bool) {
        let delimiter = self
            .source
            .get(range.start..range.start + width)
            .unwrap_or_default();

        let mode = if self.extensions.contains(Extension::NoIntraEmphasis)
            && follows_word_char(self.source, range.start)
        {
            SpanMode::Literal(delimiter.to_string())
        } else if !strong && self.extensions.contains(Extension::Underline) && delimiter == "_" {
            SpanMode::Underline
        } else {
            SpanMode::Keep
        };

        match &mode {
            SpanMode::Literal(delimiter) => self.pending_text.push_str(delimiter),
            SpanMode::Underline => self.emit(Event::InlineHtml(CowStr::Borrowed("<u>"))),
            SpanMode::Keep => self.emit(Event::Start(if strong {
                Tag::Strong
            } else {
                Tag::Emphasis
            })),
        }

        if strong {
            self.strong.push(mode);
        } else {
            self.emphasis.push(mode);
        }
    }

    fn close_span(&mut self, strong: bool) {
        let mode = if strong {
            self.strong.pop()
        } else {
            self.emphasis.pop()
        };

        match mode.unwrap_or(SpanMode::Keep) {
            SpanMode::Literal(delimiter) => self.pending_text.push_str(&delimiter),
            SpanMode::Underline => self.emit(Event::InlineHtml(CowStr::Borrowed("</u>"))),
            SpanMode::Keep => self.emit(Event::End(if strong {
                TagEnd::Strong
            } else {
                TagEnd::Emphasis
            })),
        }
    }

    // ------------------------------------------------------------------------
    // Code blocks
    // ------------------------------------------------------------------------

    fn open_code(&mut self, kind: &CodeBlockKind<'s>) {
        let mode = match kind {
            // The whole fence reads as one code span, info string included.
            CodeBlockKind::Fenced(info) if !self.extensions.contains(Extension::FencedCode) => {
                if info.is_empty() {
                    CodeMode::InlineCode(String::new())
                } else {
                    CodeMode::InlineCode(format!("{info}\n"))
                }
            }
            CodeBlockKind::Indented
                if self.extensions.contains(Extension::DisableIndentedCode) =>
            {
                CodeMode::Paragraph(String::new())
            }
            _ => {
                self.emit(Event::Start(Tag::CodeBlock(kind.clone())));
                CodeMode::Keep
            }
        };
        self.flush_text();
        self.code = Some(mode);
    }

    fn close_code(&mut self) {
        match self.code.take() {
            Some(CodeMode::InlineCode(buf)) => {
                self.emit(Event::Start(Tag::Paragraph));
                self.emit(Event::Code(CowStr::from(buf.trim_end_matches('\n').to_string())));
                self.emit(Event::End(TagEnd::Paragraph));
            }
            Some(CodeMode::Paragraph(buf)) => {
                for event in self.reparse(&buf) {
                    self.emit(event);
                }
            }
            Some(CodeMode::Keep) | None => self.emit(Event::End(TagEnd::CodeBlock)),
        }
    }

    /// Parse the text of an indented block as ordinary Markdown.
    fn reparse(&self, markdown: &str) -> Vec<Event<'static>> {
        let source = prepare_source(markdown, self.extensions);
        let events: Vec<_> = Parser::new_ext(&source, parser_options(self.extensions))
            .into_offset_iter()
            .collect();
        Rewriter::new(&source, self.extensions, self.spans)
            .rewrite(events)
            .into_iter()
            .map(Event::into_static)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Math
    // ------------------------------------------------------------------------

    fn inline_math(&self, math: &str) -> Event<'s> {
        if self.extensions.contains(Extension::MathExplicit) {
            Event::Text(CowStr::from(format!("\\({math}\\)")))
        } else {
            // Single dollars are only math in explicit mode.
            Event::Text(CowStr::from(format!("${math}$")))
        }
    }

    fn display_math(&self, math: &str, alone: bool) -> Event<'s> {
        if alone || self.extensions.contains(Extension::MathExplicit) {
            Event::Text(CowStr::from(format!("\\[{math}\\]")))
        } else {
            Event::Text(CowStr::from(format!("\\({math}\\)")))
        }
    }
}

fn follows_word_char(source: &str, offset: usize) -> bool {
    source
        .get(..offset)
        .and_then(|before| before.chars().next_back())
        .is_some_and(char::is_alphanumeric)
}

/// Whether the first character of a text event was written as a backslash
/// escape in the source.
fn starts_with_escape(source: &str, range: &Range<usize>, text: &str) -> bool {
    let Some(first) = text.chars().next().filter(char::is_ascii_punctuation) else {
        return false;
    };
    let raw = source.get(range.clone()).unwrap_or_default();
    if raw.starts_with('\\') && first != '\\' {
        return true;
    }
    let backslashes = source
        .get(..range.start)
        .unwrap_or_default()
        .bytes()
        .rev()
        .take_while(|b| *b == b'\\')
        .count();
    backslashes % 2 == 1 && raw.starts_with(first)
}

fn is_alone_in_paragraph(events: &[(Event<'_>, Range<usize>)], index: usize) -> bool {
    let before = index
        .checked_sub(1)
        .and_then(|i| events.get(i))
        .map(|(event, _)| event);
    let after = events.get(index + 1).map(|(event, _)| event);
    matches!(before, Some(Event::Start(Tag::Paragraph)))
        && matches!(after, Some(Event::End(TagEnd::Paragraph)))
}

// ============================================================================
// Source preprocessing
// ============================================================================

/// Insert the space CommonMark requires after ATX heading markers, so that
/// `#Title` is a heading, including inside blockquotes. Fenced code,
/// indented code, and raw HTML blocks are left alone.
pub(crate) fn relax_atx_headings(source: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(source.len() + 16);
    let mut fence: Option<(char, usize)> = None;
    let mut in_html = false;
    let mut changed = false;

    for line in source.split_inclusive('\n') {
        if line.trim().is_empty() {
            in_html = false;
            out.push_str(line);
            continue;
        }
        let Some(prefix) = block_prefix(line) else {
            out.push_str(line);
            continue;
        };
        let body = &line[prefix..];

        if let Some((open, open_len)) = fence {
            if let Some((marker, len)) = fence_marker(body)
                && marker == open
                && len >= open_len
            {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if in_html || starts_html_block(body) {
            in_html = true;
            out.push_str(line);
            continue;
        }
        if let Some(marker) = fence_marker(body) {
            fence = Some(marker);
            out.push_str(line);
            continue;
        }

        let hashes = body.len() - body.trim_start_matches('#').len();
        let rest = &body[hashes..];
        let needs_space = (1..=6).contains(&hashes)
            && rest
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace() && c != '#');
        if needs_space {
            out.push_str(&line[..prefix + hashes]);
            out.push(' ');
            out.push_str(rest);
            changed = true;
        } else {
            out.push_str(line);
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(source)
    }
}

/// Byte length of a line's leading indentation and blockquote markers, or
/// `None` when the line is indented code.
fn block_prefix(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut pos = 0;
    loop {
        let spaces = bytes[pos..].iter().take_while(|b| **b == b' ').count();
        if spaces > 3 {
            return None;
        }
        pos += spaces;
        if bytes.get(pos) != Some(&b'>') {
            return Some(pos);
        }
        pos += 1;
        if bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
    }
}

/// Whether `body` opens a raw HTML block, which runs to the next blank line.
fn starts_html_block(body: &str) -> bool {
    let mut chars = body.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn fence_marker(body: &str) -> Option<(char, usize)> {
    let marker = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = body.len() - body.trim_start_matches(marker).len();
    (len >= 3).then_some((marker, len))
}
