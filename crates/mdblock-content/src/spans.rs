//! Inline span extensions matched in plain text.
//!
//! CommonMark has no syntax for highlights, inline quotes, caret
//! superscripts, or bare-URL links. These are recognised after parsing, in
//! the merged text of each inline run, and expanded into events.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::{Match, Regex};

use crate::extensions::{Extension, ExtensionSet};
use mdblock_core::{Error, Result};

/// Trailing characters never treated as part of a bare URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '*', '_', '~'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpanKind {
    Url,
    Email,
    Highlight,
    Quote,
    Superscript,
}

/// Compiled span patterns, built once per converter.
#[derive(Debug)]
pub(crate) struct SpanPatterns {
    url: Regex,
    email: Regex,
    highlight: Regex,
    quote: Regex,
    superscript: Regex,
}

impl SpanPatterns {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            url: compile(r"\b(?:(?:https?|ftp)://|www\.)[^\s<>]+")?,
            email: compile(
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}\b",
            )?,
            highlight: compile(r"==([^=\s](?:[^=]*[^=\s])?)==")?,
            quote: compile(r#""([^"\n]+)""#)?,
            superscript: compile(r"\^\(([^)\n]+)\)|\^([^\s^()]+)")?,
        })
    }

    /// Expand the span extensions enabled in `extensions` within `text`.
    ///
    /// `escaped` lists byte offsets of characters written with a backslash
    /// escape; a span whose delimiter sits on one of them is left as text.
    /// Returns `None` when nothing matched, so callers can keep the original
    /// text event.
    pub(crate) fn expand<'a>(
        &self,
        text: &str,
        extensions: &ExtensionSet,
        escaped: &[usize],
    ) -> Option<Vec<Event<'a>>> {
        let enabled = self.enabled(extensions);
        if enabled.is_empty() {
            return None;
        }

        let mut events = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some((kind, found)) = earliest_match(&enabled, text, pos) else {
                break;
            };
            let usable = if found.delimiter_escaped(escaped) {
                None
            } else {
                expand_match(kind, &found)
            };
            let Some((consumed, span_events)) = usable else {
                // Nothing usable at this position; step past its first char.
                let step = text[found.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                push_text(&mut events, &text[pos..found.start() + step]);
                pos = found.start() + step;
                continue;
            };
            push_text(&mut events, &text[pos..found.start()]);
            events.extend(span_events);
            pos = found.start() + consumed;
        }

        if events.is_empty() {
            return None;
        }
        push_text(&mut events, &text[pos..]);
        Some(events)
    }

    fn enabled(&self, extensions: &ExtensionSet) -> Vec<(SpanKind, &Regex)> {
        let mut enabled = Vec::new();
        if extensions.contains(Extension::Autolink) {
            enabled.push((SpanKind::Url, &self.url));
            enabled.push((SpanKind::Email, &self.email));
        }
        if extensions.contains(Extension::Highlight) {
            enabled.push((SpanKind::Highlight, &self.highlight));
        }
        if extensions.contains(Extension::Quote) {
            enabled.push((SpanKind::Quote, &self.quote));
        }
        if extensions.contains(Extension::Superscript) {
            enabled.push((SpanKind::Superscript, &self.superscript));
        }
        enabled
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::invalid_data(format!("span pattern: {e}")))
}

/// The leftmost match among the enabled patterns; ties go to the earlier
/// pattern.
fn earliest_match<'t>(
    enabled: &[(SpanKind, &Regex)],
    text: &'t str,
    pos: usize,
) -> Option<(SpanKind, Captured<'t>)> {
    enabled
        .iter()
        .filter_map(|(kind, regex)| {
            let caps = regex.captures_at(text, pos)?;
            Captured::from_captures(&caps).map(|found| (*kind, found))
        })
        .min_by_key(|(_, found)| found.start())
}

/// The parts of a regex match needed to build events.
struct Captured<'t> {
    whole: Match<'t>,
    inner: Option<Match<'t>>,
}

impl<'t> Captured<'t> {
    fn from_captures(caps: &regex::Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        let inner = caps.get(1).or_else(|| caps.get(2));
        Some(Self { whole, inner })
    }

    fn start(&self) -> usize {
        self.whole.start()
    }

    fn as_str(&self) -> &'t str {
        self.whole.as_str()
    }

    fn inner_str(&self) -> Option<&'t str> {
        self.inner.map(|m| m.as_str())
    }

    /// Whether an escaped character falls on the match outside its inner
    /// capture, i.e. on an opening or closing delimiter.
    fn delimiter_escaped(&self, escaped: &[usize]) -> bool {
        escaped.iter().any(|&offset| {
            self.whole.range().contains(&offset)
                && !self.inner.is_some_and(|inner| inner.range().contains(&offset))
        })
    }
}

/// Build the events for one match. Returns the number of bytes consumed
/// (a bare URL may give back trailing punctuation) and the events.
fn expand_match<'a>(kind: SpanKind, found: &Captured<'_>) -> Option<(usize, Vec<Event<'a>>)> {
    match kind {
        SpanKind::Url => {
            let url = trim_url(found.as_str());
            if url.is_empty() || url.ends_with("://") || url == "www." {
                return None;
            }
            let href = if url.starts_with("www.") {
                format!("http://{url}")
            } else {
                url.to_string()
            };
            Some((url.len(), link_events(LinkType::Autolink, href, url)))
        }
        SpanKind::Email => {
            let address = found.as_str();
            Some((
                address.len(),
                link_events(LinkType::Email, address.to_string(), address),
            ))
        }
        SpanKind::Highlight => wrap_html(found, "<mark>", "</mark>"),
        SpanKind::Quote => wrap_html(found, "<q>", "</q>"),
        SpanKind::Superscript => {
            let inner = found.inner_str()?;
            Some((
                found.as_str().len(),
                vec![
                    Event::Start(Tag::Superscript),
                    Event::Text(CowStr::from(inner.to_string())),
                    Event::End(TagEnd::Superscript),
                ],
            ))
        }
    }
}

fn wrap_html<'a>(
    found: &Captured<'_>,
    open: &'static str,
    close: &'static str,
) -> Option<(usize, Vec<Event<'a>>)> {
    let inner = found.inner_str()?;
    Some((
        found.as_str().len(),
        vec![
            Event::InlineHtml(CowStr::Borrowed(open)),
            Event::Text(CowStr::from(inner.to_string())),
            Event::InlineHtml(CowStr::Borrowed(close)),
        ],
    ))
}

fn link_events<'a>(link_type: LinkType, dest: String, label: &str) -> Vec<Event<'a>> {
    vec![
        Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::from(dest),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }),
        Event::Text(CowStr::from(label.to_string())),
        Event::End(TagEnd::Link),
    ]
}

/// Drop trailing punctuation and an unbalanced closing parenthesis.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(URL_TRAILING);
        let trimmed = match trimmed.strip_suffix(')') {
            Some(rest) if trimmed.matches('(').count() < trimmed.matches(')').count() => rest,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

fn push_text<'a>(events: &mut Vec<Event<'a>>, text: &str) {
    if !text.is_empty() {
        events.push(Event::Text(CowStr::from(text.to_string())));
    }
}
