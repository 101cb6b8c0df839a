//! Whitespace normalization for Markdown held inside markup.
//!
//! Markdown is indentation sensitive, but a body embedded in a markup file
//! is usually indented to match the surrounding elements. [`dedent`] removes
//! only that shared margin so relative indentation survives.

const INDENT_CHARS: [char; 2] = [' ', '\t'];

/// Remove the leading whitespace common to every non-blank line.
///
/// Lines made only of spaces and tabs do not take part in computing the
/// margin and come out empty. Tabs and spaces are not interchangeable: the
/// margin is the longest shared string prefix.
///
/// # Example
///
/// ```
/// use mdblock_core::util::text::dedent;
///
/// let text = "  # Title\n\n      code\n  text\n";
/// assert_eq!(dedent(text), "# Title\n\n    code\ntext\n");
/// ```
pub fn dedent(text: &str) -> String {
    let margin = common_margin(text);

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (body, ending) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        if !is_blank(body) {
            out.push_str(body.strip_prefix(margin).unwrap_or(body));
        }
        out.push_str(ending);
    }
    out
}

/// Normalize the text body of a markup node into Markdown source.
///
/// Strips a single leading newline (left by pretty-printers), trims
/// trailing whitespace, then [`dedent`]s.
pub fn normalize_markup_body(text: &str) -> String {
    let text = text.strip_prefix('\n').unwrap_or(text);
    dedent(text.trim_end())
}

fn common_margin(text: &str) -> &str {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if is_blank(line) {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start_matches(INDENT_CHARS).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    margin.unwrap_or("")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

fn is_blank(line: &str) -> bool {
    line.trim_matches(INDENT_CHARS).is_empty()
}
