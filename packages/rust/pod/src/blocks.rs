//! Line classification, section lookup, and indented-block extraction.
//!
//! POD structure is line oriented: `=headN` starts a heading, a handful of
//! bare `=` commands only carry structure, and any line that starts with two
//! or more spaces is verbatim (code). Everything here works directly on the
//! raw text; callers re-scan instead of sharing a parse tree.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `=head1 Text` through `=head4 Text`.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=head([1-4])\s+(.+?)\s*$").expect("valid regex"));

/// Matches a structural command line with at most a bullet/number argument.
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=(pod|cut|over|back|item)(?:\s+(\*|\d+(?:\.\d*)?))?\s*$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Structural POD commands that carry no renderable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `=pod`
    Pod,
    /// `=cut`
    Cut,
    /// `=over [indent]`
    Over,
    /// `=back`
    Back,
    /// `=item`, `=item *`, `=item 3.`
    Item,
}

/// One classified line of a POD document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    PlainLine(&'a str),
    /// A line indented by two or more spaces, indentation still attached.
    CodeLine(&'a str),
    Directive(Directive),
}

/// A maximal run of indented lines with the shared indentation removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Dedented code, never blank.
    pub text: String,
    /// Byte offset of the first line of the run in the scanned text.
    pub start: usize,
    /// Byte offset just past the last line of the run (before its newline).
    pub end: usize,
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

/// Iterate `(start, line, next_start)` triples; `line` has its `\n`/`\r\n` removed.
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str, usize)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        (start, line, offset)
    })
}

/// Parse a `=headN` line into its level and text.
pub(crate) fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().parse().ok()?;
    Some((level, caps.get(2)?.as_str()))
}

/// Recognise a line that consists only of a structural command.
pub(crate) fn parse_directive(line: &str) -> Option<Directive> {
    let caps = DIRECTIVE_RE.captures(line)?;
    let arg = caps.get(2).map(|m| m.as_str());
    match (&caps[1], arg) {
        ("pod", None) => Some(Directive::Pod),
        ("cut", None) => Some(Directive::Cut),
        ("back", None) => Some(Directive::Back),
        ("over", None) => Some(Directive::Over),
        ("over", Some(n)) if n != "*" => Some(Directive::Over),
        ("item", _) => Some(Directive::Item),
        _ => None,
    }
}

/// `=cut` ends a POD block even when followed by a comment.
pub(crate) fn is_cut(line: &str) -> bool {
    line.strip_prefix("=cut")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

pub(crate) fn is_code_line(line: &str) -> bool {
    line.starts_with("  ")
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Classify a single line.
pub fn classify_line(line: &str) -> Block<'_> {
    if let Some((level, text)) = parse_heading(line) {
        return Block::Heading { level, text };
    }
    if let Some(directive) = parse_directive(line) {
        return Block::Directive(directive);
    }
    if is_code_line(line) {
        return Block::CodeLine(line);
    }
    Block::PlainLine(line)
}

/// Split a document into one [`Block`] per line.
pub fn segment(markup: &str) -> Vec<Block<'_>> {
    lines_with_offsets(markup)
        .map(|(_, line, _)| classify_line(line))
        .collect()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Return the body of the section whose heading text equals `name`
/// (ASCII case-insensitive), at any heading level.
///
/// The body runs from the line after the heading up to the next heading at
/// the same or a shallower level, a `=cut`, or the end of the document.
pub fn find_section<'a>(markup: &'a str, name: &str) -> Option<&'a str> {
    let name = name.trim();
    let mut open: Option<(usize, u8)> = None;

    for (start, line, next) in lines_with_offsets(markup) {
        match open {
            None => {
                match parse_heading(line) {
                    Some((level, text)) if text.eq_ignore_ascii_case(name) => {
                        open = Some((next, level));
                    }
                    _ => {}
                }
            }
            Some((body_start, level)) => {
                let closes = is_cut(line) || parse_heading(line).is_some_and(|(l, _)| l <= level);
                if closes {
                    return Some(&markup[body_start..start]);
                }
            }
        }
    }

    open.map(|(body_start, _)| &markup[body_start..])
}

// ---------------------------------------------------------------------------
// Indented blocks
// ---------------------------------------------------------------------------

/// Collect every run of indented lines in `text`, in order.
///
/// Any non-indented line, including an empty one, ends the current run.
/// Runs that are blank after trimming are dropped.
pub fn extract_indented_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut run_start = 0;
    let mut run_end = 0;

    for (start, line, _) in lines_with_offsets(text) {
        if is_code_line(line) {
            if run.is_empty() {
                run_start = start;
            }
            run.push(line);
            run_end = start + line.len();
            continue;
        }
        if let Some(code) = dedent(&run) {
            blocks.push(CodeBlock {
                text: code,
                start: run_start,
                end: run_end,
            });
        }
        run.clear();
    }

    if let Some(code) = dedent(&run) {
        blocks.push(CodeBlock {
            text: code,
            start: run_start,
            end: run_end,
        });
    }

    blocks
}

/// Strip the indentation shared by every non-blank line and trim blank lines
/// at both ends. Returns `None` for a run with no content.
pub(crate) fn dedent(lines: &[&str]) -> Option<String> {
    let first = lines.iter().position(|l| !is_blank(l))?;
    let last = lines.iter().rposition(|l| !is_blank(l))?;
    let lines = &lines[first..=last];

    let indent = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| if is_blank(l) { "" } else { l.get(indent..).unwrap_or("") })
        .collect();

    Some(stripped.join("\n"))
}
