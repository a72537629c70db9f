//! POD formatting codes: `I<>`, `B<>`, `C<>`, `L<>`, `F<>`, `S<>`, `X<>`, `Z<>`, `E<>`.
//!
//! Codes nest (`B<C<foo>>`) and have a double-angle form (`C<< $a->b >>`)
//! whose content may contain bare `>` characters. Nesting is resolved
//! innermost first by re-applying the single-angle pattern until nothing
//! changes. `E<lt>`/`E<gt>` are parked on private-use markers while the
//! other codes are rewritten so the angle brackets they produce cannot
//! close a surrounding code.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `E<name>` / `E<number>` character escapes.
static ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"E<([A-Za-z]+|0[xX][0-9A-Fa-f]+|\d+)>").expect("valid regex")
});

/// `C<< text >>`, `B<<< text >>>`, ... The content may wrap across lines.
static DOUBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\b([IBCLFSXZ])<<+\s+(.+?)\s+>>+").expect("valid regex")
});

/// Innermost `C<text>` with no angle brackets inside.
static SINGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([IBCLFSXZ])<([^<>]*)>").expect("valid regex"));

const LT_MARK: char = '\u{E000}';
const GT_MARK: char = '\u{E001}';

/// Upper bound on nesting depth we unwrap.
const MAX_NESTING: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Markdown,
    Plain,
}

/// Rewrite formatting codes as Markdown emphasis, strong, and inline code.
pub(crate) fn to_markdown(text: &str) -> String {
    rewrite(text, Style::Markdown)
}

/// Drop formatting codes, keeping only their visible text.
pub(crate) fn strip_codes(text: &str) -> String {
    rewrite(text, Style::Plain)
}

fn rewrite(text: &str, style: Style) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut out = ESCAPE_RE
        .replace_all(text, |caps: &Captures| match resolve_escape(&caps[1]) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned();

    out = DOUBLE_RE
        .replace_all(&out, |caps: &Captures| format_code(&caps[1], &caps[2], style))
        .into_owned();

    for _ in 0..MAX_NESTING {
        let next = SINGLE_RE
            .replace_all(&out, |caps: &Captures| format_code(&caps[1], &caps[2], style))
            .into_owned();
        if next == out {
            break;
        }
        out = next;
    }

    out.replace(LT_MARK, "<").replace(GT_MARK, ">")
}

fn format_code(code: &str, inner: &str, style: Style) -> String {
    if inner.is_empty() {
        return String::new();
    }
    match (code, style) {
        ("X" | "Z", _) => String::new(),
        ("L", _) => link_text(inner).to_string(),
        ("I" | "F", Style::Markdown) => format!("*{inner}*"),
        ("B", Style::Markdown) => format!("**{inner}**"),
        ("C", Style::Markdown) => format!("`{inner}`"),
        _ => inner.to_string(),
    }
}

/// `L<text|target>` shows `text`; any other link shows its target verbatim.
fn link_text(inner: &str) -> &str {
    match inner.split_once('|') {
        Some((text, _)) if !text.trim().is_empty() => text.trim(),
        _ => inner,
    }
}

fn resolve_escape(name: &str) -> Option<char> {
    let ch = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "verbar" => '|',
        "sol" => '/',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        _ => {
            let code = match name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(match ch {
        '<' => LT_MARK,
        '>' => GT_MARK,
        other => other,
    })
}
