//! Title and description inference for an extracted code block.
//!
//! Both helpers take the text the block was found in plus the block's byte
//! span inside that text, and look only at the surrounding lines.

use crate::blocks::{is_blank, is_code_line, parse_heading};
use crate::inline::strip_codes;

/// A caption line must be shorter than this to be used as a title.
const MAX_CAPTION_CHARS: usize = 50;

/// How much text after a block is considered for its description.
const DESCRIPTION_WINDOW_CHARS: usize = 300;

/// Descriptions longer than this are cut and suffixed with `...`.
const DESCRIPTION_LIMIT_CHARS: usize = 200;

/// Descriptions this short (after trimming) are discarded.
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Title for the block starting at byte `block_start` of `context`.
///
/// Prefers the nearest `=head2`..`=head4` above the block (a `=head1`
/// stops the search), then a short caption line directly above it.
pub(crate) fn infer_title(context: &str, block_start: usize) -> Option<String> {
    let before = context.get(..block_start)?;
    nearest_subheading(before).or_else(|| caption_line(before))
}

fn nearest_subheading(before: &str) -> Option<String> {
    for line in before.lines().rev() {
        match parse_heading(line) {
            Some((1, _)) => return None,
            Some((_, text)) => return non_empty(strip_codes(text)),
            None => {}
        }
    }
    None
}

fn caption_line(before: &str) -> Option<String> {
    let line = before.lines().rev().find(|l| !is_blank(l))?;
    if line.trim_start().starts_with('=') || is_code_line(line) {
        return None;
    }
    let caption = line.trim();
    if caption.chars().count() >= MAX_CAPTION_CHARS {
        return None;
    }
    non_empty(strip_codes(caption).trim_end_matches(':').trim().to_string())
}

/// Description from the prose right after the block ending at byte `block_end`.
pub(crate) fn infer_description(context: &str, block_end: usize) -> Option<String> {
    let after = context.get(block_end..)?;
    let window = match after.char_indices().nth(DESCRIPTION_WINDOW_CHARS) {
        Some((idx, _)) => &after[..idx],
        None => after,
    };

    let mut description = String::new();
    for line in window.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('=') {
            break;
        }
        if trimmed.is_empty() {
            if description.is_empty() {
                continue;
            }
            break;
        }
        if is_code_line(line) {
            break;
        }

        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&strip_codes(trimmed));

        if description.chars().count() > DESCRIPTION_LIMIT_CHARS {
            description = description.chars().take(DESCRIPTION_LIMIT_CHARS).collect();
            description.push_str("...");
            break;
        }
    }

    let description = description.trim();
    if description.chars().count() <= MIN_DESCRIPTION_CHARS {
        return None;
    }
    Some(description.to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
