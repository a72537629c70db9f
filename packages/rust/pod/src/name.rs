//! `=head1 NAME` parsing and the heading outline.

use podlens_shared::{Heading, ModuleName};

use crate::blocks::{find_section, is_blank, lines_with_offsets, parse_heading};
use crate::inline::strip_codes;

/// Split the NAME section's first paragraph at its first dash token.
///
/// `DBI - Database independent interface for Perl` yields name `DBI` and
/// description `Database independent interface for Perl`. Without a dash the
/// whole paragraph is the name.
pub fn parse_name_section(markup: &str) -> Option<ModuleName> {
    let section = find_section(markup, "NAME")?;

    let paragraph: Vec<&str> = section
        .lines()
        .skip_while(|l| is_blank(l))
        .take_while(|l| !is_blank(l) && !l.starts_with('='))
        .map(str::trim)
        .collect();
    let paragraph = strip_codes(&paragraph.join(" "));

    let words: Vec<&str> = paragraph.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    match words.iter().position(|w| matches!(*w, "-" | "--")) {
        Some(0) => None,
        Some(dash) => {
            let description = words[dash + 1..].join(" ");
            Some(ModuleName {
                name: words[..dash].join(" "),
                description: (!description.is_empty()).then_some(description),
            })
        }
        None => Some(ModuleName {
            name: words.join(" "),
            description: None,
        }),
    }
}

/// Every `=headN` heading in document order.
pub fn outline(markup: &str) -> Vec<Heading> {
    lines_with_offsets(markup)
        .filter_map(|(_, line, _)| parse_heading(line))
        .map(|(level, text)| Heading {
            level,
            text: strip_codes(text),
        })
        .collect()
}
