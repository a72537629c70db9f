//! POD-to-Markdown conversion and usage-example extraction.
//!
//! Turns raw POD (Perl's documentation markup) into two independent views:
//! a normalized Markdown rendering and a list of [`UsageExample`]s pulled
//! from `SYNOPSIS`, `EXAMPLES`, and any other verbatim block that looks like
//! Perl. Every function here is pure and infallible: odd input yields smaller
//! output, never an error, so callers can treat documentation as best-effort
//! enrichment.

mod blocks;
mod classify;
mod context;
mod embedded;
mod examples;
mod inline;
mod name;
mod render;

use tracing::{debug, instrument};

use podlens_shared::{Heading, ModuleName, UsageExample};

pub use blocks::{
    Block, CodeBlock, Directive, classify_line, extract_indented_blocks, find_section, segment,
};
pub use classify::looks_like_source;
pub use embedded::{is_perl_source, pod_regions};
pub use name::{outline, parse_name_section};
pub use render::collapse_blank_lines;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Everything derived from one POD document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    /// Markdown rendering of the whole document.
    pub markdown: String,
    /// Examples in pass order (synopsis, examples section, document scan).
    pub examples: Vec<UsageExample>,
    /// The parsed NAME section, if present.
    pub name: Option<ModuleName>,
    /// Heading outline.
    pub outline: Vec<Heading>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Convert a document, treating an absent document as empty.
///
/// Each view is computed independently from the raw text.
#[instrument(skip(markup), fields(len = markup.map_or(0, str::len)))]
pub fn convert(markup: Option<&str>) -> Conversion {
    let markup = markup.unwrap_or_default();
    if markup.trim().is_empty() {
        return Conversion::default();
    }

    Conversion {
        markdown: render(markup),
        examples: extract_examples(markup),
        name: parse_name_section(markup),
        outline: outline(markup),
    }
}

/// Render POD as Markdown.
///
/// - `=headN` → N `#` characters
/// - `I<>`, `B<>`, `C<>`, `L<>` → emphasis, strong, inline code, bare text
/// - indented runs → ```` ```perl ```` fences
/// - bare `=pod`, `=cut`, `=over`, `=back`, `=item` lines are dropped
/// - three or more blank lines collapse to one; the result is trimmed
#[instrument(skip(markup), fields(len = markup.len()))]
pub fn render(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }

    let markdown = render::run_pipeline(markup);
    debug!(out_len = markdown.len(), "render complete");
    markdown
}

/// Extract usage examples in pass order. Duplicates across passes are kept.
#[instrument(skip(markup), fields(len = markup.len()))]
pub fn extract_examples(markup: &str) -> Vec<UsageExample> {
    if markup.trim().is_empty() {
        return Vec::new();
    }
    examples::run_passes(markup)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    // --- Empty input ---

    #[test]
    fn empty_and_absent_inputs() {
        assert_eq!(render(""), "");
        assert_eq!(render("  \n\n "), "");
        assert!(extract_examples("").is_empty());
        assert_eq!(convert(None), Conversion::default());
        assert_eq!(convert(Some("")), Conversion::default());
    }

    #[test]
    fn plain_text_renders_to_itself() {
        let text = "First paragraph.\n\nSecond paragraph\nwraps here.";
        assert_eq!(render(text), text);
        assert_eq!(render(&render(text)), text);
    }

    #[test]
    fn never_fails_on_odd_input() {
        for input in ["=over", "=item", "=back\n=back", "B<unclosed", "C<< never >", "=head1", "\u{feff}=pod\n"] {
            let _ = render(input);
            let _ = extract_examples(input);
            let _ = convert(Some(input));
        }
    }

    // --- Fixture-based tests ---

    #[test]
    fn dbi_fixture_renders() {
        let pod = load_fixture("pod/dbi_excerpt.pod");
        let markdown = render(&pod);

        assert!(markdown.starts_with("# NAME"));
        assert!(markdown.contains("## connect"));
        assert!(markdown.contains("```perl\nuse DBI;"));
        assert!(markdown.contains("**must**"));
        assert!(markdown.contains("`$dbh->disconnect`"));
        assert!(!markdown.contains("=over"));
        assert!(!markdown.contains("=cut"));
        assert!(!markdown.contains("\n\n\n\n"));
    }

    #[test]
    fn dbi_fixture_examples() {
        let pod = load_fixture("pod/dbi_excerpt.pod");
        let examples = extract_examples(&pod);

        let synopsis: Vec<_> = examples.iter().filter(|e| e.title == "Synopsis").collect();
        // The empty line after `use DBI;` splits the synopsis into two blocks.
        assert_eq!(synopsis.len(), 2);
        assert_eq!(synopsis[0].code, "use DBI;");
        assert!(synopsis[1].code.starts_with("my $dbh = DBI->connect"));

        let titles: Vec<&str> = examples.iter().map(|e| e.title.as_str()).collect();
        assert!(titles.contains(&"Selecting rows"));
        assert!(titles.contains(&"Inserting with placeholders"));
        assert!(examples.iter().all(|e| e.language == "perl"));
    }

    #[test]
    fn dbi_fixture_name() {
        let pod = load_fixture("pod/dbi_excerpt.pod");
        let name = parse_name_section(&pod).expect("NAME present");
        assert_eq!(name.name, "DBI");
        assert_eq!(
            name.description.as_deref(),
            Some("Database independent interface for Perl")
        );
    }

    #[test]
    fn module_fixture_with_interleaved_code() {
        let pm = load_fixture("pod/counter.pm");
        let conversion = convert(Some(&pod_regions(&pm)));

        assert_eq!(
            conversion.name.as_ref().map(|n| n.name.as_str()),
            Some("Local::Counter")
        );
        assert_eq!(conversion.examples[0].title, "Synopsis");

        let example_titles: Vec<&str> = conversion
            .examples
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert!(example_titles.contains(&"Example 1"));

        // Indented prose under DESCRIPTION is rendered but not offered as an example.
        assert!(conversion.markdown.contains("counts things"));
        assert!(
            conversion
                .examples
                .iter()
                .all(|e| !e.code.contains("counts things"))
        );

        let levels: Vec<u8> = conversion.outline.iter().map(|h| h.level).collect();
        assert_eq!(levels.first(), Some(&1));
    }

    #[test]
    fn module_code_stays_out_of_output() {
        let pm = load_fixture("pod/counter.pm");
        let pod = pod_regions(&pm);

        let markdown = render(&pod);
        assert!(markdown.starts_with("# NAME"));
        assert!(!markdown.contains("package Local::Counter;"));
        assert!(!markdown.contains("use strict;"));

        let examples = extract_examples(&pod);
        assert!(!examples.is_empty());
        assert!(examples.iter().all(|e| e.title != "sub new {"));
        assert!(examples.iter().all(|e| !e.code.contains("bless")));
    }
}
