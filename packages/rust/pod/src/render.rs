//! POD → Markdown rendering pipeline.
//!
//! Each pass is a function over the whole document applied in sequence,
//! like a cleanup pipeline: structure first (headings, fences, directives),
//! then inline formatting codes on prose, then blank-line normalization.

use podlens_shared::EXAMPLE_LANGUAGE;

use crate::blocks::{self, Block};
use crate::inline;

/// A stretch of structured output: prose lines, or one fenced code block.
#[derive(Debug, PartialEq)]
enum Chunk {
    Prose(String),
    Fence(String),
}

/// Run the full rendering pipeline on raw POD.
pub(crate) fn run_pipeline(markup: &str) -> String {
    let chunks = render_structure(&blocks::segment(markup));

    // Fenced code is emitted as written; only prose carries formatting codes.
    let mut result = chunks
        .into_iter()
        .map(|chunk| match chunk {
            Chunk::Prose(text) => inline::to_markdown(&text),
            Chunk::Fence(code) => code,
        })
        .collect::<Vec<_>>()
        .join("\n");
    result = collapse_blank_lines(&result);

    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Headings, code fences, directives
// ---------------------------------------------------------------------------

fn render_structure(blocks: &[Block<'_>]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut prose: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for block in blocks {
        if let Block::CodeLine(line) = block {
            run.push(*line);
            continue;
        }
        flush_code_run(&mut run, &mut prose, &mut chunks);

        match block {
            Block::Heading { level, text } => {
                prose.push(format!("{} {text}", "#".repeat(usize::from(*level))));
            }
            Block::PlainLine(text) => prose.push((*text).to_string()),
            Block::Directive(_) | Block::CodeLine(_) => {}
        }
    }

    // A document may end inside a verbatim block.
    flush_code_run(&mut run, &mut prose, &mut chunks);
    flush_prose(&mut prose, &mut chunks);

    chunks
}

/// Emit the pending indented run as a fenced block. A run of whitespace-only
/// lines is emitted as plain blank lines instead.
fn flush_code_run(run: &mut Vec<&str>, prose: &mut Vec<String>, chunks: &mut Vec<Chunk>) {
    if run.is_empty() {
        return;
    }
    match blocks::dedent(run) {
        Some(code) => {
            flush_prose(prose, chunks);
            chunks.push(Chunk::Fence(format!("```{EXAMPLE_LANGUAGE}\n{code}\n```")));
        }
        None => prose.extend(run.iter().map(|_| String::new())),
    }
    run.clear();
}

fn flush_prose(prose: &mut Vec<String>, chunks: &mut Vec<Chunk>) {
    if !prose.is_empty() {
        chunks.push(Chunk::Prose(prose.join("\n")));
        prose.clear();
    }
}

// ---------------------------------------------------------------------------
// Pass 2: Blank-line normalization
// ---------------------------------------------------------------------------

/// Collapse every run of three or more blank lines into a single blank line.
///
/// Runs of one or two blank lines are kept as they are. Applying this twice
/// gives the same result as applying it once.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blanks: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            blanks.push(line);
            continue;
        }
        flush_blanks(&mut blanks, &mut out);
        out.push(line);
    }
    flush_blanks(&mut blanks, &mut out);

    out.join("\n")
}

fn flush_blanks<'a>(blanks: &mut Vec<&'a str>, out: &mut Vec<&'a str>) {
    if blanks.len() >= 3 {
        out.push("");
    } else {
        out.extend(blanks.iter().copied());
    }
    blanks.clear();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings_map_to_hashes() {
        let result = run_pipeline("=head1 NAME\n\n=head2 Sub\n\n=head3 Deeper\n\n=head4 Deepest");
        assert_eq!(result, "# NAME\n\n## Sub\n\n### Deeper\n\n#### Deepest");
    }

    #[test]
    fn verbatim_becomes_fenced_perl() {
        let result = run_pipeline("Intro\n\n    use DBI;\n      nested();\n\nOutro");
        assert_eq!(result, "Intro\n\n```perl\nuse DBI;\n  nested();\n```\n\nOutro");
    }

    #[test]
    fn fence_closed_at_end_of_document() {
        let result = run_pipeline("Intro\n\n  last();");
        assert_eq!(result, "Intro\n\n```perl\nlast();\n```");
    }

    #[test]
    fn bare_directives_removed() {
        let pod = "=pod\n\nText\n\n=over 4\n\n=item *\n\nBullet\n\n=back\n\n=cut";
        let result = run_pipeline(pod);
        assert!(!result.contains("=over"));
        assert!(!result.contains("=item"));
        assert!(!result.contains("=back"));
        assert!(!result.contains("=cut"));
        assert!(!result.contains("=pod"));
        assert!(result.contains("Text"));
        assert!(result.contains("Bullet"));
    }

    #[test]
    fn directive_with_content_kept_verbatim() {
        let result = run_pipeline("=over\n\n=item connect\n\nOpens a handle.\n\n=back");
        assert!(result.contains("=item connect"));
        assert!(result.contains("Opens a handle."));
    }

    #[test]
    fn unterminated_over_does_not_fail() {
        let result = run_pipeline("=over 4\n\n=item *\n\nDangling");
        assert_eq!(result, "Dangling");
    }

    #[test]
    fn inline_codes_translated() {
        let result = run_pipeline("Use B<bold>, I<italic>, C<code> and L<DBI>.");
        assert_eq!(result, "Use **bold**, *italic*, `code` and DBI.");
    }

    #[test]
    fn whitespace_only_run_is_not_fenced() {
        let result = run_pipeline("a\n   \nb");
        assert_eq!(result, "a\n\nb");
    }

    #[test]
    fn collapse_three_or_more() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn collapse_keeps_one_or_two() {
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn collapse_is_idempotent() {
        for input in ["a\n\n\n\nb\n\n", "\n\n\n\nx", "x\n  \n\t\n \ny", "plain", ""] {
            let once = collapse_blank_lines(input);
            assert_eq!(collapse_blank_lines(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn fenced_code_is_not_rewritten() {
        let result = run_pipeline("Loop B<ten> times:\n\n  for (my $I = 0; $I<10; $I++) { print $a->[$I]; }");
        assert_eq!(
            result,
            "Loop **ten** times:\n\n```perl\nfor (my $I = 0; $I<10; $I++) { print $a->[$I]; }\n```"
        );
    }

    #[test]
    fn fence_matches_extracted_code() {
        let pod = "=head1 EXAMPLES\n\n  my $C<5> = B<x>;\n  print $I<$j>;";
        let code = &crate::extract_examples(pod)[0].code;
        assert!(run_pipeline(pod).contains(&format!("```perl\n{code}\n```")));
    }

    #[test]
    fn double_angle_code_across_lines() {
        let result = run_pipeline("Call C<< $dbh\n->disconnect >> at the end.");
        assert_eq!(result, "Call `$dbh\n->disconnect` at the end.");
    }

    #[test]
    fn blank_runs_collapse_inside_fences_too() {
        let result = run_pipeline("  my $a = 1;\n  \n  \n  \n  my $b = 2;");
        assert_eq!(result, "```perl\nmy $a = 1;\n\nmy $b = 2;\n```");
    }

    #[test]
    fn structure_separates_prose_and_fences() {
        let chunks = render_structure(&blocks::segment("=head1 A\n\n  code();\n\nText"));
        assert_eq!(
            chunks,
            vec![
                Chunk::Prose("# A\n".to_string()),
                Chunk::Fence("```perl\ncode();\n```".to_string()),
                Chunk::Prose("\nText".to_string()),
            ]
        );
    }

    #[test]
    fn stripped_directives_do_not_leave_gaps() {
        let result = run_pipeline("One\n\n=over\n\n=item *\n\nTwo");
        assert_eq!(result, "One\n\nTwo");
    }
}
