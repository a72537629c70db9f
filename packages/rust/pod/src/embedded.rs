//! POD embedded in Perl source files.
//!
//! In a `.pm`/`.pl` file POD starts at any line beginning with `=` and a
//! letter, and runs through the next `=cut`. Everything else is program text.

use std::path::Path;

use crate::blocks::{self, is_cut};

/// File extensions whose contents are Perl code with embedded POD.
const SOURCE_EXTENSIONS: &[&str] = &["pm", "pl", "t"];

/// Whether `path` names a Perl source file rather than a standalone POD file.
pub fn is_perl_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Keep only the POD regions of `text`, `=cut` lines included.
///
/// Returns an empty string when the file has no POD.
pub fn pod_regions(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_pod = false;

    for (_, line, _) in blocks::lines_with_offsets(text) {
        if !in_pod && starts_command(line) {
            in_pod = true;
        }
        if in_pod {
            out.push(line);
            if is_cut(line) {
                in_pod = false;
            }
        }
    }

    out.join("\n")
}

fn starts_command(line: &str) -> bool {
    line.strip_prefix('=')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn code_between_regions_dropped() {
        let text = "package Foo;\n\n=head1 NAME\n\nFoo\n\n=cut\n\nsub new {}\n\n=head1 MORE\n\nText\n";
        assert_eq!(pod_regions(text), "=head1 NAME\n\nFoo\n\n=cut\n=head1 MORE\n\nText");
    }

    #[test]
    fn no_pod_gives_empty() {
        assert_eq!(pod_regions("use strict;\nmy $x = 1;\n"), "");
    }

    #[test]
    fn cut_alone_does_not_open_pod() {
        // `=cut` opens a region and closes it on the same line.
        assert_eq!(pod_regions("=cut\ncode();\n"), "=cut");
    }

    #[test]
    fn assignment_lines_are_not_commands() {
        assert_eq!(pod_regions("my $x\n= 5;\n=pod\n\nDoc\n"), "=pod\n\nDoc");
    }

    #[test]
    fn source_extensions() {
        assert!(is_perl_source(Path::new("lib/Foo/Bar.pm")));
        assert!(is_perl_source(Path::new("script.pl")));
        assert!(!is_perl_source(Path::new("perlpod.pod")));
        assert!(!is_perl_source(Path::new("-")));
    }
}
