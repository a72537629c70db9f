//! Heuristic "does this verbatim block look like Perl?" check.
//!
//! Each signature is independent; a block qualifies if any one matches.
//! This is deliberately loose: false positives and negatives are accepted.

use std::sync::LazyLock;

use regex::Regex;

static SIGNATURES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "module import",
            r#"(?m)^\s*(?:use|require|no)\s+(?:[A-Za-z_][\w:]*|v?\d[\d.]*|"[^"\n]+"|'[^'\n]+')[^;\n]*;"#,
        ),
        ("variable declaration", r"\b(?:my|our|local)\s*[\$@%(]"),
        ("scalar variable", r"\$[A-Za-z_]\w*"),
        ("container variable", r"(?:^|[^\w@%])[@%][A-Za-z_{]"),
        ("method call", r"[\w\}\]\)]\s*->\s*[\w\$\{\[\(]"),
        ("subroutine", r"\bsub\s+[A-Za-z_]\w*"),
        ("print call", r#"\b(?:print|printf|say)\b\s*[\(\$"'A-Z]"#),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// Name of the first signature `text` matches, if any.
pub(crate) fn matching_signature(text: &str) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(name, _)| *name)
}

/// Whether `text` resembles Perl source closely enough to surface as an example.
pub fn looks_like_source(text: &str) -> bool {
    matching_signature(text).is_some()
}
