//! Usage-example extraction.
//!
//! Three passes run in a fixed order and their results are concatenated:
//! 1. every verbatim block in `SYNOPSIS`
//! 2. every verbatim block in `EXAMPLES` (or `EXAMPLE`), titled from context
//! 3. every verbatim block anywhere in the document that looks like Perl
//!
//! Passes do not see each other's output, so a block found by pass 1 or 2
//! is reported again by pass 3 when it also looks like source.

use tracing::{debug, trace};

use podlens_shared::UsageExample;

use crate::blocks::{extract_indented_blocks, find_section};
use crate::classify::matching_signature;
use crate::context::{infer_description, infer_title};

const SYNOPSIS_TITLE: &str = "Synopsis";
const SYNOPSIS_DESCRIPTION: &str = "Basic usage from the module synopsis";
const DOCUMENT_FALLBACK_TITLE: &str = "Code Example";

/// Blocks this short (after trimming) are never surfaced by the document scan.
const MIN_DOCUMENT_BLOCK_CHARS: usize = 10;

pub(crate) fn run_passes(markup: &str) -> Vec<UsageExample> {
    let synopsis = synopsis_examples(markup);
    let section = section_examples(markup);
    let document = document_examples(markup);

    debug!(
        synopsis = synopsis.len(),
        examples = section.len(),
        document = document.len(),
        "example passes complete"
    );

    let mut examples = synopsis;
    examples.extend(section);
    examples.extend(document);
    examples
}

// ---------------------------------------------------------------------------
// Pass 1: SYNOPSIS
// ---------------------------------------------------------------------------

fn synopsis_examples(markup: &str) -> Vec<UsageExample> {
    let Some(section) = find_section(markup, "SYNOPSIS") else {
        return Vec::new();
    };

    extract_indented_blocks(section)
        .into_iter()
        .map(|block| {
            UsageExample::new(
                SYNOPSIS_TITLE,
                Some(SYNOPSIS_DESCRIPTION.to_string()),
                block.text,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: EXAMPLES
// ---------------------------------------------------------------------------

fn section_examples(markup: &str) -> Vec<UsageExample> {
    let Some(section) =
        find_section(markup, "EXAMPLES").or_else(|| find_section(markup, "EXAMPLE"))
    else {
        return Vec::new();
    };

    extract_indented_blocks(section)
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            let title =
                infer_title(section, block.start).unwrap_or_else(|| format!("Example {}", index + 1));
            let description = infer_description(section, block.end);
            UsageExample::new(title, description, block.text)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 3: whole-document scan
// ---------------------------------------------------------------------------

fn document_examples(markup: &str) -> Vec<UsageExample> {
    extract_indented_blocks(markup)
        .into_iter()
        .filter(|block| block.text.trim().chars().count() > MIN_DOCUMENT_BLOCK_CHARS)
        .filter_map(|block| {
            let signature = matching_signature(&block.text)?;
            trace!(signature, offset = block.start, "verbatim block looks like source");

            let title = infer_title(markup, block.start)
                .unwrap_or_else(|| DOCUMENT_FALLBACK_TITLE.to_string());
            let description = infer_description(markup, block.end);
            Some(UsageExample::new(title, description, block.text))
        })
        .collect()
}
