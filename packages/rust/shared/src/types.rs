//! Core domain types produced by the POD converter.

use serde::{Deserialize, Serialize};

/// Language tag attached to every extracted example and fenced code block.
///
/// POD documents Perl code, so no detection is attempted.
pub const EXAMPLE_LANGUAGE: &str = "perl";

// ---------------------------------------------------------------------------
// UsageExample
// ---------------------------------------------------------------------------

/// A titled, optionally described code snippet pulled out of a POD document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageExample {
    /// Display title (section heading, preceding caption, or a fallback).
    pub title: String,
    /// Prose that immediately follows the snippet, if any was meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The snippet with its shared indentation removed.
    pub code: String,
    /// Always [`EXAMPLE_LANGUAGE`].
    pub language: String,
}

impl UsageExample {
    /// Build an example tagged with [`EXAMPLE_LANGUAGE`].
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description,
            code: code.into(),
            language: EXAMPLE_LANGUAGE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ModuleName
// ---------------------------------------------------------------------------

/// The parsed `=head1 NAME` section, e.g. `DBI - Database independent interface`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleName {
    /// Text before the first dash token.
    pub name: String,
    /// Text after the first dash token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

/// A single `=headN` heading, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Outline depth, 1 through 4.
    pub level: u8,
    /// Heading text with formatting codes stripped.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_example_is_tagged_perl() {
        let ex = UsageExample::new("Synopsis", None, "use DBI;");
        assert_eq!(ex.language, "perl");
    }

    #[test]
    fn usage_example_json_omits_missing_description() {
        let ex = UsageExample::new("Code Example", None, "my $x = 1;");
        let json = serde_json::to_string(&ex).expect("serialize");
        assert!(!json.contains("description"));
        assert!(json.contains("\"language\":\"perl\""));
    }

    #[test]
    fn module_name_deserializes_without_description() {
        let parsed: ModuleName = serde_json::from_str(r#"{"name":"Foo::Bar"}"#).expect("parse");
        assert_eq!(parsed.name, "Foo::Bar");
        assert!(parsed.description.is_none());
    }
}
