//! Utilities for diagnostic-annotated test sources
//!
//! Test data embeds expectations directly in the source text:
//!
//! ```text
//! object O { <!VARIABLE_IN_ENUM!>var x = 1<!> }
//! ```
//!
//! `parse_expectations` strips the markers and returns the clean source
//! together with the expected (code, span) pairs, spans expressed in the
//! clean text. Markers nest; several codes may share one range, separated
//! by commas.

use crate::common::Span;

/// One expected diagnostic parsed from marked-up source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDiagnostic {
    pub code: String,
    pub span: Span,
}

/// Split marked-up source into clean text and expectations, in marker
/// opening order
pub fn parse_expectations(marked: &str) -> (String, Vec<ExpectedDiagnostic>) {
    let mut clean = String::with_capacity(marked.len());
    let mut expectations: Vec<ExpectedDiagnostic> = Vec::new();
    let mut open: Vec<Vec<usize>> = Vec::new();

    let mut rest = marked;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("<!>") {
            if let Some(indices) = open.pop() {
                for index in indices {
                    expectations[index].span.end = clean.len();
                }
            }
            rest = tail;
            continue;
        }

        if let Some(tail) = rest.strip_prefix("<!") {
            if let Some(end) = tail.find("!>") {
                let codes = &tail[..end];
                if is_code_list(codes) {
                    let start = clean.len();
                    let mut indices = Vec::new();
                    for code in codes.split(',') {
                        let code = code.trim();
                        if !code.is_empty() {
                            indices.push(expectations.len());
                            expectations.push(ExpectedDiagnostic {
                                code: code.to_string(),
                                span: Span::new(start, start),
                            });
                        }
                    }
                    open.push(indices);
                    rest = &tail[end + 2..];
                    continue;
                }
            }
        }

        let Some(ch) = rest.chars().next() else { break };
        clean.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    (clean, expectations)
}

/// Clean source with all diagnostic markers removed
pub fn strip_diagnostic_markers(marked: &str) -> String {
    parse_expectations(marked).0
}

/// Normalize a dump for comparison: unified line separators, trailing
/// whitespace trimmed per line, exactly one newline at EOF
pub fn normalize_dump(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let mut out = String::new();
    for line in unified.trim().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn is_code_list(codes: &str) -> bool {
    !codes.is_empty()
        && codes.split(',').all(|code| {
            let code = code.trim();
            !code.is_empty()
                && code
                    .chars()
                    .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_marker() {
        let (clean, expected) = parse_expectations("object O { <!CODE_A!>var x = 1<!> }");

        assert_eq!(clean, "object O { var x = 1 }");
        assert_eq!(
            expected,
            vec![ExpectedDiagnostic {
                code: "CODE_A".to_string(),
                span: Span::new(11, 20),
            }]
        );
        assert_eq!(&clean[11..20], "var x = 1");
    }

    #[test]
    fn test_parse_nested_markers() {
        let (clean, expected) = parse_expectations("<!OUTER!>a <!INNER!>b<!> c<!>");

        assert_eq!(clean, "a b c");
        assert_eq!(expected[0].code, "OUTER");
        assert_eq!(expected[0].span, Span::new(0, 5));
        assert_eq!(expected[1].code, "INNER");
        assert_eq!(expected[1].span, Span::new(2, 3));
    }

    #[test]
    fn test_parse_comma_separated_codes() {
        let (clean, expected) = parse_expectations("<!A, B!>x<!>");

        assert_eq!(clean, "x");
        assert_eq!(expected.len(), 2);
        assert_eq!(expected[0].code, "A");
        assert_eq!(expected[1].code, "B");
        assert_eq!(expected[0].span, expected[1].span);
    }

    #[test]
    fn test_comparison_operators_left_alone() {
        let (clean, expected) = parse_expectations("val less = a <! b!");

        assert_eq!(clean, "val less = a <! b!");
        assert!(expected.is_empty());
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(
            strip_diagnostic_markers("object O { <!X!>var a = 1<!> }"),
            "object O { var a = 1 }"
        );
    }

    #[test]
    fn test_normalize_dump() {
        let text = "line one   \r\nline two\t\r\n\r\n";
        assert_eq!(normalize_dump(text), "line one\nline two\n");
    }
}
