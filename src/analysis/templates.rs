//! Message-template mini-language parser.
//!
//! Templates look like `"User {UserId} logged in at {When:HH:mm}"`.
//! Placeholders are `{Name}`, `{Name,align}`, `{Name:format}` or
//! `{Name,align:format}`; `{{` and `}}` escape literal braces. Alignment
//! and format are stripped from placeholder names; duplicates are kept.
//! Malformed templates (unbalanced braces, empty hole) yield `None` and
//! callers log a warning and continue with no placeholders.

use crate::analysis::model::TemplatePlaceholder;

pub fn parse_template(template: &str) -> Option<Vec<TemplatePlaceholder>> {
    let mut placeholders = Vec::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                let mut in_spec = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return None,
                        ',' | ':' => in_spec = true,
                        _ if in_spec => {}
                        _ => name.push(c),
                    }
                }
                if !closed || name.is_empty() {
                    return None;
                }
                placeholders.push(TemplatePlaceholder {
                    name,
                    index: placeholders.len(),
                });
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                } else {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(placeholders)
}

/// Canonical template form for cross-record comparison: escapes are
/// unescaped and every placeholder collapses to `{}`.
pub fn normalize_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                out.push_str("{}");
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(template: &str) -> Vec<String> {
        parse_template(template)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn plain_placeholders_in_order() {
        assert_eq!(names("User {UserId} logged in from {Ip}"), ["UserId", "Ip"]);
    }

    #[test]
    fn alignment_and_format_are_stripped() {
        assert_eq!(
            names("{Count,5} items at {When:HH:mm} ({Ratio,-8:P2})"),
            ["Count", "When", "Ratio"]
        );
    }

    #[test]
    fn duplicates_are_preserved() {
        assert_eq!(names("{X} then {X} again"), ["X", "X"]);
    }

    #[test]
    fn escapes_are_not_placeholders() {
        assert_eq!(names("a {{literal}} and {Real}"), ["Real"]);
    }

    #[test]
    fn malformed_templates_yield_none() {
        assert!(parse_template("unclosed {Name").is_none());
        assert!(parse_template("stray } brace").is_none());
        assert!(parse_template("empty {} hole").is_none());
        assert!(parse_template("nested {a{b}}").is_none());
    }

    #[test]
    fn format_specs_do_not_change_normalization() {
        assert_eq!(
            normalize_template("User {Id} in"),
            normalize_template("User {Id,8:D4} in")
        );
        assert_eq!(normalize_template("a {{b}} {C}"), "a {b} {}");
    }

    #[test]
    fn indexes_count_occurrences() {
        let parsed = parse_template("{A} {B} {A}").unwrap();
        let indexes: Vec<usize> = parsed.iter().map(|p| p.index).collect();
        assert_eq!(indexes, [0, 1, 2]);
    }
}
