//! Structured documentation comment parsing (Javadoc and KDoc)
//!
//! Line-oriented: everything before the first `@tag` line is the
//! description; tag lines are matched after stripping comment decoration.
//! The two dialects share the tag vocabulary except that KDoc adds
//! `@property`, `@sample`, `@constructor` and `@author`.

use crate::schema::{DocumentationInfo, KotlinDocumentationInfo};

/// Parse the raw text of one Javadoc comment block
pub fn parse_javadoc(raw: &str) -> DocumentationInfo {
    let mut doc = DocumentationInfo::default();
    let mut description_lines: Vec<String> = Vec::new();
    let mut seen_tag = false;

    for line in raw.lines() {
        let content = strip_decoration(line);
        if let Some(rest) = content.strip_prefix('@') {
            seen_tag = true;
            apply_shared_tag(&mut doc, rest);
        } else if !seen_tag {
            description_lines.push(content.to_string());
        }
    }

    doc.description = join_description(&description_lines);
    doc
}

/// Parse the raw text of one KDoc comment block
pub fn parse_kdoc(raw: &str) -> KotlinDocumentationInfo {
    let mut doc = KotlinDocumentationInfo::default();
    let mut description_lines: Vec<String> = Vec::new();
    let mut seen_tag = false;

    for line in raw.lines() {
        let content = strip_decoration(line);
        if let Some(rest) = content.strip_prefix('@') {
            seen_tag = true;
            if !apply_kotlin_tag(&mut doc, rest) {
                apply_shared_tag(&mut doc.base, rest);
            }
        } else if !seen_tag {
            description_lines.push(content.to_string());
        }
    }

    doc.base.description = join_description(&description_lines);
    doc
}

/// Strip leading comment decoration (`/**`, `*/`, `*`, `///`, `//`) from a line
fn strip_decoration(line: &str) -> &str {
    let mut s = line.trim();
    for prefix in ["/**", "/*", "///", "//"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.strip_suffix("*/") {
        s = rest;
    }
    // Interior lines of a block comment lead with a bare asterisk
    s = s.trim_start();
    while let Some(rest) = s.strip_prefix('*') {
        s = rest;
    }
    s.trim()
}

/// Tags common to both dialects. Unrecognized tags are ignored.
fn apply_shared_tag(doc: &mut DocumentationInfo, rest: &str) {
    let (tag, value) = split_tag(rest);
    match tag {
        "param" => {
            if let Some((name, desc)) = split_named(value) {
                doc.params.insert(name.to_string(), desc.to_string());
            }
        }
        "throws" => {
            if let Some((name, desc)) = split_named(value) {
                doc.throws.insert(name.to_string(), desc.to_string());
            }
        }
        "return" => {
            if doc.returns.is_none() {
                doc.returns = Some(value.to_string());
            }
        }
        "see" => doc.see.push(value.to_string()),
        "since" => {
            if doc.since.is_none() {
                doc.since = Some(value.to_string());
            }
        }
        "deprecated" => {
            if doc.deprecated.is_none() {
                doc.deprecated = Some(value.to_string());
            }
        }
        _ => {}
    }
}

/// KDoc-only tags; returns false when the tag belongs to the shared set
fn apply_kotlin_tag(doc: &mut KotlinDocumentationInfo, rest: &str) -> bool {
    let (tag, value) = split_tag(rest);
    match tag {
        "property" => {
            if let Some((name, desc)) = split_named(value) {
                doc.property_docs.insert(name.to_string(), desc.to_string());
            }
            true
        }
        "sample" => {
            doc.samples.push(value.to_string());
            true
        }
        "constructor" => {
            if doc.constructor_doc.is_none() {
                doc.constructor_doc = Some(value.to_string());
            }
            true
        }
        "author" => {
            doc.authors.push(value.to_string());
            true
        }
        _ => false,
    }
}

/// Split `tagName remainder` after the leading `@` has been removed
fn split_tag(rest: &str) -> (&str, &str) {
    match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    }
}

/// Split a named tag value into `(key, description)` on the first
/// whitespace run. A value with no second token yields None and the
/// tag line is dropped.
fn split_named(value: &str) -> Option<(&str, &str)> {
    let idx = value.find(char::is_whitespace)?;
    let (name, desc) = (&value[..idx], value[idx..].trim());
    if name.is_empty() || desc.is_empty() {
        return None;
    }
    Some((name, desc))
}

fn join_description(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAVADOC: &str = r#"/**
 * Validates the supplied value.
 *
 * @param value the input value
 * @return true when the value is acceptable
 * @throws IllegalArgumentException if value is invalid
 * @see Validator
 * @since 1.2
 * @deprecated use validateStrict instead
 */"#;

    #[test]
    fn test_description_precedes_tags() {
        let doc = parse_javadoc(JAVADOC);
        assert_eq!(doc.description, "Validates the supplied value.");
    }

    #[test]
    fn test_named_tags() {
        let doc = parse_javadoc(JAVADOC);
        assert_eq!(doc.params.get("value").unwrap(), "the input value");
        assert_eq!(
            doc.throws.get("IllegalArgumentException").unwrap(),
            "if value is invalid"
        );
    }

    #[test]
    fn test_single_value_tags() {
        let doc = parse_javadoc(JAVADOC);
        assert_eq!(
            doc.returns.as_deref(),
            Some("true when the value is acceptable")
        );
        assert_eq!(doc.since.as_deref(), Some("1.2"));
        assert_eq!(doc.deprecated.as_deref(), Some("use validateStrict instead"));
        assert_eq!(doc.see, vec!["Validator".to_string()]);
    }

    #[test]
    fn test_named_tag_without_description_is_dropped() {
        let doc = parse_javadoc("/**\n * @param value\n */");
        assert!(doc.params.is_empty());
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let doc = parse_javadoc("/**\n * Text.\n * @implNote internal detail\n */");
        assert_eq!(doc.description, "Text.");
        assert!(doc.params.is_empty());
        assert!(doc.returns.is_none());
    }

    #[test]
    fn test_kdoc_extension_tags() {
        let doc = parse_kdoc(
            r#"/**
 * A user account.
 *
 * @property name the display name
 * @constructor creates an empty account
 * @sample com.example.samples.accountSample
 * @author Alice
 * @author Bob
 */"#,
        );
        assert_eq!(doc.base.description, "A user account.");
        assert_eq!(doc.property_docs.get("name").unwrap(), "the display name");
        assert_eq!(doc.constructor_doc.as_deref(), Some("creates an empty account"));
        assert_eq!(doc.samples, vec!["com.example.samples.accountSample".to_string()]);
        assert_eq!(doc.authors, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_kdoc_shared_tags_still_apply() {
        let doc = parse_kdoc("/**\n * @param input the raw text\n */");
        assert_eq!(doc.base.params.get("input").unwrap(), "the raw text");
    }

    #[test]
    fn test_see_collects_in_order_without_dedup() {
        let doc = parse_javadoc("/**\n * @see A\n * @see B\n * @see A\n */");
        assert_eq!(doc.see, vec!["A", "B", "A"]);
    }
}
