//! The literal-type shortcut table (spec.md §4.4 "Literal shortcut").

use std::collections::HashMap;

/// Maps a literal right-hand-side's leading shape to its known class name,
/// without invoking the chain walker. Caller-supplied `overrides`
/// (`ApiMap::with_literal_overrides`) are checked first, so an embedder
/// targeting a different literal grammar isn't stuck with this table's
/// defaults (spec §9 Open Questions: literal grammar is a deliberate,
/// documented generalization — see `DESIGN.md`).
pub(super) fn literal_type(text: &str, overrides: &HashMap<String, String>) -> Option<String> {
    if let Some(found) = overrides.get(text) {
        return Some(found.clone());
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed {
        "true" => return Some("TrueClass".to_string()),
        "false" => return Some("FalseClass".to_string()),
        "nil" => return Some("NilClass".to_string()),
        _ => {}
    }

    match trimmed.chars().next()? {
        '"' | '\'' => Some("String".to_string()),
        '[' => Some("Array".to_string()),
        '{' => Some("Hash".to_string()),
        ':' => Some("Symbol".to_string()),
        '/' => Some("Regexp".to_string()),
        c if c.is_ascii_digit() => {
            if trimmed.contains('.') {
                Some("Float".to_string())
            } else {
                Some("Integer".to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_literal_shapes() {
        let overrides = HashMap::new();
        assert_eq!(literal_type("5", &overrides), Some("Integer".to_string()));
        assert_eq!(literal_type("5.0", &overrides), Some("Float".to_string()));
        assert_eq!(literal_type("\"s\"", &overrides), Some("String".to_string()));
        assert_eq!(literal_type("[1, 2]", &overrides), Some("Array".to_string()));
        assert_eq!(literal_type("{a: 1}", &overrides), Some("Hash".to_string()));
        assert_eq!(literal_type(":sym", &overrides), Some("Symbol".to_string()));
        assert_eq!(literal_type("true", &overrides), Some("TrueClass".to_string()));
        assert_eq!(literal_type("foo.bar", &overrides), None);
    }

    #[test]
    fn caller_overrides_win_first() {
        let mut overrides = HashMap::new();
        overrides.insert("5".to_string(), "MyInt".to_string());
        assert_eq!(literal_type("5", &overrides), Some("MyInt".to_string()));
    }
}
