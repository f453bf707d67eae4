//! Regex rewrite of the key-value text into JSON, then `serde_json`.
//!
//! This is the line-oriented approach: it depends on every pair sitting on
//! its own line and every `{` sitting at the end of its key's line or on a
//! line by itself. Whitespace runs inside values are collapsed too, and a
//! backslash sequence JSON does not know makes the whole document fail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::vdf::record::Record;

// `"key"  "value"` -> `"key": "value"`
static SCALAR_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?ms)^\s*"([^"]+)"\s+"(|.*?[^\\])"$"#).expect("valid regex"));

// `"key" {` -> `"key": {`
static BLOCK_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*"([^"]+)"\s*\{$"#).expect("valid regex"));

// a value or `}` ending a line, followed by a line starting with a key
static ITEM_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(["}])$(\s+^\s*")"#).expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Rewrite key-value text into a JSON object literal.
pub fn vdf_to_json(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = SCALAR_PAIR.replace_all(text, r#""${1}": "${2}""#);
    let text = BLOCK_KEY.replace_all(&text, r#""${1}": {"#);
    let text = ITEM_BREAK.replace_all(&text, "${1},${2}");
    let text = WHITESPACE.replace_all(&text, " ");
    format!("{{{text}}}")
}

/// Convert and parse in one go. Anything that is not an object of strings and
/// objects is rejected by the `Record` deserializer.
pub fn parse(text: &str) -> Result<Record, serde_json::Error> {
    serde_json::from_str(&vdf_to_json(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdf::parser;

    const MANIFEST: &str = "\"AppState\"\n{\n\t\"appid\"\t\t\"620\"\n\t\"name\"\t\t\"Portal 2\"\n\t\"LastOwner\"\t\t\"\"\n\t\"UserConfig\"\n\t{\n\t\t\"platform_override_source\"\t\t\"windows\"\n\t}\n\t\"MountedConfig\"\n\t{\n\t}\n}\n";

    #[test]
    fn rewrites_into_json_text() {
        let json = vdf_to_json("\"a\"\n{\n\t\"b\"\t\t\"1\"\n\t\"c\"\t\t\"2\"\n}\n");
        assert_eq!(json, r#"{"a": { "b": "1", "c": "2" } }"#);
    }

    #[test]
    fn agrees_with_recursive_descent() {
        let via_json = parse(MANIFEST).unwrap();
        let via_parser = parser::parse(MANIFEST).unwrap();
        assert_eq!(via_json, via_parser);

        let app = via_json.get_record("AppState").unwrap();
        assert_eq!(app.get_str("name"), Some("Portal 2"));
        assert_eq!(app.get_str("LastOwner"), Some(""));
        assert!(app.get_record("MountedConfig").unwrap().is_empty());
    }

    #[test]
    fn escaped_quotes_survive() {
        let r = parse("\"LaunchOptions\"\t\t\"-arg \\\"x y\\\"\"\n").unwrap();
        assert_eq!(r.get_str("LaunchOptions"), Some("-arg \"x y\""));
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(parse("\"a\"\n{\n\t\"b\"\t\t\"1\"\n").is_err());
        assert!(parse("\"a\"\t\t\"1\"\n}\n").is_err());
    }
}
