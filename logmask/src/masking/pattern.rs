//! Field pattern compiler.
//!
//! Turns a configured field name into the patterns that locate its value in one
//! grammar. Every pattern exposes the value through the `value` capture group;
//! the key and delimiters only anchor the match and are never replaced.
//!
//! Field names are escaped before interpolation and validated first, so a name
//! can neither inject pattern syntax nor break the grammar it anchors.

use std::fmt;

use regex::Regex;

use crate::error::MaskError;

/// Name of the capture group holding the value span in every field pattern.
pub(crate) const VALUE_GROUP: &str = "value";

/// The text grammar a masker understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// `key=value` pairs in a URI query string.
    Uri,
    /// `"key": value` members of a JSON document.
    Json,
    /// `key=value` pairs in an `application/x-www-form-urlencoded` body.
    Form,
}

impl BodyType {
    /// Upper-case grammar name.
    pub fn as_str(self) -> &'static str {
        match self {
            BodyType::Uri => "URI",
            BodyType::Json => "JSON",
            BodyType::Form => "FORM",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field name plus its compiled patterns for one grammar.
///
/// Immutable after [`FieldSpec::compile`]; safe to share between threads.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    name: String,
    key_token: String,
    patterns: Vec<Regex>,
}

impl FieldSpec {
    /// Validates `name` and compiles its patterns for `body_type`.
    pub fn compile(name: &str, body_type: BodyType) -> Result<Self, MaskError> {
        validate_field_name(name)?;
        let key = regex::escape(name);

        let (key_token, sources) = match body_type {
            BodyType::Uri | BodyType::Form => (format!("{name}="), vec![key_value_pattern(&key)]),
            BodyType::Json => (format!("\"{name}\""), json_patterns(&key).to_vec()),
        };

        let patterns = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_owned(),
            key_token,
            patterns,
        })
    }

    /// The configured field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled patterns, in evaluation order.
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Cheap structural pre-check: can any pattern of this field match `text`?
    ///
    /// Every pattern contains the key token literally, so skipping a field when
    /// this returns `false` never changes the result.
    pub fn is_present_in(&self, text: &str) -> bool {
        text.contains(&self.key_token)
    }
}

/// Rejects names that are empty or that contain characters the grammars use
/// as delimiters.
pub fn validate_field_name(name: &str) -> Result<(), MaskError> {
    let reject = |reason| MaskError::InvalidFieldName {
        name: name.to_owned(),
        reason,
    };

    if name.is_empty() {
        return Err(reject("field name is empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(reject("field name contains whitespace"));
    }
    if name.chars().any(char::is_control) {
        return Err(reject("field name contains a control character"));
    }
    if name.contains(['"', '=', '&']) {
        return Err(reject("field name contains a grammar delimiter (`\"`, `=` or `&`)"));
    }
    Ok(())
}

/// `key=value`, where the value runs until `&`, whitespace or end of text.
fn key_value_pattern(key: &str) -> String {
    format!(r"{key}=(?P<value>[^&\s]*)")
}

/// JSON member patterns: scalar, string, array of strings, object with one
/// level of nesting.
fn json_patterns(key: &str) -> [String; 4] {
    [
        format!(
            r#""{key}"\s*:\s*(?P<value>[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?|true|false)\s*[,}}]"#
        ),
        format!(r#""{key}"\s*:\s*"(?P<value>(?:\\"|[^"])*)""#),
        format!(r#""{key}"\s*:\s*\[(?P<value>\s*(?:"(?:\\.|[^"\\])*"\s*,?\s*)*)\]"#),
        format!(r#""{key}"\s*:\s*\{{(?P<value>[^{{}}]*(?:\{{[^{{}}]*\}}[^{{}}]*)*)\}}"#),
    ]
}

#[cfg(test)]
mod tests {
    use super::{validate_field_name, BodyType, FieldSpec, VALUE_GROUP};

    fn captured<'t>(spec: &FieldSpec, text: &'t str) -> Vec<&'t str> {
        spec.patterns()
            .iter()
            .flat_map(|p| p.captures_iter(text))
            .filter_map(|c| c.name(VALUE_GROUP))
            .map(|m| m.as_str())
            .collect()
    }

    #[test]
    fn key_value_captures_only_the_value() {
        let spec = FieldSpec::compile("token", BodyType::Uri).unwrap();
        assert_eq!(captured(&spec, "a=1&token=abc&b=2"), vec!["abc"]);
        assert_eq!(captured(&spec, "token=abc def"), vec!["abc"]);
        assert_eq!(captured(&spec, "token=abc"), vec!["abc"]);
    }

    #[test]
    fn json_scalar_excludes_trailing_delimiter() {
        let spec = FieldSpec::compile("id", BodyType::Json).unwrap();
        assert_eq!(captured(&spec, r#"{"id": 12345, "x": 1}"#), vec!["12345"]);
        assert_eq!(captured(&spec, r#"{"id":true}"#), vec!["true"]);
        assert_eq!(captured(&spec, r#"{"id": -0.005 }"#), vec!["-0.005"]);
        assert_eq!(captured(&spec, r#"{"id": 1.2e3}"#), vec!["1.2e3"]);
    }

    #[test]
    fn json_string_supports_escaped_quotes() {
        let spec = FieldSpec::compile("password", BodyType::Json).unwrap();
        assert_eq!(
            captured(&spec, r#"{"password": "se\"cret", "a": "b"}"#),
            vec![r#"se\"cret"#]
        );
    }

    #[test]
    fn json_array_and_object_capture_the_interior() {
        let spec = FieldSpec::compile("secrets", BodyType::Json).unwrap();
        assert_eq!(captured(&spec, r#"{"secrets": ["a","b"]}"#), vec![r#""a","b""#]);

        let spec = FieldSpec::compile("details", BodyType::Json).unwrap();
        assert_eq!(
            captured(&spec, r#"{"details": {"a":{"b":1}}, "c": 2}"#),
            vec![r#""a":{"b":1}"#]
        );
    }

    #[test]
    fn key_token_matches_the_grammar() {
        let uri = FieldSpec::compile("token", BodyType::Uri).unwrap();
        assert!(uri.is_present_in("?token=1"));
        assert!(!uri.is_present_in(r#"{"token": 1}"#));

        let json = FieldSpec::compile("token", BodyType::Json).unwrap();
        assert!(json.is_present_in(r#"{"token": 1}"#));
        assert!(!json.is_present_in("?token=1"));
    }

    #[test]
    fn metacharacters_in_names_are_matched_literally() {
        let spec = FieldSpec::compile("a.b", BodyType::Form).unwrap();
        assert_eq!(captured(&spec, "axb=1&a.b=2"), vec!["2"]);

        let spec = FieldSpec::compile("x(y", BodyType::Json).unwrap();
        assert_eq!(captured(&spec, r#"{"x(y": "v"}"#), vec!["v"]);
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["", "pass word", "a=b", "a&b", "\"q\"", "tab\t"] {
            let err = validate_field_name(name).unwrap_err();
            assert_eq!(err.kind(), "InvalidFieldName", "{name:?} was accepted");
        }
        assert!(FieldSpec::compile("", BodyType::Json).is_err());
    }

    #[test]
    fn body_type_names() {
        assert_eq!(BodyType::Uri.to_string(), "URI");
        assert_eq!(BodyType::Json.to_string(), "JSON");
        assert_eq!(BodyType::Form.to_string(), "FORM");
    }
}
