//! Key Expression Parsing
//!
//! Strict decoding of the model's key-expression output. A `KeyExpression` can
//! only be built through validated deserialization, so every value that exists
//! in memory has three non-empty fields.

use serde::{Deserialize, Serialize};

/// A vocabulary note extracted from the learner's (or translated) text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeyExpression")]
pub struct KeyExpression {
    expression: String,
    translation: String,
    usage: String,
}

impl KeyExpression {
    pub fn new(
        expression: impl Into<String>,
        translation: impl Into<String>,
        usage: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        RawKeyExpression {
            expression: expression.into(),
            translation: translation.into(),
            usage: usage.into(),
        }
        .try_into()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }
}

/// The wire shape, before the non-empty checks.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKeyExpression {
    expression: String,
    translation: String,
    usage: String,
}

impl TryFrom<RawKeyExpression> for KeyExpression {
    type Error = SchemaError;

    fn try_from(raw: RawKeyExpression) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("expression", &raw.expression),
            ("translation", &raw.translation),
            ("usage", &raw.usage),
        ] {
            if value.trim().is_empty() {
                return Err(SchemaError::EmptyField(field));
            }
        }
        Ok(Self {
            expression: raw.expression,
            translation: raw.translation,
            usage: raw.usage,
        })
    }
}

/// The model output did not match the key-expression schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("key expression field '{0}' must be a non-empty string")]
    EmptyField(&'static str),
    #[error("key expression output is not a valid JSON array of expressions: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parses raw completion text into an ordered list of key expressions.
///
/// The whole input must be a JSON array whose elements are objects with exactly
/// `expression`, `translation` and `usage`. Any violation rejects the whole list.
pub fn parse_key_expressions(raw: &str) -> Result<Vec<KeyExpression>, SchemaError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_array_preserves_order() {
        let raw = r#"[
            {"expression": "I think", "translation": "私は思う", "usage": "Introduces an opinion."},
            {"expression": "should be", "translation": "〜であるべき", "usage": "Expresses obligation."}
        ]"#;

        let parsed = parse_key_expressions(raw).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].expression(), "I think");
        assert_eq!(parsed[1].expression(), "should be");
        assert_eq!(parsed[1].translation(), "〜であるべき");
        assert_eq!(parsed[1].usage(), "Expresses obligation.");
    }

    #[test]
    fn test_parse_empty_array_is_valid() {
        assert!(parse_key_expressions("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_key_expressions("not json").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_non_array_top_level() {
        let raw = r#"{"expression": "a", "translation": "b", "usage": "c"}"#;
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let raw = r#"[{"expression": "a", "translation": "b"}]"#;
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_extra_field() {
        let raw = r#"[{"expression": "a", "translation": "b", "usage": "c", "level": "B1"}]"#;
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let raw = r#"[{"expression": "a", "translation": "b", "usage": 3}]"#;
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_string_field() {
        let raw = r#"[{"expression": "a", "translation": " ", "usage": "c"}]"#;
        let err = parse_key_expressions(raw).unwrap_err();
        assert!(err.to_string().contains("translation"));
    }

    #[test]
    fn test_parse_rejects_whole_list_when_one_element_is_bad() {
        let raw = r#"[
            {"expression": "a", "translation": "b", "usage": "c"},
            {"expression": "d", "translation": "e"}
        ]"#;
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_code_fenced_output() {
        let raw = "```json\n[{\"expression\": \"a\", \"translation\": \"b\", \"usage\": \"c\"}]\n```";
        assert!(parse_key_expressions(raw).is_err());
    }

    #[test]
    fn test_new_validates_fields() {
        assert!(KeyExpression::new("a", "b", "c").is_ok());
        assert!(matches!(
            KeyExpression::new("", "b", "c"),
            Err(SchemaError::EmptyField("expression"))
        ));
    }
}
