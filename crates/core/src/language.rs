use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The language a learner wrote their opinion in.
///
/// English opinions receive corrective feedback; every other language is
/// translated into English first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    English,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl LanguageTag {
    /// The tag sent on the wire. `Other` is sent as Japanese, the lesson's
    /// native-language locale.
    pub fn code(self) -> &'static str {
        match self {
            LanguageTag::English => "en",
            LanguageTag::Other => "ja",
        }
    }
}

impl FromStr for LanguageTag {
    type Err = UnsupportedLanguage;

    /// Accepts `en` (any case, optional subtags) as English and any other
    /// well-formed language tag as `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let mut subtags = tag.split(['-', '_']);
        let primary = subtags.next().unwrap_or_default();

        let primary_ok = (2..=3).contains(&primary.len())
            && primary.chars().all(|c| c.is_ascii_alphabetic());
        let rest_ok = subtags.all(|sub| {
            (1..=8).contains(&sub.len()) && sub.chars().all(|c| c.is_ascii_alphanumeric())
        });
        if !primary_ok || !rest_ok {
            return Err(UnsupportedLanguage(s.to_string()));
        }

        if primary.eq_ignore_ascii_case("en") {
            Ok(LanguageTag::English)
        } else {
            Ok(LanguageTag::Other)
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
