//! Preferred interface language for a user.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported interface languages.
///
/// Mirrors the locale prefixes the page router understands; [`Language::En`]
/// is the default for new registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Russian.
    Ru,
}

impl Language {
    /// Two-letter locale code as used in URL prefixes and storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported locale code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(UnsupportedLanguage(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Language::En)]
    #[case("ru", Language::Ru)]
    fn parses_supported_codes(#[case] raw: &str, #[case] expected: Language) {
        assert_eq!(raw.parse::<Language>().expect("supported code"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "de".parse::<Language>().expect_err("unsupported code");
        assert_eq!(err, UnsupportedLanguage("de".to_owned()));
    }

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default(), Language::En);
    }
}
