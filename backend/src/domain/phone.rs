//! Phone number value object.
//!
//! Registration identifies users by phone number in E.164-like form: a `+`
//! followed by 1 to 15 digits with a non-zero leading digit. Validation lives
//! in the constructor so the rest of the domain can rely on every
//! [`PhoneNumber`] being well formed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`PhoneNumber::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneValidationError {
    Empty,
    Malformed,
}

impl fmt::Display for PhoneValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "phone number must not be empty"),
            Self::Malformed => write!(
                f,
                "phone number must be a + followed by 1 to 15 digits, e.g. +14155550000",
            ),
        }
    }
}

impl std::error::Error for PhoneValidationError {}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        let pattern = r"^\+[1-9]\d{1,14}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("phone number regex failed to compile: {error}"))
    })
}

/// Validated phone number in E.164-like form.
///
/// ## Invariants
/// - Matches `^\+[1-9]\d{1,14}$`; no whitespace, separators, or extensions.
///
/// Equality compares the normalized string, so two values built from the same
/// input are always equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "+14155550000")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and construct a [`PhoneNumber`].
    pub fn new(raw: impl Into<String>) -> Result<Self, PhoneValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PhoneValidationError::Empty);
        }
        if !phone_regex().is_match(&raw) {
            return Err(PhoneValidationError::Malformed);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
