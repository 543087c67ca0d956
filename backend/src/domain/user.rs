//! User aggregate.
//!
//! Identity (id, phone number, name parts) is fixed at registration; only the
//! preferred language may change afterwards. The password is stored as an
//! opaque hash produced by the injected hasher — the domain never sees or
//! logs plaintext.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::language::Language;
use super::phone::PhoneNumber;

/// Validation errors returned by [`User::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyFirstName,
    FirstNameTooLong { max: usize },
    LastNameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::FirstNameTooLong { max } => {
                write!(f, "first name must be at most {max} characters")
            }
            Self::LastNameTooLong { max } => {
                write!(f, "last name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for either name part.
pub const NAME_PART_MAX: usize = 64;

/// Opaque password hash.
///
/// Wraps whatever string the configured [`PasswordHasher`] produced. `Debug`
/// is redacted so an accidentally logged user never reveals the hash.
///
/// [`PasswordHasher`]: crate::domain::ports::PasswordHasher
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash string.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The stored hash string, for verification and persistence only.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Registered user.
///
/// ## Invariants
/// - `first_name` is trimmed, non-empty, and at most [`NAME_PART_MAX`] chars.
/// - `last_name`, when present, is trimmed and at most [`NAME_PART_MAX`] chars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: Option<String>,
    phone: PhoneNumber,
    password_hash: PasswordHash,
    language: Language,
    superadmin: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user at registration time.
    ///
    /// The phone number is already validated by construction; name parts are
    /// trimmed and validated here.
    pub fn register(
        id: UserId,
        first_name: impl Into<String>,
        last_name: Option<String>,
        phone: PhoneNumber,
        password_hash: PasswordHash,
        language: Language,
        created_at: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let first_name = first_name.into().trim().to_owned();
        if first_name.is_empty() {
            return Err(UserValidationError::EmptyFirstName);
        }
        if first_name.chars().count() > NAME_PART_MAX {
            return Err(UserValidationError::FirstNameTooLong { max: NAME_PART_MAX });
        }

        let last_name = match last_name {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.chars().count() > NAME_PART_MAX {
                    return Err(UserValidationError::LastNameTooLong { max: NAME_PART_MAX });
                }
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            }
            None => None,
        };

        Ok(Self {
            id,
            first_name,
            last_name,
            phone,
            password_hash,
            language,
            superadmin: false,
            created_at,
        })
    }

    /// Rehydrate a user from storage without re-running registration checks.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        id: UserId,
        first_name: String,
        last_name: Option<String>,
        phone: PhoneNumber,
        password_hash: PasswordHash,
        language: Language,
        superadmin: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            phone,
            password_hash,
            language,
            superadmin,
            created_at,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// First name part.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Optional last name part.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Normalized phone number the user registered with.
    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Preferred interface language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether the user holds the global superadmin flag.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.superadmin
    }

    /// Registration timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Change the preferred language; the only mutable identity field.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn phone() -> PhoneNumber {
        PhoneNumber::new("+14155550000").expect("valid phone")
    }

    fn register(first: &str, last: Option<&str>) -> Result<User, UserValidationError> {
        User::register(
            UserId::random(),
            first,
            last.map(str::to_owned),
            phone(),
            PasswordHash::new("hashed"),
            Language::En,
            Utc::now(),
        )
    }

    #[test]
    fn register_trims_name_parts() {
        let user = register("  Ada  ", Some("  Lovelace ")).expect("valid user");
        assert_eq!(user.first_name(), "Ada");
        assert_eq!(user.last_name(), Some("Lovelace"));
        assert!(!user.is_superadmin());
    }

    #[test]
    fn blank_last_name_collapses_to_none() {
        let user = register("Ada", Some("   ")).expect("valid user");
        assert_eq!(user.last_name(), None);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyFirstName)]
    #[case("   ", UserValidationError::EmptyFirstName)]
    fn rejects_blank_first_name(#[case] first: &str, #[case] expected: UserValidationError) {
        let err = register(first, None).expect_err("blank first name must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn rejects_over_long_names() {
        let long = "x".repeat(NAME_PART_MAX + 1);
        let err = register(&long, None).expect_err("over-long first name");
        assert_eq!(err, UserValidationError::FirstNameTooLong { max: NAME_PART_MAX });
        let err = register("Ada", Some(&long)).expect_err("over-long last name");
        assert_eq!(err, UserValidationError::LastNameTooLong { max: NAME_PART_MAX });
    }

    #[test]
    fn debug_never_reveals_password_hash() {
        let user = register("Ada", None).expect("valid user");
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("hashed"));
        assert!(rendered.contains("PasswordHash(***)"));
    }

    #[test]
    fn language_is_mutable() {
        let mut user = register("Ada", None).expect("valid user");
        user.set_language(Language::Ru);
        assert_eq!(user.language(), Language::Ru);
    }
}
