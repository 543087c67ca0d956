//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::phone::{PhoneNumber, PhoneValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Phone number was missing or malformed.
    InvalidPhone(PhoneValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhone(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `phone` passed full phone-number validation.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    phone: PhoneNumber,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw phone/password inputs.
    pub fn try_from_parts(phone: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let phone = PhoneNumber::new(phone).map_err(CredentialValidationError::InvalidPhone)?;

        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }

        Ok(Self {
            phone,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Phone number suitable for user lookups.
    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("not-a-phone", "pw")]
    fn malformed_phone_is_rejected(#[case] phone: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(phone, password)
            .expect_err("invalid phone must fail");
        assert!(matches!(err, CredentialValidationError::InvalidPhone(_)));
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = LoginCredentials::try_from_parts("+14155550000", "")
            .expect_err("blank password must fail");
        assert_eq!(err, CredentialValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("+14155550000", "secret")]
    #[case("+79261234567", "correct horse battery staple")]
    fn valid_credentials_pass(#[case] phone: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(phone, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.phone().as_ref(), phone);
        assert_eq!(creds.password(), password);
    }
}
