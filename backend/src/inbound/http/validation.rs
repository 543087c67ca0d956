//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, Language, PhoneNumber};

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn empty_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": "empty_field",
    }))
}

pub(crate) fn require_non_empty(value: &str, field: &'static str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty_field_error(field));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn parse_phone(value: &str) -> Result<PhoneNumber, Error> {
    PhoneNumber::new(value).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": "phone",
            "value": value,
            "code": "invalid_phone",
        }))
    })
}

pub(crate) fn parse_language(value: Option<String>) -> Result<Language, Error> {
    let Some(raw) = value else {
        return Ok(Language::default());
    };
    Language::from_str(&raw).map_err(|_| {
        Error::invalid_request("language must be en or ru").with_details(json!({
            "field": "language",
            "value": raw,
            "code": "unsupported_language",
        }))
    })
}
