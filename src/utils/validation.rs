use crate::utils::error::{DrError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Host;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn service_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap())
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> DrError {
    DrError::Validation {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// 服務代號：大寫英數字與底線，例如 `HMT`、`ADD_ON`
pub fn validate_service_id(field_name: &str, value: &str) -> Result<()> {
    if !service_id_pattern().is_match(value) {
        return Err(invalid(
            field_name,
            value,
            "Service ids are uppercase tokens such as HMT or ADD_ON",
        ));
    }
    Ok(())
}

pub fn validate_unique<'a>(field_name: &str, values: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(invalid(field_name, value, "Duplicate entry"));
        }
    }
    Ok(())
}

/// Values embedded as the default of a `${NAME:default}` placeholder.
pub fn validate_placeholder_default(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(field_name, value, "Value cannot contain whitespace"));
    }
    if value.contains('}') {
        return Err(invalid(
            field_name,
            value,
            "Value cannot contain '}' (it would close the placeholder)",
        ));
    }
    Ok(())
}

pub fn validate_host(field_name: &str, value: &str) -> Result<()> {
    validate_placeholder_default(field_name, value)?;
    Host::parse(value)
        .map(|_| ())
        .map_err(|e| invalid(field_name, value, format!("Invalid host: {}", e)))
}
