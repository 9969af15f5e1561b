/// Maximum length of a player or room identifier (bytes).
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate a player or room identifier from an inbound webhook.
/// `what` names the field in the error message.
pub fn validate_identifier(what: &str, id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    if id.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "{what} too long (max {} bytes)",
            MAX_IDENTIFIER_LENGTH
        ));
    }
    if id.chars().any(char::is_control) {
        return Err(format!("{what} cannot contain control characters"));
    }
    Ok(())
}

/// Validate an optional identifier; absent is fine, present must be valid.
pub fn validate_optional_identifier(what: &str, id: Option<&str>) -> Result<(), String> {
    match id {
        Some(id) => validate_identifier(what, id),
        None => Ok(()),
    }
}

/// Require an identifier to be present and valid.
pub fn require_identifier(what: &str, id: Option<String>) -> Result<String, String> {
    let id = id.ok_or_else(|| format!("{what} is required"))?;
    validate_identifier(what, &id)?;
    Ok(id)
}
