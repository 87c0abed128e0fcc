//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for a session id.
const MIN_SESSION_ID_LENGTH: usize = 8;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_session_id(&config.account.session_id)?;

    let options = &config.options;

    if options.max_parallel == 0 {
        return Err(invalid("max_parallel", "Must be at least 1"));
    }

    if options.max_page_behind == 0 {
        return Err(invalid("max_page_behind", "Must be at least 1"));
    }

    if options.poll_frequency_seconds == 0 {
        return Err(invalid("poll_frequency_seconds", "Must be at least 1"));
    }

    validate_extensions(&options.allow_file_exts)?;

    Ok(())
}

/// Validate the `FANBOXSESSID` value.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::MissingConfig(
            "session_id (the FANBOXSESSID cookie from your browser)".to_string(),
        ));
    }

    if session_id.len() < MIN_SESSION_ID_LENGTH {
        return Err(invalid(
            "session_id",
            &format!(
                "Session id must be at least {} characters (got {})",
                MIN_SESSION_ID_LENGTH,
                session_id.len()
            ),
        ));
    }

    // Characters that would break the cookie header
    if session_id
        .chars()
        .any(|c| c.is_whitespace() || c == ';' || c == ',')
    {
        return Err(invalid(
            "session_id",
            "Session id must not contain whitespace, ';' or ','",
        ));
    }

    let lower = session_id.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(invalid(
            "session_id",
            "Session id appears to be a placeholder. Please provide your FANBOXSESSID cookie.",
        ));
    }

    Ok(())
}

/// Validate the file extension allow-list.
pub fn validate_extensions<S: AsRef<str>>(extensions: &[S]) -> Result<()> {
    for ext in extensions {
        let ext = ext.as_ref().trim().trim_start_matches('.');
        if ext.is_empty() {
            return Err(invalid("allow_file_exts", "Extensions must not be empty"));
        }
        if ext.contains('/') || ext.contains('\\') {
            return Err(invalid(
                "allow_file_exts",
                &format!("Invalid extension: '{}'", ext),
            ));
        }
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> Error {
    Error::ConfigValidation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
