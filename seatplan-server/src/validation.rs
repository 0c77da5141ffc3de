//! Input validation helpers
//!
//! Text limits and small parsers shared by the HTTP handlers and stores.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};
use shared::models::Plan;

// ── Text length limits ──────────────────────────────────────────────

/// Guest, category and table names
pub const MAX_NAME_LEN: usize = 200;

/// Free-text guest notes
pub const MAX_NOTE_LEN: usize = 500;

/// Support messages
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Table names are stored trimmed and upper-cased
pub fn normalize_table_name(name: &str) -> Result<String, AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    Ok(name.trim().to_uppercase())
}

// ── Accounts ────────────────────────────────────────────────────────

/// Loose shape check: one `@` with text on both sides and a dot in the domain
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidEmail));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort)
            .with_detail("min_length", MIN_PASSWORD_LEN as u64));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Event dates are calendar days, `YYYY-MM-DD`; empty means "clear"
pub fn validate_event_date(value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Ok(());
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            AppError::validation(format!("Invalid event_date: {value}"))
                .with_detail("event_date", value)
        })
}

// ── Layout ──────────────────────────────────────────────────────────

/// Map tables are either upright or turned a quarter
pub fn validate_rotation(rotation: i32) -> Result<(), AppError> {
    match rotation {
        0 | 90 => Ok(()),
        other => Err(AppError::new(ErrorCode::InvalidRotation).with_detail("rotation", other)),
    }
}

/// Parse the `plan` query parameter; it is mandatory on plan-scoped routes
pub fn parse_plan(raw: Option<&str>) -> Result<Plan, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    match raw {
        None => Err(AppError::required("plan")),
        Some(s) if s.eq_ignore_ascii_case("a") => Ok(Plan::A),
        Some(s) if s.eq_ignore_ascii_case("b") => Ok(Plan::B),
        Some(s) => Err(AppError::validation(format!("Invalid plan: {s}")).with_detail("plan", s)),
    }
}
