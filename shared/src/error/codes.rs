//! Error codes for seatplan
//!
//! Codes are grouped by the thousands digit, see [`ErrorCategory`](super::ErrorCategory).
//! The numbers are part of the wire format; never renumber an existing code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error code carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx request
    ValidationFailed = 2,
    AlreadyExists = 4,
    RequiredField = 7,

    // 1xxx accounts
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    PasswordTooShort = 1005,
    InvalidEmail = 1006,
    /// Password change with a wrong current password
    CurrentPasswordMismatch = 1007,

    // 2xxx
    PermissionDenied = 2001,

    // 3xxx guests
    GuestNotFound = 3001,
    CategoryNotFound = 3101,

    // 4xxx tables
    TableNotFound = 4001,
    MapTableNotFound = 4101,
    RoundTableNotRotatable = 4102,
    InvalidRotation = 4103,

    // 5xxx seating
    GuestNotSeated = 5001,
    SideNotAllowed = 5002,
    PlanMismatch = 5003,
    InvalidPosition = 5004,
    SeatNotFound = 5005,

    // 6xxx messages
    MessageNotFound = 6001,

    // 9xxx
    InternalError = 9001,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 24] = [
        ErrorCode::ValidationFailed,
        ErrorCode::AlreadyExists,
        ErrorCode::RequiredField,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::PasswordTooShort,
        ErrorCode::InvalidEmail,
        ErrorCode::CurrentPasswordMismatch,
        ErrorCode::PermissionDenied,
        ErrorCode::GuestNotFound,
        ErrorCode::CategoryNotFound,
        ErrorCode::TableNotFound,
        ErrorCode::MapTableNotFound,
        ErrorCode::RoundTableNotRotatable,
        ErrorCode::InvalidRotation,
        ErrorCode::GuestNotSeated,
        ErrorCode::SideNotAllowed,
        ErrorCode::PlanMismatch,
        ErrorCode::InvalidPosition,
        ErrorCode::SeatNotFound,
        ErrorCode::MessageNotFound,
        ErrorCode::InternalError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message, used when the caller gives none
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::InvalidEmail => "Email address is invalid",
            ErrorCode::CurrentPasswordMismatch => "Current password is wrong",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::MapTableNotFound => "Map table not found",
            ErrorCode::RoundTableNotRotatable => "Round tables cannot be rotated",
            ErrorCode::InvalidRotation => "Rotation must be 0 or 90",
            ErrorCode::GuestNotSeated => "Guest is not seated in this plan",
            ErrorCode::SideNotAllowed => "Side is not valid for this table shape",
            ErrorCode::PlanMismatch => "Table does not belong to this plan",
            ErrorCode::InvalidPosition => "Seat position must be at least 1",
            ErrorCode::SeatNotFound => "Seat not found",
            ErrorCode::MessageNotFound => "Message not found",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not one of the known codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_sorted_and_round_trips() {
        for pair in ErrorCode::ALL.windows(2) {
            assert!(pair[0].code() < pair[1].code(), "{:?}", pair);
        }
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(5999), Err(InvalidErrorCode(5999)));
    }

    #[test]
    fn test_wire_form_is_a_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::SeatNotFound).unwrap(), "5005");
        let code: ErrorCode = serde_json::from_str("1007").unwrap();
        assert_eq!(code, ErrorCode::CurrentPasswordMismatch);
        assert!(serde_json::from_str::<ErrorCode>("3").is_err());
    }
}
