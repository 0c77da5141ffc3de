//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Not-owned resources look the same as missing ones
            Self::GuestNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound
            | Self::MapTableNotFound
            | Self::SeatNotFound
            | Self::MessageNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            Self::ValidationFailed
            | Self::RequiredField
            | Self::PasswordTooShort
            | Self::InvalidEmail
            | Self::CurrentPasswordMismatch
            | Self::RoundTableNotRotatable
            | Self::InvalidRotation
            | Self::GuestNotSeated
            | Self::SideNotAllowed
            | Self::PlanMismatch
            | Self::InvalidPosition => StatusCode::BAD_REQUEST,
        }
    }
}
