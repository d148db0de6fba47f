use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};

use crate::models::DonationStatus;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    #[display(fmt = "accept")]
    Accept,
    #[display(fmt = "complete-pickup")]
    CompletePickup,
}

#[derive(Debug, Display, Error, PartialEq, serde::Serialize)]
pub enum AppError {
    #[display(fmt = "internal error")]
    InternalError,

    #[display(fmt = "bad request: {}", reason)]
    BadClientData { reason: String },

    #[display(fmt = "please fill in all required fields: {}", fields)]
    ValidationError { fields: String },

    #[display(fmt = "donation not found")]
    NotFound,

    #[display(fmt = "cannot {} a donation that is {}", transition, from)]
    InvalidTransition {
        transition: Transition,
        from: DonationStatus,
    },

    #[display(fmt = "cannot {} an expired donation", transition)]
    DonationExpired { transition: Transition },

    #[display(fmt = "operation cancelled")]
    Cancelled,

    #[display(fmt = "token decoding error")]
    DecodeError,

    #[display(fmt = "unauthorized")]
    Unauthorized,

    #[display(fmt = "forbidden")]
    Forbidden,
}

impl AppError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        AppError::BadClientData {
            reason: reason.into(),
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        AppError::ValidationError {
            fields: fields.join(", "),
        }
    }
}

impl error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadClientData { .. } => StatusCode::BAD_REQUEST,
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::DonationExpired { .. } => StatusCode::CONFLICT,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DecodeError => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn invalid_transition_names_state_and_action() {
        let err = AppError::InvalidTransition {
            transition: Transition::Accept,
            from: DonationStatus::Accepted,
        };
        assert_eq!(err.to_string(), "cannot accept a donation that is accepted");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_lists_missing_fields() {
        let err = AppError::missing_fields(&["title", "address"]);
        assert_eq!(
            err.to_string(),
            "please fill in all required fields: title, address"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
