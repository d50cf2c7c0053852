//! Application error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::domain::InvalidSearchMode;
use crate::loader::LoaderError;
use crate::service::ServiceError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::UnknownStation(_)
            | ServiceError::RouteNotFound { .. }
            | ServiceError::FareNotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            ServiceError::InvalidSimulation(ref reason) => AppError::BadRequest {
                message: format!("{} ({})", e, reason.reason()),
            },
        }
    }
}

impl From<InvalidSearchMode> for AppError {
    fn from(e: InvalidSearchMode) -> Self {
        AppError::bad_request(e.to_string())
    }
}

impl From<LoaderError> for AppError {
    fn from(e: LoaderError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, message = self.message(), "Request failed");
        } else {
            debug!(%status, message = self.message(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulationError;

    #[test]
    fn identity_and_reachability_are_not_found() {
        let unknown: AppError = ServiceError::UnknownStation("X".into()).into();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.message(), "station not found: X");

        let no_route: AppError = ServiceError::RouteNotFound {
            origin: "A".into(),
            destination: "B".into(),
        }
        .into();
        assert_eq!(no_route.status(), StatusCode::NOT_FOUND);
        assert_eq!(no_route.message(), "route not found from A to B");
    }

    #[test]
    fn invalid_simulation_is_bad_request_with_reason() {
        let err: AppError =
            ServiceError::InvalidSimulation(SimulationError::InvalidSpeed(0.0)).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().ends_with("(invalid_speed)"));
    }

    #[test]
    fn bad_mode_is_bad_request() {
        let err: AppError = "fast".parse::<crate::domain::SearchMode>().unwrap_err().into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_carries_status() {
        let response = AppError::Internal {
            message: "boom".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
