use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failure of a request. Every variant carries the plain-text message the
/// client receives; database details stay in the server log.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        source: crm_db::Error,
    },
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
}

impl ApiError {
    pub fn database(context: &'static str) -> impl FnOnce(crm_db::Error) -> Self {
        move |source| Self::Database { context, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Database { context, source } => {
                tracing::error!("{context}: {source}");
                (status, context).into_response()
            }
            Self::Validation(message) | Self::NotFound(message) => {
                (status, message).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_hide_the_cause_from_the_client() {
        let response = ApiError::database("Error fetching rooms")(crm_db::Error::NotFound)
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_and_not_found_map_to_their_statuses() {
        assert_eq!(
            ApiError::Validation("Name is required").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("Customer not found").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
