use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Λάθος όνομα χρήστη ή κωδικός.";

/// Decides whether a user name and password pair may log in.
#[async_trait::async_trait]
pub trait CredentialCheck: Send + Sync {
    async fn verify(&self, user_name: &str, password: &str) -> bool;
}

/// A single user name and password pair taken from configuration. Compared
/// as plain strings. When either value is missing nobody can log in.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    user_name: Option<String>,
    password: Option<String>,
}

impl StaticCredentials {
    pub fn new(user_name: Option<String>, password: Option<String>) -> Self {
        Self {
            user_name,
            password,
        }
    }
}

#[async_trait::async_trait]
impl CredentialCheck for StaticCredentials {
    async fn verify(&self, user_name: &str, password: &str) -> bool {
        match (&self.user_name, &self.password) {
            (Some(expected_user_name), Some(expected_password)) => {
                expected_user_name == user_name && expected_password == password
            }
            _ => false,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, serde::Serialize)]
pub struct LoginOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// A missing or unreadable body counts as empty credentials, so it is
/// answered with the same 401 as a wrong password.
pub async fn post(
    State(app_state): State<crate::AppState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> impl IntoResponse {
    let Credentials { username, password } = credentials
        .map(|Json(credentials)| credentials)
        .unwrap_or_default();
    if app_state.credentials.verify(&username, &password).await {
        tracing::info!(user_name = %username, "login succeeded");
        (
            StatusCode::OK,
            Json(LoginOutcome {
                success: true,
                name: Some(username),
                message: None,
            }),
        )
    } else {
        tracing::warn!(user_name = %username, "login rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginOutcome {
                success: false,
                name: None,
                message: Some(INVALID_CREDENTIALS_MESSAGE),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_accepts_only_the_exact_configured_pair() {
        let credentials = StaticCredentials::new(Some("admin".to_owned()), Some("s3cret".to_owned()));
        assert!(credentials.verify("admin", "s3cret").await);
        assert!(!credentials.verify("admin", "S3cret").await);
        assert!(!credentials.verify("Admin", "s3cret").await);
        assert!(!credentials.verify("admin ", "s3cret").await);
    }

    #[tokio::test]
    async fn it_rejects_everyone_when_nothing_is_configured() {
        let credentials = StaticCredentials::new(None, None);
        assert!(!credentials.verify("", "").await);
        let half_configured = StaticCredentials::new(Some("admin".to_owned()), None);
        assert!(!half_configured.verify("admin", "").await);
    }
}
