use serde_json::json;
use tracing::{error, info};
use url::Url;

use crate::errors::AppError;
use crate::external::session::Session;
use crate::models::LoginResponse;

pub const LOGIN_PATH: &str = "/auth/login";

/// Exchanges credentials for a bearer token. Login itself is unauthenticated.
pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl AuthClient {
    pub fn new(client: reqwest::Client, base_url: &str, session: Session) -> Result<Self, AppError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            session,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let url = self.base_url.join(LOGIN_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body: LoginResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let reason = body.error.unwrap_or_else(|| format!("HTTP {}", status));
            error!(username, %status, "Login rejected: {}", reason);
            return Err(AppError::LoginFailed(reason));
        }

        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::LoginFailed("response did not contain a token".to_string()))?;

        self.session.store_token(&token)?;
        info!(username, "✅ Logged in");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}
