use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::errors::AppError;
use crate::external::session::Session;

/// Authenticated JSON calls against the dashboard backend.
///
/// `Ok(None)` means the session expired (HTTP 401). The token is already cleared and listeners
/// notified, so callers drop the call silently.
#[async_trait]
pub trait AuthenticatedFetcher: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Option<Value>, AppError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Option<Value>, AppError>;
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, base_url: &str, session: Session) -> Result<Self, AppError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            session,
        })
    }

    /// Adds the bearer header when a token is present. Without one the request goes out
    /// unauthenticated and the backend answers 401.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        let url = self.base_url.join(path)?;
        let builder = self.client.request(method, url);
        Ok(match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// The single place where 401 is handled.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Option<Value>, AppError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Received 401, redirecting to login");
            self.session.redirect_to_login();
            return Ok(None);
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(Some(value)),
            Err(_) if !status.is_success() => Err(AppError::Http {
                status,
                message: body.chars().take(200).collect(),
            }),
            Err(e) => Err(AppError::Parse(e.to_string())),
        }
    }
}

#[async_trait]
impl AuthenticatedFetcher for HttpFetcher {
    async fn get_json(&self, path: &str) -> Result<Option<Value>, AppError> {
        debug!(path, "GET");
        let response = self.request(Method::GET, path)?.send().await?;
        self.handle_response(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Option<Value>, AppError> {
        debug!(path, "POST");
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::session::SessionEvent;
    use crate::external::token_store::{MemoryTokenStore, TokenStore};
    use std::sync::Arc;

    fn fetcher_with_token(token: Option<&str>) -> (HttpFetcher, Session) {
        let store = Arc::new(MemoryTokenStore::new());
        if let Some(t) = token {
            store.set(t).unwrap();
        }
        let session = Session::new(store);
        let fetcher =
            HttpFetcher::new(reqwest::Client::new(), "http://127.0.0.1:12580", session.clone())
                .unwrap();
        (fetcher, session)
    }

    fn response(status: u16, body: &str) -> reqwest::Response {
        let response = http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(response)
    }

    #[test]
    fn test_bearer_header_only_with_token() {
        let (fetcher, _) = fetcher_with_token(Some("secret"));
        let request = fetcher.request(Method::GET, "/api/config").unwrap().build().unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer secret"
        );
        assert_eq!(request.url().as_str(), "http://127.0.0.1:12580/api/config");

        let (anonymous, _) = fetcher_with_token(None);
        let request = anonymous.request(Method::GET, "/api/config").unwrap().build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_401_clears_token_and_yields_none() {
        let (fetcher, session) = fetcher_with_token(Some("stale"));
        let mut events = session.subscribe();

        let result = fetcher.handle_response(response(401, "")).await.unwrap();

        assert!(result.is_none());
        assert!(session.token().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
    }

    #[tokio::test]
    async fn test_error_status_with_json_body_is_returned() {
        let (fetcher, _) = fetcher_with_token(Some("t"));
        let value = fetcher
            .handle_response(response(400, r#"{"error":"股票代码不能为空"}"#))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value["error"], "股票代码不能为空");
    }

    #[tokio::test]
    async fn test_non_json_bodies() {
        let (fetcher, _) = fetcher_with_token(Some("t"));

        let err = fetcher
            .handle_response(response(502, "<html>bad gateway</html>"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http { status, .. } if status == StatusCode::BAD_GATEWAY));

        let err = fetcher.handle_response(response(200, "not json")).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
