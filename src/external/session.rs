use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::token_store::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Token cleared; the user has to log in again.
    LoginRequired,
    LoggedIn,
}

/// Token access plus the "redirect to login" signal, shared by every HTTP call site.
#[derive(Clone)]
pub struct Session {
    tokens: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { tokens, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub fn store_token(&self, token: &str) -> Result<(), AppError> {
        self.tokens.set(token)?;
        info!("🔑 Session token stored");
        // Nobody listening is fine.
        let _ = self.events.send(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Clears the token and tells listeners to show the login flow.
    pub fn redirect_to_login(&self) {
        self.tokens.clear();
        warn!("Session expired or missing, login required");
        let _ = self.events.send(SessionEvent::LoginRequired);
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.redirect_to_login();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::token_store::MemoryTokenStore;

    #[tokio::test]
    async fn test_redirect_clears_token_and_notifies() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        let mut events = session.subscribe();

        session.store_token("abc").unwrap();
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
        assert!(session.is_authenticated());

        session.redirect_to_login();
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoginRequired);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_redirect_without_listeners_is_fine() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        session.logout();
        assert!(!session.is_authenticated());
    }
}
