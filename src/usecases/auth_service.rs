//! Login / registration flow. Delegates credential exchange to the gateway
//! and persists the resulting opaque token via SessionStore.

use crate::domain::{DomainError, Session};
use crate::ports::{ExpenseGateway, SessionStore};
use std::sync::Arc;
use tracing::info;

pub struct AuthService {
    gateway: Arc<dyn ExpenseGateway>,
    store: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn ExpenseGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self { gateway, store }
    }

    /// Returns the stored session from a previous run, if any.
    pub async fn current_session(&self) -> Result<Option<Session>, DomainError> {
        self.store.load().await
    }

    /// Exchange credentials for a token and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        if !is_valid_email(email) {
            return Err(DomainError::Input(format!("Invalid email: {}", email)));
        }
        let session = self.gateway.login(email, password).await?;
        self.store.save(&session).await?;
        info!(user_id = session.user_id, "session stored");
        Ok(session)
    }

    /// Create an account. Returns the service's confirmation message; the
    /// caller still logs in afterwards, matching the service's flow.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<String, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::Input("Username is required".to_string()));
        }
        if !is_valid_email(email) {
            return Err(DomainError::Input(format!("Invalid email: {}", email)));
        }
        if !is_valid_phone(phone_number) {
            return Err(DomainError::Input(
                "Phone number must be 1-15 digits".to_string(),
            ));
        }
        self.gateway
            .register(username, email, password, phone_number)
            .await
    }

    /// Fetch the signed-in user's display name for the dashboard greeting.
    pub async fn profile(&self, session: &Session) -> Result<String, DomainError> {
        self.gateway.user_profile(session, session.user_id).await
    }

    /// Drop the stored session.
    pub async fn logout(&self) -> Result<(), DomainError> {
        self.store.clear().await?;
        info!("session cleared");
        Ok(())
    }
}

/// Same shape the registration form enforces: one '@', a dot in the domain,
/// no whitespace.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !email.chars().any(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty() && phone.len() <= 15 && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::MockGateway;
    use crate::adapters::session::SessionJson;

    fn service(name: &str) -> AuthService {
        let path = std::env::temp_dir().join(format!("splitfair-auth-{}.json", name));
        AuthService::new(
            Arc::new(MockGateway::with_delay(1)),
            Arc::new(SessionJson::new(path)),
        )
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at.com"));
        assert!(!is_valid_email("two@@b.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("12-34"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let auth = service("login");
        auth.logout().await.unwrap();

        let session = auth.login("alice@example.com", "pw").await.unwrap();
        assert_eq!(session.user_id, 1);

        let stored = auth.current_session().await.unwrap().unwrap();
        assert_eq!(stored.token, session.token);

        auth.logout().await.unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_returns_display_name() {
        let auth = service("profile");
        let session = auth.login("alice@example.com", "pw").await.unwrap();
        assert_eq!(auth.profile(&session).await.unwrap(), "alice");
        auth.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let auth = service("register");
        assert!(auth.register("", "a@b.com", "pw", "123").await.is_err());
        assert!(auth.register("x", "bad", "pw", "123").await.is_err());
        assert!(auth.register("x", "a@b.com", "pw", "12a").await.is_err());
        assert!(auth.register("x", "a@b.com", "pw", "123").await.is_ok());
    }
}
