use std::sync::Arc;

use api::AuthGateway;
use quiz_core::model::Identity;

use crate::error::AuthError;

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthService {
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank,
    /// without contacting the gateway; `AuthError::Api` if it rejects them.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (email, password) = credentials(email, password)?;
        let identity = self.gateway.login(email, password).await?;
        tracing::info!(user = %identity.user_id(), "logged in");
        Ok(identity)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Same as `login`.
    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (email, password) = credentials(email, password)?;
        let identity = self.gateway.register(email, password).await?;
        tracing::info!(user = %identity.user_id(), "account registered");
        Ok(identity)
    }
}

/// Emails are trimmed; passwords are passed through untouched.
fn credentials<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok((email, password))
}
