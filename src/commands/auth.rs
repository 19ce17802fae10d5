//! Auth Commands
//!
//! Sign-up, sign-in, sign-out and the current user, as the views need them.

use async_trait::async_trait;
use supabase_rest::SupabaseClient;
use thiserror::Error;

use crate::models::Identity;

/// Auth failure as the views classify it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The auth provider rejected the request; carries its message
    #[error("{0}")]
    Provider(String),
    /// Transport or decoding failure
    #[error("{0}")]
    Unexpected(String),
}

impl From<supabase_rest::Error> for AuthError {
    fn from(err: supabase_rest::Error) -> Self {
        match err {
            supabase_rest::Error::Api { message, .. } => AuthError::Provider(message),
            other => AuthError::Unexpected(other.to_string()),
        }
    }
}

#[async_trait(?Send)]
pub trait AuthProvider {
    async fn current_user(&self) -> Result<Option<Identity>, AuthError>;

    /// Register; `redirect_to` is where email confirmation links land
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[async_trait(?Send)]
impl AuthProvider for SupabaseClient {
    async fn current_user(&self) -> Result<Option<Identity>, AuthError> {
        let user = self.auth().get_user().await?;
        Ok(user.as_ref().map(Identity::from))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        self.auth().sign_up(email, password, Some(redirect_to)).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.auth().sign_in_with_password(email, password).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth().sign_out().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_are_provider_errors() {
        let err = AuthError::from(supabase_rest::Error::Api {
            status: 400,
            message: "Email not confirmed".into(),
        });
        assert_eq!(err, AuthError::Provider("Email not confirmed".into()));
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        let err = AuthError::from(supabase_rest::Error::MissingSession);
        assert!(matches!(err, AuthError::Unexpected(_)));
    }
}
