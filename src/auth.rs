//! Auth Form Logic
//!
//! Mode switching, credential validation and provider error wording for the
//! sign-in / sign-up screen.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::commands::{AuthError, AuthProvider};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Welcome back",
            AuthMode::SignUp => "Create your account",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in to access your tasks and notes",
            AuthMode::SignUp => "Start organizing your tasks and notes",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in",
            AuthMode::SignUp => "Create account",
        }
    }

    /// Label of the button switching to the other mode
    pub fn switch_prompt(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Don't have an account? Sign up",
            AuthMode::SignUp => "Already have an account? Sign in",
        }
    }

    pub fn password_autocomplete(self) -> &'static str {
        match self {
            AuthMode::SignIn => "current-password",
            AuthMode::SignUp => "new-password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
}

/// Checks run before any request; the first failure wins
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(ValidationError::MissingField);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    // Length in UTF-16 code units, as the browser's minlength counts it
    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Wording shown for a failed auth request
pub fn auth_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Provider(message) => {
            if message.contains("Email not confirmed") {
                "Please check your email to confirm your account".to_string()
            } else if message.contains("Invalid login credentials") {
                "Invalid email or password".to_string()
            } else if message.contains("User already registered") {
                "An account with this email already exists".to_string()
            } else {
                message.clone()
            }
        }
        AuthError::Unexpected(_) => "An unexpected error occurred".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedUp,
    SignedIn,
}

impl AuthOutcome {
    pub fn message(self) -> &'static str {
        match self {
            AuthOutcome::SignedUp => "Account created successfully! You can now sign in.",
            AuthOutcome::SignedIn => "Welcome back!",
        }
    }

    /// Mode the form should show afterwards
    pub fn next_mode(self) -> AuthMode {
        AuthMode::SignIn
    }
}

/// Validate, then run the provider call for `mode`. Errors come back as
/// display text.
pub async fn submit<A>(
    auth: &A,
    mode: AuthMode,
    email: &str,
    password: &str,
    redirect_to: &str,
) -> Result<AuthOutcome, String>
where
    A: AuthProvider + ?Sized,
{
    validate_credentials(email, password).map_err(|e| e.to_string())?;
    let email = email.trim();

    let result = match mode {
        AuthMode::SignUp => auth
            .sign_up(email, password, redirect_to)
            .await
            .map(|_| AuthOutcome::SignedUp),
        AuthMode::SignIn => auth
            .sign_in(email, password)
            .await
            .map(|_| AuthOutcome::SignedIn),
    };

    result.map_err(|err| {
        tracing::warn!("{:?} failed: {}", mode, err);
        auth_error_message(&err)
    })
}

/// Email shown in the profile menu, `None` when signed out or unknown
pub async fn current_email<A>(auth: &A) -> Option<String>
where
    A: AuthProvider + ?Sized,
{
    match auth.current_user().await {
        Ok(user) => user.and_then(|u| u.email),
        Err(e) => {
            tracing::warn!("could not load current user: {}", e);
            None
        }
    }
}

/// End the session; both outcomes come back as toast text
pub async fn sign_out<A>(auth: &A) -> Result<&'static str, &'static str>
where
    A: AuthProvider + ?Sized,
{
    match auth.sign_out().await {
        Ok(()) => Ok("Signed out successfully"),
        Err(e) => {
            tracing::error!("sign out failed: {}", e);
            Err("Error signing out")
        }
    }
}
