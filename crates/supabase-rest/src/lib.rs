//! Supabase REST Client
//!
//! Minimal typed client for a hosted Supabase project:
//! - auth: GoTrue endpoints under `/auth/v1`, session persistence and refresh
//! - tables: PostgREST endpoints under `/rest/v1`
//!
//! Works on `wasm32-unknown-unknown` (fetch-backed reqwest) and natively.

use std::sync::Arc;

mod auth;
mod config;
mod error;
mod postgrest;
mod session;

pub use auth::{AuthChangeEvent, AuthClient, Subscription};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use postgrest::QueryBuilder;
pub use session::{MemoryStorage, Session, SessionStorage, User};

/// Entry point: one client per project, cheap to clone
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    auth: AuthClient,
}

impl SupabaseClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let http = reqwest::Client::new();
        let config = Arc::new(config);
        let auth = AuthClient::new(http.clone(), config.clone(), storage);
        Self { http, config, auth }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Start a query against `table`, authorized with the current session
    /// token (or the anon key when signed out).
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(
            self.http.clone(),
            self.config.clone(),
            table,
            self.auth.access_token(),
        )
    }
}
