//! Auth Client
//!
//! GoTrue endpoints plus the session lifecycle around them: the current
//! session is kept in memory, mirrored into [`SessionStorage`], and every
//! change is broadcast to listeners registered with
//! [`AuthClient::on_auth_state_change`].

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::{encode, ClientConfig};
use crate::error::{check, Error, Result};
use crate::session::{Session, SessionStorage, User};

/// Sessions expiring within this window are refreshed before use
const EXPIRY_MARGIN_SECS: i64 = 10;

/// What happened to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

type Listener = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct AuthState {
    session: RwLock<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
    listeners: Mutex<Listeners>,
}

/// Handle returned by [`AuthClient::on_auth_state_change`].
/// The listener stays registered until this is unsubscribed or dropped.
pub struct Subscription {
    id: u64,
    state: Weak<AuthState>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    /// Projects with email auto-confirm answer with a full session
    Session(Session),
    /// Otherwise only the (unconfirmed) user comes back
    User(User),
}

#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    state: Arc<AuthState>,
}

impl AuthClient {
    pub(crate) fn new(
        http: reqwest::Client,
        config: Arc<ClientConfig>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let storage_key = config.storage_key();
        Self {
            http,
            config,
            state: Arc::new(AuthState {
                session: RwLock::new(None),
                storage,
                storage_key,
                listeners: Mutex::new(Listeners::default()),
            }),
        }
    }

    // ========================
    // Session
    // ========================

    /// Access token of the in-memory session, if any
    pub fn access_token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }

    /// Resolve the current session: memory first, then storage.
    /// A session about to expire is refreshed; if the service rejects the
    /// refresh the session is discarded and `None` returned.
    pub async fn get_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.current().or_else(|| self.load_stored()) else {
            return Ok(None);
        };

        if !session.expires_within(Utc::now(), Duration::seconds(EXPIRY_MARGIN_SECS)) {
            self.set_current(Some(session.clone()));
            return Ok(Some(session));
        }

        tracing::debug!("stored session expiring, refreshing");
        match self.refresh_with(&session.refresh_token).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(err) if err.is_api() => {
                tracing::warn!(error = %err, "session refresh rejected, discarding session");
                self.discard();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Exchange the current refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session> {
        let session = self.current().ok_or(Error::MissingSession)?;
        match self.refresh_with(&session.refresh_token).await {
            Err(err) if matches!(err.status(), Some(400 | 401)) => {
                tracing::warn!(error = %err, "refresh token rejected, signing out");
                self.discard();
                self.emit(AuthChangeEvent::SignedOut, None);
                Err(err)
            }
            other => other,
        }
    }

    /// Fetch the user behind the current session
    pub async fn get_user(&self) -> Result<Option<User>> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };
        let response = self
            .http
            .get(self.config.endpoint("/auth/v1/user"))
            .header("apikey", self.config.anon_key())
            .bearer_auth(token)
            .send()
            .await?;
        let user = check(response).await?.json::<User>().await?;
        Ok(Some(user))
    }

    // ========================
    // Sign up / in / out
    // ========================

    /// Register a new account. Never establishes a session: confirmation
    /// (or a separate sign-in) is always required first.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<User> {
        let response = self.sign_up_request(email, password, redirect_to).send().await?;
        let user = match check(response).await?.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => session.user,
            SignUpResponse::User(user) => user,
        };
        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "email": email, "password": password });
        let response = self.token_request("password", &body).send().await?;
        let session = check(response)
            .await?
            .json::<Session>()
            .await?
            .stamped(Utc::now());

        tracing::info!(user_id = %session.user.id, "signed in");
        self.store(session.clone());
        self.emit(AuthChangeEvent::SignedIn, Some(&session));
        Ok(session)
    }

    /// Revoke the session server-side, then forget it locally.
    /// If the server call fails the local session is left untouched.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(token) = self.access_token() {
            let response = self.logout_request(&token).send().await?;
            match check(response).await {
                Ok(_) => {}
                // Session already gone on the server side
                Err(Error::Api { status: 401 | 403 | 404, .. }) => {}
                Err(err) => return Err(err),
            }
        }
        self.discard();
        tracing::info!("signed out");
        self.emit(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    // ========================
    // Listeners
    // ========================

    pub fn on_auth_state_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let mut listeners = self
            .state
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(callback)));
        Subscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        // Snapshot so listeners may (un)subscribe while being notified
        let snapshot: Vec<Listener> = self
            .state
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(event, session);
        }
    }

    // ========================
    // Internals
    // ========================

    async fn refresh_with(&self, refresh_token: &str) -> Result<Session> {
        let body = json!({ "refresh_token": refresh_token });
        let response = self.token_request("refresh_token", &body).send().await?;
        let session = check(response)
            .await?
            .json::<Session>()
            .await?
            .stamped(Utc::now());

        tracing::debug!(user_id = %session.user.id, "token refreshed");
        self.store(session.clone());
        self.emit(AuthChangeEvent::TokenRefreshed, Some(&session));
        Ok(session)
    }

    fn current(&self) -> Option<Session> {
        self.state
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, session: Option<Session>) {
        *self
            .state
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn load_stored(&self) -> Option<Session> {
        let raw = self.state.storage.load(&self.state.storage_key)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(error = %err, "dropping unreadable stored session");
                self.state.storage.remove(&self.state.storage_key);
                None
            }
        }
    }

    fn store(&self, session: Session) {
        match serde_json::to_string(&session) {
            Ok(raw) => self.state.storage.save(&self.state.storage_key, &raw),
            Err(err) => tracing::warn!(error = %err, "could not persist session"),
        }
        self.set_current(Some(session));
    }

    fn discard(&self) {
        self.state.storage.remove(&self.state.storage_key);
        self.set_current(None);
    }

    fn with_api_key(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", self.config.anon_key())
            .bearer_auth(self.config.anon_key())
    }

    pub(crate) fn sign_up_request(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut url = self.config.endpoint("/auth/v1/signup");
        if let Some(target) = redirect_to {
            url.push_str("?redirect_to=");
            url.push_str(&encode(target));
        }
        self.with_api_key(self.http.post(url))
            .json(&json!({ "email": email, "password": password }))
    }

    pub(crate) fn token_request(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> reqwest::RequestBuilder {
        let url = format!(
            "{}?grant_type={}",
            self.config.endpoint("/auth/v1/token"),
            encode(grant_type)
        );
        self.with_api_key(self.http.post(url)).json(body)
    }

    pub(crate) fn logout_request(&self, access_token: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.config.endpoint("/auth/v1/logout?scope=global"))
            .header("apikey", self.config.anon_key())
            .bearer_auth(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_with(storage: Arc<MemoryStorage>) -> AuthClient {
        let config = Arc::new(ClientConfig::new("https://abcd.supabase.co", "anon").unwrap());
        AuthClient::new(reqwest::Client::new(), config, storage)
    }

    fn session(expires_at: i64) -> Session {
        Session {
            access_token: "jwt".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at: Some(expires_at),
            refresh_token: "refresh".into(),
            user: User {
                id: "user-1".into(),
                email: Some("user@test.com".into()),
            },
        }
    }

    fn body_json(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_sign_up_request_carries_redirect() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        let request = client
            .sign_up_request("user@test.com", "abcdef", Some("http://localhost:8080"))
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://abcd.supabase.co/auth/v1/signup?redirect_to=http%3A%2F%2Flocalhost%3A8080"
        );
        assert_eq!(request.headers()["apikey"], "anon");
        assert_eq!(
            body_json(&request),
            json!({ "email": "user@test.com", "password": "abcdef" })
        );
    }

    #[test]
    fn test_password_grant_request() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        let body = json!({ "email": "a@b.co", "password": "secret" });
        let request = client.token_request("password", &body).build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://abcd.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(body_json(&request), body);
    }

    #[test]
    fn test_logout_request_uses_session_token() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        let request = client.logout_request("jwt").build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer jwt");
    }

    #[test]
    fn test_sign_up_response_variants() {
        let user: SignUpResponse =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.co","aud":"authenticated"}"#).unwrap();
        assert!(matches!(user, SignUpResponse::User(u) if u.id == "u1"));

        let with_session: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"t","token_type":"bearer","expires_in":3600,"refresh_token":"r","user":{"id":"u2"}}"#,
        )
        .unwrap();
        assert!(matches!(with_session, SignUpResponse::Session(s) if s.user.id == "u2"));
    }

    #[tokio::test]
    async fn test_get_session_restores_stored_session() {
        let storage = Arc::new(MemoryStorage::default());
        let stored = session(Utc::now().timestamp() + 3600);
        storage.save(
            "sb-abcd-auth-token",
            &serde_json::to_string(&stored).unwrap(),
        );
        let client = client_with(storage);

        assert_eq!(client.access_token(), None);
        let restored = client.get_session().await.unwrap();
        assert_eq!(restored, Some(stored));
        assert_eq!(client.access_token().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_get_session_without_storage_is_none() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        assert_eq!(client.get_session().await.unwrap(), None);
        assert_eq!(client.get_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_stored_session_is_dropped() {
        let storage = Arc::new(MemoryStorage::default());
        storage.save("sb-abcd-auth-token", "{not json");
        let client = client_with(storage.clone());

        assert_eq!(client.get_session().await.unwrap(), None);
        assert_eq!(storage.load("sb-abcd-auth-token"), None);
    }

    #[tokio::test]
    async fn test_sign_out_without_session_notifies_listeners() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = client.on_auth_state_change(move |event, session| {
            sink.lock().unwrap().push((event, session.is_some()));
        });

        client.sign_out().await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(AuthChangeEvent::SignedOut, false)]
        );
    }

    #[tokio::test]
    async fn test_unreachable_refresh_keeps_session_and_stays_quiet() {
        let storage = Arc::new(MemoryStorage::default());
        let stored = session(Utc::now().timestamp() + 3600);
        storage.save("sb-127-auth-token", &serde_json::to_string(&stored).unwrap());
        // Nothing listens on the discard port
        let config = Arc::new(ClientConfig::new("http://127.0.0.1:9", "anon").unwrap());
        let client = AuthClient::new(reqwest::Client::new(), config, storage.clone());
        assert_eq!(client.get_session().await.unwrap(), Some(stored.clone()));

        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        let _subscription = client.on_auth_state_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = client.refresh_session().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.status(), None);
        assert_eq!(events.load(Ordering::SeqCst), 0);
        assert_eq!(client.get_session().await.unwrap(), Some(stored));
        assert!(storage.load("sb-127-auth-token").is_some());
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let client = client_with(Arc::new(MemoryStorage::default()));
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let subscription = client.on_auth_state_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        client.emit(AuthChangeEvent::SignedOut, None);
        subscription.unsubscribe();
        client.emit(AuthChangeEvent::SignedOut, None);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
