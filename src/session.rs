//! Session Manager
//!
//! Resolves the stored session once at startup, then follows the auth
//! client's change notifications for the life of the app. The resolved
//! identity is the gate between the auth screen and everything else.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use supabase_rest::{AuthChangeEvent, AuthClient, Session};

use crate::models::Identity;

/// Refresh the access token this long before it expires
const REFRESH_AHEAD_SECS: i64 = 60;

/// First retry after a failed refresh; doubles per attempt
const RETRY_BASE_SECS: u64 = 5;
const RETRY_MAX_SECS: u64 = 60;

#[derive(Clone, Debug, Default, Store)]
pub struct SessionState {
    /// Startup lookup finished
    pub ready: bool,
    pub identity: Option<Identity>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Store writes implied by a session change
#[derive(Debug, Clone, PartialEq)]
struct SessionUpdate {
    /// `None` when the identity is unchanged and must not be rewritten
    identity: Option<Option<Identity>>,
    expires_at: Option<DateTime<Utc>>,
}

fn session_update(current: Option<&Identity>, session: Option<&Session>) -> SessionUpdate {
    let identity = session.map(|s| Identity::from(&s.user));
    SessionUpdate {
        identity: (identity.as_ref() != current).then_some(identity),
        expires_at: session.and_then(Session::expires_at),
    }
}

/// Wait before refreshing a token expiring at `expires_at`
fn refresh_delay(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> StdDuration {
    (expires_at - Duration::seconds(REFRESH_AHEAD_SECS) - now)
        .to_std()
        .unwrap_or_default()
}

/// Backoff before retrying a failed refresh, or `None` when retrying is
/// pointless because the session is gone
fn retry_delay(err: &supabase_rest::Error, attempt: u32) -> Option<StdDuration> {
    if matches!(err, supabase_rest::Error::MissingSession)
        || matches!(err.status(), Some(400 | 401))
    {
        return None;
    }
    let secs = RETRY_BASE_SECS
        .saturating_mul(1 << attempt.min(8))
        .min(RETRY_MAX_SECS);
    Some(StdDuration::from_secs(secs))
}

fn millis(delay: StdDuration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

/// Copyable handle to the session store
#[derive(Clone, Copy)]
pub struct SessionManager {
    state: Store<SessionState>,
    refresh_generation: StoredValue<u64>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            state: Store::new(SessionState::default()),
            refresh_generation: StoredValue::new(0),
        }
    }

    /// Subscribe to `auth` and resolve the initial session. Call once from
    /// the root component; the subscription ends with that component.
    pub fn start(&self, auth: AuthClient) {
        let manager = *self;

        let subscription = auth.on_auth_state_change(move |event, session| {
            tracing::debug!("auth state changed: {:?}", event);
            if event == AuthChangeEvent::SignedOut {
                manager.apply(None);
            } else {
                manager.apply(session);
            }
        });
        on_cleanup(move || subscription.unsubscribe());

        let initial = auth.clone();
        spawn_local(async move {
            let session = match initial.get_session().await {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!("session lookup failed: {}", e);
                    None
                }
            };
            manager.resolve(session.as_ref());
        });

        let expires_at = self.state.expires_at();
        Effect::new(move |_| match expires_at.get() {
            Some(at) => manager.schedule_refresh(auth.clone(), at),
            None => {
                manager.cancel_refresh();
            }
        });
    }

    /// Outcome of the startup lookup. Only the first call flips `ready`.
    fn resolve(&self, session: Option<&Session>) {
        if self.state.ready().get_untracked() {
            return;
        }
        self.apply(session);
        *self.state.ready().write() = true;
    }

    fn apply(&self, session: Option<&Session>) {
        let update = self
            .state
            .identity()
            .with_untracked(|current| session_update(current.as_ref(), session));
        if let Some(identity) = update.identity {
            *self.state.identity().write() = identity;
        }
        *self.state.expires_at().write() = update.expires_at;
    }

    /// Refresh shortly before `expires_at`, unless a newer schedule replaced
    /// this one by then. Transient failures are retried with backoff.
    fn schedule_refresh(&self, auth: AuthClient, expires_at: DateTime<Utc>) {
        let generation = self.cancel_refresh();
        let manager = *self;
        let first = refresh_delay(expires_at, Utc::now());

        spawn_local(async move {
            let mut wait = first;
            let mut attempt = 0;
            loop {
                TimeoutFuture::new(millis(wait)).await;
                if !manager.is_current(generation) {
                    return;
                }
                tracing::debug!("refreshing access token");
                // Success emits TokenRefreshed, which reschedules via the store
                let Err(e) = auth.refresh_session().await else {
                    return;
                };
                match retry_delay(&e, attempt) {
                    Some(delay) => {
                        tracing::warn!("token refresh failed, retrying in {:?}: {}", delay, e);
                        wait = delay;
                        attempt += 1;
                    }
                    None => {
                        tracing::warn!("token refresh failed: {}", e);
                        return;
                    }
                }
            }
        });
    }

    /// Invalidate any pending refresh; returns the new generation
    fn cancel_refresh(&self) -> u64 {
        let generation = self.refresh_generation.with_value(|g| g + 1);
        self.refresh_generation.set_value(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.refresh_generation.try_get_value() == Some(generation)
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready().get()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.identity().get()
    }

    pub fn owner_id(&self) -> Option<String> {
        self.state.identity().with(|i| i.as_ref().map(|i| i.id.clone()))
    }

    pub fn owner_id_untracked(&self) -> Option<String> {
        self.state
            .identity()
            .with_untracked(|i| i.as_ref().map(|i| i.id.clone()))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
