//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use supabase_rest::SupabaseClient;

use crate::session::SessionManager;
use crate::toast::Toasts;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Remote data/auth client
    client: StoredValue<SupabaseClient, LocalStorage>,
    /// Trigger to refetch the visible list - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to refetch the visible list - write
    set_reload_trigger: WriteSignal<u32>,
    pub session: SessionManager,
    pub toasts: Toasts,
}

impl AppContext {
    pub fn new(client: SupabaseClient, session: SessionManager, toasts: Toasts) -> Self {
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        Self {
            client: StoredValue::new_local(client),
            reload_trigger,
            set_reload_trigger,
            session,
            toasts,
        }
    }

    pub fn client(&self) -> SupabaseClient {
        self.client.get_value()
    }

    /// Trigger a refetch of the current list
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
