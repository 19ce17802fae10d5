//! TaskFlow Frontend App
//!
//! Root component: configuration check, session gate and routes.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;
use supabase_rest::{ClientConfig, SupabaseClient};

use crate::components::{AuthView, Header, NotesView, Spinner, TasksView, Toaster};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::session::SessionManager;
use crate::storage::BrowserStorage;
use crate::toast::Toasts;

#[component]
pub fn App() -> impl IntoView {
    match AppConfig::load().and_then(|config| config.client_config()) {
        Ok(config) => view! { <TaskFlow config=config /> }.into_any(),
        Err(e) => {
            tracing::error!("configuration error: {}", e);
            view! { <ConfigErrorScreen message=e.to_string() /> }.into_any()
        }
    }
}

#[component]
fn TaskFlow(config: ClientConfig) -> impl IntoView {
    let client = SupabaseClient::new(config, Arc::new(BrowserStorage));
    let session = SessionManager::new();
    session.start(client.auth().clone());

    // Provide context to all children
    provide_context(AppContext::new(client, session, Toasts::new()));

    let signed_in = Memo::new(move |_| session.identity().is_some());

    view! {
        <Router>
            <Show
                when=move || session.is_ready()
                fallback=|| view! { <div class="app-loading"><Spinner /></div> }
            >
                {move || {
                    if signed_in.get() {
                        view! {
                            <Header />
                            <Routes fallback=|| view! { <Redirect path="/" /> }>
                                <Route path=path!("/") view=TasksView />
                                <Route path=path!("/notes") view=NotesView />
                            </Routes>
                        }
                            .into_any()
                    } else {
                        view! { <AuthView /> }.into_any()
                    }
                }}
            </Show>
            <Toaster />
        </Router>
    }
}

#[component]
fn ConfigErrorScreen(message: String) -> impl IntoView {
    view! {
        <div class="config-error">
            <h2>"TaskFlow is not configured"</h2>
            <p>{message}</p>
            <p class="hint">
                "Set SUPABASE_URL and SUPABASE_ANON_KEY at build time, or define "
                <code>"window.__TASKFLOW_CONFIG__"</code>
                " before the app loads."
            </p>
        </div>
    }
}
