//! Auth View
//!
//! Sign-in / sign-up form shown to signed-out visitors. A successful
//! sign-in is picked up by the session manager, which swaps this view out.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{self, AuthMode};
use crate::config::app_origin;
use crate::context::use_app_context;

#[component]
pub fn AuthView() -> impl IntoView {
    let ctx = use_app_context();
    let (mode, set_mode) = signal(AuthMode::default());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let switch_mode = move |_| {
        set_mode.update(|m| *m = m.toggled());
        set_email.set(String::new());
        set_password.set(String::new());
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let current = mode.get_untracked();
        let email = email.get_untracked();
        let password = password.get_untracked();

        set_loading.set(true);
        spawn_local(async move {
            let client = ctx.client();
            match auth::submit(&client, current, &email, &password, &app_origin()).await {
                Ok(outcome) => {
                    ctx.toasts.success(outcome.message());
                    set_mode.try_set(outcome.next_mode());
                }
                Err(message) => ctx.toasts.error(message),
            }
            set_loading.try_set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <div class="auth-header">
                    <div class="brand-mark">"✓"</div>
                    <h2>{move || mode.get().heading()}</h2>
                    <p class="auth-subtitle">{move || mode.get().subtitle()}</p>
                </div>
                <form class="auth-form" on:submit=on_submit>
                    <label for="email">"Email address"</label>
                    <input
                        id="email"
                        name="email"
                        type="email"
                        autocomplete="email"
                        required
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        name="password"
                        type="password"
                        autocomplete=move || mode.get().password_autocomplete()
                        required
                        placeholder="••••••••"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    <button type="submit" class="primary-btn" disabled=move || loading.get()>
                        {move || {
                            if loading.get() {
                                view! { <span class="spinner small"></span> }.into_any()
                            } else {
                                mode.get().submit_label().into_any()
                            }
                        }}
                    </button>
                    <button type="button" class="link-btn" on:click=switch_mode>
                        {move || mode.get().switch_prompt()}
                    </button>
                </form>
            </div>
        </div>
    }
}
