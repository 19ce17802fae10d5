//! Header Component
//!
//! Top bar for signed-in users: brand, cross-links and the profile menu.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_outside_click::use_outside_click;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::auth;
use crate::context::use_app_context;

const EXTERNAL_LINKS: &[(&str, &str, &str)] = &[
    ("https://drive.google.com", "Drive", "🗄"),
    ("https://www.linkedin.com", "LinkedIn", "in"),
    ("https://chatgpt.com", "ChatGPT", "💬"),
];

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();
    let location = use_location();
    let (menu_open, set_menu_open) = signal(false);
    let (email, set_email) = signal(None::<String>);
    let menu_ref = NodeRef::<Div>::new();

    let brand = move || {
        if location.pathname.get() == "/notes" { "NoteFlow" } else { "TaskFlow" }
    };

    use_outside_click(menu_ref, menu_open, move || set_menu_open.set(false));

    // Email for the profile menu, fetched once
    spawn_local(async move {
        let email = auth::current_email(&ctx.client()).await;
        set_email.try_set(email);
    });

    let sign_out = move |_| {
        spawn_local(async move {
            match auth::sign_out(&ctx.client()).await {
                Ok(message) => ctx.toasts.success(message),
                Err(message) => ctx.toasts.error(message),
            }
        });
    };

    view! {
        <header class="app-header">
            <div class="header-inner">
                <A href="/" attr:class="brand">
                    <span class="brand-mark">"✓"</span>
                    <h1>{brand}</h1>
                </A>
                <nav class="header-links">
                    <A href="/notes" attr:class="header-link">
                        <span class="link-icon">"🗒"</span>
                        <span class="link-label">"Notes"</span>
                    </A>
                    {EXTERNAL_LINKS
                        .iter()
                        .map(|(href, label, icon)| {
                            view! {
                                <a class="header-link" href=*href target="_blank" rel="noopener noreferrer">
                                    <span class="link-icon">{*icon}</span>
                                    <span class="link-label">{*label}</span>
                                </a>
                            }
                        })
                        .collect_view()}
                    <div class="profile-menu" node_ref=menu_ref>
                        <button
                            class="profile-btn"
                            title="Account"
                            on:click=move |_| set_menu_open.update(|open| *open = !*open)
                        >
                            "👤"
                        </button>
                        <Show when=move || menu_open.get()>
                            <div class="profile-dropdown">
                                <p class="profile-email" title=move || email.get().unwrap_or_default()>
                                    {move || email.get()}
                                </p>
                                <button class="dropdown-item" on:click=sign_out>
                                    "Sign Out"
                                </button>
                            </div>
                        </Show>
                    </div>
                </nav>
            </div>
        </header>
    }
}
