//! Category Tab Bar Component
//!
//! Tab bar for switching between short-term and long-term tasks.

use leptos::prelude::*;

use crate::models::Category;

#[component]
pub fn CategoryTabs(
    active: ReadSignal<Category>,
    set_active: WriteSignal<Category>,
) -> impl IntoView {
    view! {
        <div class="category-tabs">
            {Category::ALL
                .into_iter()
                .map(|category| {
                    let tab_class = move || {
                        if active.get() == category { "category-tab active" } else { "category-tab" }
                    };
                    view! {
                        <button
                            type="button"
                            class=tab_class
                            on:click=move |_| set_active.set(category)
                        >
                            {category.tab_label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
