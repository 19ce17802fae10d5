//! Task Form Component
//!
//! Add/edit form with priority selector. Submitting is left to the parent.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::models::Priority;
use crate::tasks::TaskDraft;

#[component]
pub fn TaskForm(
    draft: RwSignal<TaskDraft>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let editing = move || draft.with(TaskDraft::is_editing);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };

    view! {
        <form class="task-form" on:submit=submit>
            <input
                type="text"
                placeholder="Add a new task..."
                prop:value=move || draft.with(|d| d.text.clone())
                on:input=move |ev| draft.update(|d| d.text = event_target_value(&ev))
            />
            <div class="task-form-actions">
                <select on:change=move |ev| {
                    draft.update(|d| d.priority = Priority::parse(&event_target_value(&ev)))
                }>
                    {Priority::ALL
                        .into_iter()
                        .map(|priority| {
                            view! {
                                <option
                                    value=priority.as_str()
                                    selected=move || draft.with(|d| d.priority == priority)
                                >
                                    {priority.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button type="submit" class="primary-btn">
                    {move || if editing() { "Update" } else { "Add" }}
                </button>
                <Show when=editing>
                    <button
                        type="button"
                        class="secondary-btn"
                        on:click=move |_| draft.update(TaskDraft::cancel)
                    >
                        "Cancel"
                    </button>
                </Show>
            </div>
        </form>
    }
}
