//! Note Form Component

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::notes::NoteDraft;

#[component]
pub fn NoteForm(
    draft: RwSignal<NoteDraft>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let editing = move || draft.with(NoteDraft::is_editing);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };

    view! {
        <form class="note-form" on:submit=submit>
            <input
                type="text"
                placeholder="Note title..."
                prop:value=move || draft.with(|d| d.title.clone())
                on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
            />
            <textarea
                rows="4"
                placeholder="Write your note..."
                prop:value=move || draft.with(|d| d.content.clone())
                on:input=move |ev| draft.update(|d| d.content = event_target_value(&ev))
            ></textarea>
            <div class="note-form-actions">
                <button type="submit" class="primary-btn">
                    {move || if editing() { "Update Note" } else { "Add Note" }}
                </button>
                <Show when=editing>
                    <button
                        type="button"
                        class="secondary-btn"
                        on:click=move |_| draft.update(NoteDraft::cancel)
                    >
                        "Cancel"
                    </button>
                </Show>
            </div>
        </form>
    }
}
