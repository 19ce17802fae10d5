//! Note Card Component

use chrono::Local;
use leptos::prelude::*;

use crate::models::Note;
use crate::notes;

#[component]
pub fn NoteCard(
    note: Note,
    on_edit: Callback<Note>,
    on_toggle_pin: Callback<Note>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let card_class = if note.pinned { "note-card pinned" } else { "note-card" };
    let created = notes::display_date(&note.created_at, &Local);
    let edit_target = note.clone();
    let pin_target = note.clone();
    let id = note.id.clone();

    view! {
        <div class=card_class>
            <div class="note-header">
                <h3 class="note-title">{note.title.clone()}</h3>
                <div class="row-actions">
                    <button class="edit-btn" title="Edit" on:click=move |_| on_edit.run(edit_target.clone())>
                        "✎"
                    </button>
                    <button
                        class="pin-btn"
                        title=if note.pinned { "Unpin" } else { "Pin" }
                        on:click=move |_| on_toggle_pin.run(pin_target.clone())
                    >
                        {if note.pinned { "📌" } else { "📍" }}
                    </button>
                    <button class="delete-btn" title="Delete" on:click=move |_| on_delete.run(id.clone())>
                        "×"
                    </button>
                </div>
            </div>
            <p class="note-content">{note.content.clone()}</p>
            <div class="note-date">{created}</div>
        </div>
    }
}
