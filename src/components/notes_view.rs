//! Notes View
//!
//! Note form above a grid of cards, pinned first.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{NoteCard, NoteForm, Spinner};
use crate::context::use_app_context;
use crate::models::Note;
use crate::notes::{self, NoteDraft};

#[component]
pub fn NotesView() -> impl IntoView {
    let ctx = use_app_context();
    let (notes, set_notes) = signal(Vec::<Note>::new());
    let (loading, set_loading) = signal(true);
    let draft = RwSignal::new(NoteDraft::default());

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let Some(owner) = ctx.session.owner_id() else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match notes::fetch(&client, &owner).await {
                Ok(loaded) => set_notes.set(loaded),
                Err(e) => ctx.toasts.report(&e),
            }
            set_loading.set(false);
        });
    });

    let submit = Callback::new(move |_: ()| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        let Some(submission) = draft.with_untracked(|d| d.submission(&owner)) else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match notes::save(&client, &submission).await {
                Ok(message) => {
                    ctx.toasts.success(message);
                    draft.try_update(NoteDraft::cancel);
                    ctx.reload();
                }
                Err(e) => ctx.toasts.report(&e),
            }
        });
    });

    let on_edit = Callback::new(move |note: Note| draft.update(|d| d.begin_edit(&note)));

    let on_toggle_pin = Callback::new(move |note: Note| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match notes::toggle_pin(&client, &owner, &note).await {
                Ok(()) => ctx.reload(),
                Err(e) => ctx.toasts.report(&e),
            }
        });
    });

    let on_delete = Callback::new(move |id: String| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        draft.update(|d| {
            d.release(&id);
        });
        spawn_local(async move {
            let client = ctx.client();
            match notes::delete(&client, &owner, &id).await {
                Ok(message) => {
                    ctx.toasts.success(message);
                    ctx.reload();
                }
                Err(e) => ctx.toasts.report(&e),
            }
        });
    });

    view! {
        <main class="page">
            <NoteForm draft=draft on_submit=submit />
            <Show when=move || !loading.get() fallback=Spinner>
                <div class="note-grid">
                    <For
                        each=move || notes.get()
                        key=|note| (note.id.clone(), note.title.clone(), note.content.clone(), note.pinned)
                        children=move |note| {
                            view! {
                                <NoteCard
                                    note=note
                                    on_edit=on_edit
                                    on_toggle_pin=on_toggle_pin
                                    on_delete=on_delete
                                />
                            }
                        }
                    />
                </div>
                <Show when=move || notes.with(Vec::is_empty)>
                    <div class="empty-state">"No notes yet. Start by adding one!"</div>
                </Show>
            </Show>
        </main>
    }
}
