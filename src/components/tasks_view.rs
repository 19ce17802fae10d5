//! Tasks View
//!
//! Category tabs, the add/edit form and the task list. Every mutation is
//! followed by a full refetch through the context reload trigger.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{CategoryTabs, Spinner, TaskForm, TaskRow};
use crate::context::use_app_context;
use crate::models::{Category, Task};
use crate::tasks::{self, TaskDraft};

#[component]
pub fn TasksView() -> impl IntoView {
    let ctx = use_app_context();
    let (active_tab, set_active_tab) = signal(Category::default());
    let (tasks, set_tasks) = signal(Vec::<Task>::new());
    let (loading, set_loading) = signal(true);
    let draft = RwSignal::new(TaskDraft::default());

    // Load tasks when the tab or trigger changes
    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let category = active_tab.get();
        let Some(owner) = ctx.session.owner_id() else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match tasks::fetch(&client, &owner, category).await {
                // Drop results for a tab the user already left
                Ok(loaded) if active_tab.try_get_untracked() == Some(category) => {
                    tracing::debug!("loaded {} {} tasks", loaded.len(), category);
                    set_tasks.set(loaded);
                }
                Ok(_) => {}
                Err(e) => ctx.toasts.report(&e),
            }
            set_loading.set(false);
        });
    });

    let submit = Callback::new(move |_: ()| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        let today = Utc::now().date_naive();
        let category = active_tab.get_untracked();
        let Some(submission) = draft.with_untracked(|d| d.submission(&owner, category, today)) else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match tasks::save(&client, &submission).await {
                Ok(message) => {
                    ctx.toasts.success(message);
                    draft.try_update(TaskDraft::cancel);
                    ctx.reload();
                }
                Err(e) => ctx.toasts.report(&e),
            }
        });
    });

    let on_toggle = Callback::new(move |task: Task| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        spawn_local(async move {
            let client = ctx.client();
            match tasks::toggle(&client, &owner, &task).await {
                Ok(()) => ctx.reload(),
                Err(e) => ctx.toasts.report(&e),
            }
        });
    });

    let on_edit = Callback::new(move |task: Task| draft.update(|d| d.begin_edit(&task)));

    let on_delete = Callback::new(move |id: String| {
        let Some(owner) = ctx.session.owner_id_untracked() else {
            return;
        };
        draft.update(|d| {
            d.release(&id);
        });
        spawn_local(async move {
            let client = ctx.client();
            match tasks::delete(&client, &owner, &id).await {
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
            <CategoryTabs active=active_tab set_active=set_active_tab />
            <TaskForm draft=draft on_submit=submit />
            <Show when=move || !loading.get() fallback=Spinner>
                <div class="task-list">
                    <For
                        each=move || tasks.get()
                        key=|task| (task.id.clone(), task.text.clone(), task.priority, task.completed)
                        children=move |task| {
                            view! {
                                <TaskRow
                                    task=task
                                    on_toggle=on_toggle
                                    on_edit=on_edit
                                    on_delete=on_delete
                                />
                            }
                        }
                    />
                    <Show when=move || tasks.with(Vec::is_empty)>
                        <div class="empty-state">
                            {move || format!("No {} tasks found", active_tab.get())}
                        </div>
                    </Show>
                </div>
            </Show>
        </main>
    }
}
