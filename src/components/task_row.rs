//! Task Row Component

use leptos::prelude::*;

use crate::models::Task;

/// One task with completion toggle, due date, priority flag and actions
#[component]
pub fn TaskRow(
    task: Task,
    on_toggle: Callback<Task>,
    on_edit: Callback<Task>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let row_class = if task.completed { "task-row completed" } else { "task-row" };
    let flag_class = format!("priority-flag {}", task.priority.css_class());
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let toggle_target = task.clone();
    let edit_target = task.clone();
    let id = task.id.clone();

    view! {
        <div class=row_class>
            <button
                class="toggle-btn"
                title=if task.completed { "Mark as not done" } else { "Mark as done" }
                on:click=move |_| on_toggle.run(toggle_target.clone())
            >
                {if task.completed { "●" } else { "○" }}
            </button>
            <div class="task-body">
                <p class="task-text">{task.text.clone()}</p>
                <div class="task-meta">
                    <span class="task-due">{due}</span>
                    <span class=flag_class title=task.priority.label()>"⚑"</span>
                </div>
            </div>
            <div class="row-actions">
                <button class="edit-btn" title="Edit" on:click=move |_| on_edit.run(edit_target.clone())>
                    "✎"
                </button>
                <button class="delete-btn" title="Delete" on:click=move |_| on_delete.run(id.clone())>
                    "×"
                </button>
            </div>
        </div>
    }
}
