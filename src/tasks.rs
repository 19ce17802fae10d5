//! Task Board Logic
//!
//! Form state and the fetch/mutate operations behind the Tasks view.
//! Mutations never touch the visible list: callers refetch on success.

use chrono::NaiveDate;
use thiserror::Error;

use crate::commands::{StoreError, TaskStore};
use crate::models::{Category, NewTask, Priority, Task, TaskPatch};

/// Contents of the add/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub priority: Priority,
    /// Id of the task being edited, if any
    pub editing: Option<String>,
}

/// What submitting the form should do
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSubmission {
    Create(NewTask),
    /// Only text and priority are editable
    Update {
        id: String,
        owner: String,
        patch: TaskPatch,
    },
}

impl TaskDraft {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Load `task` into the form for editing
    pub fn begin_edit(&mut self, task: &Task) {
        self.text = task.text.clone();
        self.priority = task.priority;
        self.editing = Some(task.id.clone());
    }

    /// Back to the empty form (medium priority, not editing)
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Cancel editing if `id` is the task being edited. Returns whether it was.
    pub fn release(&mut self, id: &str) -> bool {
        if self.editing.as_deref() == Some(id) {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// Turn the form into a request. `None` if the trimmed text is empty.
    pub fn submission(
        &self,
        owner: &str,
        tab: Category,
        today: NaiveDate,
    ) -> Option<TaskSubmission> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(match &self.editing {
            Some(id) => TaskSubmission::Update {
                id: id.clone(),
                owner: owner.to_string(),
                patch: TaskPatch {
                    text: Some(text.to_string()),
                    priority: Some(self.priority),
                    completed: None,
                },
            },
            None => TaskSubmission::Create(NewTask {
                user_id: owner.to_string(),
                text: text.to_string(),
                priority: self.priority,
                category: tab,
                due_date: today,
            }),
        })
    }
}

/// Task operation failures; `Display` is the notification text
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Error loading tasks")]
    Load(#[source] StoreError),
    #[error("Error adding task")]
    Add(#[source] StoreError),
    #[error("Error updating task")]
    Update(#[source] StoreError),
    #[error("Error updating task")]
    Toggle(#[source] StoreError),
    #[error("Error deleting task")]
    Delete(#[source] StoreError),
}

pub async fn fetch<S>(store: &S, owner: &str, category: Category) -> Result<Vec<Task>, TaskError>
where
    S: TaskStore + ?Sized,
{
    store
        .list_tasks(owner, category)
        .await
        .map_err(TaskError::Load)
}

/// Create or update. Returns the success message.
pub async fn save<S>(store: &S, submission: &TaskSubmission) -> Result<&'static str, TaskError>
where
    S: TaskStore + ?Sized,
{
    match submission {
        TaskSubmission::Create(task) => {
            store.insert_task(task).await.map_err(TaskError::Add)?;
            Ok("Task added successfully")
        }
        TaskSubmission::Update { id, owner, patch } => {
            store
                .update_task(id, owner, patch)
                .await
                .map_err(TaskError::Update)?;
            Ok("Task updated successfully")
        }
    }
}

/// Flip `completed` relative to the state the caller last saw
pub async fn toggle<S>(store: &S, owner: &str, task: &Task) -> Result<(), TaskError>
where
    S: TaskStore + ?Sized,
{
    let patch = TaskPatch {
        completed: Some(!task.completed),
        ..Default::default()
    };
    store
        .update_task(&task.id, owner, &patch)
        .await
        .map_err(TaskError::Toggle)
}

pub async fn delete<S>(store: &S, owner: &str, id: &str) -> Result<&'static str, TaskError>
where
    S: TaskStore + ?Sized,
{
    store.delete_task(id, owner).await.map_err(TaskError::Delete)?;
    Ok("Task deleted successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::memory::MemoryStore;

    const OWNER: &str = "user-1";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn draft(text: &str, priority: Priority) -> TaskDraft {
        TaskDraft {
            text: text.to_string(),
            priority,
            editing: None,
        }
    }

    async fn create(store: &MemoryStore, text: &str, priority: Priority, tab: Category) {
        let submission = draft(text, priority).submission(OWNER, tab, today()).unwrap();
        save(store, &submission).await.unwrap();
    }

    #[test]
    fn test_blank_text_submits_nothing() {
        let blank = draft("   ", Priority::High);
        assert_eq!(blank.submission(OWNER, Category::ShortTerm, today()), None);
    }

    #[test]
    fn test_edit_then_cancel_restores_defaults() {
        let task = Task {
            id: "t-1".into(),
            user_id: OWNER.into(),
            text: "Write report".into(),
            completed: false,
            priority: Priority::High,
            due_date: Some(today()),
            category: Category::LongTerm,
            created_at: chrono::Utc::now(),
        };
        let mut form = TaskDraft::default();
        form.begin_edit(&task);
        assert_eq!(form.text, "Write report");
        assert_eq!(form.priority, Priority::High);
        assert!(form.is_editing());

        form.cancel();
        assert_eq!(form, TaskDraft::default());
        assert_eq!(form.priority, Priority::Medium);
    }

    #[test]
    fn test_edit_submission_only_patches_text_and_priority() {
        let form = TaskDraft {
            text: "  Renamed  ".into(),
            priority: Priority::Low,
            editing: Some("t-9".into()),
        };
        let submission = form.submission(OWNER, Category::ShortTerm, today()).unwrap();
        assert_eq!(
            submission,
            TaskSubmission::Update {
                id: "t-9".into(),
                owner: OWNER.into(),
                patch: TaskPatch {
                    text: Some("Renamed".into()),
                    priority: Some(Priority::Low),
                    completed: None,
                },
            }
        );
    }

    #[test]
    fn test_release_only_cancels_matching_edit() {
        let mut form = TaskDraft {
            text: "x".into(),
            priority: Priority::High,
            editing: Some("t-1".into()),
        };
        assert!(!form.release("t-2"));
        assert!(form.is_editing());
        assert!(form.release("t-1"));
        assert_eq!(form, TaskDraft::default());
    }

    #[tokio::test]
    async fn test_create_inserts_one_owned_task_due_today() {
        let store = MemoryStore::new();
        create(&store, "  Buy milk ", Priority::High, Category::ShortTerm).await;

        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.user_id, OWNER);
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Category::ShortTerm);
        assert_eq!(task.due_date, Some(today()));
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_fetch_lists_only_active_category_newest_first() {
        let store = MemoryStore::new();
        create(&store, "first", Priority::Medium, Category::ShortTerm).await;
        create(&store, "later", Priority::Medium, Category::LongTerm).await;
        create(&store, "second", Priority::Medium, Category::ShortTerm).await;

        let short = fetch(&store, OWNER, Category::ShortTerm).await.unwrap();
        let texts: Vec<_> = short.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["second", "first"]);

        let long = fetch(&store, OWNER, Category::LongTerm).await.unwrap();
        assert!(long.iter().all(|t| t.category == Category::LongTerm));
        assert_eq!(long.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_flag() {
        let store = MemoryStore::new();
        create(&store, "flip me", Priority::Medium, Category::ShortTerm).await;

        let original = fetch(&store, OWNER, Category::ShortTerm).await.unwrap().remove(0);
        toggle(&store, OWNER, &original).await.unwrap();
        let flipped = fetch(&store, OWNER, Category::ShortTerm).await.unwrap().remove(0);
        assert_eq!(flipped.completed, !original.completed);

        toggle(&store, OWNER, &flipped).await.unwrap();
        let restored = fetch(&store, OWNER, Category::ShortTerm).await.unwrap().remove(0);
        assert_eq!(restored.completed, original.completed);
    }

    #[tokio::test]
    async fn test_update_keeps_category_and_due_date() {
        let store = MemoryStore::new();
        create(&store, "draft", Priority::Low, Category::LongTerm).await;
        let task = store.tasks().remove(0);

        let mut form = TaskDraft::default();
        form.begin_edit(&task);
        form.text = "final".into();
        form.priority = Priority::High;
        let message = save(&store, &form.submission(OWNER, Category::ShortTerm, today()).unwrap())
            .await
            .unwrap();

        assert_eq!(message, "Task updated successfully");
        let updated = store.tasks().remove(0);
        assert_eq!(updated.text, "final");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.category, Category::LongTerm);
        assert_eq!(updated.due_date, task.due_date);
    }

    #[tokio::test]
    async fn test_failures_map_to_distinct_messages() {
        let store = MemoryStore::new();
        create(&store, "keep", Priority::Medium, Category::ShortTerm).await;
        let task = store.tasks().remove(0);

        store.fail_on("delete_task");
        let err = delete(&store, OWNER, &task.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Error deleting task");
        assert_eq!(store.tasks().len(), 1);

        store.fail_on("update_task");
        let err = toggle(&store, OWNER, &task).await.unwrap_err();
        assert!(matches!(err, TaskError::Toggle(_)));

        store.fail_on("insert_task");
        let submission = draft("new", Priority::Medium)
            .submission(OWNER, Category::ShortTerm, today())
            .unwrap();
        let err = save(&store, &submission).await.unwrap_err();
        assert_eq!(err.to_string(), "Error adding task");

        store.fail_on("list_tasks");
        let err = fetch(&store, OWNER, Category::ShortTerm).await.unwrap_err();
        assert_eq!(err.to_string(), "Error loading tasks");
    }

    #[tokio::test]
    async fn test_delete_of_edited_task_clears_form_even_on_failure() {
        let store = MemoryStore::new();
        create(&store, "doomed", Priority::High, Category::ShortTerm).await;
        let task = store.tasks().remove(0);
        let mut form = TaskDraft::default();
        form.begin_edit(&task);

        store.fail_on("delete_task");
        form.release(&task.id);
        assert!(delete(&store, OWNER, &task.id).await.is_err());
        assert_eq!(form, TaskDraft::default());
    }
}
