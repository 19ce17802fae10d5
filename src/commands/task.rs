//! Task Commands
//!
//! CRUD on the `tasks` table. Every query is scoped to the owner.

use async_trait::async_trait;
use supabase_rest::SupabaseClient;

use super::{StoreError, TASKS_TABLE};
use crate::models::{Category, NewTask, Task, TaskPatch};

#[async_trait(?Send)]
pub trait TaskStore {
    /// Tasks of `owner` in `category`, newest first
    async fn list_tasks(&self, owner: &str, category: Category) -> Result<Vec<Task>, StoreError>;

    async fn insert_task(&self, task: &NewTask) -> Result<(), StoreError>;

    async fn update_task(&self, id: &str, owner: &str, patch: &TaskPatch) -> Result<(), StoreError>;

    async fn delete_task(&self, id: &str, owner: &str) -> Result<(), StoreError>;
}

#[async_trait(?Send)]
impl TaskStore for SupabaseClient {
    async fn list_tasks(&self, owner: &str, category: Category) -> Result<Vec<Task>, StoreError> {
        self.from(TASKS_TABLE)
            .select("*")
            .eq("user_id", owner)
            .eq("category", category)
            .order("created_at", false)
            .fetch()
            .await
    }

    async fn insert_task(&self, task: &NewTask) -> Result<(), StoreError> {
        self.from(TASKS_TABLE).insert(task)?.execute().await
    }

    async fn update_task(
        &self,
        id: &str,
        owner: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError> {
        self.from(TASKS_TABLE)
            .update(patch)?
            .eq("id", id)
            .eq("user_id", owner)
            .execute()
            .await
    }

    async fn delete_task(&self, id: &str, owner: &str) -> Result<(), StoreError> {
        self.from(TASKS_TABLE)
            .delete()
            .eq("id", id)
            .eq("user_id", owner)
            .execute()
            .await
    }
}
