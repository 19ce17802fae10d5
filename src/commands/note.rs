//! Note Commands
//!
//! CRUD on the `notes` table. Every query is scoped to the owner.

use async_trait::async_trait;
use supabase_rest::SupabaseClient;

use super::{StoreError, NOTES_TABLE};
use crate::models::{NewNote, Note, NotePatch};

#[async_trait(?Send)]
pub trait NoteStore {
    /// Notes of `owner`, pinned first, then newest first
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, StoreError>;

    async fn insert_note(&self, note: &NewNote) -> Result<(), StoreError>;

    async fn update_note(&self, id: &str, owner: &str, patch: &NotePatch) -> Result<(), StoreError>;

    async fn delete_note(&self, id: &str, owner: &str) -> Result<(), StoreError>;
}

#[async_trait(?Send)]
impl NoteStore for SupabaseClient {
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, StoreError> {
        self.from(NOTES_TABLE)
            .select("*")
            .eq("user_id", owner)
            .order("pinned", false)
            .order("created_at", false)
            .fetch()
            .await
    }

    async fn insert_note(&self, note: &NewNote) -> Result<(), StoreError> {
        self.from(NOTES_TABLE).insert(note)?.execute().await
    }

    async fn update_note(
        &self,
        id: &str,
        owner: &str,
        patch: &NotePatch,
    ) -> Result<(), StoreError> {
        self.from(NOTES_TABLE)
            .update(patch)?
            .eq("id", id)
            .eq("user_id", owner)
            .execute()
            .await
    }

    async fn delete_note(&self, id: &str, owner: &str) -> Result<(), StoreError> {
        self.from(NOTES_TABLE)
            .delete()
            .eq("id", id)
            .eq("user_id", owner)
            .execute()
            .await
    }
}
