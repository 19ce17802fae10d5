//! Note Board Logic
//!
//! Form state, display ordering and the fetch/mutate operations behind the
//! Notes view.

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::commands::{NoteStore, StoreError};
use crate::models::{NewNote, Note, NotePatch};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub editing: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoteSubmission {
    Create(NewNote),
    Update {
        id: String,
        owner: String,
        patch: NotePatch,
    },
}

impl NoteDraft {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn begin_edit(&mut self, note: &Note) {
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.editing = Some(note.id.clone());
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Cancel editing if `id` is the note being edited
    pub fn release(&mut self, id: &str) -> bool {
        if self.editing.as_deref() == Some(id) {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// Both title and content must be non-blank after trimming
    pub fn submission(&self, owner: &str) -> Option<NoteSubmission> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some(match &self.editing {
            Some(id) => NoteSubmission::Update {
                id: id.clone(),
                owner: owner.to_string(),
                patch: NotePatch {
                    title: Some(title.to_string()),
                    content: Some(content.to_string()),
                    pinned: None,
                },
            },
            None => NoteSubmission::Create(NewNote {
                user_id: owner.to_string(),
                title: title.to_string(),
                content: content.to_string(),
            }),
        })
    }
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Error loading notes")]
    Load(#[source] StoreError),
    #[error("Error adding note")]
    Add(#[source] StoreError),
    #[error("Error updating note")]
    Update(#[source] StoreError),
    #[error("Error updating note")]
    Pin(#[source] StoreError),
    #[error("Error deleting note")]
    Delete(#[source] StoreError),
}

/// Pinned first, then newest first
pub fn display_order(a: &Note, b: &Note) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Creation date as shown on a card, in the viewer's zone (`Local` in the app)
pub fn display_date<Tz: TimeZone>(created_at: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created_at.with_timezone(zone).format("%-m/%-d/%Y").to_string()
}

/// Load the owner's notes in display order
pub async fn fetch<S>(store: &S, owner: &str) -> Result<Vec<Note>, NoteError>
where
    S: NoteStore + ?Sized,
{
    let mut notes = store.list_notes(owner).await.map_err(NoteError::Load)?;
    notes.sort_by(display_order);
    Ok(notes)
}

pub async fn save<S>(store: &S, submission: &NoteSubmission) -> Result<&'static str, NoteError>
where
    S: NoteStore + ?Sized,
{
    match submission {
        NoteSubmission::Create(note) => {
            store.insert_note(note).await.map_err(NoteError::Add)?;
            Ok("Note added successfully")
        }
        NoteSubmission::Update { id, owner, patch } => {
            store
                .update_note(id, owner, patch)
                .await
                .map_err(NoteError::Update)?;
            Ok("Note updated successfully")
        }
    }
}

pub async fn toggle_pin<S>(store: &S, owner: &str, note: &Note) -> Result<(), NoteError>
where
    S: NoteStore + ?Sized,
{
    let patch = NotePatch {
        pinned: Some(!note.pinned),
        ..Default::default()
    };
    store
        .update_note(&note.id, owner, &patch)
        .await
        .map_err(NoteError::Pin)
}

pub async fn delete<S>(store: &S, owner: &str, id: &str) -> Result<&'static str, NoteError>
where
    S: NoteStore + ?Sized,
{
    store.delete_note(id, owner).await.map_err(NoteError::Delete)?;
    Ok("Note deleted successfully")
}
