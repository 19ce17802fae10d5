//! In-Memory Commands
//!
//! Test double for the remote data service. Records every call, can be told
//! to fail a given operation, and hands out increasing `created_at` stamps.

use std::cell::RefCell;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{AuthError, AuthProvider, NoteStore, StoreError, TaskStore};
use crate::models::{Category, Identity, NewNote, NewTask, Note, NotePatch, Task, TaskPatch};

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    notes: Vec<Note>,
    next_id: u64,
    ticks: i64,
    failing: Option<&'static str>,
    calls: Vec<String>,
    user: Option<Identity>,
    accounts: Vec<(String, String)>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation (e.g. `"delete_task"`) fail from now on
    pub fn fail_on(&self, op: &'static str) {
        self.state.borrow_mut().failing = Some(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.borrow().notes.clone()
    }

    pub fn register(&self, email: &str, password: &str) {
        self.state
            .borrow_mut()
            .accounts
            .push((email.to_string(), password.to_string()));
    }

    pub fn signed_in(&self) -> Option<Identity> {
        self.state.borrow().user.clone()
    }

    /// Store a note as if inserted at `created_at`
    pub fn seed_note(
        &self,
        owner: &str,
        title: &str,
        pinned: bool,
        created_at: DateTime<Utc>,
    ) -> String {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.notes.push(Note {
            id: id.clone(),
            user_id: owner.to_string(),
            title: title.to_string(),
            content: format!("{} content", title),
            pinned,
            created_at,
        });
        id
    }

    fn begin(&self, op: &'static str) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(op.to_string());
        if state.failing == Some(op) {
            return Err(StoreError::Api {
                status: 500,
                message: format!("{} failed", op),
            });
        }
        Ok(())
    }

    fn next_id(state: &mut State) -> String {
        state.next_id += 1;
        format!("id-{}", state.next_id)
    }

    fn now(state: &mut State) -> DateTime<Utc> {
        state.ticks += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(state.ticks)
    }
}

#[async_trait(?Send)]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner: &str, category: Category) -> Result<Vec<Task>, StoreError> {
        self.begin("list_tasks")?;
        let mut tasks: Vec<Task> = self
            .state
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.user_id == owner && t.category == category)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn insert_task(&self, task: &NewTask) -> Result<(), StoreError> {
        self.begin("insert_task")?;
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let created_at = Self::now(&mut state);
        state.tasks.push(Task {
            id,
            user_id: task.user_id.clone(),
            text: task.text.clone(),
            completed: false,
            priority: task.priority,
            due_date: Some(task.due_date),
            category: task.category,
            created_at,
        });
        Ok(())
    }

    async fn update_task(
        &self,
        id: &str,
        owner: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError> {
        self.begin("update_task")?;
        let mut state = self.state.borrow_mut();
        for task in state.tasks.iter_mut().filter(|t| t.id == id && t.user_id == owner) {
            if let Some(text) = &patch.text {
                task.text = text.clone();
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
        }
        Ok(())
    }

    async fn delete_task(&self, id: &str, owner: &str) -> Result<(), StoreError> {
        self.begin("delete_task")?;
        self.state
            .borrow_mut()
            .tasks
            .retain(|t| !(t.id == id && t.user_id == owner));
        Ok(())
    }
}

#[async_trait(?Send)]
impl NoteStore for MemoryStore {
    /// Insertion order on purpose: the view must sort
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, StoreError> {
        self.begin("list_notes")?;
        Ok(self
            .state
            .borrow()
            .notes
            .iter()
            .filter(|n| n.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_note(&self, note: &NewNote) -> Result<(), StoreError> {
        self.begin("insert_note")?;
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let created_at = Self::now(&mut state);
        state.notes.push(Note {
            id,
            user_id: note.user_id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            pinned: false,
            created_at,
        });
        Ok(())
    }

    async fn update_note(
        &self,
        id: &str,
        owner: &str,
        patch: &NotePatch,
    ) -> Result<(), StoreError> {
        self.begin("update_note")?;
        let mut state = self.state.borrow_mut();
        for note in state.notes.iter_mut().filter(|n| n.id == id && n.user_id == owner) {
            if let Some(title) = &patch.title {
                note.title = title.clone();
            }
            if let Some(content) = &patch.content {
                note.content = content.clone();
            }
            if let Some(pinned) = patch.pinned {
                note.pinned = pinned;
            }
        }
        Ok(())
    }

    async fn delete_note(&self, id: &str, owner: &str) -> Result<(), StoreError> {
        self.begin("delete_note")?;
        self.state
            .borrow_mut()
            .notes
            .retain(|n| !(n.id == id && n.user_id == owner));
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthProvider for MemoryStore {
    async fn current_user(&self) -> Result<Option<Identity>, AuthError> {
        self.state.borrow_mut().calls.push("current_user".into());
        Ok(self.signed_in())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("sign_up:{}:{}", email, redirect_to));
        if state.accounts.iter().any(|(e, _)| e == email) {
            return Err(AuthError::Provider("User already registered".into()));
        }
        state.accounts.push((email.to_string(), password.to_string()));
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("sign_in:{}", email));
        let known = state
            .accounts
            .iter()
            .any(|(e, p)| e == email && p == password);
        if !known {
            return Err(AuthError::Provider("Invalid login credentials".into()));
        }
        state.user = Some(Identity {
            id: format!("user-{}", email),
            email: Some(email.to_string()),
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.state.borrow_mut();
        state.calls.push("sign_out".into());
        if state.failing == Some("sign_out") {
            return Err(AuthError::Unexpected("network down".into()));
        }
        state.user = None;
        Ok(())
    }
}
