//! Toast Notifications
//!
//! A small queue of transient success/error messages, shared through
//! context and rendered by `<Toaster/>`.

use std::error::Error;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Ordered list of live toasts, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    /// Append a toast and return its id
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
        });
        self.next_id
    }

    /// Drop the toast with `id`. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Handle to the app's toast queue
#[derive(Clone, Copy)]
pub struct Toasts {
    queue: RwSignal<ToastQueue>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message.into());
    }

    /// Log `err` with its cause and show its display text
    pub fn report<E: Error>(&self, err: &E) {
        match err.source() {
            Some(source) => tracing::error!("{}: {}", err, source),
            None => tracing::error!("{}", err),
        }
        self.error(err.to_string());
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.try_update(|q| q.dismiss(id));
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.queue.with(|q| q.items().to_vec())
    }

    fn show(&self, kind: ToastKind, message: String) {
        let id = self.queue.try_update(|q| q.push(kind, message));
        let Some(id) = id else { return };

        let queue = self.queue;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_DURATION_MS).await;
            // The root may be gone by now
            queue.try_update(|q| q.dismiss(id));
        });
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}
