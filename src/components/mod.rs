//! UI Components
//!
//! Leptos components for the pages and their shared pieces.

mod auth_view;
mod category_tabs;
mod header;
mod note_card;
mod note_form;
mod notes_view;
mod spinner;
mod task_form;
mod task_row;
mod tasks_view;
mod toaster;

pub use auth_view::AuthView;
pub use category_tabs::CategoryTabs;
pub use header::Header;
pub use note_card::NoteCard;
pub use note_form::NoteForm;
pub use notes_view::NotesView;
pub use spinner::Spinner;
pub use task_form::TaskForm;
pub use task_row::TaskRow;
pub use tasks_view::TasksView;
pub use toaster::Toaster;
