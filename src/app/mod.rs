//! Application layer.
//!
//! # Structure
//!
//! - `task/` - task-line classification, style registry, style-string painting
//! - `extractor` / `extraction_controller` - the asynchronous name pipeline
//! - `highlight_controller` - glue from painting to live widgets
//! - `document` / `tab_manager` - open documents and their identity
//! - `state.rs` - main application coordinator

pub mod buffer_utils;
pub mod document;
pub mod error;
pub mod extraction_controller;
pub mod extractor;
pub mod highlight_controller;
pub mod messages;
pub mod platform;
pub mod settings;
pub mod state;
pub mod tab_manager;
pub mod task;

// Re-exports for convenient external access
pub use document::{Document, DocumentId};
pub use error::AppError;
pub use extractor::NamePair;
pub use messages::Message;
pub use settings::{AppSettings, FontChoice, ThemeMode};
pub use task::classifier::TaskState;
