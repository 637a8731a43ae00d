//! Core types for the artisan users dispatcher.
//!
//! This module provides typed wrappers around the JSON payloads exchanged
//! with callers and with the row store.

pub mod action;
pub mod artisan;
pub mod envelope;
pub mod id;
pub mod row;

pub use action::{Action, ActionError, CreateUserInput, UpdateUserInput};
pub use artisan::{ArtisanDraft, DEFAULT_CRAFT_SPECIALTY};
pub use envelope::ResponseEnvelope;
pub use id::RowId;
pub use row::{Row, is_truthy};
