//! Business logic services for the dispatcher.
//!
//! # Services
//!
//! - `users` - `createUser` / `updateUser` against the row store

pub mod users;

pub use users::UserService;
