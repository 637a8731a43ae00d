//! Artisan users dispatcher library.
//!
//! This crate provides the dispatcher as a library, allowing the router to
//! be driven in-process by tests and embedded by other binaries.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
