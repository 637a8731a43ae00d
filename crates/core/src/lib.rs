//! Artisan Users Core - Shared types library.
//!
//! This crate provides the types shared by the dispatcher and its tests:
//! - `dispatcher` - HTTP handler that creates and updates user rows
//! - `integration-tests` - End-to-end tests for the HTTP surface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Rows are
//! kept as JSON objects so columns the dispatcher does not know about are
//! passed through to the store verbatim.
//!
//! # Modules
//!
//! - [`types`] - Row ids, per-action request shapes, and the response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
