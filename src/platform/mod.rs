//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Exporting the session to JavaScript
//! - Logging and panic reporting in the browser console
//! - Storage (LocalStorage on web, see `persistence::LocalStore`)
//!
//! Native hosts use `Session` directly.

#[cfg(target_arch = "wasm32")]
pub mod web;
