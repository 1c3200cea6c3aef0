//! Browser glue shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Isolates `web-sys` access and session-to-signal plumbing from page and
//! component logic.

pub mod auth;
pub mod session_storage;
