//! Reactive state provided through Leptos context.

pub mod auth;
pub mod ui;
