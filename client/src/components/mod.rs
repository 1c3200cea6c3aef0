//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read session and notice state from Leptos context providers
//! installed by `app::App`.

pub mod loading_spinner;
pub mod nav_bar;
pub mod notice_bar;
pub mod protected;
