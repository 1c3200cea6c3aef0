//! Networking glue between the browser and the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` implements the core `Transport` trait over `fetch`. All
//! authenticated calls still go through the controller's gateway.

pub mod transport;
