//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Access control lives in the `Protected` wrapper around
//! the route, never inside the page.

pub mod dashboards;
pub mod home;
pub mod login;
pub mod management;
pub mod not_found;
pub mod profile;
