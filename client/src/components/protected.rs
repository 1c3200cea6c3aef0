//! Route wrapper that renders its children only for permitted roles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route in `app::App` wraps its page in `Protected`. The
//! decision is recomputed whenever `AuthState` changes, so a forced
//! invalidation while the page is open redirects to the login page without
//! any page-level handling.

use evalboard::{Access, GuardDecision, Role, RouteGuard};
use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::components::Redirect;

use crate::components::loading_spinner::LoadingSpinner;
use crate::state::auth::AuthState;

/// Guarded region. `role` and `roles` must both hold when both are given;
/// with neither, any signed-in user passes.
#[component]
pub fn Protected(
    #[prop(optional)] role: Option<Role>,
    #[prop(optional)] roles: Option<Vec<Role>>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let guard = RouteGuard::default();
    let access = Access { role, roles };
    let decision = Memo::new(move |_| auth.with(|state| guard.check(&state.session, &access)));

    move || match decision.get() {
        GuardDecision::Loading => view! { <LoadingSpinner/> }.into_any(),
        GuardDecision::Allow => children().into_any(),
        GuardDecision::RedirectTo(path) => view! { <Redirect path=path/> }.into_any(),
    }
}
