//! `/`: forwards to the signed-in user's landing page.

use evalboard::{GuardDecision, RouteGuard};
use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::components::Redirect;

use crate::components::loading_spinner::LoadingSpinner;
use crate::state::auth::AuthState;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let guard = RouteGuard::default();
    let decision = Memo::new(move |_| auth.with(|state| guard.home(&state.session)));

    move || match decision.get() {
        GuardDecision::RedirectTo(path) => view! { <Redirect path=path/> }.into_any(),
        GuardDecision::Loading | GuardDecision::Allow => view! { <LoadingSpinner/> }.into_any(),
    }
}
