//! Management screens. Listing and editing live in the service's own
//! admin tooling for now; these pages only hold the routes.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
fn Placeholder(title: &'static str, body: String) -> impl IntoView {
    view! {
        <section class="page page--placeholder">
            <h1>{title}</h1>
            <p>{body}</p>
        </section>
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    view! { <Placeholder title="Users" body="User accounts and role assignments.".to_owned()/> }
}

#[component]
pub fn SurveysPage() -> impl IntoView {
    view! { <Placeholder title="Surveys" body="Evaluation surveys and their questions.".to_owned()/> }
}

/// Shared by coordinators (all evaluations) and teachers (their own).
#[component]
pub fn EvaluationsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let body = auth.with_untracked(|state| {
        if state.session.is_teacher() {
            "Evaluations you have received.".to_owned()
        } else {
            "Evaluations across your department.".to_owned()
        }
    });
    view! { <Placeholder title="Evaluations" body=body/> }
}
