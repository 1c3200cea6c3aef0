//! Role landing pages. Each greets the user and links into its area.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::AuthState;

#[component]
fn DashboardShell(title: &'static str, links: Vec<(&'static str, &'static str)>) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let greeting = move || auth.with(AuthState::display_name).map(|name| format!("Welcome, {name}"));

    view! {
        <section class="page dashboard">
            <h1>{title}</h1>
            <p class="dashboard__greeting">{greeting}</p>
            <ul class="dashboard__cards">
                {links
                    .into_iter()
                    .map(|(label, href)| view! { <li class="dashboard__card"><A href=href>{label}</A></li> })
                    .collect_view()}
            </ul>
        </section>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! {
        <DashboardShell
            title="Administration"
            links=vec![
                ("Manage users", "/admin/users"),
                ("Manage surveys", "/admin/surveys"),
                ("Review evaluations", "/coordinator/evaluations"),
            ]
        />
    }
}

#[component]
pub fn CoordinatorDashboard() -> impl IntoView {
    view! {
        <DashboardShell
            title="Coordination"
            links=vec![("Evaluations", "/coordinator/evaluations"), ("My profile", "/profile")]
        />
    }
}

#[component]
pub fn TeacherDashboard() -> impl IntoView {
    view! {
        <DashboardShell
            title="My teaching"
            links=vec![("My evaluations", "/teacher/evaluations"), ("My profile", "/profile")]
        />
    }
}
