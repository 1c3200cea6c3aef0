//! Top navigation: role-specific links, user badge and sign-out.

#[cfg(test)]
#[path = "nav_bar_test.rs"]
mod nav_bar_test;

use evalboard::guard::{LOGIN_PATH, PROFILE_PATH};
use evalboard::{Role, SessionController};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const fn link(label: &'static str, href: &'static str) -> NavLink {
    NavLink { label, href }
}

/// Links shown for a signed-in role. Signed-out users get none.
pub fn nav_links(role: Option<Role>) -> Vec<NavLink> {
    let mut links = match role {
        None => return Vec::new(),
        Some(Role::Admin) => vec![
            link("Dashboard", "/admin/dashboard"),
            link("Users", "/admin/users"),
            link("Surveys", "/admin/surveys"),
            link("Evaluations", "/coordinator/evaluations"),
        ],
        Some(Role::Coordinator) => {
            vec![link("Dashboard", "/coordinator/dashboard"), link("Evaluations", "/coordinator/evaluations")]
        }
        Some(Role::Teacher) => {
            vec![link("Dashboard", "/teacher/dashboard"), link("My evaluations", "/teacher/evaluations")]
        }
        Some(Role::Unrecognized) => Vec::new(),
    };
    links.push(link("Profile", PROFILE_PATH));
    links
}

#[component]
pub fn NavBar() -> impl IntoView {
    let controller = expect_context::<SessionController>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let signing_out = RwSignal::new(false);
    let signed_out = RwSignal::new(false);

    Effect::new(move || {
        if signed_out.get() {
            signed_out.set(false);
            navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let links = move || nav_links(auth.with(|state| state.session.role()));
    let signed_in = move || auth.with(|state| state.user().is_some());
    let user_name = move || auth.with(AuthState::display_name).unwrap_or_default();
    let role_label = move || auth.with(AuthState::role_label).unwrap_or_default();

    let on_logout = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);
        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            controller.logout().await;
            signing_out.set(false);
            signed_out.set(true);
        });
    };

    view! {
        <header class="nav-bar">
            <span class="nav-bar__brand">"Teacher Evaluation"</span>
            <nav class="nav-bar__links">
                <For
                    each=links
                    key=|link| link.href
                    children=|link| view! { <A href=link.href>{link.label}</A> }
                />
            </nav>
            <Show
                when=signed_in
                fallback=|| view! { <A href=LOGIN_PATH>"Sign in"</A> }
            >
                <div class="nav-bar__user">
                    <span class="nav-bar__name">{user_name}</span>
                    <span class="nav-bar__role">{role_label}</span>
                    <button
                        class="nav-bar__logout"
                        type="button"
                        disabled=move || signing_out.get()
                        on:click=on_logout.clone()
                    >
                        "Sign out"
                    </button>
                </div>
            </Show>
        </header>
    }
}
