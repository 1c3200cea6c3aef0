//! Root component: session wiring, context providers and routes.
//!
//! DESIGN
//! ======
//! The controller is constructed exactly once here and shared through
//! context; pages never build their own. A listener mirrors every session
//! change into `RwSignal<AuthState>`, which is what route guards and the
//! nav bar react to. A forced invalidation therefore reaches the UI as a
//! plain state change and the active `Protected` wrapper redirects.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use evalboard::store::KeyValueSessionStore;
use evalboard::{ApiConfig, Role, SessionController};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::nav_bar::NavBar;
use crate::components::notice_bar::NoticeBar;
use crate::components::protected::Protected;
use crate::net::transport::GlooTransport;
use crate::pages::dashboards::{AdminDashboard, CoordinatorDashboard, TeacherDashboard};
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::management::{EvaluationsPage, SurveysPage, UsersPage};
use crate::pages::not_found::NotFoundPage;
use crate::pages::profile::ProfilePage;
use crate::state::auth::AuthState;
use crate::state::ui::UiState;
use crate::util::auth::mirror_session;
use crate::util::session_storage::LocalStorage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let controller = build_controller();
    let auth = RwSignal::new(AuthState::from(controller.snapshot()));
    let ui = RwSignal::new(UiState::default());
    mirror_session(&controller, auth);

    provide_context(controller.clone());
    provide_context(auth);
    provide_context(ui);

    leptos::task::spawn_local(async move {
        controller.initialize().await;
    });

    view! {
        <Title text="Teacher Evaluation"/>
        <Router>
            <NavBar/>
            <NoticeBar/>
            <main class="app-main">
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <Route path=path!("/login") view=LoginPage/>
                    <Route path=path!("/") view=HomePage/>
                    <Route
                        path=path!("/admin/dashboard")
                        view=|| view! { <Protected role=Role::Admin><AdminDashboard/></Protected> }
                    />
                    <Route
                        path=path!("/admin/users")
                        view=|| view! { <Protected role=Role::Admin><UsersPage/></Protected> }
                    />
                    <Route
                        path=path!("/admin/surveys")
                        view=|| view! { <Protected role=Role::Admin><SurveysPage/></Protected> }
                    />
                    <Route
                        path=path!("/coordinator/dashboard")
                        view=|| {
                            view! {
                                <Protected roles=vec![Role::Admin, Role::Coordinator]>
                                    <CoordinatorDashboard/>
                                </Protected>
                            }
                        }
                    />
                    <Route
                        path=path!("/coordinator/evaluations")
                        view=|| {
                            view! {
                                <Protected roles=vec![Role::Admin, Role::Coordinator]>
                                    <EvaluationsPage/>
                                </Protected>
                            }
                        }
                    />
                    <Route
                        path=path!("/teacher/dashboard")
                        view=|| view! { <Protected role=Role::Teacher><TeacherDashboard/></Protected> }
                    />
                    <Route
                        path=path!("/teacher/evaluations")
                        view=|| view! { <Protected role=Role::Teacher><EvaluationsPage/></Protected> }
                    />
                    <Route path=path!("/profile") view=|| view! { <Protected><ProfilePage/></Protected> }/>
                </Routes>
            </main>
        </Router>
    }
}

fn build_controller() -> SessionController {
    let config = api_config(option_env!("EVAL_API_URL"));
    let transport = Arc::new(GlooTransport::new(config.clone()));
    let store = Arc::new(KeyValueSessionStore::new(LocalStorage));
    SessionController::with_config(&config, transport, store)
}

/// Service config for a build-time base URL; invalid values fall back to the default.
pub(crate) fn api_config(base_url: Option<&str>) -> ApiConfig {
    let config = ApiConfig::default();
    match base_url {
        Some(url) => config.clone().with_base_url(url).unwrap_or_else(|e| {
            leptos::logging::warn!("ignoring EVAL_API_URL: {e}");
            config
        }),
        None => config,
    }
}
