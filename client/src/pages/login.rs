//! Email + password sign-in page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Submits through `SessionController::login`. The page never navigates on
//! success itself: an effect watching `AuthState` sends any settled,
//! signed-in user to their role's landing page, which also covers users
//! who open `/login` while already signed in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use evalboard::{SessionController, SessionError};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::auth::signed_in_destination;

/// Trimmed email and raw password, or the inline message to show.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Inline text for a failed login.
pub(crate) fn login_error_message(error: &SessionError) -> String {
    match error {
        SessionError::Superseded => "Sign-in was interrupted. Please try again.".to_owned(),
        other => other.to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let controller = expect_context::<SessionController>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let reachable = RwSignal::new(None::<bool>);

    Effect::new(move || {
        if let Some(path) = auth.with(|state| signed_in_destination(&state.session)) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let gateway = controller.gateway().clone();
    leptos::task::spawn_local(async move {
        reachable.set(Some(gateway.check_connection().await));
    });

    let pending = move || busy.get() || auth.with(|state| state.session.login_pending);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (email_value, password_value) =
            match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
                Ok(values) => values,
                Err(message) => {
                    error.set(Some(message.to_owned()));
                    return;
                }
            };
        error.set(None);
        busy.set(true);

        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            match controller.login(&email_value, &password_value).await {
                Ok(profile) if profile.role.landing_path().is_none() => {
                    error.set(Some("Your account has no dashboard assigned. Contact an administrator.".to_owned()));
                }
                Ok(_) => password.set(String::new()),
                Err(e) => error.set(Some(login_error_message(&e))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Teacher Evaluation"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="username"
                        placeholder="you@school.edu"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=pending>
                        {move || if pending() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="login-message login-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <Show when=move || reachable.get() == Some(false)>
                    <p class="login-message">"The evaluation service is not reachable right now."</p>
                </Show>
            </div>
        </div>
    }
}
