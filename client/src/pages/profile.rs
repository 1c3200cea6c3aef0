//! Profile page: identity details, refresh and password change.
//!
//! ERROR HANDLING
//! ==============
//! Password-change failures stay inline on the form. A failed refresh goes
//! to the notice bar; a 401 there has already cleared the session and the
//! surrounding `Protected` redirects.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use evalboard::SessionController;
use evalboard::controller::validate_password_change;
use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;

use crate::state::auth::{AuthState, role_label};
use crate::state::ui::UiState;

/// Local checks for the change-password form, including confirmation.
pub(crate) fn validate_password_form(current: &str, new: &str, confirm: &str) -> Result<(), String> {
    validate_password_change(current, new).map_err(|e| e.to_string())?;
    if new != confirm {
        return Err("The new passwords do not match.".to_owned());
    }
    Ok(())
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let controller = expect_context::<SessionController>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let current = RwSignal::new(String::new());
    let new = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let result = RwSignal::new(None::<Result<(), String>>);
    let busy = RwSignal::new(false);
    let refreshing = RwSignal::new(false);

    let field = move |f: fn(&evalboard::UserProfile) -> String| {
        move || auth.with(|state| state.user().map(f)).unwrap_or_default()
    };

    let refresh_controller = controller.clone();
    let on_refresh = move |_| {
        if refreshing.get_untracked() {
            return;
        }
        refreshing.set(true);
        let controller = refresh_controller.clone();
        leptos::task::spawn_local(async move {
            match controller.get_current_user().await {
                Ok(_) => {
                    ui.update(|state| {
                        state.push_info("Profile refreshed.");
                    });
                }
                Err(e) => {
                    ui.update(|state| {
                        state.report(&e);
                    });
                }
            }
            refreshing.set(false);
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let (current_value, new_value) = (current.get_untracked(), new.get_untracked());
        if let Err(message) = validate_password_form(&current_value, &new_value, &confirm.get_untracked()) {
            result.set(Some(Err(message)));
            return;
        }
        busy.set(true);
        result.set(None);
        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            let outcome = controller.change_password(&current_value, &new_value).await;
            if outcome.is_ok() {
                current.set(String::new());
                new.set(String::new());
                confirm.set(String::new());
            }
            result.set(Some(outcome.map_err(|e| e.to_string())));
            busy.set(false);
        });
    };

    let role = move || auth.with(|state| state.session.role().map(role_label)).unwrap_or_default();

    view! {
        <section class="page profile">
            <h1>"My profile"</h1>
            <dl class="profile__details">
                <dt>"Name"</dt>
                <dd>{field(evalboard::UserProfile::display_name)}</dd>
                <dt>"Email"</dt>
                <dd>{field(|p| p.email.clone())}</dd>
                <dt>"Role"</dt>
                <dd>{role}</dd>
                <dt>"Department"</dt>
                <dd>{field(|p| p.department.clone().unwrap_or_else(|| "-".to_owned()))}</dd>
            </dl>
            <button type="button" on:click=on_refresh disabled=move || refreshing.get()>
                "Refresh"
            </button>

            <h2>"Change password"</h2>
            <form class="profile__password" on:submit=on_submit>
                <input
                    type="password"
                    autocomplete="current-password"
                    placeholder="Current password"
                    prop:value=move || current.get()
                    on:input=move |ev| current.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    autocomplete="new-password"
                    placeholder="New password"
                    prop:value=move || new.get()
                    on:input=move |ev| new.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    autocomplete="new-password"
                    placeholder="Confirm new password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Update password"</button>
            </form>
            {move || {
                result
                    .get()
                    .map(|outcome| match outcome {
                        Ok(()) => view! { <p class="form-result form-result--ok">"Password updated."</p> }.into_any(),
                        Err(message) => view! { <p class="form-result form-result--error">{message}</p> }.into_any(),
                    })
            }}
        </section>
    }
}
