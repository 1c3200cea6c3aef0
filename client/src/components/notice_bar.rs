//! Dismissible notices for failed background calls.
//!
//! Each rendered notice schedules its own dismissal after
//! `NoticeLevel::lifetime_ms`; the close button removes it sooner.

use leptos::prelude::*;

use crate::state::ui::{NoticeLevel, UiState};

#[component]
pub fn NoticeBar() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    view! {
        <div class="notice-bar" aria-live="polite">
            <For
                each=move || ui.with(|state| state.notices.clone())
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    schedule_dismiss(ui, id, notice.level.lifetime_ms());
                    let class = match notice.level {
                        NoticeLevel::Info => "notice notice--info",
                        NoticeLevel::Error => "notice notice--error",
                    };
                    view! {
                        <div class=class role="alert">
                            <span>{notice.message}</span>
                            <button
                                class="notice__dismiss"
                                type="button"
                                aria-label="Dismiss"
                                on:click=move |_| ui.update(|state| state.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(feature = "csr")]
fn schedule_dismiss(ui: RwSignal<UiState>, id: u64, lifetime_ms: u32) {
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(lifetime_ms).await;
        ui.try_update(|state| state.dismiss(id));
    });
}

#[cfg(not(feature = "csr"))]
fn schedule_dismiss(_ui: RwSignal<UiState>, _id: u64, _lifetime_ms: u32) {}
