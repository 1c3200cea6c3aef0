use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="page page--not-found">
            <h1>"Page not found"</h1>
            <p>"The page you are looking for does not exist."</p>
            <A href="/">"Back to start"</A>
        </section>
    }
}
