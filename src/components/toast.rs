use leptos::prelude::*;
use std::time::Duration;

/// Dismissible notice that hides itself `hide_after` the latest show.
#[component]
pub fn Toast(
    message: ReadSignal<String>,
    visible: RwSignal<bool>,
    #[prop(default = Duration::from_secs(5))] hide_after: Duration,
) -> impl IntoView {
    // Bumped on every show so an older timer cannot hide a newer toast.
    let shown = StoredValue::new(0u64);

    Effect::new(move |_| {
        if !visible.get() {
            return;
        }
        let generation = shown.get_value() + 1;
        shown.set_value(generation);
        set_timeout(
            move || {
                if shown.get_value() == generation {
                    visible.set(false);
                }
            },
            hide_after,
        );
    });

    view! {
        <div class=move || {
            if visible.get() { "toast toast-visible" } else { "toast toast-hidden" }
        }>
            {message}
            <button class="toast-close" on:click=move |_| visible.set(false)>
                "×"
            </button>
        </div>
    }
}
