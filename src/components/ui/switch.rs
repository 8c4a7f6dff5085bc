use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Checkbox-style toggle.
///
/// NOTE: We intentionally avoid `bind:checked=...` because Leptos binding
/// APIs/macros have changed across versions. This manual wiring is stable.
#[component]
pub fn Switch(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into)] checked: Signal<bool>,
    #[prop(into)] on_toggle: Callback<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "peer size-4 shrink-0 rounded-[4px] border border-input shadow-xs transition-shadow outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        "disabled:cursor-not-allowed disabled:opacity-50 accent-primary hover:cursor-pointer",
        class
    );

    let on_change = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
                on_toggle.run(input.checked());
            }
        }
    };

    view! {
        <input
            data-name="Switch"
            type="checkbox"
            class=merged_class
            id=id
            prop:checked=move || checked.get()
            on:change=on_change
        />
    }
}
