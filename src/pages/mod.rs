use crate::components::ui::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Label, Switch,
};
use crate::links::{tokenize_links, LinkToken};
use crate::state::{AppContext, Mode, PageSyncController};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Render a buffer as text runs with URL-like matches turned into anchors.
///
/// Builds real DOM nodes from tokens; note content is never injected as HTML.
fn rendered_buffer(input: &str) -> AnyView {
    tokenize_links(input)
        .into_iter()
        .map(|token| match token {
            LinkToken::Text(text) => view! { <span>{text}</span> }.into_any(),
            LinkToken::Link { href, label } => view! {
                <a
                    href=href
                    target="_blank"
                    rel="noopener noreferrer"
                    class="text-primary underline underline-offset-4"
                >
                    {label}
                </a>
            }
            .into_any(),
        })
        .collect_view()
        .into_any()
}

#[component]
pub fn NotePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<PageSyncController>();

    let current_page = app_state.0.current_page;
    let buffer = app_state.0.buffer;
    let mode = app_state.0.mode;
    let spellcheck = app_state.0.spellcheck;
    let recent_pages = app_state.0.recent_pages;

    let editor_ref: NodeRef<html::Textarea> = NodeRef::new();

    let editing = move || mode.get() == Mode::Editing;

    // Refocus the editor whenever we (re-)enter edit mode.
    Effect::new(move |_| {
        if mode.get() == Mode::Editing {
            if let Some(el) = editor_ref.get() {
                let _ = el.focus();
            }
        }
    });

    // Keyboard policy (one coherent variant):
    // - Escape: save, then toggle edit/view.
    // - Left/Right arrows while the editor is not focused: page navigation.
    // - Any other key while not focused: send focus back to the editor.
    let key_controller = controller.clone();
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let key = ev.key();

        if key == "Escape" {
            key_controller.toggle_mode();
            return;
        }

        let editor_focused = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.tag_name().to_lowercase() == "textarea")
            .unwrap_or(false);
        if editor_focused {
            return;
        }

        match key.as_str() {
            "ArrowLeft" => {
                ev.prevent_default();
                key_controller.change_page(-1);
            }
            "ArrowRight" => {
                ev.prevent_default();
                key_controller.change_page(1);
            }
            _ => {
                if mode.get_untracked() == Mode::Editing {
                    if let Some(el) = editor_ref.get() {
                        let _ = el.focus();
                    }
                }
            }
        }
    });

    let input_controller = controller.clone();
    let on_editor_input = move |ev: web_sys::Event| {
        input_controller.on_input(event_target_value(&ev));
    };

    let prev_controller = controller.clone();
    let next_controller = controller.clone();
    let toggle_controller = controller.clone();
    let setting_controller = controller.clone();
    let jump_controller = controller.clone();

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[840px] space-y-4 px-4 py-8">
                <div class="flex items-center justify-between">
                    <div class="space-y-1">
                        <h1 class="text-xl font-semibold">
                            {move || format!("Page {}", current_page.get())}
                        </h1>
                        <p class="text-xs text-muted-foreground">
                            {move || if editing() {
                                "Editing. Esc shows links; Left/Right switch pages when unfocused."
                            } else {
                                "Viewing. Esc returns to editing."
                            }}
                        </p>
                    </div>

                    <div class="flex items-center gap-2">
                        <Button
                            class="border bg-border/30 shadow-xs hover:bg-border/50"
                            attr:disabled=move || current_page.get() <= 1
                            on:click=move |_| prev_controller.change_page(-1)
                        >
                            "Previous"
                        </Button>
                        <Button
                            class="border bg-border/30 shadow-xs hover:bg-border/50"
                            on:click=move |_| next_controller.change_page(1)
                        >
                            "Next"
                        </Button>
                        <Button on:click=move |_| toggle_controller.toggle_mode()>
                            {move || if editing() { "View" } else { "Edit" }}
                        </Button>
                    </div>
                </div>

                <Show
                    when=editing
                    fallback=move || view! {
                        <div class="min-h-[320px] w-full whitespace-pre-wrap rounded-md border border-border bg-muted/30 px-3 py-2 text-sm">
                            <Show
                                when=move || !buffer.get().is_empty()
                                fallback=|| view! {
                                    <span class="text-muted-foreground">"This page is empty."</span>
                                }
                            >
                                {move || rendered_buffer(&buffer.get())}
                            </Show>
                        </div>
                    }
                >
                    <textarea
                        node_ref=editor_ref
                        class="min-h-[320px] w-full resize-y rounded-md border border-input bg-transparent px-3 py-2 text-sm shadow-xs transition-[color,box-shadow] outline-none focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2"
                        placeholder="Type your notes..."
                        autofocus=true
                        spellcheck=move || if spellcheck.get() { "true" } else { "false" }
                        prop:value=move || buffer.get()
                        on:input=on_editor_input.clone()
                    ></textarea>
                </Show>

                <Show when=move || !recent_pages.get().is_empty() fallback=|| ().into_view()>
                    <div class="flex flex-wrap items-center gap-2">
                        <span class="text-xs text-muted-foreground">"Recent:"</span>
                        {let jump_controller = jump_controller.clone(); move || {
                            let jump = jump_controller.clone();
                            recent_pages
                                .get()
                                .into_iter()
                                .map(move |r| {
                                    let jump = jump.clone();
                                    view! {
                                        <Button
                                            class="h-7 border bg-transparent px-2 text-xs text-muted-foreground hover:bg-border/50"
                                            on:click=move |_| jump.set_page(r.page)
                                        >
                                            {format!("p. {}", r.page)}
                                        </Button>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                </Show>

                <Card>
                    <CardHeader>
                        <CardTitle>"Settings"</CardTitle>
                        <CardDescription>"Stored in this browser; applied immediately."</CardDescription>
                    </CardHeader>
                    <CardContent>
                        <div class="flex items-center gap-2">
                            <Switch
                                id="setting-spellcheck"
                                checked=Signal::derive(move || spellcheck.get())
                                on_toggle=Callback::new(move |enabled: bool| {
                                    setting_controller.set_setting("spellcheck", enabled)
                                })
                            />
                            <Label html_for="setting-spellcheck">"Spellcheck"</Label>
                        </div>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
