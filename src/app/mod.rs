use crate::pages::NotePage;
use crate::state::{AppContext, AppState, PageSyncController};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state.clone()));
    provide_context(PageSyncController::new(AppContext(state)));

    view! { <NotePage /> }
}
