mod page_sync;

pub(crate) use page_sync::PageSyncController;

use crate::models::RecentPage;
use crate::storage::{
    load_current_page, load_page_content, load_recent_pages, load_setting_enabled,
};
use leptos::prelude::*;

/// Presentation state of the note surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Editing,
    Viewing,
}

#[derive(Clone)]
pub(crate) struct AppState {
    /// Active page indicator; persisted, always >= 1.
    pub current_page: RwSignal<u32>,

    /// In-memory buffer for the active page. Source of truth between saves.
    pub buffer: RwSignal<String>,

    pub mode: RwSignal<Mode>,

    /// Persisted setting flags.
    pub spellcheck: RwSignal<bool>,

    /// Recently opened pages (newest first), persisted as JSON.
    pub recent_pages: RwSignal<Vec<RecentPage>>,
}

impl AppState {
    pub fn new() -> Self {
        let current_page = load_current_page();
        let buffer = load_page_content(current_page);

        Self {
            current_page: RwSignal::new(current_page),
            buffer: RwSignal::new(buffer),
            mode: RwSignal::new(Mode::Editing),
            spellcheck: RwSignal::new(load_setting_enabled("spellcheck")),
            recent_pages: RwSignal::new(load_recent_pages()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
