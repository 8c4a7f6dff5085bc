use crate::state::{AppContext, Mode};
use crate::storage;
use crate::util::now_ms;
use leptos::prelude::*;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;

/// Controller for the note surface.
///
/// Responsibilities:
/// - trailing-edge debounced autosave of the active buffer
/// - explicit saves on mode switches
/// - page navigation (indicator persisted, clamped to >= 1)
/// - setting toggles
///
/// Non-responsibilities:
/// - rendering (the view reads the signals on `AppState`)
#[derive(Clone)]
pub(crate) struct PageSyncController {
    state: AppContext,

    /// Debounce delay between the last input and the autosave.
    autosave_ms: i32,

    /// Handle of the pending autosave timer, if any. Each input replaces it,
    /// so at most one save is scheduled at a time.
    autosave_timer: Arc<Mutex<Option<i32>>>,
}

/// New page indicator after a relative move; never below 1.
pub(crate) fn next_page(current: u32, delta: i32) -> u32 {
    (current as i64 + delta as i64).clamp(1, u32::MAX as i64) as u32
}

impl PageSyncController {
    pub fn new(state: AppContext) -> Self {
        Self {
            state,
            autosave_ms: 300,
            autosave_timer: Arc::new(Mutex::new(None)),
        }
    }

    /// Called by the editor on each input event.
    pub fn on_input(&self, content: String) {
        self.state.0.buffer.set(content);
        self.schedule_autosave();
    }

    fn schedule_autosave(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };

        if let Ok(mut pending) = self.autosave_timer.lock() {
            if let Some(tid) = pending.take() {
                let _ = win.clear_timeout_with_handle(tid);
            }
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.autosave_fired();
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.autosave_ms,
            )
            .unwrap_or(0);

        if let Ok(mut pending) = self.autosave_timer.lock() {
            *pending = Some(tid);
        }
    }

    fn cancel_pending_autosave(&self) -> bool {
        let Ok(mut pending) = self.autosave_timer.lock() else {
            return false;
        };
        let Some(tid) = pending.take() else {
            return false;
        };
        if let Some(win) = web_sys::window() {
            let _ = win.clear_timeout_with_handle(tid);
        }
        true
    }

    fn autosave_fired(&self) {
        if let Ok(mut pending) = self.autosave_timer.lock() {
            *pending = None;
        }
        self.save_current_page();
    }

    /// Write the buffer under the current page's key.
    ///
    /// On a rejected write the user gets a blocking alert and the in-memory
    /// buffer is kept as-is; no retry.
    pub fn save_current_page(&self) {
        let page = self.state.0.current_page.get_untracked();
        let content = self.state.0.buffer.get_untracked();

        if let Err(e) = storage::save_page_content(page, &content) {
            leptos::logging::error!("failed to save page {page}: {e}");
            if let Some(win) = web_sys::window() {
                let _ = win.alert_with_message("Saving failed");
            }
        }
    }

    /// Bind page `page` to the surface. A never-written page is an empty
    /// new page, not an error.
    pub fn load_page(&self, page: u32) {
        self.state.0.buffer.set(storage::load_page_content(page));
    }

    /// Switch to an absolute page. Persists the indicator, records the page
    /// in the recents list, then loads its content.
    pub fn set_page(&self, page: u32) {
        let page = page.max(1);
        if page == self.state.0.current_page.get_untracked() {
            return;
        }

        // Don't lose edits still sitting behind the debounce timer.
        if self.cancel_pending_autosave() {
            self.save_current_page();
        }

        storage::save_current_page(page);
        let recents = storage::write_recent_page(page, now_ms());
        self.state.0.recent_pages.set(recents);

        self.state.0.current_page.set(page);
        self.load_page(page);
    }

    pub fn change_page(&self, delta: i32) {
        let current = self.state.0.current_page.get_untracked();
        self.set_page(next_page(current, delta));
    }

    /// Escape-key policy: entering view mode persists the buffer first, so
    /// the rendered links always reflect what is stored.
    pub fn toggle_mode(&self) {
        match self.state.0.mode.get_untracked() {
            Mode::Editing => {
                // The pending debounce timer becomes redundant once we save here.
                self.cancel_pending_autosave();
                self.save_current_page();
                self.state.0.mode.set(Mode::Viewing);
            }
            Mode::Viewing => {
                self.state.0.mode.set(Mode::Editing);
            }
        }
    }

    /// Apply and persist a named setting flag. Unknown keys warn and do nothing.
    pub fn set_setting(&self, name: &str, enabled: bool) {
        match name {
            "spellcheck" => {
                self.state.0.spellcheck.set(enabled);
                storage::save_setting_enabled(name, enabled);
            }
            _ => leptos::logging::warn!("tried to set unsupported settings key: {name}"),
        }
    }
}


// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::state::AppState;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            web_sys::window()
                .expect("window should exist in browser tests")
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .expect("set_timeout should succeed");
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn clear_keys(pages: &[u32]) {
        if let Some(store) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            for p in pages {
                let _ = store.remove_item(&storage::page_key(*p));
            }
            let _ = store.remove_item(storage::CURRENT_PAGE_KEY);
            let _ = store.remove_item(storage::RECENT_PAGES_KEY);
        }
    }

    #[wasm_bindgen_test]
    async fn test_rapid_inputs_coalesce_into_one_trailing_save() {
        clear_keys(&[4242]);
        storage::save_current_page(4242);

        let state = AppState::new();
        let controller = PageSyncController::new(AppContext(state));

        controller.on_input("f".to_string());
        controller.on_input("fi".to_string());
        controller.on_input("final".to_string());

        // Nothing lands before the debounce window elapses.
        assert_eq!(storage::load_page_content(4242), "");

        sleep_ms(400).await;
        assert_eq!(storage::load_page_content(4242), "final");

        clear_keys(&[4242]);
    }

    #[wasm_bindgen_test]
    fn test_set_page_flushes_pending_edit_under_old_key() {
        clear_keys(&[4242, 4243]);
        storage::save_current_page(4242);

        let state = AppState::new();
        let controller = PageSyncController::new(AppContext(state.clone()));

        controller.on_input("pending edit".to_string());
        controller.set_page(4243);

        // The buffered edit is saved under the page it belongs to,
        // not under the page we navigated to.
        assert_eq!(storage::load_page_content(4242), "pending edit");
        assert_eq!(storage::load_page_content(4243), "");
        assert_eq!(state.current_page.get_untracked(), 4243);
        assert_eq!(storage::load_current_page(), 4243);

        clear_keys(&[4242, 4243]);
    }
}
