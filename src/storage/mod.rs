use crate::models::RecentPage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const CURRENT_PAGE_KEY: &str = "notepage-current";
pub(crate) const RECENT_PAGES_KEY: &str = "notepage-recent";

const RECENT_PAGES_MAX: usize = 8;

/// Key for a page's note content.
pub(crate) fn page_key(page: u32) -> String {
    format!("notepage-{page}")
}

/// Key for a persisted boolean setting flag.
pub(crate) fn setting_key(name: &str) -> String {
    format!("notepage-{name}-enabled")
}

/// The one storage failure we surface to the user: a rejected write
/// (quota exceeded, or localStorage unavailable entirely).
#[derive(Debug, Clone)]
pub(crate) struct StorageError(pub String);

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage write failed: {}", self.0)
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// A page that was never written reads back as an empty page.
pub(crate) fn load_page_content(page: u32) -> String {
    local_storage()
        .and_then(|s| s.get_item(&page_key(page)).ok().flatten())
        .unwrap_or_default()
}

pub(crate) fn save_page_content(page: u32, content: &str) -> Result<(), StorageError> {
    let Some(storage) = local_storage() else {
        return Err(StorageError("localStorage is unavailable".to_string()));
    };

    storage
        .set_item(&page_key(page), content)
        .map_err(|e| StorageError(format!("{e:?}")))
}

/// Clamp a raw stored page indicator to a valid page number.
///
/// Absent, unparseable, zero, and negative values all fall back to page 1.
pub(crate) fn parse_current_page(raw: Option<String>) -> u32 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

pub(crate) fn load_current_page() -> u32 {
    parse_current_page(local_storage().and_then(|s| s.get_item(CURRENT_PAGE_KEY).ok().flatten()))
}

pub(crate) fn save_current_page(page: u32) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(CURRENT_PAGE_KEY, &page.to_string());
    }
}

pub(crate) fn load_setting_enabled(name: &str) -> bool {
    local_storage()
        .and_then(|s| s.get_item(&setting_key(name)).ok().flatten())
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

pub(crate) fn save_setting_enabled(name: &str, enabled: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(&setting_key(name), if enabled { "true" } else { "false" });
    }
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

/// Move `page` to the front of the recents list, deduplicated and capped.
pub(crate) fn upsert_recent_page(
    mut items: Vec<RecentPage>,
    page: u32,
    now_ms: i64,
) -> Vec<RecentPage> {
    items.retain(|x| x.page != page);
    items.insert(
        0,
        RecentPage {
            page,
            last_opened_ms: now_ms,
        },
    );
    if items.len() > RECENT_PAGES_MAX {
        items.truncate(RECENT_PAGES_MAX);
    }
    items
}

pub(crate) fn load_recent_pages() -> Vec<RecentPage> {
    load_json_from_storage::<Vec<RecentPage>>(RECENT_PAGES_KEY).unwrap_or_default()
}

pub(crate) fn write_recent_page(page: u32, now_ms: i64) -> Vec<RecentPage> {
    let next = upsert_recent_page(load_recent_pages(), page, now_ms);
    save_json_to_storage(RECENT_PAGES_KEY, &next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_format() {
        assert_eq!(page_key(1), "notepage-1");
        assert_eq!(page_key(42), "notepage-42");
    }

    #[test]
    fn test_setting_key_format() {
        assert_eq!(setting_key("spellcheck"), "notepage-spellcheck-enabled");
    }

    #[test]
    fn test_parse_current_page_absent_defaults_to_one() {
        assert_eq!(parse_current_page(None), 1);
    }

    #[test]
    fn test_parse_current_page_garbage_defaults_to_one() {
        assert_eq!(parse_current_page(Some("".to_string())), 1);
        assert_eq!(parse_current_page(Some("abc".to_string())), 1);
        assert_eq!(parse_current_page(Some("1.5".to_string())), 1);
    }

    #[test]
    fn test_parse_current_page_clamps_below_one() {
        assert_eq!(parse_current_page(Some("0".to_string())), 1);
        assert_eq!(parse_current_page(Some("-3".to_string())), 1);
    }

    #[test]
    fn test_parse_current_page_valid() {
        assert_eq!(parse_current_page(Some("7".to_string())), 7);
        assert_eq!(parse_current_page(Some(" 12 ".to_string())), 12);
    }

    #[test]
    fn test_upsert_recent_page_moves_to_front_without_duplicates() {
        let items = vec![
            RecentPage {
                page: 3,
                last_opened_ms: 100,
            },
            RecentPage {
                page: 5,
                last_opened_ms: 90,
            },
        ];

        let next = upsert_recent_page(items, 5, 200);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].page, 5);
        assert_eq!(next[0].last_opened_ms, 200);
        assert_eq!(next[1].page, 3);
    }

    #[test]
    fn test_upsert_recent_page_caps_length() {
        let mut items = Vec::new();
        for p in 1..=10u32 {
            items = upsert_recent_page(items, p, p as i64);
        }
        assert_eq!(items.len(), RECENT_PAGES_MAX);
        assert_eq!(items[0].page, 10);
        // Oldest entries fall off the end.
        assert!(items.iter().all(|x| x.page > 2));
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_page_content_roundtrip() {
        let page = 9001;
        save_page_content(page, "hello, notes").expect("save should succeed");
        assert_eq!(load_page_content(page), "hello, notes");

        // Overwrite wins.
        save_page_content(page, "replaced").expect("save should succeed");
        assert_eq!(load_page_content(page), "replaced");

        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(&page_key(page));
        }
    }

    #[wasm_bindgen_test]
    fn test_unwritten_page_reads_empty() {
        assert_eq!(load_page_content(987_654), "");
    }

    #[wasm_bindgen_test]
    fn test_current_page_roundtrip_and_clamp() {
        save_current_page(4);
        assert_eq!(load_current_page(), 4);

        if let Some(storage) = local_storage() {
            let _ = storage.set_item(CURRENT_PAGE_KEY, "not-a-number");
        }
        assert_eq!(load_current_page(), 1);

        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(CURRENT_PAGE_KEY);
        }
    }

    #[wasm_bindgen_test]
    fn test_setting_flag_roundtrip() {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(&setting_key("spellcheck"));
        }
        assert!(!load_setting_enabled("spellcheck"));

        save_setting_enabled("spellcheck", true);
        assert!(load_setting_enabled("spellcheck"));

        save_setting_enabled("spellcheck", false);
        assert!(!load_setting_enabled("spellcheck"));

        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(&setting_key("spellcheck"));
        }
    }

    #[wasm_bindgen_test]
    fn test_recent_pages_persist() {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(RECENT_PAGES_KEY);
        }

        write_recent_page(2, 100);
        let recents = write_recent_page(6, 200);
        assert_eq!(recents[0].page, 6);

        let loaded = load_recent_pages();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].page, 6);

        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(RECENT_PAGES_KEY);
        }
    }
}
