use serde::{Deserialize, Serialize};

/// One entry in the locally persisted recent-pages list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecentPage {
    pub page: u32,
    pub last_opened_ms: i64,
}
