use serde::{Deserialize, Serialize};

use crate::criterion::SortCriterion;

pub const CONFIG_GROUP: &str = "clanmemberlistsorting";
pub const KEY_ACTIVE_SORT_TYPE: &str = "activeSortType";
pub const KEY_REVERSE_SORT: &str = "reverseSort";

/// User-facing sort preferences, persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    #[serde(rename = "activeSortType")]
    pub active_criterion: SortCriterion,
    #[serde(rename = "reverseSort")]
    pub reverse: bool,
}

/// Notification that a persisted config value changed outside the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChanged {
    pub group: String,
    pub key: String,
}

impl ConfigChanged {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }

    pub fn is_reverse_toggle(&self) -> bool {
        self.group == CONFIG_GROUP && self.key == KEY_REVERSE_SORT
    }
}
