use serde::{Deserialize, Serialize};

/// Dimension the member list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortCriterion {
    #[default]
    #[serde(rename = "SORT_BY_NAME")]
    ByName,
    #[serde(rename = "SORT_BY_RANK")]
    ByRank,
    #[serde(rename = "SORT_BY_WORLD")]
    ByWorld,
    #[serde(rename = "SORT_BY_RECENT_CHAT")]
    ByRecentChat,
}

impl SortCriterion {
    /// Declaration order. Menu slots after the primary one follow this order.
    pub const ALL: [Self; 4] = [Self::ByName, Self::ByRank, Self::ByWorld, Self::ByRecentChat];

    pub fn label(self) -> &'static str {
        match self {
            Self::ByName => "Sort by name",
            Self::ByRank => "Sort by rank",
            Self::ByWorld => "Sort by world",
            Self::ByRecentChat => "Sort by recent chat",
        }
    }

    /// Position in [`SortCriterion::ALL`].
    pub const fn ordinal(self) -> usize {
        match self {
            Self::ByName => 0,
            Self::ByRank => 1,
            Self::ByWorld => 2,
            Self::ByRecentChat => 3,
        }
    }

    /// Whether the unreversed ordering puts the largest key first.
    pub const fn descending_by_default(self) -> bool {
        !matches!(self, Self::ByName)
    }
}
