use std::fmt;

use serde::{Deserialize, Serialize};

/// Clan rank as reported by the clan roster.
///
/// Wraps the client's raw rank value. Ordering follows the raw value, so a
/// higher value means higher standing in the clan hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClanRank(pub i8);

impl ClanRank {
    pub const GUEST: Self = Self(-1);
    pub const RECRUIT: Self = Self(0);
    pub const CORPORAL: Self = Self(10);
    pub const SERGEANT: Self = Self(20);
    pub const LIEUTENANT: Self = Self(30);
    pub const CAPTAIN: Self = Self(40);
    pub const GENERAL: Self = Self(50);
    pub const ADMINISTRATOR: Self = Self(100);
    pub const DEPUTY_OWNER: Self = Self(125);
    pub const OWNER: Self = Self(126);
    pub const JMOD: Self = Self(127);

    /// Default title for the well-known ranks. Custom clan ranks have none.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::GUEST => Some("Guest"),
            Self::RECRUIT => Some("Recruit"),
            Self::CORPORAL => Some("Corporal"),
            Self::SERGEANT => Some("Sergeant"),
            Self::LIEUTENANT => Some("Lieutenant"),
            Self::CAPTAIN => Some("Captain"),
            Self::GENERAL => Some("General"),
            Self::ADMINISTRATOR => Some("Administrator"),
            Self::DEPUTY_OWNER => Some("Deputy Owner"),
            Self::OWNER => Some("Owner"),
            Self::JMOD => Some("Jagex Moderator"),
            _ => None,
        }
    }
}

impl fmt::Display for ClanRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title() {
            Some(title) => f.write_str(title),
            None => write!(f, "Rank {}", self.0),
        }
    }
}
