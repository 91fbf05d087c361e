use serde::{Deserialize, Serialize};

/// Interface group hosting the clan member list.
pub const CLAN_MEMBERS_GROUP_ID: i32 = 701;

/// Vertical distance between two member rows, matching the client's own layout.
pub const ROW_HEIGHT: i32 = 15;

/// Opaque handle to a widget owned by the client. Only valid until the
/// client rebuilds the interface, so every dereference may fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u32);

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Widget type tag as exposed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Layer,
    Inventory,
    Rectangle,
    Text,
    Graphic,
    Model,
    TextInventory,
    Line,
}

/// Interface components the plugin looks up by stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Container whose children are the flat member rows.
    MemberList,
    /// Header layer the sort button is attached to.
    Header,
}

/// Directional icon shown on the sort button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIcon {
    ArrowUp,
    ArrowDown,
}

impl SortIcon {
    pub const fn for_reverse(reverse: bool) -> Self {
        if reverse { Self::ArrowUp } else { Self::ArrowDown }
    }

    pub const fn sprite_id(self) -> i32 {
        match self {
            Self::ArrowUp => 773,
            Self::ArrowDown => 788,
        }
    }
}

/// Placement and listener flags for the sort button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub has_listener: bool,
}

impl ButtonLayout {
    pub const SORT_BUTTON: Self = Self {
        x: 2,
        y: 2,
        width: 16,
        height: 16,
        has_listener: true,
    };
}
