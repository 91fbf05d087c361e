pub mod chat;
pub mod criterion;
pub mod rank;
pub mod settings;
pub mod text;
pub mod widget;

pub use chat::{ChatMessage, ChatMessageType};
pub use criterion::SortCriterion;
pub use rank::ClanRank;
pub use settings::{ConfigChanged, SortSettings};
pub use text::{normalize_identity, remove_tags, to_jagex_name};
pub use widget::{ButtonLayout, Component, ROW_HEIGHT, SortIcon, WidgetId, WidgetType};
