use clansort_shared::{
    ButtonLayout, ClanRank, Component, SortIcon, WidgetId, WidgetType, normalize_identity,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("widget {0} is no longer part of the interface")]
    StaleWidget(WidgetId),

    #[error("component {0:?} is not loaded")]
    MissingComponent(Component),

    #[error("roster lookup failed: {0}")]
    Lookup(String),
}

/// Read view of one widget at the time it was queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInfo {
    pub widget_type: WidgetType,
    /// Rendered text, for text widgets.
    pub text: String,
    /// Op name the client shows in the right-click menu.
    pub name: String,
    pub has_op_listener: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClanMember {
    pub name: String,
    pub rank: ClanRank,
}

/// Live member lookup of the clan channel the local player is in.
pub trait ClanChannel {
    fn find_member(&self, name: &str) -> Result<Option<ClanMember>, HostError>;
}

/// Everything the plugin needs from the client.
///
/// The client owns every widget and the clan roster. The plugin reads through
/// this trait and only writes row positions and its own sort button back.
pub trait Client {
    /// Children of a component in render order, or `None` when it is not loaded.
    fn widget_children(&self, component: Component) -> Option<Vec<WidgetId>>;

    fn widget(&self, id: WidgetId) -> Option<WidgetInfo>;

    fn set_original_y(&mut self, id: WidgetId, y: i32) -> Result<(), HostError>;

    fn revalidate(&mut self, id: WidgetId) -> Result<(), HostError>;

    fn create_child(
        &mut self,
        parent: Component,
        widget_type: WidgetType,
    ) -> Result<WidgetId, HostError>;

    fn delete_all_children(&mut self, parent: Component);

    fn configure_button(&mut self, id: WidgetId, layout: ButtonLayout) -> Result<(), HostError>;

    fn set_action(&mut self, id: WidgetId, slot: usize, label: &str) -> Result<(), HostError>;

    fn set_sprite(&mut self, id: WidgetId, icon: SortIcon) -> Result<(), HostError>;

    fn clan_channel(&self) -> Option<&dyn ClanChannel>;

    fn clan_settings_loaded(&self) -> bool;
}

/// In-memory roster, used by hosts that receive the member list as data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub members: Vec<ClanMember>,
}

impl RosterSnapshot {
    pub fn new(members: Vec<ClanMember>) -> Self {
        Self { members }
    }

    pub fn set_rank(&mut self, name: &str, rank: ClanRank) -> bool {
        let key = normalize_identity(name);
        match self
            .members
            .iter_mut()
            .find(|member| normalize_identity(&member.name) == key)
        {
            Some(member) => {
                member.rank = rank;
                true
            }
            None => false,
        }
    }
}

impl ClanChannel for RosterSnapshot {
    fn find_member(&self, name: &str) -> Result<Option<ClanMember>, HostError> {
        let key = normalize_identity(name);
        Ok(self
            .members
            .iter()
            .find(|member| normalize_identity(&member.name) == key)
            .cloned())
    }
}
