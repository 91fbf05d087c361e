use clansort_shared::{
    ButtonLayout, ClanRank, Component, ROW_HEIGHT, SortIcon, WidgetId, WidgetType, remove_tags,
};
use serde::{Deserialize, Serialize};

use crate::host::{ClanChannel, ClanMember, Client, HostError, RosterSnapshot, WidgetInfo};

/// Listener widgets carry the op name in the client's highlight colour.
const LISTENER_NAME_COLOR: &str = "ff9040";

/// One member as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRow {
    pub name: String,
    pub world: String,
    /// Rank in the clan roster. Members without one are not in the channel roster.
    #[serde(default)]
    pub rank: Option<ClanRank>,
    /// The local player's row has no op listener.
    #[serde(default)]
    pub local: bool,
}

impl MemberRow {
    pub fn new(name: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: world.into(),
            rank: None,
            local: false,
        }
    }

    pub fn local(name: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            local: true,
            ..Self::new(name, world)
        }
    }

    pub fn with_rank(mut self, rank: ClanRank) -> Self {
        self.rank = Some(rank);
        self
    }
}

#[derive(Debug, Clone)]
struct MemoryWidget {
    info: WidgetInfo,
    alive: bool,
    y: i32,
    revalidations: u32,
    layout: Option<ButtonLayout>,
    actions: Vec<Option<String>>,
    sprite: Option<SortIcon>,
}

impl MemoryWidget {
    fn new(widget_type: WidgetType, y: i32) -> Self {
        Self {
            info: WidgetInfo {
                widget_type,
                text: String::new(),
                name: String::new(),
                has_op_listener: false,
            },
            alive: true,
            y,
            revalidations: 0,
            layout: None,
            actions: Vec::new(),
            sprite: None,
        }
    }

    fn text(mut self, text: &str) -> Self {
        self.info.text = text.to_string();
        self
    }

    fn listener(mut self, name: String) -> Self {
        self.info.name = name;
        self.info.has_op_listener = true;
        self
    }
}

/// Self-contained [`Client`] that keeps the member list interface in memory.
///
/// Lays rows out the way the game does and tracks every position, sprite and
/// action the plugin writes, so it can back scripted replays as well as tests.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    widgets: Vec<MemoryWidget>,
    member_list: Option<Vec<WidgetId>>,
    header: Option<Vec<WidgetId>>,
    rows: Vec<MemberRow>,
    roster: Option<RosterSnapshot>,
    settings_loaded: bool,
    lookup_fault: bool,
}

impl MemoryClient {
    /// Fully loaded interface with the given rows, in the given display order.
    pub fn with_rows(rows: &[MemberRow]) -> Self {
        let mut client = Self {
            widgets: Vec::new(),
            member_list: None,
            header: Some(Vec::new()),
            rows: Vec::new(),
            roster: None,
            settings_loaded: true,
            lookup_fault: false,
        };
        client.set_rows(rows.to_vec());
        client
    }

    pub fn rows(&self) -> &[MemberRow] {
        &self.rows
    }

    /// Rebuild the member list, as the client does when membership changes.
    /// Every previously handed out member widget becomes stale.
    pub fn set_rows(&mut self, rows: Vec<MemberRow>) {
        self.retire_member_list();

        let mut children = Vec::with_capacity(rows.len() * 5);
        for (idx, row) in rows.iter().enumerate() {
            let y = i32::try_from(idx).unwrap_or(i32::MAX).saturating_mul(ROW_HEIGHT);
            let start = if row.local {
                WidgetType::Graphic
            } else {
                WidgetType::Rectangle
            };
            children.push(self.push(MemoryWidget::new(start, y)));
            children.push(self.push(MemoryWidget::new(WidgetType::Text, y).text(&row.name)));
            children.push(self.push(MemoryWidget::new(WidgetType::Text, y).text(&row.world)));
            children.push(self.push(MemoryWidget::new(WidgetType::Graphic, y)));
        }
        for (idx, row) in rows.iter().enumerate().filter(|(_, row)| !row.local) {
            let y = i32::try_from(idx).unwrap_or(i32::MAX).saturating_mul(ROW_HEIGHT);
            let name = format!(
                "<col={LISTENER_NAME_COLOR}>{}</col>",
                remove_tags(&row.name)
            );
            children.push(self.push(MemoryWidget::new(WidgetType::Rectangle, y).listener(name)));
        }

        self.roster = Some(RosterSnapshot::new(
            rows.iter()
                .filter_map(|row| {
                    row.rank.map(|rank| ClanMember {
                        name: remove_tags(&row.name),
                        rank,
                    })
                })
                .collect(),
        ));
        self.member_list = Some(children);
        self.rows = rows;
    }

    /// Change a member's roster rank without touching the interface.
    pub fn promote(&mut self, name: &str, rank: ClanRank) -> bool {
        let Some(roster) = self.roster.as_mut() else {
            return false;
        };
        if !roster.set_rank(&remove_tags(name), rank) {
            return false;
        }
        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|row| remove_tags(&row.name) == remove_tags(name))
        {
            row.rank = Some(rank);
        }
        true
    }

    pub fn unload_member_list(&mut self) {
        self.retire_member_list();
        self.member_list = None;
    }

    pub fn reload_member_list(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        self.set_rows(rows);
    }

    pub fn unload_header(&mut self) {
        self.delete_all_children(Component::Header);
        self.header = None;
    }

    pub fn clear_clan_channel(&mut self) {
        self.roster = None;
    }

    pub fn set_clan_settings_loaded(&mut self, loaded: bool) {
        self.settings_loaded = loaded;
    }

    /// Make every roster lookup fail, as a half-loaded clan channel does.
    pub fn set_lookup_fault(&mut self, fault: bool) {
        self.lookup_fault = fault;
    }

    pub fn header_children(&self) -> Vec<WidgetId> {
        self.header.clone().unwrap_or_default()
    }

    pub fn y_of(&self, id: WidgetId) -> Option<i32> {
        self.live(id).map(|widget| widget.y)
    }

    pub fn revalidations(&self, id: WidgetId) -> u32 {
        self.live(id).map_or(0, |widget| widget.revalidations)
    }

    pub fn sprite(&self, id: WidgetId) -> Option<SortIcon> {
        self.live(id).and_then(|widget| widget.sprite)
    }

    pub fn layout(&self, id: WidgetId) -> Option<ButtonLayout> {
        self.live(id).and_then(|widget| widget.layout)
    }

    pub fn actions(&self, id: WidgetId) -> Vec<String> {
        self.live(id)
            .map(|widget| widget.actions.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Vertical offset currently rendered for a member's name label.
    pub fn position_of(&self, name: &str) -> Option<i32> {
        self.member_list.as_ref()?.iter().find_map(|id| {
            let widget = self.live(*id)?;
            (widget.info.widget_type == WidgetType::Text && widget.info.text == name)
                .then_some(widget.y)
        })
    }

    /// Member names in rendered top-to-bottom order.
    pub fn rendered_order(&self) -> Vec<String> {
        let mut placed: Vec<(i32, &str)> = self
            .rows
            .iter()
            .filter_map(|row| Some((self.position_of(&row.name)?, row.name.as_str())))
            .collect();
        placed.sort_by_key(|(y, _)| *y);
        placed.into_iter().map(|(_, name)| name.to_string()).collect()
    }

    fn push(&mut self, widget: MemoryWidget) -> WidgetId {
        let id = WidgetId(u32::try_from(self.widgets.len()).unwrap_or(u32::MAX));
        self.widgets.push(widget);
        id
    }

    fn retire_member_list(&mut self) {
        for id in self.member_list.take().unwrap_or_default() {
            if let Some(widget) = self.widgets.get_mut(id.0 as usize) {
                widget.alive = false;
            }
        }
    }

    fn live(&self, id: WidgetId) -> Option<&MemoryWidget> {
        self.widgets
            .get(id.0 as usize)
            .filter(|widget| widget.alive)
    }

    fn live_mut(&mut self, id: WidgetId) -> Result<&mut MemoryWidget, HostError> {
        self.widgets
            .get_mut(id.0 as usize)
            .filter(|widget| widget.alive)
            .ok_or(HostError::StaleWidget(id))
    }
}

impl ClanChannel for MemoryClient {
    fn find_member(&self, name: &str) -> Result<Option<ClanMember>, HostError> {
        if self.lookup_fault {
            return Err(HostError::Lookup(format!("member table busy for {name}")));
        }
        match self.roster.as_ref() {
            Some(roster) => roster.find_member(name),
            None => Ok(None),
        }
    }
}

impl Client for MemoryClient {
    fn widget_children(&self, component: Component) -> Option<Vec<WidgetId>> {
        match component {
            Component::MemberList => self.member_list.clone(),
            Component::Header => self.header.clone(),
        }
    }

    fn widget(&self, id: WidgetId) -> Option<WidgetInfo> {
        self.live(id).map(|widget| widget.info.clone())
    }

    fn set_original_y(&mut self, id: WidgetId, y: i32) -> Result<(), HostError> {
        self.live_mut(id)?.y = y;
        Ok(())
    }

    fn revalidate(&mut self, id: WidgetId) -> Result<(), HostError> {
        self.live_mut(id)?.revalidations += 1;
        Ok(())
    }

    fn create_child(
        &mut self,
        parent: Component,
        widget_type: WidgetType,
    ) -> Result<WidgetId, HostError> {
        let id = match (parent, self.header.is_some(), self.member_list.is_some()) {
            (Component::Header, true, _) | (Component::MemberList, _, true) => {
                self.push(MemoryWidget::new(widget_type, 0))
            }
            _ => return Err(HostError::MissingComponent(parent)),
        };
        let children = match parent {
            Component::Header => self.header.as_mut(),
            Component::MemberList => self.member_list.as_mut(),
        };
        if let Some(children) = children {
            children.push(id);
        }
        Ok(id)
    }

    fn delete_all_children(&mut self, parent: Component) {
        let children = match parent {
            Component::Header => self.header.as_mut().map(std::mem::take),
            Component::MemberList => self.member_list.as_mut().map(std::mem::take),
        };
        for id in children.unwrap_or_default() {
            if let Some(widget) = self.widgets.get_mut(id.0 as usize) {
                widget.alive = false;
            }
        }
    }

    fn configure_button(&mut self, id: WidgetId, layout: ButtonLayout) -> Result<(), HostError> {
        let widget = self.live_mut(id)?;
        widget.layout = Some(layout);
        widget.y = layout.y;
        Ok(())
    }

    fn set_action(&mut self, id: WidgetId, slot: usize, label: &str) -> Result<(), HostError> {
        let widget = self.live_mut(id)?;
        if widget.actions.len() <= slot {
            widget.actions.resize(slot + 1, None);
        }
        widget.actions[slot] = Some(label.to_string());
        Ok(())
    }

    fn set_sprite(&mut self, id: WidgetId, icon: SortIcon) -> Result<(), HostError> {
        self.live_mut(id)?.sprite = Some(icon);
        Ok(())
    }

    fn clan_channel(&self) -> Option<&dyn ClanChannel> {
        self.roster.as_ref().map(|_| self as &dyn ClanChannel)
    }

    fn clan_settings_loaded(&self) -> bool {
        self.settings_loaded
    }
}
