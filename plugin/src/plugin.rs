use clansort_shared::widget::CLAN_MEMBERS_GROUP_ID;
use clansort_shared::{
    ButtonLayout, ChatMessage, Component, ConfigChanged, SortCriterion, SortIcon, SortSettings,
    WidgetId, WidgetType,
};
use tracing::{debug, info, trace, warn};

use crate::classifier::classify_member_list;
use crate::clock::Clock;
use crate::config::ConfigStore;
use crate::entry::Entry;
use crate::host::Client;
use crate::menu::MenuRotation;
use crate::recency::RecencyCache;
use crate::scheduler::{RescanScheduler, TickDecision};
use crate::sort_engine::{SortOutcome, sort_and_place};

/// Sortable clan member list: reacts to client events and keeps the rows ordered.
///
/// All methods run on the client thread; nothing here is shared across threads.
pub struct ClanMemberListSort<S, K> {
    config: S,
    clock: K,
    settings: SortSettings,
    recency: RecencyCache,
    rotation: MenuRotation,
    scheduler: RescanScheduler,
    entries: Vec<Entry>,
    sort_button: Option<WidgetId>,
}

impl<S: ConfigStore, K: Clock> ClanMemberListSort<S, K> {
    pub fn new(config: S, clock: K) -> Self {
        let settings = config.load();
        Self {
            config,
            clock,
            settings,
            recency: RecencyCache::new(),
            rotation: MenuRotation::new(),
            scheduler: RescanScheduler::default(),
            entries: Vec::new(),
            sort_button: None,
        }
    }

    pub fn settings(&self) -> SortSettings {
        self.settings
    }

    pub fn config(&self) -> &S {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut S {
        &mut self.config
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn recency(&self) -> &RecencyCache {
        &self.recency
    }

    pub fn rotation(&self) -> &MenuRotation {
        &self.rotation
    }

    pub fn scheduler(&self) -> &RescanScheduler {
        &self.scheduler
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn sort_button(&self) -> Option<WidgetId> {
        self.sort_button
    }

    /// Member names in the order of the last sort pass.
    pub fn sorted_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name_text.as_str()).collect()
    }

    pub fn start_up<C: Client + ?Sized>(&mut self, client: &mut C) {
        info!(
            criterion = ?self.settings.active_criterion,
            reverse = self.settings.reverse,
            "clan member list sorting started"
        );
        self.init_widgets(client);
    }

    pub fn shut_down<C: Client + ?Sized>(&mut self, client: &mut C) {
        if client.widget_children(Component::Header).is_some() {
            client.delete_all_children(Component::Header);
        }
        self.sort_button = None;
        self.recency.clear();
        self.entries.clear();
        self.scheduler.reset();
        info!("clan member list sorting stopped");
    }

    pub fn on_widget_loaded<C: Client + ?Sized>(&mut self, client: &mut C, group_id: i32) {
        if group_id == CLAN_MEMBERS_GROUP_ID {
            self.init_widgets(client);
        }
    }

    /// Attach the sort button to the member list header.
    pub fn init_widgets<C: Client + ?Sized>(&mut self, client: &mut C) {
        if client.widget_children(Component::Header).is_none() {
            debug!("member list header not loaded, sort button deferred");
            return;
        }

        client.delete_all_children(Component::Header);
        self.sort_button = None;

        let button = match client.create_child(Component::Header, WidgetType::Graphic) {
            Ok(button) => button,
            Err(e) => {
                warn!(error = %e, "failed to create sort button");
                return;
            }
        };
        if let Err(e) = client.configure_button(button, ButtonLayout::SORT_BUTTON) {
            warn!(error = %e, "failed to configure sort button");
            return;
        }
        self.sort_button = Some(button);

        self.rotate_menu(client, self.settings.active_criterion);
        self.update_sort_button_sprite(client);
        if let Err(e) = client.revalidate(button) {
            trace!(error = %e, "failed to revalidate sort button");
        }
    }

    pub fn on_chat_message(&mut self, message: &ChatMessage) {
        if !message.kind.is_clan_chat() {
            return;
        }
        self.recency
            .record_activity(&message.name, self.clock.now_ms());
    }

    /// Periodic client tick. A due rescan is only scheduled here and runs in
    /// [`ClanMemberListSort::run_deferred`], once the client has settled the list.
    pub fn on_game_tick<C: Client + ?Sized>(&mut self, client: &C) -> TickDecision {
        let container_present = client.widget_children(Component::MemberList).is_some();
        let decision = self
            .scheduler
            .on_tick(self.clock.now_ms(), container_present);
        if decision == TickDecision::Scheduled {
            trace!("member list rescan scheduled");
        }
        decision
    }

    /// Deferred half of a tick: reclassify the rows and sort them.
    pub fn run_deferred<C: Client + ?Sized>(&mut self, client: &mut C) -> Option<SortOutcome> {
        let requested_at_ms = self.scheduler.pending_request()?;
        let now_ms = self.clock.now_ms();

        let Some(entries) = classify_member_list(&*client) else {
            debug!(
                waited_ms = now_ms - requested_at_ms,
                "member list vanished before rescan"
            );
            self.scheduler.abandon();
            return None;
        };

        self.entries = entries;
        let outcome = self.sort(client);
        self.scheduler.complete(now_ms);
        debug!(
            waited_ms = now_ms - requested_at_ms,
            rows = outcome.placed,
            "member list rescanned"
        );
        Some(outcome)
    }

    /// Re-sort the rows of the last rescan with the current settings.
    pub fn sort<C: Client + ?Sized>(&mut self, client: &mut C) -> SortOutcome {
        sort_and_place(client, &mut self.entries, self.settings, &self.recency)
    }

    /// Left click on the sort button flips the direction.
    pub fn on_sort_button_click<C: Client + ?Sized>(&mut self, client: &mut C) -> SortOutcome {
        self.settings.reverse = !self.settings.reverse;
        self.persist_settings();
        self.update_sort_button_sprite(client);
        self.sort(client)
    }

    /// A menu action was picked on the sort button.
    pub fn on_sort_button_op<C: Client + ?Sized>(
        &mut self,
        client: &mut C,
        op: i32,
    ) -> Option<SortCriterion> {
        let Some(criterion) = self.rotation.resolve(op) else {
            trace!(op, "ignoring unknown sort action");
            return None;
        };

        self.settings.active_criterion = criterion;
        self.persist_settings();
        self.rotate_menu(client, criterion);
        Some(criterion)
    }

    pub fn on_config_changed<C: Client + ?Sized>(&mut self, client: &mut C, event: &ConfigChanged) {
        if !event.is_reverse_toggle() {
            return;
        }
        // Only the direction follows the store; the criterion changes through the menu.
        self.settings.reverse = self.config.load().reverse;
        self.update_sort_button_sprite(client);
    }

    fn rotate_menu<C: Client + ?Sized>(&mut self, client: &mut C, active: SortCriterion) {
        self.rotation.rotate(active);
        if let Some(button) = self.sort_button {
            self.rotation.apply_labels(client, button);
        }
        self.sort(client);
    }

    fn update_sort_button_sprite<C: Client + ?Sized>(&self, client: &mut C) {
        let Some(button) = self.sort_button else {
            return;
        };
        if let Err(e) = client.set_sprite(button, SortIcon::for_reverse(self.settings.reverse)) {
            trace!(error = %e, "failed to update sort button sprite");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.config.save(&self.settings) {
            warn!(error = %e, "failed to persist sort settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use clansort_shared::settings::{CONFIG_GROUP, KEY_ACTIVE_SORT_TYPE, KEY_REVERSE_SORT};
    use clansort_shared::widget::CLAN_MEMBERS_GROUP_ID;
    use clansort_shared::{
        ButtonLayout, ChatMessage, ChatMessageType, ClanRank, Component, ConfigChanged,
        SortCriterion, SortIcon, SortSettings, WidgetType,
    };

    use super::ClanMemberListSort;
    use crate::clock::ManualClock;
    use crate::config::{ConfigStore, MemoryConfigStore};
    use crate::host::Client;
    use crate::memory_client::{MemberRow, MemoryClient};
    use crate::scheduler::{RESCAN_INTERVAL_MS, TickDecision};

    const START: i64 = 1_700_000_000_000;

    type Plugin<'a> = ClanMemberListSort<MemoryConfigStore, &'a ManualClock>;

    fn rows() -> Vec<MemberRow> {
        vec![
            MemberRow::local("Me", "302").with_rank(ClanRank::SERGEANT),
            MemberRow::new("Zed", "301").with_rank(ClanRank::RECRUIT),
            MemberRow::new("<img=41>Ann", "303").with_rank(ClanRank::CAPTAIN),
        ]
    }

    fn plugin(clock: &ManualClock, settings: SortSettings) -> Plugin<'_> {
        ClanMemberListSort::new(MemoryConfigStore::new(settings), clock)
    }

    fn chat(kind: ChatMessageType, name: &str) -> ChatMessage {
        ChatMessage {
            kind,
            name: name.to_string(),
        }
    }

    fn tick_and_settle(plugin: &mut Plugin<'_>, client: &mut MemoryClient) -> TickDecision {
        let decision = plugin.on_game_tick(&*client);
        plugin.run_deferred(client);
        decision
    }

    #[test]
    fn start_up_builds_the_sort_button() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(
            &clock,
            SortSettings {
                active_criterion: SortCriterion::ByWorld,
                reverse: true,
            },
        );

        plugin.start_up(&mut client);

        let button = plugin.sort_button().expect("button created");
        assert_eq!(client.header_children(), vec![button]);
        assert_eq!(client.layout(button), Some(ButtonLayout::SORT_BUTTON));
        assert_eq!(client.sprite(button), Some(SortIcon::ArrowUp));
        assert_eq!(client.revalidations(button), 1);
        assert_eq!(
            client.actions(button),
            vec![
                "Sort by world",
                "Sort by name",
                "Sort by rank",
                "Sort by recent chat"
            ]
        );
    }

    #[test]
    fn start_up_without_header_waits_for_widget_load() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        client.unload_header();
        let mut plugin = plugin(&clock, SortSettings::default());

        plugin.start_up(&mut client);
        assert!(plugin.sort_button().is_none());

        let mut client = MemoryClient::with_rows(&rows());
        plugin.on_widget_loaded(&mut client, CLAN_MEMBERS_GROUP_ID + 1);
        assert!(plugin.sort_button().is_none());
        plugin.on_widget_loaded(&mut client, CLAN_MEMBERS_GROUP_ID);
        assert!(plugin.sort_button().is_some());
    }

    #[test]
    fn rescan_runs_on_the_deferred_step_only() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);

        assert_eq!(plugin.on_game_tick(&client), TickDecision::Scheduled);
        assert_eq!(client.rendered_order(), ["Me", "Zed", "<img=41>Ann"]);

        let outcome = plugin.run_deferred(&mut client).expect("rescan ran");
        assert_eq!(outcome.placed, 3);
        assert_eq!(client.rendered_order(), ["<img=41>Ann", "Me", "Zed"]);
        assert_eq!(plugin.scheduler().last_rescan_ms(), START);

        assert!(plugin.run_deferred(&mut client).is_none());
    }

    #[test]
    fn rescans_are_throttled_to_the_interval() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());

        assert_eq!(tick_and_settle(&mut plugin, &mut client), TickDecision::Scheduled);
        clock.advance(600);
        assert_eq!(tick_and_settle(&mut plugin, &mut client), TickDecision::Throttled);
        clock.set(START + RESCAN_INTERVAL_MS);
        assert_eq!(tick_and_settle(&mut plugin, &mut client), TickDecision::Scheduled);
    }

    #[test]
    fn missing_container_skips_tick_and_keeps_positions() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());

        assert_eq!(plugin.on_game_tick(&client), TickDecision::Scheduled);
        client.unload_member_list();
        assert!(plugin.run_deferred(&mut client).is_none());
        assert_eq!(plugin.scheduler().last_rescan_ms(), 0);

        assert_eq!(plugin.on_game_tick(&client), TickDecision::NoContainer);

        client.reload_member_list();
        assert_eq!(tick_and_settle(&mut plugin, &mut client), TickDecision::Scheduled);
        assert_eq!(plugin.sorted_names(), ["<img=41>Ann", "Me", "Zed"]);
    }

    #[test]
    fn recent_clan_chat_moves_speakers_up() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(
            &clock,
            SortSettings {
                active_criterion: SortCriterion::ByRecentChat,
                reverse: false,
            },
        );
        plugin.start_up(&mut client);

        clock.set(100);
        plugin.on_chat_message(&chat(ChatMessageType::ClanChat, "Ann"));
        clock.set(200);
        plugin.on_chat_message(&chat(ChatMessageType::ClanGuestChat, "Ann"));
        plugin.on_chat_message(&chat(ChatMessageType::Public, "Zed"));
        assert_eq!(plugin.recency().lookup("Ann"), 200);
        assert_eq!(plugin.recency().lookup("Zed"), 0);

        clock.set(START);
        tick_and_settle(&mut plugin, &mut client);
        assert_eq!(client.rendered_order(), ["<img=41>Ann", "Me", "Zed"]);
    }

    #[test]
    fn click_toggles_direction_and_persists() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);
        tick_and_settle(&mut plugin, &mut client);
        let button = plugin.sort_button().expect("button created");
        assert_eq!(client.sprite(button), Some(SortIcon::ArrowDown));

        plugin.on_sort_button_click(&mut client);
        assert!(plugin.config().load().reverse);
        assert_eq!(client.sprite(button), Some(SortIcon::ArrowUp));
        assert_eq!(client.rendered_order(), ["Zed", "Me", "<img=41>Ann"]);
        assert_eq!(plugin.rotation().primary(), SortCriterion::ByName);

        plugin.on_sort_button_click(&mut client);
        assert_eq!(client.rendered_order(), ["<img=41>Ann", "Me", "Zed"]);
    }

    #[test]
    fn picking_a_menu_action_activates_its_criterion() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);
        tick_and_settle(&mut plugin, &mut client);

        // Name is primary, so rank sits on op 2.
        assert_eq!(
            plugin.on_sort_button_op(&mut client, 2),
            Some(SortCriterion::ByRank)
        );
        assert_eq!(plugin.config().load().active_criterion, SortCriterion::ByRank);
        assert_eq!(plugin.rotation().primary(), SortCriterion::ByRank);
        assert_eq!(client.rendered_order(), ["<img=41>Ann", "Me", "Zed"]);
        assert_eq!(plugin.entries()[0].rank, Some(ClanRank::CAPTAIN));

        let button = plugin.sort_button().expect("button created");
        assert_eq!(client.actions(button)[0], "Sort by rank");

        // World now sits on op 3.
        plugin.on_sort_button_op(&mut client, 3);
        assert_eq!(plugin.settings().active_criterion, SortCriterion::ByWorld);
        assert_eq!(client.rendered_order(), ["<img=41>Ann", "Me", "Zed"]);
        plugin.on_sort_button_click(&mut client);
        assert_eq!(client.rendered_order(), ["Zed", "Me", "<img=41>Ann"]);
    }

    #[test]
    fn unknown_menu_action_changes_nothing() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);

        assert_eq!(plugin.on_sort_button_op(&mut client, 9), None);
        assert_eq!(plugin.settings(), SortSettings::default());
        assert_eq!(plugin.rotation().primary(), SortCriterion::ByName);
    }

    #[test]
    fn reverse_changed_elsewhere_refreshes_sprite() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);
        let button = plugin.sort_button().expect("button created");

        plugin
            .config_mut()
            .save(&SortSettings {
                active_criterion: SortCriterion::ByName,
                reverse: true,
            })
            .expect("memory save");

        plugin.on_config_changed(&mut client, &ConfigChanged::new(CONFIG_GROUP, KEY_ACTIVE_SORT_TYPE));
        assert_eq!(client.sprite(button), Some(SortIcon::ArrowDown));

        plugin.on_config_changed(&mut client, &ConfigChanged::new(CONFIG_GROUP, KEY_REVERSE_SORT));
        assert_eq!(client.sprite(button), Some(SortIcon::ArrowUp));
        assert!(plugin.settings().reverse);
    }

    #[test]
    fn reverse_reload_keeps_menu_and_criterion_in_step() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);
        tick_and_settle(&mut plugin, &mut client);
        let button = plugin.sort_button().expect("button created");

        plugin
            .config_mut()
            .save(&SortSettings {
                active_criterion: SortCriterion::ByWorld,
                reverse: true,
            })
            .expect("memory save");
        plugin.on_config_changed(&mut client, &ConfigChanged::new(CONFIG_GROUP, KEY_REVERSE_SORT));

        assert_eq!(plugin.settings().active_criterion, plugin.rotation().primary());
        assert_eq!(plugin.settings().active_criterion, SortCriterion::ByName);
        assert!(plugin.settings().reverse);
        assert_eq!(client.actions(button)[0], "Sort by name");
        assert_eq!(
            plugin.on_sort_button_op(&mut client, 1),
            Some(SortCriterion::ByName)
        );
    }

    #[test]
    fn shut_down_clears_header_even_without_a_button() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        let stray = client
            .create_child(Component::Header, WidgetType::Graphic)
            .expect("header loaded");
        assert!(plugin.sort_button().is_none());

        plugin.shut_down(&mut client);
        assert!(client.header_children().is_empty());
        assert!(client.widget(stray).is_none());
    }

    #[test]
    fn shut_down_clears_session_state() {
        let clock = ManualClock::new(START);
        let mut client = MemoryClient::with_rows(&rows());
        let mut plugin = plugin(&clock, SortSettings::default());
        plugin.start_up(&mut client);
        plugin.on_chat_message(&chat(ChatMessageType::ClanChat, "Zed"));
        tick_and_settle(&mut plugin, &mut client);

        plugin.shut_down(&mut client);
        assert!(client.header_children().is_empty());
        assert!(plugin.recency().is_empty());
        assert!(plugin.entries().is_empty());
        assert!(plugin.sort_button().is_none());
    }
}
