use std::time::Duration;

use clansort_plugin::{
    ClanMemberListSort, ConfigStore, ManualClock, MemoryClient, RESCAN_INTERVAL_MS, TickDecision,
};
use clansort_shared::remove_tags;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::scenario::{Action, Scenario};

/// Scenario time of the first tick.
pub const START_MS: i64 = 1_700_000_000_000;

/// Shortest tick the driver runs at; shorter requests are rounded up.
const MIN_TICK: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    pub tick: Duration,
    pub max_ticks: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub ticks: u64,
    pub rescans: u64,
    /// Member names top to bottom, as last rendered.
    pub order: Vec<String>,
}

type Plugin<S> = ClanMemberListSort<S, ManualClock>;

/// Ticks after the last scripted event until one more rescan has landed.
fn settle_ticks(tick: Duration) -> u64 {
    let tick_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX).max(1);
    RESCAN_INTERVAL_MS.unsigned_abs().div_ceil(tick_ms) + 1
}

/// Drive the plugin through a scenario the way the game client would: one
/// game tick per interval, scripted events first, and the deferred rescan at
/// the next scheduling opportunity after the tick.
pub async fn run<S: ConfigStore>(
    scenario: &Scenario,
    store: S,
    options: ReplayOptions,
) -> ReplayReport {
    let mut client = MemoryClient::with_rows(&scenario.members);
    client.set_clan_settings_loaded(scenario.clan_settings_loaded);

    let mut plugin = ClanMemberListSort::new(store, ManualClock::new(START_MS));
    plugin.start_up(&mut client);

    let tick = options.tick.max(MIN_TICK);
    let total = options
        .max_ticks
        .unwrap_or_else(|| scenario.last_event_tick() + settle_ticks(tick));
    let tick_ms = i64::try_from(tick.as_millis()).unwrap_or(i64::MAX);
    info!(
        members = scenario.members.len(),
        events = scenario.events.len(),
        ticks = total,
        tick_ms,
        "replaying scenario"
    );

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rescans = 0;

    for tick in 1..=total {
        ticker.tick().await;

        for action in scenario.events_at(tick) {
            apply(&mut plugin, &mut client, action);
        }

        let decision = plugin.on_game_tick(&client);
        if decision == TickDecision::Scheduled {
            tokio::task::yield_now().await;
            if let Some(outcome) = plugin.run_deferred(&mut client) {
                rescans += 1;
                debug!(tick, placed = outcome.placed, failed = outcome.failed_writes, "rescan");
            }
        }

        plugin.clock().advance(tick_ms);
    }

    let report = ReplayReport {
        ticks: total,
        rescans,
        order: client.rendered_order(),
    };
    plugin.shut_down(&mut client);
    report
}

fn apply<S: ConfigStore>(plugin: &mut Plugin<S>, client: &mut MemoryClient, action: &Action) {
    match action {
        Action::Chat(message) => plugin.on_chat_message(message),
        Action::Select { op } => match plugin.on_sort_button_op(client, *op) {
            Some(criterion) => info!(?criterion, "sort criterion selected"),
            None => warn!(op, "menu action does not map to a criterion"),
        },
        Action::Click => {
            plugin.on_sort_button_click(client);
            info!(reverse = plugin.settings().reverse, "sort direction toggled");
        }
        Action::Join { member } => {
            let mut rows = client.rows().to_vec();
            rows.push(member.clone());
            client.set_rows(rows);
            debug!(name = %member.name, "member joined");
        }
        Action::Leave { name } => {
            let mut rows = client.rows().to_vec();
            let leaving = remove_tags(name);
            rows.retain(|row| remove_tags(&row.name) != leaving);
            client.set_rows(rows);
            debug!(%name, "member left");
        }
        Action::Promote { name, rank } => {
            if client.promote(name, *rank) {
                debug!(%name, %rank, "member rank changed");
            } else {
                warn!(%name, "promoted member is not in the roster");
            }
        }
    }
}
