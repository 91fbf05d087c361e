use std::cmp::Ordering;

use clansort_shared::{ClanRank, SortCriterion, SortSettings};
use tracing::debug;

use crate::entry::Entry;
use crate::host::Client;
use crate::rank_resolver::resolve_ranks;
use crate::recency::RecencyCache;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Text(String),
    // `None` (unresolved) orders below every real rank.
    Rank(Option<ClanRank>),
    LastSeen(i64),
}

fn sort_key(entry: &Entry, criterion: SortCriterion, recency: &RecencyCache) -> SortKey {
    match criterion {
        SortCriterion::ByName => SortKey::Text(entry.name_text.clone()),
        SortCriterion::ByWorld => SortKey::Text(entry.world_text.clone()),
        SortCriterion::ByRank => SortKey::Rank(entry.rank),
        SortCriterion::ByRecentChat => SortKey::LastSeen(recency.lookup(&entry.name_text)),
    }
}

/// Whether the pass puts the largest key first. `reverse` flips the
/// criterion's own direction rather than replacing it.
pub fn is_descending(criterion: SortCriterion, reverse: bool) -> bool {
    criterion.descending_by_default() != reverse
}

/// Stable in-place ordering; entries with equal keys keep their input order.
pub fn order_entries(
    entries: &mut Vec<Entry>,
    criterion: SortCriterion,
    reverse: bool,
    recency: &RecencyCache,
) {
    let descending = is_descending(criterion, reverse);
    let mut keyed: Vec<(SortKey, Entry)> = std::mem::take(entries)
        .into_iter()
        .map(|entry| (sort_key(&entry, criterion, recency), entry))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord: Ordering = a.cmp(b);
        if descending { ord.reverse() } else { ord }
    });

    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOutcome {
    pub placed: usize,
    pub failed_writes: usize,
}

/// Order the entries by the active criterion and write the resulting row positions.
pub fn sort_and_place<C: Client + ?Sized>(
    client: &mut C,
    entries: &mut Vec<Entry>,
    settings: SortSettings,
    recency: &RecencyCache,
) -> SortOutcome {
    if entries.is_empty() {
        return SortOutcome::default();
    }

    if settings.active_criterion == SortCriterion::ByRank {
        let resolved = resolve_ranks(&*client, entries);
        debug!(resolved, total = entries.len(), "resolved clan ranks");
    }

    order_entries(
        entries,
        settings.active_criterion,
        settings.reverse,
        recency,
    );

    let failed_writes = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| entry.place_at(client, idx))
        .sum();

    debug!(
        criterion = ?settings.active_criterion,
        reverse = settings.reverse,
        placed = entries.len(),
        failed_writes,
        "sorted member list"
    );

    SortOutcome {
        placed: entries.len(),
        failed_writes,
    }
}
