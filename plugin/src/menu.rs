use clansort_shared::{SortCriterion, WidgetId};
use tracing::trace;

use crate::host::Client;

/// Op index the client reports for the first (left-click) menu action.
pub const PRIMARY_ACTION_INDEX: i32 = 1;

const CRITERIA: usize = SortCriterion::ALL.len();

/// Assignment of sort criteria to the sort button's menu actions.
///
/// The active criterion always sits in the primary slot; the others follow in
/// declaration order. Op indices are tracked per criterion here rather than on
/// the criterion itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRotation {
    slots: [SortCriterion; CRITERIA],
    action_index: [Option<i32>; CRITERIA],
}

impl Default for MenuRotation {
    fn default() -> Self {
        Self {
            slots: SortCriterion::ALL,
            action_index: [None; CRITERIA],
        }
    }
}

impl MenuRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotate(&mut self, active: SortCriterion) {
        self.slots[0] = active;
        self.action_index[active.ordinal()] = Some(PRIMARY_ACTION_INDEX);

        let rest = SortCriterion::ALL
            .into_iter()
            .filter(|criterion| *criterion != active);
        for (slot, criterion) in rest.enumerate().map(|(idx, c)| (idx + 1, c)) {
            self.slots[slot] = criterion;
            self.action_index[criterion.ordinal()] =
                Some(PRIMARY_ACTION_INDEX + i32::try_from(slot).unwrap_or(i32::MAX));
        }
    }

    pub fn slots(&self) -> &[SortCriterion; CRITERIA] {
        &self.slots
    }

    pub fn primary(&self) -> SortCriterion {
        self.slots[0]
    }

    /// Op index currently bound to a criterion, `None` before the first rotation.
    pub fn action_index(&self, criterion: SortCriterion) -> Option<i32> {
        self.action_index[criterion.ordinal()]
    }

    /// Map a reported op index back to its criterion.
    pub fn resolve(&self, op: i32) -> Option<SortCriterion> {
        SortCriterion::ALL
            .into_iter()
            .find(|criterion| self.action_index(*criterion) == Some(op))
    }

    /// Write one action label per slot onto the button.
    pub fn apply_labels<C: Client + ?Sized>(&self, client: &mut C, button: WidgetId) {
        for (slot, criterion) in self.slots.iter().enumerate() {
            if let Err(e) = client.set_action(button, slot, criterion.label()) {
                trace!(slot, error = %e, "failed to label sort action");
            }
        }
    }
}
