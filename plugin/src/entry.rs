use clansort_shared::{ClanRank, ROW_HEIGHT, WidgetId};
use tracing::trace;

use crate::host::Client;

/// One member row of the clan list, rebuilt on every rescan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Widget carrying the right-click ops for this member. Absent for the local player.
    pub op_listener: Option<WidgetId>,
    pub name: WidgetId,
    pub world: WidgetId,
    pub icon: WidgetId,
    /// Name label text as rendered, tags included.
    pub name_text: String,
    pub world_text: String,
    /// `None` until the roster has been consulted for this rescan.
    pub rank: Option<ClanRank>,
}

impl Entry {
    pub fn widgets(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.op_listener
            .into_iter()
            .chain([self.name, self.world, self.icon])
    }

    /// Move every widget of the row to the given list position.
    ///
    /// Returns how many widget writes the client rejected.
    pub fn place_at<C: Client + ?Sized>(&self, client: &mut C, index: usize) -> usize {
        let y = row_offset(index);
        let mut failures = 0;
        for id in self.widgets() {
            let result = client
                .set_original_y(id, y)
                .and_then(|()| client.revalidate(id));
            if let Err(e) = result {
                trace!(widget = %id, error = %e, "skipping row widget");
                failures += 1;
            }
        }
        failures
    }
}

pub fn row_offset(index: usize) -> i32 {
    i32::try_from(index)
        .unwrap_or(i32::MAX)
        .saturating_mul(ROW_HEIGHT)
}
