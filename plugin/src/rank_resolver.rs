use clansort_shared::remove_tags;
use tracing::trace;

use crate::entry::Entry;
use crate::host::Client;

/// Refresh the roster rank of every entry.
///
/// Needs both the clan channel and the clan settings; when either is missing
/// nothing changes. Entries the roster does not know keep their previous rank.
/// Returns how many entries received a rank.
pub fn resolve_ranks<C: Client + ?Sized>(client: &C, entries: &mut [Entry]) -> usize {
    let Some(channel) = client.clan_channel() else {
        return 0;
    };
    if !client.clan_settings_loaded() {
        return 0;
    }

    let mut resolved = 0;
    for entry in entries.iter_mut() {
        // Overlay plugins decorate the label with icons that are not part of the name.
        let name = remove_tags(&entry.name_text);
        match channel.find_member(&name) {
            Ok(Some(member)) => {
                entry.rank = Some(member.rank);
                resolved += 1;
            }
            Ok(None) => {}
            Err(e) => trace!(name = %name, error = %e, "rank lookup failed"),
        }
    }
    resolved
}
