use clansort_shared::{Component, WidgetId, WidgetType, remove_tags};

use crate::entry::Entry;
use crate::host::{Client, WidgetInfo};

/// Widgets of one row window, as queried from the client.
pub type ChildSnapshot = (WidgetId, Option<WidgetInfo>);

/// Classify the current member list.
///
/// Returns `None` when the container is not loaded, in which case the caller
/// keeps whatever positions were written last.
pub fn classify_member_list<C: Client + ?Sized>(client: &C) -> Option<Vec<Entry>> {
    let children = client.widget_children(Component::MemberList)?;
    let snapshot: Vec<ChildSnapshot> = children
        .into_iter()
        .map(|id| (id, client.widget(id)))
        .collect();
    Some(classify(&snapshot))
}

/// Classify a snapshot of container children, preserving their order.
///
/// Every member is four consecutive widgets: a row background (a rectangle for
/// other members, a graphic for the local player), the name text, the world
/// text and the rank icon graphic. The right-click ops live on a separate
/// widget further along, matched back to its row by name.
pub fn classify(children: &[ChildSnapshot]) -> Vec<Entry> {
    children
        .windows(4)
        .filter_map(|window| row_from_window(window, children))
        .collect()
}

fn row_from_window(window: &[ChildSnapshot], children: &[ChildSnapshot]) -> Option<Entry> {
    let [start, name, world, icon] = window else {
        return None;
    };
    let (Some(start_info), Some(name_info), Some(world_info), Some(icon_info)) =
        (&start.1, &name.1, &world.1, &icon.1)
    else {
        return None;
    };

    let is_row = matches!(
        start_info.widget_type,
        WidgetType::Rectangle | WidgetType::Graphic
    ) && name_info.widget_type == WidgetType::Text
        && world_info.widget_type == WidgetType::Text
        && icon_info.widget_type == WidgetType::Graphic;
    if !is_row {
        return None;
    }

    Some(Entry {
        op_listener: find_op_listener(children, &name_info.text),
        name: name.0,
        world: world.0,
        icon: icon.0,
        name_text: name_info.text.clone(),
        world_text: world_info.text.clone(),
        rank: None,
    })
}

fn find_op_listener(children: &[ChildSnapshot], name_text: &str) -> Option<WidgetId> {
    let wanted = remove_tags(name_text);
    children.iter().find_map(|(id, info)| {
        let info = info.as_ref()?;
        (info.has_op_listener && remove_tags(&info.name) == wanted).then_some(*id)
    })
}
