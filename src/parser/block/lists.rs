//! List-marker recognition and list tightness resolution.

use crate::scan;
use crate::tree::{BlockKind, ListData, ListKind, NodeId, Tree};

/// Recognize a list marker at `offset`.
///
/// `marker_offset` is the indentation the caller measured before the
/// marker; it is stored in the returned data so the item's continuation
/// rule can reproduce the column geometry.
///
/// A line that forms a horizontal rule is never a list marker — `- - -`
/// is a rule, not a bullet.
pub(super) fn parse_list_marker(
    line: &str,
    offset: usize,
    marker_offset: usize,
) -> Option<ListData> {
    let rest = &line[offset..];
    if scan::HRULE.is_match(rest) {
        return None;
    }

    let (matched_len, spaces_after_marker, kind) =
        if let Some(caps) = scan::BULLET_MARKER.captures(rest) {
            let matched = caps.get(0)?.as_str();
            let marker = caps.get(1)?.as_str().chars().next()?;
            let spaces = caps.get(2).map_or(0, |m| m.as_str().len());
            (matched.len(), spaces, ListKind::Bullet { marker })
        } else if let Some(caps) = scan::ORDERED_MARKER.captures(rest) {
            let matched = caps.get(0)?.as_str();
            let start = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let delimiter = caps.get(2)?.as_str().chars().next()?;
            let spaces = caps.get(3).map_or(0, |m| m.as_str().len());
            (matched.len(), spaces, ListKind::Ordered { start, delimiter })
        } else {
            return None;
        };

    // A marker at end of line, one with no following space, or one with
    // five or more is treated as marker plus a single space.
    let blank_item = matched_len == rest.len();
    let padding = if spaces_after_marker >= 5 || spaces_after_marker < 1 || blank_item {
        matched_len - spaces_after_marker + 1
    } else {
        matched_len
    };

    Some(ListData {
        kind,
        marker_offset,
        padding,
    })
}

/// Whether a block ends with a blank line, looking through the last
/// child chain of lists and list items.
fn ends_with_blank_line(tree: &Tree, id: NodeId) -> bool {
    let block = tree.block(id);
    if block.last_line_blank {
        return true;
    }
    match block.kind {
        BlockKind::List { .. } | BlockKind::ListItem { .. } => block
            .children
            .last()
            .is_some_and(|&child| ends_with_blank_line(tree, child)),
        _ => false,
    }
}

/// Compute the final tightness of a list.
///
/// The list is loose when any item other than the last ends with a blank
/// line, or when blank lines separate the blocks inside any item (the
/// very last block of the very last item excepted).
pub(super) fn resolve_tight(tree: &Tree, list: NodeId) -> bool {
    let items = &tree.block(list).children;
    for (i, &item) in items.iter().enumerate() {
        let last_item = i == items.len() - 1;
        if ends_with_blank_line(tree, item) && !last_item {
            return false;
        }
        let blocks = &tree.block(item).children;
        for (j, &inner) in blocks.iter().enumerate() {
            let last_inner = j == blocks.len() - 1;
            if ends_with_blank_line(tree, inner) && !(last_item && last_inner) {
                return false;
            }
        }
    }
    true
}
