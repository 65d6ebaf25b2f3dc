//! Position allocation for ordered sibling sets.
//!
//! Siblings are passed as `(id, position)` pairs already in board order.
//! Every placement renumbers the resulting sequence to `0..N-1` and reports
//! only the entries whose position actually changed.

/// One sibling's position before and after a placement. `from` is `None`
/// for an entity that was not part of the sequence (cross-parent move).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionChange<Id> {
    pub id: Id,
    pub from: Option<i64>,
    pub to: i64,
}

/// Outcome of splicing one entity into a sibling sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement<Id> {
    /// Final order, moved entity included
    pub order: Vec<Id>,
    /// Index the moved entity ended up at (after clamping)
    pub index: usize,
    /// Index it held before, if it was already a sibling
    pub previous_index: Option<usize>,
    pub changes: Vec<PositionChange<Id>>,
}

impl<Id> Placement<Id> {
    /// True when the moved entity stays where it was
    pub fn is_noop(&self) -> bool {
        self.previous_index == Some(self.index)
    }
}

/// Position for a new entity appended after `positions`
pub fn append_position(positions: impl IntoIterator<Item = i64>) -> i64 {
    positions.into_iter().max().map_or(0, |max| max + 1)
}

/// Remove `moved` from `siblings` (if present), splice it in at `index`
/// (clamped to the remaining length) and renumber.
pub fn insert_at<Id: Clone + PartialEq>(
    siblings: &[(Id, i64)],
    moved: &Id,
    index: usize,
) -> Placement<Id> {
    let previous_index = siblings.iter().position(|(id, _)| id == moved);
    let mut remaining: Vec<(Id, Option<i64>)> = siblings
        .iter()
        .filter(|(id, _)| id != moved)
        .map(|(id, pos)| (id.clone(), Some(*pos)))
        .collect();

    let from = previous_index.map(|i| siblings[i].1);
    let index = index.min(remaining.len());
    remaining.insert(index, (moved.clone(), from));

    let changes = renumbered(&remaining);
    Placement {
        order: remaining.into_iter().map(|(id, _)| id).collect(),
        index,
        previous_index,
        changes,
    }
}

/// Renumber an ordered sequence to `0..N-1`
pub fn normalize<Id: Clone>(siblings: &[(Id, i64)]) -> Vec<PositionChange<Id>> {
    let entries: Vec<(Id, Option<i64>)> = siblings
        .iter()
        .map(|(id, pos)| (id.clone(), Some(*pos)))
        .collect();
    renumbered(&entries)
}

fn renumbered<Id: Clone>(entries: &[(Id, Option<i64>)]) -> Vec<PositionChange<Id>> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, (id, from))| {
            let to = i as i64;
            (*from != Some(to)).then(|| PositionChange {
                id: id.clone(),
                from: *from,
                to,
            })
        })
        .collect()
}
