// Ordering of the room inventory table.
use std::cmp::Ordering;

use crate::metrics::extract_numeric_size;
use crate::schema::RoomCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Next sort state after the user picks `key`.
    ///
    /// Picking the key that is currently ascending flips it to descending;
    /// anything else starts ascending on `key`.
    pub fn toggle(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        let direction = match current {
            Some(c) if c.key == key && c.direction == SortDirection::Asc => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        SortConfig { key, direction }
    }
}

fn compare(a: &RoomCategory, b: &RoomCategory, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Size => {
            let a = extract_numeric_size(a.size_sqft.as_deref());
            let b = extract_numeric_size(b.size_sqft.as_deref());
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    }
}

/// Sorted view over `items`. The input is left as it was and equal entries
/// keep their relative order in either direction.
pub fn sort_by(items: &[RoomCategory], key: SortKey, direction: SortDirection) -> Vec<&RoomCategory> {
    let mut sorted: Vec<&RoomCategory> = items.iter().collect();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Apply an optional sort; with none active the source order is kept.
pub fn project(items: &[RoomCategory], config: Option<SortConfig>) -> Vec<&RoomCategory> {
    match config {
        Some(c) => sort_by(items, c.key, c.direction),
        None => items.iter().collect(),
    }
}
