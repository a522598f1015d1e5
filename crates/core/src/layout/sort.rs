//! Reading-order sorting within a group.
//!
//! Manga reads right-to-left in top-to-bottom columns, and top-to-bottom for
//! horizontal captions. Positions closer than a tolerance compare as equal on
//! the primary key and fall through to the secondary key.

use std::cmp::Ordering;

use crate::geometry::{BBox, Orientation};

/// Comparison rule for one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortRule {
    /// Auto-merge rule: strict position keys with a small tie tolerance.
    Strict { tolerance: f64 },
    /// Manual-merge rule: vertical lines whose centers are within
    /// `column_tolerance` times their average width share a column.
    Column {
        column_tolerance: f64,
        tolerance: f64,
    },
}

fn by_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Compares two member boxes of a group with the given orientation.
pub fn compare_reading_order(
    a: &BBox,
    b: &BBox,
    orientation: Orientation,
    rule: SortRule,
) -> Ordering {
    match (orientation, rule) {
        (Orientation::Vertical, SortRule::Strict { tolerance }) => {
            if (b.x0 - a.x0).abs() > tolerance {
                by_f64(b.x0, a.x0)
            } else {
                by_f64(a.top, b.top)
            }
        }
        (Orientation::Vertical, SortRule::Column { column_tolerance, .. }) => {
            let avg_width = (a.width() + b.width()) / 2.0;
            if (a.center_x() - b.center_x()).abs() < avg_width * column_tolerance {
                by_f64(a.top, b.top)
            } else {
                by_f64(b.x0, a.x0)
            }
        }
        (Orientation::Horizontal, SortRule::Strict { tolerance })
        | (Orientation::Horizontal, SortRule::Column { tolerance, .. }) => {
            if (a.top - b.top).abs() > tolerance {
                by_f64(a.top, b.top)
            } else {
                by_f64(a.x0, b.x0)
            }
        }
    }
}

/// Stable insertion sort.
///
/// Tolerance comparisons are not transitive; the std sorts may panic on a
/// comparator that is not a total order, this one cannot.
fn insertion_sort_by<T, F>(items: &mut [T], mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Union of the boxes of `items`, or None for an empty slice.
pub fn group_bbox<T>(items: &[T], bbox: impl Fn(&T) -> BBox) -> Option<BBox> {
    let mut iter = items.iter().map(&bbox);
    let first = iter.next()?;
    Some(iter.fold(first, |acc, b| acc.union(&b)))
}

/// Sorts `items` into reading order and returns the group orientation.
///
/// The orientation comes from the aspect of the union of all boxes. Groups
/// with fewer than two members are left as they are.
pub fn sort_reading_order<T>(
    items: &mut [T],
    bbox: impl Fn(&T) -> BBox,
    rule: SortRule,
) -> Option<Orientation> {
    let orientation = group_bbox(items, &bbox)?.orientation();
    if items.len() >= 2 {
        insertion_sort_by(items, |a, b| {
            compare_reading_order(&bbox(a), &bbox(b), orientation, rule)
        });
    }
    Some(orientation)
}
