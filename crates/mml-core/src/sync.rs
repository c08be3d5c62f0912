use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefLoc<L> {
    pub reference: String,
    pub location: L,
}

impl<L> RefLoc<L> {
    pub fn new(reference: impl Into<String>, location: L) -> Self {
        Self {
            reference: reference.into(),
            location,
        }
    }
}

/// Index of the entry with the greatest location not above `query`.
///
/// Returns `None` when `query` precedes the first entry (or the list is
/// empty). A query at or past the last location yields the last index.
pub fn find_highest_index<L: PartialOrd>(list: &[RefLoc<L>], query: &L) -> Option<usize> {
    let after = list.partition_point(|entry| entry.location <= *query);
    after.checked_sub(1)
}

/// Index of the first entry carrying `reference`.
pub fn find_ref_index<L>(list: &[RefLoc<L>], reference: &str) -> Option<usize> {
    list.iter().position(|entry| entry.reference == reference)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PagePosition {
    pub index: usize,
    pub reference: String,
    /// How far `query` lies between this entry and the next one, in `0..=1`.
    pub fraction: f64,
}

/// The entry enclosing `query` and how far into it `query` lies. The last
/// entry extends to `total`. A query before the first entry reports the
/// first entry at fraction zero.
pub fn page_position(list: &[RefLoc<f64>], total: f64, query: f64) -> Option<PagePosition> {
    let first = list.first()?;
    let Some(index) = find_highest_index(list, &query) else {
        return Some(PagePosition {
            index: 0,
            reference: first.reference.clone(),
            fraction: 0.0,
        });
    };
    let entry = &list[index];
    let end = list
        .get(index + 1)
        .map(|next| next.location)
        .unwrap_or(total);
    let height = end - entry.location;
    let fraction = if height > 0.0 {
        ((query - entry.location) / height).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(PagePosition {
        index,
        reference: entry.reference.clone(),
        fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::{RefLoc, find_highest_index, find_ref_index, page_position};

    fn pages() -> Vec<RefLoc<i64>> {
        vec![RefLoc::new("A", 0), RefLoc::new("B", 10), RefLoc::new("C", 20)]
    }

    #[test]
    fn finds_greatest_location_not_above_query() {
        let list = pages();
        assert_eq!(find_highest_index(&list, &5), Some(0));
        assert_eq!(find_highest_index(&list, &15), Some(1));
        assert_eq!(find_highest_index(&list, &25), Some(2));
        assert_eq!(find_highest_index(&list, &-1), None);
    }

    #[test]
    fn exact_locations_select_their_entry() {
        let list = pages();
        assert_eq!(find_highest_index(&list, &0), Some(0));
        assert_eq!(find_highest_index(&list, &10), Some(1));
        assert_eq!(find_highest_index(&list, &20), Some(2));
    }

    #[test]
    fn empty_list_has_no_index() {
        let list: Vec<RefLoc<i64>> = Vec::new();
        assert_eq!(find_highest_index(&list, &3), None);
    }

    #[test]
    fn references_are_found_by_name() {
        let list = pages();
        assert_eq!(find_ref_index(&list, "B"), Some(1));
        assert_eq!(find_ref_index(&list, "Z"), None);
    }

    #[test]
    fn page_position_reports_fraction() {
        let list = vec![RefLoc::new("1", 0.0), RefLoc::new("2", 100.0)];

        let mid = page_position(&list, 300.0, 50.0).expect("position");
        assert_eq!(mid.reference, "1");
        assert!((mid.fraction - 0.5).abs() < f64::EPSILON);

        let last = page_position(&list, 300.0, 200.0).expect("position");
        assert_eq!(last.index, 1);
        assert!((last.fraction - 0.5).abs() < f64::EPSILON);

        let before = page_position(&list, 300.0, -5.0).expect("position");
        assert_eq!((before.index, before.fraction), (0, 0.0));

        assert!(page_position(&[], 10.0, 1.0).is_none());
    }
}
