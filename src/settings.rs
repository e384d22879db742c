use std::cmp::Ordering;

/// Direction of [`LinkedQueue::sort`](crate::LinkedQueue::sort).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Whether `right` must be placed before `left` when merging.
    /// Equal values never are, which keeps the sort stable in both directions.
    pub(crate) fn takes_right(self, left: &str, right: &str) -> bool {
        match self {
            SortOrder::Ascending => right.cmp(left) == Ordering::Less,
            SortOrder::Descending => right.cmp(left) == Ordering::Greater,
        }
    }
}

// `true` means descending, matching the driver's flag
impl From<bool> for SortOrder {
    fn from(descending: bool) -> Self {
        if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}
