//! Two-pointer merge of name-sorted listings

use crate::types::Entry;
use std::cmp::Ordering;

/// Correspondence between two sorted sequences
#[derive(Debug, Clone, PartialEq)]
pub struct Merge<'a, T> {
    /// Pairs present on both sides, in sorted order
    pub common: Vec<(&'a T, &'a T)>,

    pub left_only: Vec<&'a T>,

    pub right_only: Vec<&'a T>,
}

/// Merge two sequences already sorted by `key`.
///
/// Linear in the combined length; neither side is re-read. Keys are assumed
/// unique within a side, as names in one directory are.
pub fn merge_sorted<'a, T, K, F>(left: &'a [T], right: &'a [T], key: F) -> Merge<'a, T>
where
    K: Ord + ?Sized,
    F: Fn(&T) -> &K,
{
    let mut merge = Merge {
        common: Vec::new(),
        left_only: Vec::new(),
        right_only: Vec::new(),
    };
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match key(&left[i]).cmp(key(&right[j])) {
            Ordering::Less => {
                merge.left_only.push(&left[i]);
                i += 1;
            }
            Ordering::Greater => {
                merge.right_only.push(&right[j]);
                j += 1;
            }
            Ordering::Equal => {
                merge.common.push((&left[i], &right[j]));
                i += 1;
                j += 1;
            }
        }
    }
    merge.left_only.extend(&left[i..]);
    merge.right_only.extend(&right[j..]);

    merge
}

/// Merge source and destination listings by entry name
pub fn merge_entries<'a>(source: &'a [Entry], destination: &'a [Entry]) -> Merge<'a, Entry> {
    merge_sorted(source, destination, |entry| entry.name.as_os_str())
}
