//! Implements a merge tree to merge an arbitrary number of sorted map outputs.
//! Genericized in order to build arbitrary merge trees.

use std::iter;

/// See module description.
/// This type uses dynamic instead of static dispatch because it realizes an arbitrary structure
/// and can therefore not work with a single type signature.
pub struct ShardMergeIterator<'a, T: Ord> {
    left: Box<dyn Iterator<Item = T> + 'a>,
    right: Box<dyn Iterator<Item = T> + 'a>,

    left_peeked: Option<T>,
    right_peeked: Option<T>,
}

impl<'a, T: Ord> Iterator for ShardMergeIterator<'a, T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        // fill up
        if self.left_peeked.is_none() {
            self.left_peeked = self.left.next();
        }
        if self.right_peeked.is_none() {
            self.right_peeked = self.right.next();
        }

        // Consume peeked values; ties go left so equal items keep their source order.
        let take_left = match (&self.left_peeked, &self.right_peeked) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(l), Some(r)) => l <= r,
        };
        if take_left {
            self.left_peeked.take()
        } else {
            self.right_peeked.take()
        }
    }
}

impl<'a, T: Ord + 'a> ShardMergeIterator<'a, T> {
    fn empty() -> ShardMergeIterator<'a, T> {
        ShardMergeIterator {
            left: Box::new(iter::empty()),
            right: Box::new(iter::empty()),
            left_peeked: None,
            right_peeked: None,
        }
    }

    fn pair<L, R>(left: L, right: R) -> ShardMergeIterator<'a, T>
    where
        L: Iterator<Item = T> + 'a,
        R: Iterator<Item = T> + 'a,
    {
        ShardMergeIterator {
            left: Box::new(left),
            right: Box::new(right),
            ..ShardMergeIterator::empty()
        }
    }

    /// Takes multiple sorted iterators of type It and generates one ShardMergeIterator
    /// yielding all their items in sorted order.
    pub fn build<It, ItIt>(sources: ItIt) -> ShardMergeIterator<'a, T>
    where
        It: Iterator<Item = T> + 'a,
        ItIt: IntoIterator<Item = It>,
    {
        let mut sources = sources.into_iter();
        let mut merged: Vec<ShardMergeIterator<'a, T>> = Vec::new();

        // Initial merging: Merge pairs of input iterators together.
        while let Some(src1) = sources.next() {
            match sources.next() {
                None => merged.push(ShardMergeIterator::pair(src1, iter::empty())),
                Some(src2) => merged.push(ShardMergeIterator::pair(src1, src2)),
            }
        }

        // Recursively build the merge tree from the leaves.
        ShardMergeIterator::merge(merged)
    }

    /// Merge multiple ShardMergeIterators, recursively (meaning it will result in a more or less
    /// balanced merge sort tree).
    fn merge(mut its: Vec<ShardMergeIterator<'a, T>>) -> ShardMergeIterator<'a, T> {
        match its.len() {
            0 => ShardMergeIterator::empty(),
            1 => its.remove(0),
            _ => {
                let split_at = its.len() / 2;
                let right = its.split_off(split_at);
                ShardMergeIterator::pair(ShardMergeIterator::merge(its), ShardMergeIterator::merge(right))
            }
        }
    }
}
