//! [`Sorted`] and related items.
use std::{cmp::Ordering, vec};

/// Yields the input in the order given by `cmp`. The sort is stable.
///
/// Buffering: the whole input is drained and sorted on the first pull.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Sorted<I: Iterator, F> {
    input: Option<I>,
    cmp: F,
    output: vec::IntoIter<I::Item>,
}

impl<I: Iterator, F> Sorted<I, F>
where
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    pub fn new(input: I, cmp: F) -> Self {
        Sorted {
            input: Some(input),
            cmp,
            output: Vec::new().into_iter(),
        }
    }
}

impl<I: Iterator, F> Iterator for Sorted<I, F>
where
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(input) = self.input.take() {
            let mut buffer: Vec<_> = input.collect();
            buffer.sort_by(&mut self.cmp);
            self.output = buffer.into_iter();
        }
        self.output.next()
    }
}
