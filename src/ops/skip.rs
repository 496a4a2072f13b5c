//! [`Skip`] and related items.

/// Drops the first `n` elements. The dropped elements are pulled on the
/// first request, not at construction.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Skip<I> {
    input: I,
    pending: usize,
}

impl<I> Skip<I> {
    pub fn new(input: I, n: usize) -> Self {
        Skip { input, pending: n }
    }
}

impl<I: Iterator> Iterator for Skip<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        while self.pending > 0 {
            self.pending -= 1;
            self.input.next()?;
        }
        self.input.next()
    }
}
