//! [`Take`] and related items.

/// Yields at most `n` elements, never pulling past the `n`th.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Take<I> {
    input: I,
    remaining: usize,
}

impl<I> Take<I> {
    pub fn new(input: I, n: usize) -> Self {
        Take {
            input,
            remaining: n,
        }
    }
}

impl<I: Iterator> Iterator for Take<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.input.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.input.size_hint();
        let hi = hi.map_or(self.remaining, |hi| hi.min(self.remaining));
        (lo.min(self.remaining), Some(hi))
    }
}
