//! [`Chunks`] and related items.

/// Groups elements into vectors of `size`. The last chunk may be shorter.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Chunks<I> {
    input: I,
    size: usize,
}

impl<I> Chunks<I> {
    /// A `size` of zero is treated as one.
    pub fn new(input: I, size: usize) -> Self {
        Chunks {
            input,
            size: size.max(1),
        }
    }
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Vec<I::Item>> {
        let first = self.input.next()?;
        // `size` may be far larger than what the input holds.
        let mut chunk = Vec::with_capacity(self.size.min(64));
        chunk.push(first);
        chunk.extend(self.input.by_ref().take(self.size - 1));
        Some(chunk)
    }
}
