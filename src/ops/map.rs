//! [`Map`] and related items.

/// Applies `func` to each element as it is pulled.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Map<I, F> {
    input: I,
    func: F,
}

impl<I, F> Map<I, F> {
    pub fn new(input: I, func: F) -> Self {
        Map { input, func }
    }
}

impl<I: Iterator, F: FnMut(I::Item) -> B, B> Iterator for Map<I, F> {
    type Item = B;

    fn next(&mut self) -> Option<B> {
        self.input.next().map(&mut self.func)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.input.size_hint()
    }
}
