//! [`Filter`] and related items.

/// Yields the elements that satisfy `pred`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Filter<I, P> {
    input: I,
    pred: P,
}

impl<I, P> Filter<I, P> {
    pub fn new(input: I, pred: P) -> Self {
        Filter { input, pred }
    }
}

impl<I: Iterator, P: FnMut(&I::Item) -> bool> Iterator for Filter<I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            let item = self.input.next()?;
            if (self.pred)(&item) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.input.size_hint().1)
    }
}
