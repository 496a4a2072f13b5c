//! [`Intersperse`] and related items.

/// Places a clone of `sep` between consecutive elements.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Intersperse<I: Iterator> {
    input: I,
    sep: I::Item,
    next_item: Option<I::Item>,
    started: bool,
}

impl<I: Iterator> Intersperse<I> {
    pub fn new(input: I, sep: I::Item) -> Self {
        Intersperse {
            input,
            sep,
            next_item: None,
            started: false,
        }
    }
}

impl<I: Iterator> Iterator for Intersperse<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(item) = self.next_item.take() {
            return Some(item);
        }
        if !self.started {
            self.started = true;
            return self.input.next();
        }
        // A separator is only due if another element follows.
        self.next_item = Some(self.input.next()?);
        Some(self.sep.clone())
    }
}
