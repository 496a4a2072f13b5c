//! [`TakeWhile`] and related items.

/// Yields elements while `pred` holds. The first failing element is
/// discarded and the input is never pulled again.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TakeWhile<I, P> {
    input: I,
    pred: P,
    done: bool,
}

impl<I, P> TakeWhile<I, P> {
    pub fn new(input: I, pred: P) -> Self {
        TakeWhile {
            input,
            pred,
            done: false,
        }
    }
}

impl<I: Iterator, P: FnMut(&I::Item) -> bool> Iterator for TakeWhile<I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }
        let item = self.input.next()?;
        if (self.pred)(&item) {
            Some(item)
        } else {
            self.done = true;
            None
        }
    }
}
