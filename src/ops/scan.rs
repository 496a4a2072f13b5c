//! [`Scan`] and related items.

/// Running fold: yields each intermediate accumulator, not the initial one.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Scan<I, A, F> {
    input: I,
    acc: Option<A>,
    func: F,
}

impl<I, A, F> Scan<I, A, F> {
    pub fn new(input: I, init: A, func: F) -> Self {
        Scan {
            input,
            acc: Some(init),
            func,
        }
    }
}

impl<I, A, F> Iterator for Scan<I, A, F>
where
    I: Iterator,
    A: Clone,
    F: FnMut(A, I::Item) -> A,
{
    type Item = A;

    fn next(&mut self) -> Option<A> {
        let item = self.input.next()?;
        let acc = self.acc.take()?;
        let next = (self.func)(acc, item);
        self.acc = Some(next.clone());
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.input.size_hint()
    }
}
