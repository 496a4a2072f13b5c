//! [`FlatMap`] and related items.

/// Maps each element to an iterable and yields its contents in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FlatMap<I, F, U: IntoIterator> {
    input: I,
    func: F,
    front: Option<U::IntoIter>,
}

impl<I, F, U: IntoIterator> FlatMap<I, F, U> {
    pub fn new(input: I, func: F) -> Self {
        FlatMap {
            input,
            func,
            front: None,
        }
    }
}

impl<I, F, U> Iterator for FlatMap<I, F, U>
where
    I: Iterator,
    F: FnMut(I::Item) -> U,
    U: IntoIterator,
{
    type Item = U::Item;

    fn next(&mut self) -> Option<U::Item> {
        loop {
            if let Some(front) = &mut self.front {
                if let Some(item) = front.next() {
                    return Some(item);
                }
                self.front = None;
            }
            self.front = Some((self.func)(self.input.next()?).into_iter());
        }
    }
}
