//! [`FilterMap`] and related items.

/// Maps each element through `func`, dropping the `None`s.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FilterMap<I, F> {
    input: I,
    func: F,
}

impl<I, F> FilterMap<I, F> {
    pub fn new(input: I, func: F) -> Self {
        FilterMap { input, func }
    }
}

impl<I: Iterator, F: FnMut(I::Item) -> Option<B>, B> Iterator for FilterMap<I, F> {
    type Item = B;

    fn next(&mut self) -> Option<B> {
        loop {
            if let Some(out) = (self.func)(self.input.next()?) {
                return Some(out);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.input.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_can() {
        let words = ["1", "two", "3"];
        let nums: Vec<i32> = FilterMap::new(words.into_iter(), |w: &str| w.parse().ok()).collect();
        assert_eq!(nums, vec![1, 3]);
    }
}
