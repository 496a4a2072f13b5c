//! [`Reversed`] and related items.
use std::vec;

/// Yields the input back to front.
///
/// Buffering: the whole input is drained on the first pull.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Reversed<I: Iterator> {
    input: Option<I>,
    output: vec::IntoIter<I::Item>,
}

impl<I: Iterator> Reversed<I> {
    pub fn new(input: I) -> Self {
        Reversed {
            input: Some(input),
            output: Vec::new().into_iter(),
        }
    }
}

impl<I: Iterator> Iterator for Reversed<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if let Some(input) = self.input.take() {
            let mut buffer: Vec<_> = input.collect();
            buffer.reverse();
            self.output = buffer.into_iter();
        }
        self.output.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_to_front() {
        let out: Vec<_> = Reversed::new(0..4).collect();
        assert_eq!(out, vec![3, 2, 1, 0]);
        assert_eq!(Reversed::new(0..0).next(), None);
    }
}
