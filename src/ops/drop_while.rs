//! [`DropWhile`] and related items.

/// Discards elements while `pred` holds, then yields everything after.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct DropWhile<I, P> {
    input: I,
    pred: P,
    dropping: bool,
}

impl<I, P> DropWhile<I, P> {
    pub fn new(input: I, pred: P) -> Self {
        DropWhile {
            input,
            pred,
            dropping: true,
        }
    }
}

impl<I: Iterator, P: FnMut(&I::Item) -> bool> Iterator for DropWhile<I, P> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if !self.dropping {
            return self.input.next();
        }
        loop {
            let item = self.input.next()?;
            if !(self.pred)(&item) {
                self.dropping = false;
                return Some(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::counting::counted;

    #[test]
    fn predicate_is_not_consulted_after_the_flip() {
        let mut calls = 0;
        let out: Vec<_> = DropWhile::new([1, 2, 7, 1, 2].into_iter(), |x: &i32| {
            calls += 1;
            *x < 5
        })
        .collect();
        assert_eq!(out, vec![7, 1, 2]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn pulls_only_what_it_yields() {
        let (source, pulls) = counted(0..100);
        let mut rest = DropWhile::new(source, |x: &i32| *x < 3);
        assert_eq!(rest.next(), Some(3));
        assert_eq!(pulls.get(), 4);
    }
}
