//! [`Repeat`] and related items.

/// Replays a finite input, either forever or a fixed number of times.
///
/// Buffering: the whole input is drained into memory on the first pull and
/// replayed from there, so the input is consumed exactly once. An empty
/// input yields nothing, however many repetitions are asked for.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Repeat<I: Iterator> {
    input: Option<I>,
    buffer: Vec<I::Item>,
    pos: usize,
    /// Passes left, including the current one. `None` repeats forever.
    passes: Option<usize>,
}

impl<I: Iterator> Repeat<I> {
    pub fn forever(input: I) -> Self {
        Repeat {
            input: Some(input),
            buffer: Vec::new(),
            pos: 0,
            passes: None,
        }
    }

    pub fn times(input: I, n: usize) -> Self {
        Repeat {
            input: Some(input),
            buffer: Vec::new(),
            pos: 0,
            passes: Some(n),
        }
    }
}

impl<I: Iterator> Iterator for Repeat<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.passes == Some(0) {
            return None;
        }
        if let Some(input) = self.input.take() {
            self.buffer = input.collect();
            log::trace!("buffered {} elements for replay", self.buffer.len());
        }
        if self.buffer.is_empty() {
            return None;
        }
        if self.pos == self.buffer.len() {
            self.pos = 0;
            if let Some(passes) = &mut self.passes {
                *passes -= 1;
                if *passes == 0 {
                    return None;
                }
            }
        }
        let item = self.buffer[self.pos].clone();
        self.pos += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::counting::counted;

    #[test]
    fn replays_without_re_reading() {
        let (source, pulls) = counted([1, 2, 3]);
        let out: Vec<_> = Repeat::times(source, 3).collect();
        assert_eq!(out, vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);
        assert_eq!(pulls.get(), 3);
    }

    #[test]
    fn forever_cycles() {
        let out: Vec<_> = Repeat::forever("ab".chars()).take(5).collect();
        assert_eq!(out, vec!['a', 'b', 'a', 'b', 'a']);
    }

    #[test]
    fn degenerate_cases() {
        assert_eq!(Repeat::forever(0..0).next(), None);
        let (source, pulls) = counted(0..3);
        assert_eq!(Repeat::times(source, 0).next(), None);
        assert_eq!(pulls.get(), 0);
    }
}
