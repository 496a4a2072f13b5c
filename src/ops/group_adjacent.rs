//! [`GroupAdjacent`] and related items.

/// Groups runs of consecutive elements with equal discriminators.
///
/// Only the current run is buffered. A run is emitted as soon as the first
/// element of the next run is seen, and that element is carried over.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct GroupAdjacent<I: Iterator, F, G> {
    input: I,
    disc: F,
    carry: Option<(G, I::Item)>,
}

impl<I: Iterator, F, G> GroupAdjacent<I, F, G> {
    pub fn new(input: I, disc: F) -> Self {
        GroupAdjacent {
            input,
            disc,
            carry: None,
        }
    }
}

impl<I, F, G> Iterator for GroupAdjacent<I, F, G>
where
    I: Iterator,
    F: FnMut(&I::Item) -> G,
    G: PartialEq,
{
    type Item = (G, Vec<I::Item>);

    fn next(&mut self) -> Option<(G, Vec<I::Item>)> {
        let (key, first) = match self.carry.take() {
            Some(carried) => carried,
            None => {
                let item = self.input.next()?;
                ((self.disc)(&item), item)
            }
        };
        let mut run = vec![first];
        for item in self.input.by_ref() {
            let next_key = (self.disc)(&item);
            if next_key != key {
                self.carry = Some((next_key, item));
                break;
            }
            run.push(item);
        }
        Some((key, run))
    }
}
