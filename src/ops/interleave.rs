//! [`Interleave`] and related items.

/// Alternates between two inputs, starting with the first. When one input
/// runs dry the rest of the other follows.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Interleave<A, B> {
    a: A,
    b: B,
    a_next: bool,
}

impl<A, B> Interleave<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Interleave { a, b, a_next: true }
    }
}

impl<A, B> Iterator for Interleave<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        let from_a = self.a_next;
        self.a_next = !self.a_next;
        if from_a {
            self.a.next().or_else(|| self.b.next())
        } else {
            self.b.next().or_else(|| self.a.next())
        }
    }
}
