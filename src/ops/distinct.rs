//! [`Distinct`] and related items.
use crate::{oracle::StructuralHash, table::TableBuilder};

/// Drops elements structurally equal to one already yielded.
///
/// Elements without a structural hash cannot be compared, so they are
/// passed through unchanged.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Distinct<I: Iterator> {
    input: I,
    seen: TableBuilder<I::Item, ()>,
}

impl<I: Iterator> Distinct<I>
where
    I::Item: StructuralHash + Clone,
{
    pub fn new(input: I) -> Self {
        Distinct {
            input,
            seen: TableBuilder::new(),
        }
    }
}

impl<I: Iterator> Iterator for Distinct<I>
where
    I::Item: StructuralHash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            let item = self.input.next()?;
            match self.seen.update(item.clone(), ()) {
                Ok(None) => return Some(item),
                Ok(Some(())) => continue,
                Err(err) => {
                    log::warn!("distinct passes an element through unchecked: {err}");
                    return Some(item);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn keeps_first_occurrences() {
        let out: Vec<_> = Distinct::new([3, 1, 3, 2, 1].into_iter()).collect();
        assert_eq!(out, vec![3, 1, 2]);
    }

    #[test]
    fn compares_structurally() {
        let a = Value::record([("k", Value::Int(1))]);
        let b = Value::record([("k", Value::Int(1))]);
        let r = Value::resource("sock", 0u8);
        let input = [a, b, Value::float(1.0), Value::Int(1), r.clone(), r];
        let out: Vec<_> = Distinct::new(input.into_iter()).collect();
        assert_eq!(out.len(), 5);
    }
}
