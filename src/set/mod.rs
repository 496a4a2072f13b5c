//! Persistent hash sets keyed by structural hash.
use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::Result,
    map::HashMap,
    node::{Entry, Iter},
    oracle::{HashKey, StructuralHash},
    stream::Stream,
    table::{HashTable, TableBuilder},
};

mod non_empty;
#[cfg(test)]
mod tests;

pub use non_empty::NonEmptyHashSet;

/// An immutable set: the keys of a table whose values carry nothing.
pub struct HashSet<T> {
    table: HashTable<T, ()>,
}

impl<T: StructuralHash + Clone> HashSet<T> {
    pub fn new() -> HashSet<T> {
        HashSet {
            table: HashTable::default(),
        }
    }

    /// Build a set from `items`, dropping structural duplicates.
    pub fn collect(items: impl IntoIterator<Item = T>) -> Result<HashSet<T>> {
        let mut builder = TableBuilder::new();
        for t in items {
            builder.update(t, ())?;
        }
        Ok(HashSet::from_table(builder.freeze()))
    }

    pub fn singleton(t: T) -> Result<HashSet<T>> {
        HashSet::collect([t])
    }

    pub(crate) fn from_table(table: HashTable<T, ()>) -> HashSet<T> {
        HashSet { table }
    }

    fn from_entries(entries: impl IntoIterator<Item = Entry<T, ()>>) -> HashSet<T> {
        let mut builder = TableBuilder::new();
        for entry in entries {
            builder.insert_entry(entry);
        }
        HashSet::from_table(builder.freeze())
    }

    /// The number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether or not the set is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether or not the set contains `t`.
    pub fn contains(&self, t: &T) -> bool {
        self.table.contains_key(t)
    }

    pub fn added(&self, t: T) -> Result<HashSet<T>> {
        if self.contains(&t) {
            return Ok(self.clone());
        }
        let mut builder = self.table.to_builder();
        builder.update(t, ())?;
        Ok(HashSet::from_table(builder.freeze()))
    }

    pub fn removed(&self, t: &T) -> HashSet<T> {
        if !self.contains(t) {
            return self.clone();
        }
        let mut builder = self.table.to_builder();
        builder.remove(t);
        HashSet::from_table(builder.freeze())
    }

    /// Elements of either set. The larger set is used as the base.
    pub fn union(&self, other: &HashSet<T>) -> HashSet<T> {
        if self.table.same_root(&other.table) {
            return self.clone();
        }
        let (big, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut builder = big.table.to_builder();
        for entry in small.table.raw_entries() {
            if !builder.contains_entry(entry) {
                builder.insert_entry(entry.clone());
            }
        }
        HashSet::from_table(builder.freeze())
    }

    /// Elements of both sets.
    pub fn intersect(&self, other: &HashSet<T>) -> HashSet<T> {
        let (big, small) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        HashSet::from_entries(
            small
                .table
                .raw_entries()
                .filter(|e| big.table.lookup(e).is_some())
                .cloned(),
        )
    }

    /// Elements of `self` that are not in `other`.
    pub fn minus(&self, other: &HashSet<T>) -> HashSet<T> {
        HashSet::from_entries(
            self.table
                .raw_entries()
                .filter(|e| other.table.lookup(e).is_none())
                .cloned(),
        )
    }

    pub fn is_subset_of(&self, other: &HashSet<T>) -> bool {
        self.len() <= other.len()
            && self
                .table
                .raw_entries()
                .all(|e| other.table.lookup(e).is_some())
    }

    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> HashSet<T> {
        HashSet::from_entries(self.table.raw_entries().filter(|e| pred(&e.key)).cloned())
    }

    /// Transform every element. Elements that become equal collapse into one.
    pub fn map<U: StructuralHash + Clone>(&self, f: impl FnMut(&T) -> U) -> Result<HashSet<U>> {
        HashSet::collect(self.iter().map(f))
    }

    pub fn flat_map<U, I>(&self, f: impl FnMut(&T) -> I) -> Result<HashSet<U>>
    where
        U: StructuralHash + Clone,
        I: IntoIterator<Item = U>,
    {
        HashSet::collect(self.iter().flat_map(f))
    }

    /// Partition the set by the discriminator `f`. Every group holds at
    /// least one element.
    pub fn group_by<G: StructuralHash + Clone>(
        &self,
        mut f: impl FnMut(&T) -> G,
    ) -> Result<HashMap<G, NonEmptyHashSet<T>>> {
        let groups = self.table.group_by(|t, _| f(t))?;
        Ok(HashMap::from_entries(groups.into_raw_entries().map(|group| {
            let members = NonEmptyHashSet::from_table(group.value.clone());
            group.with_value(members)
        })))
    }

    pub fn partition(&self, mut pred: impl FnMut(&T) -> bool) -> (HashSet<T>, HashSet<T>) {
        let mut yes = TableBuilder::new();
        let mut no = TableBuilder::new();
        for entry in self.table.raw_entries() {
            if pred(&entry.key) {
                yes.insert_entry(entry.clone());
            } else {
                no.insert_entry(entry.clone());
            }
        }
        (
            HashSet::from_table(yes.freeze()),
            HashSet::from_table(no.freeze()),
        )
    }

    /// The first element in iteration order.
    pub fn head(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Everything but [`HashSet::head`].
    pub fn tail(&self) -> HashSet<T> {
        match self.head() {
            Some(first) => self.removed(first),
            None => self.clone(),
        }
    }

    pub fn exists(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.iter().any(pred)
    }

    pub fn forall(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.iter().all(pred)
    }

    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &T) -> A) -> A {
        self.iter().fold(init, |acc, t| f(acc, t))
    }

    /// Apply `f` to each of the elements in the set. The order is unspecified.
    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.iter().for_each(f)
    }

    pub fn to_list(&self) -> Vec<T> {
        self.table.clone().into_entries().map(|(t, ())| t).collect()
    }

    pub fn to_stream(&self) -> Stream<T>
    where
        T: 'static,
    {
        Stream::emit_all(self.table.clone().into_entries().map(|(t, ())| t))
    }
}

impl<T> HashSet<T> {
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            inner: self.table.raw_entries(),
        }
    }
}

pub struct SetIter<'a, T> {
    inner: Iter<'a, T, ()>,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|e| &e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIter<'_, T> {}

impl<'a, T> IntoIterator for &'a HashSet<T> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> SetIter<'a, T> {
        self.iter()
    }
}

impl<T: StructuralHash + Clone> Default for HashSet<T> {
    fn default() -> HashSet<T> {
        HashSet::new()
    }
}

impl<T> Clone for HashSet<T> {
    fn clone(&self) -> HashSet<T> {
        HashSet {
            table: self.table.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HashSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: StructuralHash + Clone> PartialEq for HashSet<T> {
    fn eq(&self, other: &HashSet<T>) -> bool {
        self.structural_eq(other)
    }
}

impl<T: StructuralHash + Clone> Eq for HashSet<T> {}

impl<T> Hash for HashSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.len().hash(state);
        self.table.digest().hash(state);
    }
}

impl<T: StructuralHash + Clone> StructuralHash for HashSet<T> {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::unordered(
            self.table.raw_entries().map(|e| e.hash.to_string()),
        ))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.table.same_root(&other.table)
            || (self.len() == other.len()
                && self.table.digest() == other.table.digest()
                && self.is_subset_of(other))
    }
}
