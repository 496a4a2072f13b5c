use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{Error, Result},
    oracle::{HashKey, StructuralHash},
    table::HashTable,
};

use super::{HashSet, SetIter};

/// A [`HashSet`] with at least one element.
pub struct NonEmptyHashSet<T> {
    set: HashSet<T>,
}

impl<T: StructuralHash + Clone> NonEmptyHashSet<T> {
    /// Fails with [`Error::Empty`] when `items` yields nothing.
    pub fn collect(items: impl IntoIterator<Item = T>) -> Result<NonEmptyHashSet<T>> {
        NonEmptyHashSet::try_from(HashSet::collect(items)?)
    }

    pub fn of(t: T) -> Result<NonEmptyHashSet<T>> {
        Ok(NonEmptyHashSet {
            set: HashSet::singleton(t)?,
        })
    }

    pub(crate) fn from_table(table: HashTable<T, ()>) -> NonEmptyHashSet<T> {
        debug_assert!(!table.is_empty());
        NonEmptyHashSet {
            set: HashSet::from_table(table),
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn contains(&self, t: &T) -> bool {
        self.set.contains(t)
    }

    /// The first element in iteration order. Always present.
    pub fn head(&self) -> &T {
        match self.set.head() {
            Some(head) => head,
            None => unreachable!("non-empty set without elements"),
        }
    }

    pub fn tail(&self) -> HashSet<T> {
        self.set.tail()
    }

    pub fn added(&self, t: T) -> Result<NonEmptyHashSet<T>> {
        Ok(NonEmptyHashSet {
            set: self.set.added(t)?,
        })
    }

    pub fn removed(&self, t: &T) -> HashSet<T> {
        self.set.removed(t)
    }

    pub fn union(&self, other: &HashSet<T>) -> NonEmptyHashSet<T> {
        NonEmptyHashSet {
            set: self.set.union(other),
        }
    }

    pub fn filter(&self, pred: impl FnMut(&T) -> bool) -> HashSet<T> {
        self.set.filter(pred)
    }

    /// Mapping never empties a set, though it may shrink it.
    pub fn map<U: StructuralHash + Clone>(
        &self,
        f: impl FnMut(&T) -> U,
    ) -> Result<NonEmptyHashSet<U>> {
        Ok(NonEmptyHashSet {
            set: self.set.map(f)?,
        })
    }

    pub fn fold<A>(&self, init: A, f: impl FnMut(A, &T) -> A) -> A {
        self.set.fold(init, f)
    }

    pub fn exists(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.set.exists(pred)
    }

    pub fn forall(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.set.forall(pred)
    }

    pub fn to_list(&self) -> Vec<T> {
        self.set.to_list()
    }

    pub fn as_set(&self) -> &HashSet<T> {
        &self.set
    }

    pub fn into_set(self) -> HashSet<T> {
        self.set
    }
}

impl<T> NonEmptyHashSet<T> {
    pub fn iter(&self) -> SetIter<'_, T> {
        self.set.iter()
    }
}

impl<T: StructuralHash + Clone> TryFrom<HashSet<T>> for NonEmptyHashSet<T> {
    type Error = Error;

    fn try_from(set: HashSet<T>) -> Result<NonEmptyHashSet<T>> {
        if set.is_empty() {
            return Err(Error::empty("set"));
        }
        Ok(NonEmptyHashSet { set })
    }
}

impl<T> From<NonEmptyHashSet<T>> for HashSet<T> {
    fn from(set: NonEmptyHashSet<T>) -> HashSet<T> {
        set.set
    }
}

impl<T> Clone for NonEmptyHashSet<T> {
    fn clone(&self) -> NonEmptyHashSet<T> {
        NonEmptyHashSet {
            set: self.set.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for NonEmptyHashSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.set, f)
    }
}

impl<T: StructuralHash + Clone> PartialEq for NonEmptyHashSet<T> {
    fn eq(&self, other: &NonEmptyHashSet<T>) -> bool {
        self.set == other.set
    }
}

impl<T: StructuralHash + Clone> Eq for NonEmptyHashSet<T> {}

impl<T> Hash for NonEmptyHashSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.set.hash(state)
    }
}

impl<T: StructuralHash + Clone> StructuralHash for NonEmptyHashSet<T> {
    fn hash_key(&self) -> Result<HashKey> {
        self.set.hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.set.structural_eq(&other.set)
    }
}

impl<'a, T> IntoIterator for &'a NonEmptyHashSet<T> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> SetIter<'a, T> {
        self.set.iter()
    }
}
