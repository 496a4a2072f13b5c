use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{Error, Result},
    oracle::{HashKey, StructuralHash},
    table::{Entries, HashTable},
};

use super::HashMap;

/// A [`HashMap`] with at least one entry.
///
/// Operations that keep every key (`updated`, `map`) stay non-empty; those
/// that may drop the last entry hand back a plain `HashMap`.
pub struct NonEmptyHashMap<K, V> {
    map: HashMap<K, V>,
}

impl<K: StructuralHash + Clone, V: Clone> NonEmptyHashMap<K, V> {
    /// Fails with [`Error::Empty`] when `pairs` yields nothing.
    pub fn collect(pairs: impl IntoIterator<Item = (K, V)>) -> Result<NonEmptyHashMap<K, V>> {
        NonEmptyHashMap::try_from(HashMap::collect(pairs)?)
    }

    pub fn of(k: K, v: V) -> Result<NonEmptyHashMap<K, V>> {
        Ok(NonEmptyHashMap {
            map: HashMap::singleton(k, v)?,
        })
    }

    pub(crate) fn from_table(table: HashTable<K, V>) -> NonEmptyHashMap<K, V> {
        debug_assert!(!table.is_empty());
        NonEmptyHashMap {
            map: HashMap::from_table(table),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.map.get(k)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.map.contains_key(k)
    }

    /// The first entry in iteration order. Always present.
    pub fn head(&self) -> (&K, &V) {
        match self.map.head() {
            Some(head) => head,
            None => unreachable!("non-empty map without entries"),
        }
    }

    pub fn tail(&self) -> HashMap<K, V> {
        self.map.tail()
    }

    pub fn updated(&self, k: K, v: V) -> Result<NonEmptyHashMap<K, V>> {
        Ok(NonEmptyHashMap {
            map: self.map.updated(k, v)?,
        })
    }

    pub fn removed(&self, k: &K) -> HashMap<K, V> {
        self.map.removed(k)
    }

    pub fn merge(&self, other: &HashMap<K, V>) -> NonEmptyHashMap<K, V> {
        NonEmptyHashMap {
            map: self.map.merge(other),
        }
    }

    pub fn filter(&self, pred: impl FnMut(&K, &V) -> bool) -> HashMap<K, V> {
        self.map.filter(pred)
    }

    pub fn map<W: Clone>(&self, f: impl FnMut(&K, &V) -> W) -> NonEmptyHashMap<K, W> {
        NonEmptyHashMap {
            map: self.map.map(f),
        }
    }

    pub fn keys(&self) -> Vec<K> {
        self.map.keys()
    }

    pub fn values(&self) -> Vec<V> {
        self.map.values()
    }

    pub fn fold<A>(&self, init: A, f: impl FnMut(A, &K, &V) -> A) -> A {
        self.map.fold(init, f)
    }

    pub fn exists(&self, pred: impl FnMut(&K, &V) -> bool) -> bool {
        self.map.exists(pred)
    }

    pub fn forall(&self, pred: impl FnMut(&K, &V) -> bool) -> bool {
        self.map.forall(pred)
    }

    pub fn to_list(&self) -> Vec<(K, V)> {
        self.map.to_list()
    }

    pub fn as_map(&self) -> &HashMap<K, V> {
        &self.map
    }

    pub fn into_map(self) -> HashMap<K, V> {
        self.map
    }
}

impl<K, V> NonEmptyHashMap<K, V> {
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.map.iter()
    }
}

impl<K: StructuralHash + Clone, V: Clone> TryFrom<HashMap<K, V>> for NonEmptyHashMap<K, V> {
    type Error = Error;

    fn try_from(map: HashMap<K, V>) -> Result<NonEmptyHashMap<K, V>> {
        if map.is_empty() {
            return Err(Error::empty("map"));
        }
        Ok(NonEmptyHashMap { map })
    }
}

impl<K, V> From<NonEmptyHashMap<K, V>> for HashMap<K, V> {
    fn from(map: NonEmptyHashMap<K, V>) -> HashMap<K, V> {
        map.map
    }
}

impl<K, V> Clone for NonEmptyHashMap<K, V> {
    fn clone(&self) -> NonEmptyHashMap<K, V> {
        NonEmptyHashMap {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NonEmptyHashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.map, f)
    }
}

impl<K: StructuralHash + Clone, V: Clone + PartialEq> PartialEq for NonEmptyHashMap<K, V> {
    fn eq(&self, other: &NonEmptyHashMap<K, V>) -> bool {
        self.map == other.map
    }
}

impl<K: StructuralHash + Clone, V: Clone + Eq> Eq for NonEmptyHashMap<K, V> {}

impl<K, V> Hash for NonEmptyHashMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state)
    }
}

impl<K: StructuralHash + Clone, V: StructuralHash + Clone> StructuralHash
    for NonEmptyHashMap<K, V>
{
    fn hash_key(&self) -> Result<HashKey> {
        self.map.hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.map.structural_eq(&other.map)
    }
}

impl<'a, K, V> IntoIterator for &'a NonEmptyHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Entries<'a, K, V> {
        self.map.iter()
    }
}
