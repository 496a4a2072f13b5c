//! Persistent hash maps keyed by structural hash.
use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::Result,
    node::Entry,
    oracle::{HashKey, StructuralHash},
    stream::Stream,
    table::{Entries, HashTable, TableBuilder},
};

mod non_empty;

pub use non_empty::NonEmptyHashMap;

/// An immutable map. Every "modifying" operation returns a new map and
/// leaves the receiver untouched; the two share whatever structure the
/// change did not touch.
pub struct HashMap<K, V> {
    table: HashTable<K, V>,
}

impl<K: StructuralHash + Clone, V: Clone> HashMap<K, V> {
    pub fn new() -> HashMap<K, V> {
        HashMap {
            table: HashTable::default(),
        }
    }

    /// Build a map from `(key, value)` pairs. A repeated key keeps its last
    /// value.
    pub fn collect(pairs: impl IntoIterator<Item = (K, V)>) -> Result<HashMap<K, V>> {
        let mut builder = TableBuilder::new();
        for (k, v) in pairs {
            builder.update(k, v)?;
        }
        Ok(HashMap::from_table(builder.freeze()))
    }

    pub fn singleton(k: K, v: V) -> Result<HashMap<K, V>> {
        HashMap::collect([(k, v)])
    }

    pub(crate) fn from_table(table: HashTable<K, V>) -> HashMap<K, V> {
        HashMap { table }
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = Entry<K, V>>) -> HashMap<K, V> {
        let mut builder = TableBuilder::new();
        for entry in entries {
            builder.insert_entry(entry);
        }
        HashMap::from_table(builder.freeze())
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether or not the map is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up the value mapped to `k`. Keys that cannot be hashed are never
    /// present.
    pub fn get(&self, k: &K) -> Option<&V> {
        self.table.get(k)
    }

    /// Whether or not a mapping for `k` is in the map.
    pub fn contains_key(&self, k: &K) -> bool {
        self.table.contains_key(k)
    }

    /// A map with `k` mapped to `v`, replacing any previous mapping.
    pub fn updated(&self, k: K, v: V) -> Result<HashMap<K, V>> {
        let mut builder = self.table.to_builder();
        builder.update(k, v)?;
        Ok(HashMap::from_table(builder.freeze()))
    }

    /// A map without `k`. Returns a copy of `self` if `k` was not present.
    pub fn removed(&self, k: &K) -> HashMap<K, V> {
        let mut builder = self.table.to_builder();
        builder.remove(k);
        HashMap::from_table(builder.freeze())
    }

    /// Right-biased union: mappings in `other` win over those in `self`.
    pub fn merge(&self, other: &HashMap<K, V>) -> HashMap<K, V> {
        if self.is_empty() || self.table.same_root(&other.table) {
            return other.clone();
        }
        let mut builder = self.table.to_builder();
        for entry in other.table.raw_entries() {
            builder.insert_entry(entry.clone());
        }
        log::debug!(
            "merged maps of {} and {} entries into {}",
            self.len(),
            other.len(),
            builder.len()
        );
        HashMap::from_table(builder.freeze())
    }

    pub fn filter(&self, mut pred: impl FnMut(&K, &V) -> bool) -> HashMap<K, V> {
        HashMap::from_entries(
            self.table
                .raw_entries()
                .filter(|e| pred(&e.key, &e.value))
                .cloned(),
        )
    }

    pub fn filter_keys(&self, mut pred: impl FnMut(&K) -> bool) -> HashMap<K, V> {
        self.filter(|k, _| pred(k))
    }

    pub fn filter_values(&self, mut pred: impl FnMut(&V) -> bool) -> HashMap<K, V> {
        self.filter(|_, v| pred(v))
    }

    /// Keep the entries for which `f` returns a value, mapped to that value.
    pub fn filter_map<W: Clone>(&self, mut f: impl FnMut(&K, &V) -> Option<W>) -> HashMap<K, W> {
        HashMap::from_entries(
            self.table
                .raw_entries()
                .filter_map(|e| f(&e.key, &e.value).map(|w| e.with_value(w))),
        )
    }

    /// Transform every value. The keys, and their cached hashes, carry over.
    pub fn map<W: Clone>(&self, mut f: impl FnMut(&K, &V) -> W) -> HashMap<K, W> {
        HashMap::from_entries(
            self.table
                .raw_entries()
                .map(|e| e.with_value(f(&e.key, &e.value))),
        )
    }

    /// Re-key every entry. Keys that collide after the mapping keep the
    /// value visited last.
    pub fn map_keys<J: StructuralHash + Clone>(
        &self,
        mut f: impl FnMut(&K, &V) -> J,
    ) -> Result<HashMap<J, V>> {
        HashMap::collect(self.iter().map(|(k, v)| (f(k, v), v.clone())))
    }

    pub fn flat_map<J, W, I>(&self, mut f: impl FnMut(&K, &V) -> I) -> Result<HashMap<J, W>>
    where
        J: StructuralHash + Clone,
        W: Clone,
        I: IntoIterator<Item = (J, W)>,
    {
        HashMap::collect(self.iter().flat_map(|(k, v)| f(k, v)))
    }

    pub fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Partition the map by the discriminator `f`. Every group holds at
    /// least one entry.
    pub fn group_by<G: StructuralHash + Clone>(
        &self,
        mut f: impl FnMut(&V) -> G,
    ) -> Result<HashMap<G, NonEmptyHashMap<K, V>>> {
        let groups = self.table.group_by(|_, v| f(v))?;
        Ok(HashMap::from_entries(groups.into_raw_entries().map(|group| {
            let members = NonEmptyHashMap::from_table(group.value.clone());
            group.with_value(members)
        })))
    }

    /// Split into the entries that satisfy `pred` and those that do not.
    pub fn partition(
        &self,
        mut pred: impl FnMut(&K, &V) -> bool,
    ) -> (HashMap<K, V>, HashMap<K, V>) {
        let mut yes = TableBuilder::new();
        let mut no = TableBuilder::new();
        for entry in self.table.raw_entries() {
            if pred(&entry.key, &entry.value) {
                yes.insert_entry(entry.clone());
            } else {
                no.insert_entry(entry.clone());
            }
        }
        (
            HashMap::from_table(yes.freeze()),
            HashMap::from_table(no.freeze()),
        )
    }

    /// The first entry in iteration order.
    pub fn head(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Everything but [`HashMap::head`].
    pub fn tail(&self) -> HashMap<K, V> {
        match self.table.raw_entries().next() {
            Some(first) => {
                let mut builder = self.table.to_builder();
                builder.remove(&first.key);
                HashMap::from_table(builder.freeze())
            }
            None => self.clone(),
        }
    }

    pub fn find(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Option<(&K, &V)> {
        self.iter().find(|(k, v)| pred(k, v))
    }

    pub fn exists(&self, mut pred: impl FnMut(&K, &V) -> bool) -> bool {
        self.iter().any(|(k, v)| pred(k, v))
    }

    pub fn forall(&self, mut pred: impl FnMut(&K, &V) -> bool) -> bool {
        self.iter().all(|(k, v)| pred(k, v))
    }

    pub fn count(&self, mut pred: impl FnMut(&K, &V) -> bool) -> usize {
        self.iter().filter(|(k, v)| pred(k, v)).count()
    }

    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &K, &V) -> A) -> A {
        self.iter().fold(init, |acc, (k, v)| f(acc, k, v))
    }

    /// Apply `f` to the map's contents. The order in which `f` is applied is
    /// unspecified.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        self.iter().for_each(|(k, v)| f(k, v))
    }

    pub fn to_list(&self) -> Vec<(K, V)> {
        self.table.clone().into_entries().collect()
    }

    /// A lazy stream over the entries. The map is shared with the stream,
    /// not copied.
    pub fn to_stream(&self) -> Stream<(K, V)>
    where
        K: 'static,
        V: 'static,
    {
        Stream::emit_all(self.table.clone().into_entries())
    }
}

impl<K, V> HashMap<K, V> {
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.table.entries()
    }
}

impl<K: StructuralHash + Clone, V: Clone> Default for HashMap<K, V> {
    fn default() -> HashMap<K, V> {
        HashMap::new()
    }
}

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> HashMap<K, V> {
        HashMap {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Entries<'a, K, V> {
        self.iter()
    }
}

impl<K: StructuralHash + Clone, V: Clone> HashMap<K, V> {
    /// Whether every entry of `self` has a counterpart in `other` whose value
    /// satisfies `same`. Callers check the lengths.
    fn covered_by(&self, other: &HashMap<K, V>, mut same: impl FnMut(&V, &V) -> bool) -> bool {
        self.table.raw_entries().all(|entry| {
            other
                .table
                .lookup(entry)
                .is_some_and(|found| same(&entry.value, &found.value))
        })
    }
}

/// Two maps are equal when they hold the same keys, compared structurally,
/// mapped to equal values.
impl<K: StructuralHash + Clone, V: Clone + PartialEq> PartialEq for HashMap<K, V> {
    fn eq(&self, other: &HashMap<K, V>) -> bool {
        if self.table.same_root(&other.table) {
            return true;
        }
        self.len() == other.len()
            && self.table.digest() == other.table.digest()
            && self.covered_by(other, |l, r| l == r)
    }
}

impl<K: StructuralHash + Clone, V: Clone + Eq> Eq for HashMap<K, V> {}

impl<K, V> Hash for HashMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.len().hash(state);
        self.table.digest().hash(state);
    }
}

impl<K: StructuralHash + Clone, V: StructuralHash + Clone> StructuralHash for HashMap<K, V> {
    fn hash_key(&self) -> Result<HashKey> {
        let members = self
            .table
            .raw_entries()
            .map(|e| Ok(format!("{}=>{}", e.hash, e.value.hash_key()?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(HashKey::unordered(members))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.table.digest() == other.table.digest()
            && self.covered_by(other, |l, r| l.structural_eq(r))
    }
}
