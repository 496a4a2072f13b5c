//! The hash table behind every map and set: a single-owner builder that is
//! mutated during construction, and the frozen read-only view it turns into.
use std::{fmt, sync::Arc};

use crate::{
    error::Result,
    node::{Chunk, Entry, IntoIter, Iter},
    oracle::{hash_bits, HashKey, StructuralHash},
};

/// Mutable construction handle for a [`HashTable`].
///
/// A builder started from an existing table shares that table's nodes and
/// copies only what it changes, so the source table is never affected.
pub struct TableBuilder<K, V> {
    root: Arc<Chunk<K, V>>,
}

impl<K: StructuralHash + Clone, V: Clone> TableBuilder<K, V> {
    pub fn new() -> TableBuilder<K, V> {
        TableBuilder {
            root: Default::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map `key` to `value`. An entry whose key is structurally equal to
    /// `key` is replaced and its value returned; otherwise the pair is added.
    pub fn update(&mut self, key: K, value: V) -> Result<Option<V>> {
        let hash = key.hash_key()?;
        Ok(self.insert_entry(Entry::new(hash, key, value)).map(|e| e.value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = key.hash_key().ok()?;
        let bits = hash_bits(&hash);
        self.root.get(&hash, bits, key, 0).map(|e| &e.value)
    }

    pub fn freeze(self) -> HashTable<K, V> {
        HashTable { root: self.root }
    }

    /// Re-insert an entry whose hash is already known.
    pub(crate) fn insert_entry(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        Arc::make_mut(&mut self.root).insert(entry, 0)
    }

    pub(crate) fn get_mut_hashed(&mut self, hash: &HashKey, key: &K) -> Option<&mut V> {
        let bits = hash_bits(hash);
        // Leave shared nodes alone on a miss.
        self.root.get(hash, bits, key, 0)?;
        Arc::make_mut(&mut self.root)
            .get_mut(hash, bits, key, 0)
            .map(|e| &mut e.value)
    }

    pub(crate) fn contains_entry<W>(&self, entry: &Entry<K, W>) -> bool {
        self.root
            .get(&entry.hash, entry.bits, &entry.key, 0)
            .is_some()
    }

    /// Drop the entry for `key`. Only the map and set layers remove entries,
    /// and only while producing a new collection.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let hash = key.hash_key().ok()?;
        let bits = hash_bits(&hash);
        self.root.get(&hash, bits, key, 0)?;
        Arc::make_mut(&mut self.root)
            .remove(&hash, bits, key, 0)
            .map(|e| e.value)
    }
}

impl<K: StructuralHash + Clone, V: Clone> Default for TableBuilder<K, V> {
    fn default() -> TableBuilder<K, V> {
        TableBuilder::new()
    }
}

impl<K, V> Clone for TableBuilder<K, V> {
    fn clone(&self) -> TableBuilder<K, V> {
        TableBuilder {
            root: self.root.clone(),
        }
    }
}

/// A frozen hash table. Read-only; every change goes through a new
/// [`TableBuilder`].
pub struct HashTable<K, V> {
    root: Arc<Chunk<K, V>>,
}

impl<K, V> HashTable<K, V> {
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily walk the `(key, value)` pairs. The order is stable for this
    /// table but is not meaningful across tables.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            inner: self.root.iter(),
        }
    }

    pub(crate) fn raw_entries(&self) -> Iter<'_, K, V> {
        self.root.iter()
    }

    pub(crate) fn digest(&self) -> u64 {
        self.root.digest()
    }

    pub(crate) fn same_root(&self, other: &HashTable<K, V>) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl<K: StructuralHash + Clone, V: Clone> HashTable<K, V> {
    pub fn builder() -> TableBuilder<K, V> {
        TableBuilder::new()
    }

    /// A builder seeded with this table's contents.
    pub fn to_builder(&self) -> TableBuilder<K, V> {
        TableBuilder {
            root: self.root.clone(),
        }
    }

    /// Look up `key`. A key without a structural hash cannot have been
    /// stored, so it is reported as absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_entry(key).map(|(_, v)| v)
    }

    pub fn get_entry(&self, key: &K) -> Option<(&K, &V)> {
        let hash = match key.hash_key() {
            Ok(hash) => hash,
            Err(err) => {
                log::trace!("lookup with an unhashable key: {err}");
                return None;
            }
        };
        let bits = hash_bits(&hash);
        self.root
            .get(&hash, bits, key, 0)
            .map(|e| (&e.key, &e.value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get_entry(key).is_some()
    }

    /// Lazily move the `(key, value)` pairs out, cloning from shared nodes.
    pub fn into_entries(self) -> IntoEntries<K, V> {
        IntoEntries {
            inner: IntoIter::new(self.root),
        }
    }

    /// Find the entry matching another entry's key, reusing its cached hash.
    pub(crate) fn lookup<W>(&self, entry: &Entry<K, W>) -> Option<&Entry<K, V>> {
        self.root.get(&entry.hash, entry.bits, &entry.key, 0)
    }

    pub(crate) fn into_raw_entries(self) -> IntoIter<K, V> {
        IntoIter::new(self.root)
    }

    /// Split the table by the discriminator `f`. Members keep their cached
    /// hashes, and no group is empty.
    pub(crate) fn group_by<G: StructuralHash + Clone>(
        &self,
        mut f: impl FnMut(&K, &V) -> G,
    ) -> Result<HashTable<G, HashTable<K, V>>> {
        let mut groups: TableBuilder<G, TableBuilder<K, V>> = TableBuilder::new();
        for entry in self.raw_entries() {
            let g = f(&entry.key, &entry.value);
            let hash = g.hash_key()?;
            match groups.get_mut_hashed(&hash, &g) {
                Some(members) => {
                    members.insert_entry(entry.clone());
                }
                None => {
                    let mut members = TableBuilder::new();
                    members.insert_entry(entry.clone());
                    groups.insert_entry(Entry::new(hash, g, members));
                }
            }
        }
        log::debug!("grouped {} entries into {} groups", self.len(), groups.len());
        let mut frozen = TableBuilder::new();
        for group in groups.freeze().into_raw_entries() {
            frozen.insert_entry(group.with_value(group.value.clone().freeze()));
        }
        Ok(frozen.freeze())
    }
}

impl<K: StructuralHash + Clone, V: Clone> Default for HashTable<K, V> {
    fn default() -> HashTable<K, V> {
        TableBuilder::new().freeze()
    }
}

impl<K, V> Clone for HashTable<K, V> {
    fn clone(&self) -> HashTable<K, V> {
        HashTable {
            root: self.root.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

pub struct Entries<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}

impl<K, V> Clone for Entries<'_, K, V> {
    fn clone(&self) -> Self {
        Entries {
            inner: self.inner.clone(),
        }
    }
}

pub struct IntoEntries<K, V> {
    inner: IntoIter<K, V>,
}

impl<K: Clone, V: Clone> Iterator for IntoEntries<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next().map(|e| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoEntries<K, V> {}
