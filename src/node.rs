//! Underlying node representation for the tables.
//!
//! A table is a hash array mapped trie. Each [`Chunk`] covers `BITS` bits of
//! an entry's 32-bit hash and holds up to `ARITY` children, stored densely and
//! addressed through an occupancy bitmap. A child is a single entry, a bucket
//! of entries whose hashes are identical, or another chunk.
//!
//! Chunks are shared between table versions behind `Arc`. Mutation goes
//! through `Arc::make_mut`, which copies only the path from the root to the
//! modified slot.
use std::{fmt, mem, slice, sync::Arc};

use crate::oracle::{hash_bits, HashBits, HashKey, StructuralHash};

const BITS: u32 = 5;
const ARITY: usize = 1 << BITS;

/// One key/value pair, with its key's canonical hash cached so that rebuilds
/// never rehash.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: HashKey,
    pub(crate) bits: HashBits,
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K: StructuralHash, V> Entry<K, V> {
    pub(crate) fn new(hash: HashKey, key: K, value: V) -> Entry<K, V> {
        Entry {
            bits: hash_bits(&hash),
            hash,
            key,
            value,
        }
    }

    fn matches(&self, hash: &HashKey, key: &K) -> bool {
        self.hash == *hash && self.key.structural_eq(key)
    }
}

impl<K: Clone, V> Entry<K, V> {
    /// The same key, cached hash included, paired with a new value.
    pub(crate) fn with_value<W>(&self, value: W) -> Entry<K, W> {
        Entry {
            hash: self.hash.clone(),
            bits: self.bits,
            key: self.key.clone(),
            value,
        }
    }
}

/// Entries whose 32-bit hashes are identical, in insertion order.
#[derive(Clone)]
pub(crate) struct Bucket<K, V> {
    bits: HashBits,
    entries: Vec<Entry<K, V>>,
}

impl<K: StructuralHash, V> Bucket<K, V> {
    fn find(&self, hash: &HashKey, key: &K) -> Option<&Entry<K, V>> {
        self.entries.iter().find(|e| e.matches(hash, key))
    }

    fn find_mut(&mut self, hash: &HashKey, key: &K) -> Option<&mut Entry<K, V>> {
        self.entries.iter_mut().find(|e| e.matches(hash, key))
    }

    /// Replace a matching entry in place, or append.
    fn update(&mut self, mut entry: Entry<K, V>) -> Option<Entry<K, V>> {
        match self.find_mut(&entry.hash, &entry.key) {
            Some(prev) => {
                mem::swap(prev, &mut entry);
                Some(entry)
            }
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    fn remove(&mut self, hash: &HashKey, key: &K) -> Option<Entry<K, V>> {
        let ix = self.entries.iter().position(|e| e.matches(hash, key))?;
        Some(self.entries.remove(ix))
    }
}

#[derive(Clone)]
enum Child<K, V> {
    Leaf(Entry<K, V>),
    Collision(Arc<Bucket<K, V>>),
    Inner(Arc<Chunk<K, V>>),
}

impl<K, V> Child<K, V> {
    fn len(&self) -> usize {
        match self {
            Child::Leaf(_) => 1,
            Child::Collision(bucket) => bucket.entries.len(),
            Child::Inner(chunk) => chunk.len,
        }
    }

    fn digest(&self) -> u64 {
        match self {
            Child::Leaf(entry) => u64::from(entry.bits),
            Child::Collision(bucket) => {
                u64::from(bucket.bits).wrapping_mul(bucket.entries.len() as u64)
            }
            Child::Inner(chunk) => chunk.digest,
        }
    }

    /// The hash shared by everything in a leaf or bucket.
    fn terminal_bits(&self) -> Option<HashBits> {
        match self {
            Child::Leaf(entry) => Some(entry.bits),
            Child::Collision(bucket) => Some(bucket.bits),
            Child::Inner(_) => None,
        }
    }
}

pub(crate) struct Chunk<K, V> {
    bitmap: u32,
    /// Wrapping sum of the hash bits of every entry below this chunk. Equal
    /// key sets have equal digests, whatever the trie's shape.
    digest: u64,
    len: usize,
    children: Vec<Child<K, V>>,
}

impl<K, V> Chunk<K, V> {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn digest(&self) -> u64 {
        self.digest
    }

    #[inline(always)]
    fn mask(bits: HashBits, shift: u32) -> u32 {
        bits.checked_shr(shift).unwrap_or(0) % ARITY as u32
    }

    fn index_of(&self, slot: u32) -> usize {
        (self.bitmap & ((1u32 << slot) - 1)).count_ones() as usize
    }

    fn occupied(&self, slot: u32) -> bool {
        self.bitmap & (1u32 << slot) != 0
    }

    fn add_summary(&mut self, bits: HashBits) {
        self.len += 1;
        self.digest = self.digest.wrapping_add(u64::from(bits));
    }

    fn remove_summary(&mut self, bits: HashBits) {
        self.len -= 1;
        self.digest = self.digest.wrapping_sub(u64::from(bits));
    }

    /// Place a leaf or bucket in an empty chunk.
    fn adopt(&mut self, child: Child<K, V>, shift: u32) {
        debug_assert!(self.children.is_empty());
        if let Some(bits) = child.terminal_bits() {
            self.bitmap |= 1 << Self::mask(bits, shift);
        }
        self.len += child.len();
        self.digest = self.digest.wrapping_add(child.digest());
        self.children.push(child);
    }

    /// If this chunk holds a single leaf or bucket, hand it up so the parent
    /// can store it directly. Single inner children stay where they are.
    fn collapse(&mut self) -> Option<Child<K, V>> {
        if !matches!(
            self.children.as_slice(),
            [Child::Leaf(_)] | [Child::Collision(_)]
        ) {
            return None;
        }
        self.bitmap = 0;
        self.len = 0;
        self.digest = 0;
        self.children.pop()
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            stack: vec![self.children.iter()],
            bucket: Default::default(),
            remaining: self.len,
        }
    }
}

impl<K: StructuralHash + Clone, V: Clone> Chunk<K, V> {
    pub(crate) fn get(
        &self,
        hash: &HashKey,
        bits: HashBits,
        key: &K,
        shift: u32,
    ) -> Option<&Entry<K, V>> {
        let slot = Self::mask(bits, shift);
        if !self.occupied(slot) {
            return None;
        }
        match &self.children[self.index_of(slot)] {
            Child::Leaf(entry) => entry.matches(hash, key).then_some(entry),
            Child::Collision(bucket) if bucket.bits == bits => bucket.find(hash, key),
            Child::Collision(_) => None,
            Child::Inner(inner) => inner.get(hash, bits, key, shift + BITS),
        }
    }

    pub(crate) fn get_mut(
        &mut self,
        hash: &HashKey,
        bits: HashBits,
        key: &K,
        shift: u32,
    ) -> Option<&mut Entry<K, V>> {
        let slot = Self::mask(bits, shift);
        if !self.occupied(slot) {
            return None;
        }
        let ix = self.index_of(slot);
        match &mut self.children[ix] {
            Child::Leaf(entry) => entry.matches(hash, key).then_some(entry),
            Child::Collision(bucket) if bucket.bits == bits => {
                Arc::make_mut(bucket).find_mut(hash, key)
            }
            Child::Collision(_) => None,
            Child::Inner(inner) => Arc::make_mut(inner).get_mut(hash, bits, key, shift + BITS),
        }
    }

    /// Insert `entry`, replacing and returning an entry with an equal key.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>, shift: u32) -> Option<Entry<K, V>> {
        let bits = entry.bits;
        let slot = Self::mask(bits, shift);
        let ix = self.index_of(slot);
        if !self.occupied(slot) {
            self.children.insert(ix, Child::Leaf(entry));
            self.bitmap |= 1 << slot;
            self.add_summary(bits);
            return None;
        }
        match &mut self.children[ix] {
            Child::Leaf(prev) if prev.matches(&entry.hash, &entry.key) => {
                // Same key, same bits: the summary does not change.
                return Some(mem::replace(prev, entry));
            }
            Child::Collision(bucket) if bucket.bits == bits => {
                let res = Arc::make_mut(bucket).update(entry);
                if res.is_none() {
                    self.add_summary(bits);
                }
                return res;
            }
            Child::Inner(inner) => {
                let res = Arc::make_mut(inner).insert(entry, shift + BITS);
                if res.is_none() {
                    self.add_summary(bits);
                }
                return res;
            }
            // A different key lives here: restructure below.
            Child::Leaf(_) | Child::Collision(_) => {}
        }
        let prev = self.children.remove(ix);
        self.children.insert(ix, Self::split(prev, entry, shift + BITS));
        self.add_summary(bits);
        None
    }

    /// Combine an existing leaf or bucket with a new entry for a different
    /// key that landed in the same slot.
    fn split(prev: Child<K, V>, entry: Entry<K, V>, shift: u32) -> Child<K, V> {
        match prev {
            Child::Leaf(leaf) if leaf.bits == entry.bits => Child::Collision(Arc::new(Bucket {
                bits: entry.bits,
                entries: vec![leaf, entry],
            })),
            prev => {
                // The hashes differ, so they part ways at some level; nothing
                // ever descends past the last 5-bit window.
                let mut chunk = Chunk::default();
                chunk.adopt(prev, shift);
                chunk.insert(entry, shift);
                Child::Inner(Arc::new(chunk))
            }
        }
    }

    pub(crate) fn remove(
        &mut self,
        hash: &HashKey,
        bits: HashBits,
        key: &K,
        shift: u32,
    ) -> Option<Entry<K, V>> {
        let slot = Self::mask(bits, shift);
        if !self.occupied(slot) {
            return None;
        }
        let ix = self.index_of(slot);
        let res = match &mut self.children[ix] {
            Child::Leaf(entry) => {
                if !entry.matches(hash, key) {
                    return None;
                }
                self.bitmap &= !(1 << slot);
                match self.children.remove(ix) {
                    Child::Leaf(entry) => entry,
                    _ => unreachable!("slot kind changed during removal"),
                }
            }
            Child::Collision(bucket) => {
                if bucket.bits != bits {
                    return None;
                }
                let bucket = Arc::make_mut(bucket);
                let res = bucket.remove(hash, key)?;
                if bucket.entries.len() == 1 {
                    if let Some(last) = bucket.entries.pop() {
                        self.children[ix] = Child::Leaf(last);
                    }
                }
                res
            }
            Child::Inner(inner) => {
                let inner = Arc::make_mut(inner);
                let res = inner.remove(hash, bits, key, shift + BITS)?;
                if let Some(promoted) = inner.collapse() {
                    self.children[ix] = promoted;
                }
                res
            }
        };
        self.remove_summary(bits);
        Some(res)
    }
}

impl<K, V> Default for Chunk<K, V> {
    fn default() -> Chunk<K, V> {
        Chunk {
            bitmap: 0,
            digest: 0,
            len: 0,
            children: Vec::new(),
        }
    }
}

impl<K: Clone, V: Clone> Clone for Chunk<K, V> {
    fn clone(&self) -> Chunk<K, V> {
        Chunk {
            bitmap: self.bitmap,
            digest: self.digest,
            len: self.len,
            children: self.children.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Chunk<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk{{")?;
        write!(f, "len: {:?}, ", self.len)?;
        write!(f, "digest: {:?}, ", self.digest)?;
        write!(f, "bitmap: {:032b}, ", self.bitmap)?;
        write!(f, "children: [")?;
        for (i, child) in self.children.iter().enumerate() {
            let suffix = if i + 1 == self.children.len() { "" } else { ", " };
            match child {
                Child::Leaf(e) => write!(f, "<{:?}: {:?}>{suffix}", e.key, e.value)?,
                Child::Collision(bucket) => {
                    write!(f, "<bits:{:?}, [", bucket.bits)?;
                    for e in &bucket.entries {
                        write!(f, "{:?}: {:?}; ", e.key, e.value)?;
                    }
                    write!(f, "]>{suffix}")?;
                }
                Child::Inner(inner) => write!(f, "{inner:?}{suffix}")?,
            }
        }
        write!(f, "]}}")
    }
}

/// Borrowing iterator over every entry below a chunk.
pub(crate) struct Iter<'a, K, V> {
    stack: Vec<slice::Iter<'a, Child<K, V>>>,
    bucket: slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<&'a Entry<K, V>> {
        loop {
            if let Some(entry) = self.bucket.next() {
                self.remaining -= 1;
                return Some(entry);
            }
            match self.stack.last_mut()?.next() {
                None => {
                    self.stack.pop();
                }
                Some(Child::Leaf(entry)) => {
                    self.remaining -= 1;
                    return Some(entry);
                }
                Some(Child::Collision(bucket)) => self.bucket = bucket.entries.iter(),
                Some(Child::Inner(inner)) => self.stack.push(inner.children.iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            stack: self.stack.clone(),
            bucket: self.bucket.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning iterator: walks shared chunks and clones entries out one at a time.
pub(crate) struct IntoIter<K, V> {
    stack: Vec<(Arc<Chunk<K, V>>, usize)>,
    bucket: Option<(Arc<Bucket<K, V>>, usize)>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Arc<Chunk<K, V>>) -> IntoIter<K, V> {
        let remaining = root.len;
        IntoIter {
            stack: vec![(root, 0)],
            bucket: None,
            remaining,
        }
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Entry<K, V>> {
        loop {
            if let Some((bucket, pos)) = &mut self.bucket {
                if let Some(entry) = bucket.entries.get(*pos) {
                    *pos += 1;
                    self.remaining -= 1;
                    return Some(entry.clone());
                }
                self.bucket = None;
            }
            let (chunk, pos) = self.stack.last_mut()?;
            let Some(child) = chunk.children.get(*pos) else {
                self.stack.pop();
                continue;
            };
            *pos += 1;
            match child {
                Child::Leaf(entry) => {
                    self.remaining -= 1;
                    return Some(entry.clone());
                }
                Child::Collision(bucket) => self.bucket = Some((bucket.clone(), 0)),
                Child::Inner(inner) => {
                    let inner = inner.clone();
                    self.stack.push((inner, 0));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for IntoIter<K, V> {}
