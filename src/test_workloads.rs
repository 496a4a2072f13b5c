//! Randomized operation workloads shared by the map and set tests. Each
//! workload is replayed against a `BTreeMap`/`BTreeSet` oracle.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
    iter::once,
};

use crate::{oracle::StructuralHash, HashKey, HashMap, HashSet, Result};

#[derive(Debug)]
pub(crate) enum Operation {
    Insert(u64),
    Remove(u64),
    Save,
    Union(usize),
    Dump,
}

trait TestKey: StructuralHash + Clone + Ord + Debug {}

impl<T: StructuralHash + Clone + Ord + Debug> TestKey for T {}

fn check_map<K: TestKey>(map: &HashMap<K, u64>, oracle: &BTreeMap<K, u64>) {
    assert_eq!(oracle.len(), map.len());
    let expected: Vec<(K, u64)> = oracle.iter().map(|(k, v)| (k.clone(), *v)).collect();
    let mut actual = map.to_list();
    actual.sort();
    assert_eq!(expected, actual);
    for (k, v) in oracle {
        assert_eq!(Some(v), map.get(k));
    }
}

fn run_map<K: TestKey>(ops: impl IntoIterator<Item = Operation>, keys: impl Fn(u64) -> Vec<K>) {
    let mut oracle = BTreeMap::<K, u64>::new();
    let mut map1 = HashMap::new();
    let mut map2 = HashMap::new();
    let mut saved = Vec::<(HashMap<K, u64>, BTreeMap<K, u64>)>::new();
    for op in ops {
        match op {
            Operation::Insert(i) => {
                let v = i.wrapping_add(1);
                for k in keys(i) {
                    assert_eq!(oracle.get(&k), map1.get(&k));
                    let prev = map1.clone();
                    oracle.insert(k.clone(), v);
                    map1 = map1.updated(k.clone(), v).unwrap();
                    assert_eq!(oracle.get(&k), map1.get(&k));
                    assert_eq!(oracle.len(), map1.len());
                    // The old version is untouched.
                    assert_eq!(prev.len() + usize::from(!prev.contains_key(&k)), map1.len());
                }
                for k in keys(i).into_iter().rev() {
                    map2 = map2.updated(k, v).unwrap();
                }
                assert_eq!(map1, map2);
            }
            Operation::Remove(i) => {
                for k in keys(i) {
                    assert_eq!(oracle.contains_key(&k), map1.contains_key(&k));
                    oracle.remove(&k);
                    let prev = map1.clone();
                    map1 = map1.removed(&k);
                    assert!(!map1.contains_key(&k));
                    assert_eq!(oracle.len(), map1.len());
                    assert_eq!(prev.len() - usize::from(prev.contains_key(&k)), map1.len());
                    map2 = map2.removed(&k);
                }
                assert_eq!(map1, map2);
            }
            Operation::Dump => {
                check_map(&map1, &oracle);
                for (map, oracle) in &saved {
                    check_map(map, oracle);
                }
            }
            Operation::Union(ix) => {
                let (prev, prev_oracle) = &saved[ix];
                // Later writes in the saved map win.
                map1 = map1.merge(prev);
                map2 = map2.merge(prev);
                for (k, v) in prev_oracle {
                    oracle.insert(k.clone(), *v);
                }
                assert_eq!(map1, map2);
            }
            Operation::Save => {
                saved.push((map2.clone(), oracle.clone()));
            }
        }
    }
}

fn check_set<T: TestKey>(set: &HashSet<T>, oracle: &BTreeSet<T>) {
    assert_eq!(oracle.len(), set.len());
    let expected: Vec<T> = oracle.iter().cloned().collect();
    let mut actual = set.to_list();
    actual.sort();
    assert_eq!(expected, actual);
    for t in oracle {
        assert!(set.contains(t));
    }
}

fn run_set<T: TestKey>(ops: impl IntoIterator<Item = Operation>, members: impl Fn(u64) -> Vec<T>) {
    let mut oracle = BTreeSet::<T>::new();
    let mut set1 = HashSet::new();
    let mut set2 = HashSet::new();
    let mut saved = Vec::<(HashSet<T>, BTreeSet<T>)>::new();
    for op in ops {
        match op {
            Operation::Insert(i) => {
                for t in members(i) {
                    assert_eq!(oracle.contains(&t), set1.contains(&t));
                    oracle.insert(t.clone());
                    set1 = set1.added(t.clone()).unwrap();
                    assert!(set1.contains(&t));
                    assert_eq!(oracle.len(), set1.len());
                }
                for t in members(i).into_iter().rev() {
                    set2 = set2.added(t).unwrap();
                }
                assert_eq!(set1, set2);
            }
            Operation::Remove(i) => {
                for t in members(i) {
                    assert_eq!(oracle.contains(&t), set1.contains(&t));
                    oracle.remove(&t);
                    set1 = set1.removed(&t);
                    set2 = set2.removed(&t);
                    assert!(!set1.contains(&t));
                    assert_eq!(oracle.len(), set1.len());
                }
                assert_eq!(set1, set2);
            }
            Operation::Dump => {
                check_set(&set1, &oracle);
                for (set, oracle) in &saved {
                    check_set(set, oracle);
                }
            }
            Operation::Union(ix) => {
                let (prev, prev_oracle) = &saved[ix];
                set1 = set1.union(prev);
                set2 = prev.union(&set2);
                oracle.extend(prev_oracle.iter().cloned());
                assert_eq!(set1, set2);
            }
            Operation::Save => {
                saved.push((set2.clone(), oracle.clone()));
            }
        }
    }
}

pub(crate) fn test_hash_map(ops: impl IntoIterator<Item = Operation>) {
    run_map(ops, |i| vec![i])
}

pub(crate) fn test_hash_map_collision(ops: impl IntoIterator<Item = Operation>) {
    run_map(ops, |i| {
        let (k1, k2) = collider(i);
        vec![k1, k2]
    })
}

pub(crate) fn test_hash_set(ops: impl IntoIterator<Item = Operation>) {
    run_set(ops, |i| vec![i])
}

pub(crate) fn test_hash_set_collision(ops: impl IntoIterator<Item = Operation>) {
    run_set(ops, |i| {
        let (c1, c2) = collider(i);
        vec![c1, c2]
    })
}

/// A key whose structural hash only looks at the first field, so both keys
/// of a pair always land in the same bucket.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct Collider(u64, u64);

impl StructuralHash for Collider {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::int(i128::from(self.0)))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

pub(crate) fn collider(i: u64) -> (Collider, Collider) {
    (Collider(i, 0), Collider(i, 1))
}

const N: usize = 1000;

pub(crate) fn insert_remove_sparse() -> impl Iterator<Item = Operation> {
    let to_insert: BTreeSet<u64> = (0..N).map(|_| rand::random::<u64>()).collect();
    let in_sequence: Vec<u64> = to_insert.into_iter().collect();
    let in_set: Vec<u64> = in_sequence[0..(N / 2)].to_vec();
    let not_in_set: Vec<u64> = in_sequence[(N / 2)..].to_vec();
    in_set
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(once(Operation::Dump))
        .chain(not_in_set.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(in_set.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
}

pub(crate) fn insert_remove_dense() -> impl Iterator<Item = Operation> {
    const K: u64 = N as u64;
    (0..K)
        .map(Operation::Insert)
        .chain(once(Operation::Dump))
        .chain(once(Operation::Save))
        .chain((0..K).map(Operation::Remove))
        .chain(once(Operation::Dump))
}

pub(crate) fn union_no_overlap() -> impl Iterator<Item = Operation> {
    let to_insert_1 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    let to_insert_2 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    to_insert_1
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(to_insert_1.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(to_insert_2.into_iter().map(Operation::Insert))
        .chain(once(Operation::Dump))
        .chain(once(Operation::Union(0)))
        .chain(once(Operation::Dump))
}

pub(crate) fn union_partial_overlap() -> impl Iterator<Item = Operation> {
    let to_insert_1 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    let mut to_insert_2 = Vec::from_iter(to_insert_1[0..N / 2].iter().copied());
    to_insert_2.extend((0..N).map(|_| rand::random::<u64>()));
    to_insert_1
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(to_insert_1.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(to_insert_2.into_iter().map(Operation::Insert))
        .chain(once(Operation::Dump))
        .chain(once(Operation::Union(0)))
        .chain(once(Operation::Dump))
}
