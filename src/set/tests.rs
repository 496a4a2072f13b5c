use crate::{
    test_workloads::{self, test_hash_set, test_hash_set_collision},
    Error, HashSet, NonEmptyHashSet, StructuralHash, Value,
};

#[test]
fn insert_remove_hash_dense() {
    test_hash_set(test_workloads::insert_remove_dense())
}

#[test]
fn insert_remove_hash_sparse() {
    test_hash_set(test_workloads::insert_remove_sparse())
}

#[test]
fn insert_remove_hash_dense_collisions() {
    test_hash_set_collision(test_workloads::insert_remove_dense())
}

#[test]
fn insert_remove_hash_sparse_collisions() {
    test_hash_set_collision(test_workloads::insert_remove_sparse())
}

#[test]
fn union_no_overlap() {
    test_hash_set(test_workloads::union_no_overlap())
}

#[test]
fn union_no_overlap_collisions() {
    test_hash_set_collision(test_workloads::union_no_overlap())
}

#[test]
fn union_partial_overlap() {
    test_hash_set(test_workloads::union_partial_overlap())
}

#[test]
fn union_partial_collisions() {
    test_hash_set_collision(test_workloads::union_partial_overlap())
}

#[test]
fn set_algebra() {
    let l = HashSet::collect(0..10u32).unwrap();
    let r = HashSet::collect(5..15u32).unwrap();
    assert_eq!(l.union(&r), HashSet::collect(0..15u32).unwrap());
    assert_eq!(l.intersect(&r), HashSet::collect(5..10u32).unwrap());
    assert_eq!(l.minus(&r), HashSet::collect(0..5u32).unwrap());
    assert!(l.intersect(&r).is_subset_of(&l));
    assert!(!l.is_subset_of(&r));
    assert!(HashSet::<u32>::new().is_subset_of(&r));
}

#[test]
fn mixed_members() {
    let set = HashSet::collect([
        Value::Int(1),
        Value::float(1.0),
        Value::str("1"),
        Value::Bool(true),
        Value::Int(1),
    ])
    .unwrap();
    assert_eq!(set.len(), 4);
    assert!(set.contains(&Value::float(1.0)));
    assert!(!set.contains(&Value::Null));
    assert!(matches!(
        set.added(Value::resource("pipe", 0u8)),
        Err(Error::UnsupportedKeyKind { .. })
    ));
}

#[test]
fn rebuilds_leave_the_receiver_alone() {
    let set = HashSet::collect(["a", "b", "c"]).unwrap();
    let added = set.added("d").unwrap();
    let removed = set.removed(&"a");
    let filtered = set.filter(|s| *s != "b");
    assert_eq!(set.len(), 3);
    assert_eq!(added.len(), 4);
    assert_eq!(removed.len(), 2);
    assert_eq!(filtered.len(), 2);
    assert!(set.contains(&"a") && set.contains(&"b"));
}

#[test]
fn map_collapses_equal_images() {
    let set = HashSet::collect(0..20i64).unwrap();
    let parity = set.map(|n| n % 2).unwrap();
    assert_eq!(parity, HashSet::collect([0, 1]).unwrap());
    let doubled = set.flat_map(|n| [*n, n + 100]).unwrap();
    assert_eq!(doubled.len(), 40);
}

#[test]
fn group_by_partitions_the_set() {
    let words = HashSet::collect(["apple", "avocado", "banana", "blueberry", "cherry"]).unwrap();
    let groups = words
        .group_by(|w| w.chars().next().unwrap_or(' '))
        .unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.get(&'a').map(|g| g.len()), Some(2));
    let total: usize = groups.values().iter().map(|g| g.len()).sum();
    assert_eq!(total, words.len());
    for (first, members) in &groups {
        assert!(members.forall(|w| w.starts_with(*first)));
    }
}

#[test]
fn queries() {
    let set = HashSet::collect(1..=4u64).unwrap();
    assert_eq!(set.fold(0, |acc, n| acc + n), 10);
    assert!(set.exists(|n| *n == 4));
    assert!(set.forall(|n| *n > 0));
    let (even, odd) = set.partition(|n| n % 2 == 0);
    assert_eq!((even.len(), odd.len()), (2, 2));
    let head = *set.head().unwrap();
    assert!(!set.tail().contains(&head));
    assert_eq!(set.tail().len(), 3);
    let mut listed = set.to_stream().to_list();
    listed.sort();
    assert_eq!(listed, vec![1, 2, 3, 4]);
}

#[test]
fn sets_can_be_keys() {
    let l = HashSet::collect([1, 2, 3]).unwrap();
    let r = HashSet::collect([3, 2, 1]).unwrap();
    assert_eq!(l.hash_key().unwrap(), r.hash_key().unwrap());
    let nested = HashSet::collect([l.clone(), r]).unwrap();
    assert_eq!(nested.len(), 1);
    assert!(nested.contains(&l));
}

#[test]
fn non_empty_sets() {
    assert!(matches!(
        NonEmptyHashSet::<u8>::collect([]),
        Err(Error::Empty { collection: "set" })
    ));
    let one = NonEmptyHashSet::of('x').unwrap();
    assert_eq!(*one.head(), 'x');
    assert!(one.removed(&'x').is_empty());
    let two = one.added('y').unwrap();
    assert_eq!(two.len(), 2);
    assert_eq!(two.map(|_| 0).unwrap().len(), 1);
    assert!(NonEmptyHashSet::try_from(HashSet::<char>::new()).is_err());
}
