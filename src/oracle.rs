//! The equality/hash oracle: canonical, type-discriminating hash keys and the
//! matching structural equality.
//!
//! Every key stored in a [`HashMap`](crate::HashMap) or
//! [`HashSet`](crate::HashSet) goes through [`StructuralHash`]. The key it
//! produces is a `(TypeTag, Canonical)` pair. Values of different kinds never
//! share a key (`1`, `1.0`, `"1"` and `true` are four distinct keys), and
//! composite values are keyed by their contents rather than their identity.
//!
//! Equal values always produce equal keys. The converse does not hold for the
//! 32-bit trie index derived from a key, which is why the table always
//! confirms a match with [`StructuralHash::structural_eq`].
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
    sync::Arc,
};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rustc_hash::FxHasher;

use crate::error::Result;

/// Hash bits used to index the trie.
pub(crate) type HashBits = u32;

/// The coarse kind of a keyed value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Seq,
    Record,
    /// Objects that opted out of structural equality.
    Identity,
}

impl TypeTag {
    fn prefix(self) -> &'static str {
        match self {
            TypeTag::Null => "n",
            TypeTag::Bool => "b",
            TypeTag::Int => "i",
            TypeTag::Float => "f",
            TypeTag::Str => "s",
            TypeTag::Seq => "a",
            TypeTag::Record => "o",
            TypeTag::Identity => "#",
        }
    }
}

/// The value-derived half of a [`HashKey`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Canonical {
    Int(i128),
    /// Normalized `f64` bits.
    Bits(u64),
    Text(Arc<str>),
}

/// A canonical, type-discriminating identifier derived from a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: TypeTag,
    form: Canonical,
}

impl HashKey {
    pub fn new(tag: TypeTag, form: Canonical) -> HashKey {
        HashKey { tag, form }
    }

    pub fn null() -> HashKey {
        HashKey::new(TypeTag::Null, Canonical::Int(0))
    }

    pub fn boolean(b: bool) -> HashKey {
        HashKey::new(TypeTag::Bool, Canonical::Int(b as i128))
    }

    pub fn int(n: i128) -> HashKey {
        HashKey::new(TypeTag::Int, Canonical::Int(n))
    }

    /// `-0.0` keys like `0.0` and every NaN keys alike, matching
    /// `OrderedFloat` equality.
    pub fn float(f: f64) -> HashKey {
        let normalized = if f == 0.0 {
            0.0
        } else if f.is_nan() {
            f64::NAN
        } else {
            f
        };
        HashKey::new(TypeTag::Float, Canonical::Bits(normalized.to_bits()))
    }

    pub fn text(s: &str) -> HashKey {
        HashKey::new(TypeTag::Str, Canonical::Text(s.into()))
    }

    pub fn identity(id: u64) -> HashKey {
        HashKey::new(TypeTag::Identity, Canonical::Int(id as i128))
    }

    /// Key of an ordered sequence: the `(index, key)` pairs in order.
    pub fn sequence(items: impl IntoIterator<Item = Result<HashKey>>) -> Result<HashKey> {
        let mut encoded = String::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                encoded.push(',');
            }
            encoded.push_str(&format!("{i}={}", item?));
        }
        Ok(HashKey::new(TypeTag::Seq, Canonical::Text(encoded.into())))
    }

    /// Key of a record: the `(name, key)` pairs in lexicographic name order,
    /// so field insertion order never matters.
    pub fn record<'a>(
        fields: impl IntoIterator<Item = (&'a str, Result<HashKey>)>,
    ) -> Result<HashKey> {
        let mut pairs = fields
            .into_iter()
            .map(|(name, key)| Ok((name, key?)))
            .collect::<Result<Vec<_>>>()?;
        pairs.sort_by(|(l, _), (r, _)| l.cmp(r));
        let encoded = pairs
            .iter()
            .map(|(name, key)| format!("{name:?}={key}"))
            .collect::<Vec<_>>()
            .join(",");
        Ok(HashKey::new(TypeTag::Record, Canonical::Text(encoded.into())))
    }

    /// Key of an unordered collection: the member encodings, sorted.
    pub(crate) fn unordered(members: impl IntoIterator<Item = String>) -> HashKey {
        let mut members: Vec<String> = members.into_iter().collect();
        members.sort();
        HashKey::new(TypeTag::Record, Canonical::Text(members.join(",").into()))
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn canonical(&self) -> &Canonical {
        &self.form
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.tag.prefix();
        match (self.tag, &self.form) {
            (TypeTag::Str, Canonical::Text(s)) => write!(f, "{prefix}:{s:?}"),
            (TypeTag::Seq, Canonical::Text(s)) => write!(f, "{prefix}:[{s}]"),
            (TypeTag::Record, Canonical::Text(s)) => write!(f, "{prefix}:{{{s}}}"),
            (_, Canonical::Text(s)) => write!(f, "{prefix}:{s}"),
            (_, Canonical::Int(n)) => write!(f, "{prefix}:{n}"),
            (_, Canonical::Bits(b)) => write!(f, "{prefix}:{b:#018x}"),
        }
    }
}

pub(crate) fn hash_bits(key: &HashKey) -> HashBits {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    let full = hasher.finish();
    // Fold the high half in: FxHasher leaves the low bits weak for short keys.
    (full ^ (full >> 32)) as HashBits
}

/// Types that can be used as map keys and set members.
pub trait StructuralHash {
    /// The canonical key of `self`, or `UnsupportedKeyKind` for values with
    /// no structural hash.
    fn hash_key(&self) -> Result<HashKey>;

    /// Structural equality. Must agree with `hash_key`: equal values have
    /// equal keys.
    fn structural_eq(&self, other: &Self) -> bool;
}

/// The structural hash of `value`.
pub fn hash<T: StructuralHash + ?Sized>(value: &T) -> Result<HashKey> {
    value.hash_key()
}

/// Structural equality of `a` and `b`.
pub fn equals<T: StructuralHash + ?Sized>(a: &T, b: &T) -> bool {
    a.structural_eq(b)
}

macro_rules! int_keys {
    ($($t:ty),*) => {
        $(
            impl StructuralHash for $t {
                fn hash_key(&self) -> Result<HashKey> {
                    Ok(HashKey::int(*self as i128))
                }

                fn structural_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

int_keys!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl StructuralHash for f64 {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::float(*self))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        OrderedFloat(*self) == OrderedFloat(*other)
    }
}

impl StructuralHash for f32 {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::float(f64::from(*self)))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        OrderedFloat(*self) == OrderedFloat(*other)
    }
}

impl StructuralHash for OrderedFloat<f64> {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::float(self.0))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralHash for bool {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::boolean(*self))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralHash for char {
    fn hash_key(&self) -> Result<HashKey> {
        let mut buf = [0u8; 4];
        Ok(HashKey::text(self.encode_utf8(&mut buf)))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralHash for str {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::text(self))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralHash for String {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::text(self))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralHash for () {
    fn hash_key(&self) -> Result<HashKey> {
        Ok(HashKey::null())
    }

    fn structural_eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: StructuralHash> StructuralHash for Option<T> {
    fn hash_key(&self) -> Result<HashKey> {
        match self {
            None => Ok(HashKey::null()),
            Some(t) => t.hash_key(),
        }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(l), Some(r)) => l.structural_eq(r),
            _ => false,
        }
    }
}

impl<T: StructuralHash> StructuralHash for [T] {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::sequence(self.iter().map(T::hash_key))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(l, r)| l.structural_eq(r))
    }
}

impl<T: StructuralHash> StructuralHash for Vec<T> {
    fn hash_key(&self) -> Result<HashKey> {
        self.as_slice().hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.as_slice().structural_eq(other.as_slice())
    }
}

impl<T: StructuralHash> StructuralHash for VecDeque<T> {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::sequence(self.iter().map(T::hash_key))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(l, r)| l.structural_eq(r))
    }
}

impl<A: StructuralHash, B: StructuralHash> StructuralHash for (A, B) {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::sequence([self.0.hash_key(), self.1.hash_key()])
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.0.structural_eq(&other.0) && self.1.structural_eq(&other.1)
    }
}

impl<A: StructuralHash, B: StructuralHash, C: StructuralHash> StructuralHash for (A, B, C) {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::sequence([self.0.hash_key(), self.1.hash_key(), self.2.hash_key()])
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.0.structural_eq(&other.0)
            && self.1.structural_eq(&other.1)
            && self.2.structural_eq(&other.2)
    }
}

impl<T: StructuralHash> StructuralHash for BTreeMap<String, T> {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::record(self.iter().map(|(name, v)| (name.as_str(), v.hash_key())))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((ln, lv), (rn, rv))| ln == rn && lv.structural_eq(rv))
    }
}

impl<T: StructuralHash> StructuralHash for IndexMap<String, T> {
    fn hash_key(&self) -> Result<HashKey> {
        HashKey::record(self.iter().map(|(name, v)| (name.as_str(), v.hash_key())))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, l)| other.get(name).is_some_and(|r| l.structural_eq(r)))
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for &T {
    fn hash_key(&self) -> Result<HashKey> {
        (**self).hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        (**self).structural_eq(*other)
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for Box<T> {
    fn hash_key(&self) -> Result<HashKey> {
        (**self).hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        (**self).structural_eq(other)
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for Arc<T> {
    fn hash_key(&self) -> Result<HashKey> {
        (**self).hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other) || (**self).structural_eq(other)
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for Rc<T> {
    fn hash_key(&self) -> Result<HashKey> {
        (**self).hash_key()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other) || (**self).structural_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key<T: StructuralHash + ?Sized>(t: &T) -> HashKey {
        t.hash_key().unwrap()
    }

    #[test]
    fn scalar_kinds_never_share_keys() {
        let keys = [key(&1i64), key(&1.0f64), key("1"), key(&true), key(&())];
        for (i, l) in keys.iter().enumerate() {
            for (j, r) in keys.iter().enumerate() {
                assert_eq!(i == j, l == r, "{l} vs {r}");
            }
        }
    }

    #[test]
    fn integer_widths_agree() {
        assert_eq!(key(&7u8), key(&7i64));
        assert_eq!(key(&u64::MAX).to_string(), format!("i:{}", u64::MAX));
    }

    #[test]
    fn float_zero_and_nan_normalize() {
        assert_eq!(key(&0.0f64), key(&-0.0f64));
        assert!(equals(&0.0f64, &-0.0f64));
        assert_eq!(key(&f64::NAN), key(&-f64::NAN));
        assert!(equals(&f64::NAN, &f64::NAN));
        assert_ne!(key(&1.5f64), key(&2.5f64));
    }

    #[test]
    fn sequences_are_ordered() {
        assert_eq!(key(&vec![1, 2, 3]), key(&vec![1, 2, 3]));
        assert_ne!(key(&vec![1, 2, 3]), key(&vec![3, 2, 1]));
        assert_ne!(key(&vec![1, 2]), key(&vec![1, 2, 3]));
        assert!(!equals(&vec![1, 2], &vec![2, 1]));
    }

    #[test]
    fn strings_cannot_forge_sequence_encodings() {
        let tricky = vec!["a,1=s:\"b\"".to_owned()];
        let honest = vec!["a".to_owned(), "b".to_owned()];
        assert_ne!(key(&tricky), key(&honest));
    }

    #[test]
    fn records_ignore_field_order() {
        let mut l = IndexMap::new();
        l.insert("x".to_owned(), 1);
        l.insert("y".to_owned(), 2);
        let mut r = IndexMap::new();
        r.insert("y".to_owned(), 2);
        r.insert("x".to_owned(), 1);
        assert_eq!(key(&l), key(&r));
        assert!(equals(&l, &r));

        r.insert("z".to_owned(), 3);
        assert_ne!(key(&l), key(&r));
        assert!(!equals(&l, &r));
    }

    #[test]
    fn nested_composites_recurse() {
        let l = vec![(1, "a".to_owned()), (2, "b".to_owned())];
        let r = vec![(1, "a".to_owned()), (2, "b".to_owned())];
        assert_eq!(key(&l), key(&r));
        assert_eq!(
            key(&l).to_string(),
            "a:[0=a:[0=i:1,1=s:\"a\"],1=a:[0=i:2,1=s:\"b\"]]"
        );
    }

    #[test]
    fn hash_bits_follow_keys() {
        assert_eq!(hash_bits(&key("abc")), hash_bits(&key(&"abc".to_owned())));
        assert_eq!(key(&Some(3)), key(&3));
        assert_eq!(key(&None::<i32>), HashKey::null());
    }
}
