//! Single-pass lazy pipelines.
//!
//! A [`Stream`] owns a boxed lazy sequence. Chaining methods take the stream
//! by value and hand back a new one wrapping a combinator from
//! [`ops`](crate::ops), so a stream that has been extended or drained cannot
//! be touched again. Nothing runs until a terminal method pulls.
//!
//! [`SharedStream`] covers the cases where a stream has to be reached
//! through a shared reference; it enforces the same single-use rule at
//! runtime instead.
use std::{cmp::Ordering, fmt::Display, iter};

use crate::{
    error::Result,
    map::HashMap,
    oracle::StructuralHash,
    ops::{
        self, Chunks, Distinct, DropWhile, Filter, FilterMap, FlatMap, GroupAdjacent, Interleave,
        Intersperse, Map, Repeat, Reversed, Scan, Skip, Sorted, Take, TakeWhile, Zip,
    },
    set::HashSet,
    table::TableBuilder,
};

mod shared;
mod sink;

pub use shared::SharedStream;
pub use sink::WriteMode;

/// The boxed sequence behind a stream.
pub type IntoIter<T> = Box<dyn Iterator<Item = T>>;

#[must_use = "streams are lazy and do nothing unless consumed"]
pub struct Stream<T> {
    inner: IntoIter<T>,
}

impl<T: 'static> Stream<T> {
    fn wrap(inner: impl Iterator<Item = T> + 'static) -> Stream<T> {
        Stream {
            inner: Box::new(inner),
        }
    }

    /// A stream of exactly one element.
    pub fn emit(value: T) -> Stream<T> {
        Stream::wrap(iter::once(value))
    }

    /// A stream over any iterable source. The source is not read until the
    /// stream is.
    pub fn emit_all<I>(source: I) -> Stream<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Stream::wrap(source.into_iter())
    }

    pub fn empty() -> Stream<T> {
        Stream::wrap(iter::empty())
    }

    /// `value`, forever.
    pub fn constant(value: T) -> Stream<T>
    where
        T: Clone,
    {
        Stream::wrap(iter::repeat(value))
    }

    /// `seed`, `f(seed)`, `f(f(seed))`, and so on.
    pub fn iterate(seed: T, mut f: impl FnMut(&T) -> T + 'static) -> Stream<T> {
        Stream::wrap(iter::successors(Some(seed), move |prev| Some(f(prev))))
    }

    /// Generate elements from a state until `f` returns `None`.
    pub fn unfold<S: 'static>(
        seed: S,
        mut f: impl FnMut(S) -> Option<(T, S)> + 'static,
    ) -> Stream<T> {
        let mut state = Some(seed);
        Stream::wrap(iter::from_fn(move || {
            let (item, next) = f(state.take()?)?;
            state = Some(next);
            Some(item)
        }))
    }

    pub fn map<U: 'static>(self, f: impl FnMut(T) -> U + 'static) -> Stream<U> {
        Stream::wrap(Map::new(self.inner, f))
    }

    pub fn filter(self, pred: impl FnMut(&T) -> bool + 'static) -> Stream<T> {
        Stream::wrap(Filter::new(self.inner, pred))
    }

    pub fn filter_map<U: 'static>(self, f: impl FnMut(T) -> Option<U> + 'static) -> Stream<U> {
        Stream::wrap(FilterMap::new(self.inner, f))
    }

    pub fn flat_map<I>(self, f: impl FnMut(T) -> I + 'static) -> Stream<I::Item>
    where
        I: IntoIterator + 'static,
        I::IntoIter: 'static,
        I::Item: 'static,
    {
        Stream::wrap(FlatMap::new(self.inner, f))
    }

    pub fn take(self, n: usize) -> Stream<T> {
        Stream::wrap(Take::new(self.inner, n))
    }

    pub fn drop(self, n: usize) -> Stream<T> {
        Stream::wrap(Skip::new(self.inner, n))
    }

    pub fn take_while(self, pred: impl FnMut(&T) -> bool + 'static) -> Stream<T> {
        Stream::wrap(TakeWhile::new(self.inner, pred))
    }

    pub fn drop_while(self, pred: impl FnMut(&T) -> bool + 'static) -> Stream<T> {
        Stream::wrap(DropWhile::new(self.inner, pred))
    }

    pub fn zip<U: 'static>(self, other: Stream<U>) -> Stream<(T, U)> {
        Stream::wrap(Zip::new(self.inner, other.inner))
    }

    /// Pair each element with its position, counting from zero.
    pub fn zip_with_index(self) -> Stream<(T, usize)> {
        Stream::wrap(Zip::new(self.inner, 0..))
    }

    /// Runs of consecutive elements with equal discriminators.
    pub fn group_adjacent<G: PartialEq + 'static>(
        self,
        disc: impl FnMut(&T) -> G + 'static,
    ) -> Stream<(G, Vec<T>)> {
        Stream::wrap(GroupAdjacent::new(self.inner, disc))
    }

    /// Vectors of `size` elements; the last may be shorter.
    pub fn chunk(self, size: usize) -> Stream<Vec<T>> {
        Stream::wrap(Chunks::new(self.inner, size))
    }

    pub fn intersperse(self, sep: T) -> Stream<T>
    where
        T: Clone,
    {
        Stream::wrap(Intersperse::new(self.inner, sep))
    }

    pub fn interleave(self, other: Stream<T>) -> Stream<T> {
        Stream::wrap(Interleave::new(self.inner, other.inner))
    }

    /// Running fold, yielding every intermediate accumulator.
    pub fn scan<A: Clone + 'static>(
        self,
        init: A,
        f: impl FnMut(A, T) -> A + 'static,
    ) -> Stream<A> {
        Stream::wrap(Scan::new(self.inner, init, f))
    }

    pub fn append(self, other: Stream<T>) -> Stream<T> {
        Stream::wrap(self.inner.chain(other.inner))
    }

    pub fn prepend(self, other: Stream<T>) -> Stream<T> {
        Stream::wrap(other.inner.chain(self.inner))
    }

    /// Run `f` on each element as it passes through.
    pub fn tap(self, mut f: impl FnMut(&T) + 'static) -> Stream<T> {
        Stream::wrap(Map::new(self.inner, move |item: T| {
            f(&item);
            item
        }))
    }

    /// Drop elements structurally equal to an earlier one.
    pub fn distinct(self) -> Stream<T>
    where
        T: StructuralHash + Clone,
    {
        Stream::wrap(Distinct::new(self.inner))
    }

    /// Buffering: drains the whole upstream on the first pull.
    pub fn sorted(self) -> Stream<T>
    where
        T: Ord,
    {
        Stream::wrap(Sorted::new(self.inner, Ord::cmp))
    }

    /// Buffering: drains the whole upstream on the first pull.
    pub fn sorted_by(self, cmp: impl FnMut(&T, &T) -> Ordering + 'static) -> Stream<T> {
        Stream::wrap(Sorted::new(self.inner, cmp))
    }

    /// Buffering: drains the whole upstream on the first pull.
    pub fn reverse(self) -> Stream<T> {
        Stream::wrap(Reversed::new(self.inner))
    }

    /// Replay the upstream forever. The upstream must be finite; it is read
    /// once, into memory, on the first pull.
    pub fn repeat(self) -> Stream<T>
    where
        T: Clone,
    {
        Stream::wrap(Repeat::forever(self.inner))
    }

    /// Replay the upstream `times` times, reading it only once.
    pub fn repeat_n(self, times: usize) -> Stream<T>
    where
        T: Clone,
    {
        Stream::wrap(Repeat::times(self.inner, times))
    }

    /// Pull everything and discard it, for the side effects upstream.
    pub fn drain(self) {
        self.inner.for_each(drop)
    }

    pub fn to_list(self) -> Vec<T> {
        self.inner.collect()
    }

    pub fn fold<A>(self, init: A, f: impl FnMut(A, T) -> A) -> A {
        ops::fold(self.inner, init, f)
    }

    /// `None` for an empty stream.
    pub fn reduce(self, f: impl FnMut(T, T) -> T) -> Option<T> {
        ops::reduce(self.inner, f)
    }

    /// Pulls a single element.
    pub fn first(mut self) -> Option<T> {
        self.inner.next()
    }

    pub fn last(self) -> Option<T> {
        self.inner.last()
    }

    pub fn count(self) -> usize {
        self.inner.count()
    }

    /// Stops pulling at the first match.
    pub fn find(mut self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        self.inner.find(|item| pred(item))
    }

    pub fn exists(mut self, pred: impl FnMut(T) -> bool) -> bool {
        self.inner.any(pred)
    }

    pub fn forall(mut self, pred: impl FnMut(T) -> bool) -> bool {
        self.inner.all(pred)
    }

    pub fn for_each(self, f: impl FnMut(T)) {
        self.inner.for_each(f)
    }

    /// Join the elements' display forms with `sep`.
    pub fn mk_string(self, sep: &str) -> String
    where
        T: Display,
    {
        let mut out = String::new();
        for (i, item) in self.inner.enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&item.to_string());
        }
        out
    }

    pub fn to_hash_set(self) -> Result<HashSet<T>>
    where
        T: StructuralHash + Clone,
    {
        HashSet::collect(self.inner)
    }

    /// Buffering: drains the whole stream into groups keyed by `disc`. Each
    /// group keeps its elements in stream order.
    pub fn group_by<G: StructuralHash + Clone>(
        self,
        mut disc: impl FnMut(&T) -> G,
    ) -> Result<HashMap<G, Vec<T>>>
    where
        T: Clone,
    {
        let mut groups: TableBuilder<G, Vec<T>> = TableBuilder::new();
        let mut total = 0usize;
        for item in self.inner {
            total += 1;
            let g = disc(&item);
            let hash = g.hash_key()?;
            match groups.get_mut_hashed(&hash, &g) {
                Some(members) => members.push(item),
                None => {
                    groups.update(g, vec![item])?;
                }
            }
        }
        log::debug!("grouped {total} stream elements into {} groups", groups.len());
        Ok(HashMap::from_table(groups.freeze()))
    }

    /// Share this stream behind a runtime single-use check.
    pub fn share(self) -> SharedStream<T> {
        SharedStream::new(self)
    }
}

impl<K, V> Stream<(K, V)>
where
    K: StructuralHash + Clone + 'static,
    V: Clone + 'static,
{
    /// Collect pairs into a map; a repeated key keeps its last value.
    pub fn to_hash_map(self) -> Result<HashMap<K, V>> {
        HashMap::collect(self.inner)
    }
}

impl Stream<i64> {
    /// `start`, `start + step`, ... up to but excluding `stop`. A negative
    /// `step` counts down; a zero `step` yields nothing.
    pub fn range(start: i64, stop: i64, step: i64) -> Stream<i64> {
        let mut next = Some(start);
        Stream::wrap(iter::from_fn(move || {
            let current = next?;
            let in_range = match step.cmp(&0) {
                Ordering::Greater => current < stop,
                Ordering::Less => current > stop,
                Ordering::Equal => false,
            };
            if !in_range {
                next = None;
                return None;
            }
            next = current.checked_add(step);
            Some(current)
        }))
    }

    /// The naturals, from zero.
    pub fn infinite() -> Stream<i64> {
        Stream::wrap(0..)
    }
}

impl<T: 'static> IntoIterator for Stream<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.inner
    }
}

impl<T: 'static> FromIterator<T> for Stream<T> {
    /// Buffers the items; use [`Stream::emit_all`] to stay lazy.
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Stream<T> {
        Stream::emit_all(items.into_iter().collect::<Vec<_>>())
    }
}
