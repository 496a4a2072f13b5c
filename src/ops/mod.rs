//! Lazy, single-purpose sequence combinators.
//!
//! Each combinator is an [`Iterator`] bound to exactly one upstream input
//! (two for [`Zip`] and [`Interleave`]). Nothing is pulled until the
//! consumer asks for it, and no combinator reads more than one element past
//! what it has yielded. The exceptions buffer their whole input on the first
//! pull and say so in their docs: [`Sorted`], [`Reversed`] and [`Repeat`].
mod chunks;
mod distinct;
mod drop_while;
mod filter;
mod filter_map;
mod flat_map;
mod fold;
mod group_adjacent;
mod interleave;
mod intersperse;
mod map;
mod repeat;
mod reversed;
mod scan;
mod skip;
mod sorted;
mod take;
mod take_while;
mod zip;

pub use chunks::Chunks;
pub use distinct::Distinct;
pub use drop_while::DropWhile;
pub use filter::Filter;
pub use filter_map::FilterMap;
pub use flat_map::FlatMap;
pub use fold::{fold, reduce};
pub use group_adjacent::GroupAdjacent;
pub use interleave::Interleave;
pub use intersperse::Intersperse;
pub use map::Map;
pub use repeat::Repeat;
pub use reversed::Reversed;
pub use scan::Scan;
pub use skip::Skip;
pub use sorted::Sorted;
pub use take::Take;
pub use take_while::TakeWhile;
pub use zip::Zip;
