use std::cell::{Cell, RefCell};

use crate::error::{Error, Result};

use super::{IntoIter, Stream};

/// A stream reachable through a shared reference.
///
/// The handle may be extended once (`fork` and the chaining helpers) or
/// drained once (`consume` and the terminal helpers), never both and never
/// twice. Breaking the rule is reported as [`Error::AlreadyForked`] or
/// [`Error::AlreadyConsumed`] rather than by a panic.
pub struct SharedStream<T> {
    inner: RefCell<Option<Stream<T>>>,
    consumed: Cell<bool>,
    forked: Cell<bool>,
}

impl<T: 'static> SharedStream<T> {
    pub fn new(stream: Stream<T>) -> SharedStream<T> {
        SharedStream {
            inner: RefCell::new(Some(stream)),
            consumed: Cell::new(false),
            forked: Cell::new(false),
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    pub fn is_forked(&self) -> bool {
        self.forked.get()
    }

    fn take_inner(&self) -> Result<Stream<T>> {
        // Both flags are set before the stream leaves, so an empty slot is
        // always explained by one of them.
        self.inner.borrow_mut().take().ok_or(if self.forked.get() {
            Error::AlreadyForked
        } else {
            Error::AlreadyConsumed
        })
    }

    /// Extend the stream with `f`, handing back a fresh handle.
    pub fn fork<U: 'static>(
        &self,
        f: impl FnOnce(Stream<T>) -> Stream<U>,
    ) -> Result<SharedStream<U>> {
        if self.forked.get() {
            return Err(Error::AlreadyForked);
        }
        if self.consumed.get() {
            return Err(Error::AlreadyConsumed);
        }
        self.forked.set(true);
        log::trace!("shared stream forked");
        Ok(SharedStream::new(f(self.take_inner()?)))
    }

    /// Run the terminal `f` over the stream.
    pub fn consume<R>(&self, f: impl FnOnce(Stream<T>) -> R) -> Result<R> {
        if self.consumed.get() {
            return Err(Error::AlreadyConsumed);
        }
        if self.forked.get() {
            return Err(Error::AlreadyForked);
        }
        self.consumed.set(true);
        log::trace!("shared stream consumed");
        Ok(f(self.take_inner()?))
    }

    pub fn map<U: 'static>(&self, f: impl FnMut(T) -> U + 'static) -> Result<SharedStream<U>> {
        self.fork(|s| s.map(f))
    }

    pub fn filter(&self, pred: impl FnMut(&T) -> bool + 'static) -> Result<SharedStream<T>> {
        self.fork(|s| s.filter(pred))
    }

    pub fn take(&self, n: usize) -> Result<SharedStream<T>> {
        self.fork(|s| s.take(n))
    }

    pub fn drop(&self, n: usize) -> Result<SharedStream<T>> {
        self.fork(|s| s.drop(n))
    }

    pub fn drain(&self) -> Result<()> {
        self.consume(Stream::drain)
    }

    pub fn to_list(&self) -> Result<Vec<T>> {
        self.consume(Stream::to_list)
    }

    pub fn fold<A>(&self, init: A, f: impl FnMut(A, T) -> A) -> Result<A> {
        self.consume(|s| s.fold(init, f))
    }

    pub fn reduce(&self, f: impl FnMut(T, T) -> T) -> Result<Option<T>> {
        self.consume(|s| s.reduce(f))
    }

    pub fn first(&self) -> Result<Option<T>> {
        self.consume(Stream::first)
    }

    /// Iterate the stream. Counts as the terminal use.
    pub fn try_iter(&self) -> Result<IntoIter<T>> {
        self.consume(Stream::into_iter)
    }
}

impl<T: 'static> From<Stream<T>> for SharedStream<T> {
    fn from(stream: Stream<T>) -> SharedStream<T> {
        SharedStream::new(stream)
    }
}
