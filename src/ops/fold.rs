//! Terminal folds.

/// Combine every element into `init`, front to back.
pub fn fold<I: IntoIterator, A>(input: I, init: A, mut f: impl FnMut(A, I::Item) -> A) -> A {
    let mut acc = init;
    for item in input {
        acc = f(acc, item);
    }
    acc
}

/// Fold seeded with the first element. `None` for an empty input.
pub fn reduce<I: IntoIterator>(
    input: I,
    f: impl FnMut(I::Item, I::Item) -> I::Item,
) -> Option<I::Item> {
    let mut iter = input.into_iter();
    let first = iter.next()?;
    Some(fold(iter, first, f))
}
