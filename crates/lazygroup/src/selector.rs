use core::{convert::Infallible, hash::Hash};

/// Computes the group key of an item.
///
/// Most callers never name this trait: [`lazy_group_by`](crate::lazy_group_by)
/// wraps a plain closure in [`KeyFn`], and
/// [`try_lazy_group_by`](crate::try_lazy_group_by) wraps a fallible one in
/// [`TryKeyFn`].
pub trait KeySelector<T> {
    /// The key items are grouped by.
    type Key: Hash + Eq + Clone;
    /// Failure type; [`Infallible`] for selectors that cannot fail.
    type Error;

    /// Returns the key of `item`.
    ///
    /// # Errors
    ///
    /// Returns the selector's own error when no key can be computed for
    /// `item`.
    fn select(&mut self, item: &T) -> Result<Self::Key, Self::Error>;
}

/// Adapts an infallible closure `FnMut(&T) -> K` into a [`KeySelector`].
#[derive(Clone, Copy)]
pub struct KeyFn<F>(pub F);

impl<T, K, F> KeySelector<T> for KeyFn<F>
where
    F: FnMut(&T) -> K,
    K: Hash + Eq + Clone,
{
    type Key = K;
    type Error = Infallible;

    #[inline]
    fn select(&mut self, item: &T) -> Result<K, Infallible> {
        Ok((self.0)(item))
    }
}

/// Adapts a fallible closure `FnMut(&T) -> Result<K, E>` into a
/// [`KeySelector`].
#[derive(Clone, Copy)]
pub struct TryKeyFn<F>(pub F);

impl<T, K, E, F> KeySelector<T> for TryKeyFn<F>
where
    F: FnMut(&T) -> Result<K, E>,
    K: Hash + Eq + Clone,
{
    type Key = K;
    type Error = E;

    #[inline]
    fn select(&mut self, item: &T) -> Result<K, E> {
        (self.0)(item)
    }
}
