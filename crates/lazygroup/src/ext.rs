use core::hash::Hash;

use crate::{Grouped, KeyFn, TryKeyFn};

/// Lazily groups `items` by the key `key_fn` computes for each of them.
///
/// Nothing is read from `items` until the result, or one of its groups, is
/// pulled.
///
/// ```rust
/// use lazygroup::lazy_group_by;
///
/// let grouped = lazy_group_by([1, 2, 1, 3, 2, 1], |n: &i32| *n);
/// let groups: Vec<(i32, Vec<i32>)> = grouped
///     .iter()
///     .map(|(key, group)| (key, group.collect()))
///     .collect();
/// assert_eq!(groups, [(1, vec![1, 1, 1]), (2, vec![2, 2]), (3, vec![3])]);
/// ```
pub fn lazy_group_by<Src, K, F>(items: Src, key_fn: F) -> Grouped<Src::IntoIter, KeyFn<F>>
where
    Src: IntoIterator,
    F: FnMut(&Src::Item) -> K,
    K: Hash + Eq + Clone,
{
    Grouped::new(items, KeyFn(key_fn))
}

/// Lazily groups `items` by a key selector that may fail.
///
/// Selector failures surface as [`GroupByError`](crate::GroupByError)s from
/// whichever pull ran into them.
///
/// ```rust
/// use lazygroup::try_lazy_group_by;
///
/// let grouped = try_lazy_group_by(["1", "2", "one"], |s: &&str| s.parse::<u8>());
/// let keys: Result<Vec<_>, _> = grouped.try_iter().map(|e| e.map(|(k, _)| k)).collect();
/// assert_eq!(keys.unwrap_err().position(), 2);
/// ```
pub fn try_lazy_group_by<Src, K, E, F>(
    items: Src,
    key_fn: F,
) -> Grouped<Src::IntoIter, TryKeyFn<F>>
where
    Src: IntoIterator,
    F: FnMut(&Src::Item) -> Result<K, E>,
    K: Hash + Eq + Clone,
{
    Grouped::new(items, TryKeyFn(key_fn))
}

/// Adds [`lazy_group_by`] and [`try_lazy_group_by`] as iterator methods.
///
/// ```rust
/// use lazygroup::LazyGroupByExt;
///
/// let grouped = "a bb c dd".split(' ').lazy_group_by(|w| w.len());
/// assert_eq!(grouped.get_group(&2).unwrap().collect::<Vec<_>>(), ["bb", "dd"]);
/// ```
pub trait LazyGroupByExt: Iterator + Sized {
    /// See [`lazy_group_by`].
    fn lazy_group_by<K, F>(self, key_fn: F) -> Grouped<Self, KeyFn<F>>
    where
        F: FnMut(&Self::Item) -> K,
        K: Hash + Eq + Clone,
    {
        Grouped::new(self, KeyFn(key_fn))
    }

    /// See [`try_lazy_group_by`].
    fn try_lazy_group_by<K, E, F>(self, key_fn: F) -> Grouped<Self, TryKeyFn<F>>
    where
        F: FnMut(&Self::Item) -> Result<K, E>,
        K: Hash + Eq + Clone,
    {
        Grouped::new(self, TryKeyFn(key_fn))
    }
}

impl<I: Iterator> LazyGroupByExt for I {}
