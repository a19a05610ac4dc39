/// Allocation hints for a [`Grouped`](crate::Grouped).
///
/// None of these change what the grouping yields; they only size the
/// internal tables up front.
///
/// # Examples
///
/// ```rust
/// use lazygroup::{GroupByOptions, Grouped, KeyFn};
///
/// let options = GroupByOptions {
///     expected_keys: 26,
///     ..Default::default()
/// };
/// let words = ["apple", "avocado", "banana"];
/// let grouped = Grouped::with_options(words, KeyFn(|w: &&str| w.as_bytes()[0]), options);
/// assert_eq!(grouped.keys().count(), 2);
/// ```
///
/// # Default
///
/// All hints default to `0`, meaning every table grows on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct GroupByOptions {
    /// Expected number of distinct keys.
    ///
    /// Used as the initial capacity of the key-buffer table, the pending-key
    /// queue and the memo of discovered groups.
    ///
    /// # Default
    ///
    /// `0`
    pub expected_keys: usize,

    /// Initial capacity of each per-key buffer, allocated when its key is
    /// first seen.
    ///
    /// # Default
    ///
    /// `0`
    pub buffer_capacity: usize,
}
