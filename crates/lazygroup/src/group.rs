use alloc::rc::Rc;
use core::{cell::RefCell, convert::Infallible, fmt};

use crate::{GroupByError, KeySelector, engine::Engine};

/// The lazily produced items of one key, in source order.
///
/// A `Group` is a cursor into state shared with its [`Grouped`] handle and
/// every other group of the same grouping. Pulling from it may read ahead in
/// the source and buffer items of other keys for their own groups. Clones
/// share the same buffer: an item taken through one clone is gone for all of
/// them, and a group fetched again with
/// [`Grouped::get_group`](crate::Grouped::get_group) resumes where the last
/// pull left off.
///
/// [`Grouped`]: crate::Grouped
pub struct Group<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    engine: Rc<RefCell<Engine<I, S>>>,
    key: S::Key,
}

impl<I, S> Group<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    pub(crate) fn new(engine: Rc<RefCell<Engine<I, S>>>, key: S::Key) -> Self {
        Self { engine, key }
    }

    /// The key this group collects.
    #[must_use]
    pub fn key(&self) -> &S::Key {
        &self.key
    }

    /// Items already read from the source for this key and not yet taken.
    ///
    /// The item that led to the key's discovery is counted here until the
    /// group first yields it, so a group fresh from the outer iteration
    /// reports at least `1`.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.engine.borrow().buffered_len(&self.key)
    }

    /// Pulls the next item of this group.
    ///
    /// Returns `Ok(None)` once the source is exhausted and the buffer is
    /// empty; from then on the group stays empty.
    ///
    /// # Errors
    ///
    /// Returns the key selector's failure on an item read while looking for
    /// the next match. The failing item is kept and retried by the next pull.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the key selector of the same grouping.
    pub fn try_next(&mut self) -> Result<Option<I::Item>, GroupByError<S::Error>> {
        self.engine.borrow_mut().next_item(&self.key)
    }

    /// Turns this group into an iterator of `Result`s, for fallible
    /// selectors.
    #[must_use]
    pub fn try_iter(self) -> TryGroup<I, S> {
        TryGroup { group: self }
    }

    fn remaining_hint(&self) -> (usize, Option<usize>) {
        let engine = self.engine.borrow();
        let buffered = engine.buffered_len(&self.key);
        if engine.is_exhausted() {
            (buffered, Some(buffered))
        } else {
            (buffered, None)
        }
    }
}

impl<I, S> Clone for Group<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    fn clone(&self) -> Self {
        Self {
            engine: Rc::clone(&self.engine),
            key: self.key.clone(),
        }
    }
}

impl<I, S> fmt::Debug for Group<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("key", &self.key)
            .field("buffered", &self.buffered_len())
            .finish_non_exhaustive()
    }
}

impl<I, S> Iterator for Group<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item, Error = Infallible>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(item) => item,
            Err(error) => match error.into_inner() {},
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining_hint()
    }
}

/// A [`Group`] yielding `Result`s, for groupings with a fallible selector.
///
/// After an `Err`, the next call retries the failed item.
pub struct TryGroup<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    group: Group<I, S>,
}

impl<I, S> TryGroup<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    /// Recovers the underlying group.
    #[must_use]
    pub fn into_inner(self) -> Group<I, S> {
        self.group
    }
}

impl<I, S> Iterator for TryGroup<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    type Item = Result<I::Item, GroupByError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.group.try_next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.group.remaining_hint()
    }
}
