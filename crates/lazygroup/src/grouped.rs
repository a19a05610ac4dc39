use alloc::{rc::Rc, vec::Vec};
use core::{cell::RefCell, convert::Infallible, fmt};

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::{GroupByError, GroupByOptions, KeySelector, engine::Engine, group::Group};

/// Insertion-ordered map returned by [`Grouped::into_groups`].
pub type GroupMap<K, T> = IndexMap<K, Vec<T>, DefaultHashBuilder>;

type Memo<I, S> =
    IndexMap<<S as KeySelector<<I as Iterator>::Item>>::Key, Group<I, S>, DefaultHashBuilder>;
type Entry<I, S> = (<S as KeySelector<<I as Iterator>::Item>>::Key, Group<I, S>);
type Advanced<I, S> =
    Result<Option<Entry<I, S>>, GroupByError<<S as KeySelector<<I as Iterator>::Item>>::Error>>;

/// A lazily grouped sequence.
///
/// Iterating a `Grouped` yields `(key, group)` pairs in first-occurrence
/// order of the keys. Every pair produced is remembered, so later
/// iterations replay the known pairs before reading further, and
/// [`get_group`](Self::get_group) answers known keys without touching the
/// source.
///
/// ```rust
/// use lazygroup::lazy_group_by;
///
/// let grouped = lazy_group_by(["a", "bb", "c", "dd"], |s: &&str| s.len());
/// for (len, group) in &grouped {
///     let words: Vec<_> = group.collect();
///     assert!(words.iter().all(|w| w.len() == len));
/// }
/// assert!(grouped.get_group(&3).is_none());
/// ```
pub struct Grouped<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    engine: Rc<RefCell<Engine<I, S>>>,
    memo: RefCell<Memo<I, S>>,
}

impl<I, S> Grouped<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    /// Groups `items` by `selector` with default options.
    pub fn new<Src>(items: Src, selector: S) -> Self
    where
        Src: IntoIterator<IntoIter = I>,
    {
        Self::with_options(items, selector, GroupByOptions::default())
    }

    /// Groups `items` by `selector`, sizing internal tables from `options`.
    pub fn with_options<Src>(items: Src, selector: S, options: GroupByOptions) -> Self
    where
        Src: IntoIterator<IntoIter = I>,
    {
        Self {
            engine: Rc::new(RefCell::new(Engine::new(
                items.into_iter(),
                selector,
                options,
            ))),
            memo: RefCell::new(IndexMap::with_capacity_and_hasher(
                options.expected_keys,
                DefaultHashBuilder::default(),
            )),
        }
    }

    /// Number of keys discovered so far.
    #[must_use]
    pub fn discovered_len(&self) -> usize {
        self.memo.borrow().len()
    }

    /// Whether the whole source has been read.
    ///
    /// Keys may still be undiscovered by this handle, but no further
    /// reading is needed to produce them.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.engine.borrow().is_exhausted()
    }

    /// Iterates `(key, group)` pairs, yielding `Result`s for fallible
    /// selectors.
    ///
    /// After an `Err`, the next call retries the item that failed.
    #[must_use]
    pub fn try_iter(&self) -> TryGroups<'_, I, S> {
        TryGroups {
            cursor: Cursor::new(self),
        }
    }

    /// Looks up the group of `key`, reading the source only until the key
    /// is discovered.
    ///
    /// Returns `Ok(None)` if `key` never occurs. Every key discovered along
    /// the way is remembered.
    ///
    /// # Errors
    ///
    /// Returns the key selector's failure on an item read during the search.
    /// Searching again retries that item.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the key selector of the same grouping.
    pub fn try_get_group(
        &self,
        key: &S::Key,
    ) -> Result<Option<Group<I, S>>, GroupByError<S::Error>> {
        if let Some(group) = self.memo.borrow().get(key) {
            return Ok(Some(group.clone()));
        }

        while let Some((found, group)) = self.advance()? {
            if found == *key {
                return Ok(Some(group));
            }
        }

        Ok(None)
    }

    /// Drains the whole grouping into an insertion-ordered map.
    ///
    /// # Errors
    ///
    /// Returns the first key selector failure.
    pub fn try_into_groups(self) -> Result<GroupMap<S::Key, I::Item>, GroupByError<S::Error>> {
        let mut groups = GroupMap::with_capacity_and_hasher(
            self.discovered_len(),
            DefaultHashBuilder::default(),
        );
        for entry in self.try_iter() {
            let (key, group) = entry?;
            let items = group.try_iter().collect::<Result<Vec<_>, _>>()?;
            groups.insert(key, items);
        }
        Ok(groups)
    }

    /// Pulls the next key from the outer sequence and remembers its group.
    fn advance(&self) -> Advanced<I, S> {
        let Some(key) = self.engine.borrow_mut().next_key()? else {
            return Ok(None);
        };
        let group = Group::new(Rc::clone(&self.engine), key.clone());
        self.memo.borrow_mut().insert(key.clone(), group.clone());
        Ok(Some((key, group)))
    }
}

impl<I, S> Grouped<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item, Error = Infallible>,
{
    /// Iterates `(key, group)` pairs in first-occurrence order of the keys.
    ///
    /// Pairs already discovered are replayed first; the rest are discovered
    /// as the iterator advances. Several iterators over one handle may be
    /// live at once and each yields every key exactly once.
    #[must_use]
    pub fn iter(&self) -> Groups<'_, I, S> {
        Groups {
            cursor: Cursor::new(self),
        }
    }

    /// Iterates the keys in first-occurrence order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, I, S> {
        Keys { groups: self.iter() }
    }

    /// Looks up the group of `key`, reading the source only until the key
    /// is discovered. Returns `None` if `key` never occurs.
    ///
    /// # Panics
    ///
    /// Panics if called from inside the key selector of the same grouping.
    #[must_use]
    pub fn get_group(&self, key: &S::Key) -> Option<Group<I, S>> {
        match self.try_get_group(key) {
            Ok(group) => group,
            Err(error) => match error.into_inner() {},
        }
    }

    /// Drains the whole grouping into an insertion-ordered map.
    #[must_use]
    pub fn into_groups(self) -> GroupMap<S::Key, I::Item> {
        match self.try_into_groups() {
            Ok(groups) => groups,
            Err(error) => match error.into_inner() {},
        }
    }
}

impl<I, S> fmt::Debug for Grouped<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let memo = self.memo.borrow();
        f.debug_struct("Grouped")
            .field("keys", &memo.keys().collect::<Vec<_>>())
            .field("exhausted", &self.is_exhausted())
            .finish_non_exhaustive()
    }
}

impl<'a, I, S> IntoIterator for &'a Grouped<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item, Error = Infallible>,
{
    type Item = (S::Key, Group<I, S>);
    type IntoIter = Groups<'a, I, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Position of one iteration over a handle's memo.
struct Cursor<'a, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    grouped: &'a Grouped<I, S>,
    position: usize,
}

impl<'a, I, S> Cursor<'a, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    fn new(grouped: &'a Grouped<I, S>) -> Self {
        Self {
            grouped,
            position: 0,
        }
    }

    // Reads the memo at `position`; when the cursor has caught up, the next
    // pair is appended there by `advance`.
    fn try_next(&mut self) -> Advanced<I, S> {
        let memoized = self
            .grouped
            .memo
            .borrow()
            .get_index(self.position)
            .map(|(key, group)| (key.clone(), group.clone()));

        let entry = match memoized {
            Some(entry) => Some(entry),
            None => self.grouped.advance()?,
        };
        if entry.is_some() {
            self.position += 1;
        }
        Ok(entry)
    }

    // Keys still in the pending queue are certain to come out; only an
    // exhausted source bounds the total.
    fn size_hint(&self) -> (usize, Option<usize>) {
        let known = self.grouped.discovered_len().saturating_sub(self.position);
        let engine = self.grouped.engine.borrow();
        let lower = known + engine.pending_len();
        if engine.is_exhausted() {
            (lower, Some(lower))
        } else {
            (lower, None)
        }
    }
}

/// Iterator over the `(key, group)` pairs of a [`Grouped`].
pub struct Groups<'a, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    cursor: Cursor<'a, I, S>,
}

impl<I, S> Iterator for Groups<'_, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item, Error = Infallible>,
{
    type Item = (S::Key, Group<I, S>);

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.try_next() {
            Ok(entry) => entry,
            Err(error) => match error.into_inner() {},
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

/// Fallible iterator over the `(key, group)` pairs of a [`Grouped`].
pub struct TryGroups<'a, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    cursor: Cursor<'a, I, S>,
}

impl<I, S> Iterator for TryGroups<'_, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    type Item = Result<(S::Key, Group<I, S>), GroupByError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.try_next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

/// Iterator over the keys of a [`Grouped`], in first-occurrence order.
pub struct Keys<'a, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    groups: Groups<'a, I, S>,
}

impl<I, S> Iterator for Keys<'_, I, S>
where
    I: Iterator,
    S: KeySelector<I::Item, Error = Infallible>,
{
    type Item = S::Key;

    fn next(&mut self) -> Option<Self::Item> {
        self.groups.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groups.size_hint()
    }
}
