//! Shared state behind a grouping and the two pull algorithms that advance
//! it.
//!
//! One `Engine` is owned (through `Rc<RefCell<_>>`) by a `Grouped` handle and
//! by every `Group` it has produced. It holds:
//! - the source cursor, fused so that pulls after the end keep returning
//!   `None`;
//! - the key-buffer table: one FIFO per key seen so far, holding items read
//!   from the source that their group has not consumed yet;
//! - the pending-key queue: keys discovered while advancing a group that the
//!   outer sequence has not produced yet, in discovery order;
//! - a stall slot for an item whose key selector failed, so the item is
//!   retried by the next pull instead of being dropped.
//!
//! A key has a buffer if and only if it has been seen. The pending-key queue
//! is a subset of the buffered keys. Every item read from the source is
//! either handed straight to the group pulling it or pushed onto exactly one
//! buffer.

use alloc::collections::VecDeque;
use core::iter::Fuse;

use hashbrown::{HashMap, hash_map::Entry};
use tracing::{debug, trace};

use crate::{GroupByError, GroupByOptions, KeySelector};

type Key<I, S> = <S as KeySelector<<I as Iterator>::Item>>::Key;
type Pulled<I, S> = Result<
    Option<(Key<I, S>, <I as Iterator>::Item)>,
    GroupByError<<S as KeySelector<<I as Iterator>::Item>>::Error>,
>;

pub(crate) struct Engine<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    source: Fuse<I>,
    selector: S,
    buffers: HashMap<S::Key, VecDeque<I::Item>>,
    pending: VecDeque<S::Key>,
    stalled: Option<I::Item>,
    pulled: usize,
    source_done: bool,
    buffer_capacity: usize,
}

impl<I, S> Engine<I, S>
where
    I: Iterator,
    S: KeySelector<I::Item>,
{
    pub(crate) fn new(source: I, selector: S, options: GroupByOptions) -> Self {
        Self {
            source: source.fuse(),
            selector,
            buffers: HashMap::with_capacity(options.expected_keys),
            pending: VecDeque::with_capacity(options.expected_keys),
            stalled: None,
            pulled: 0,
            source_done: false,
            buffer_capacity: options.buffer_capacity,
        }
    }

    /// Whether every item has been read from the source and classified.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.source_done && self.stalled.is_none()
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of items read from the source and not yet consumed by `key`'s
    /// group.
    pub(crate) fn buffered_len(&self, key: &S::Key) -> usize {
        self.buffers.get(key).map_or(0, VecDeque::len)
    }

    /// Produces the next item of `key`'s group.
    ///
    /// Drains the key's own buffer first, then reads from the source, filing
    /// every item of another key into that key's buffer.
    pub(crate) fn next_item(
        &mut self,
        key: &S::Key,
    ) -> Result<Option<I::Item>, GroupByError<S::Error>> {
        if let Some(item) = self.buffers.get_mut(key).and_then(VecDeque::pop_front) {
            return Ok(Some(item));
        }

        while let Some((item_key, item)) = self.pull()? {
            if item_key == *key {
                return Ok(Some(item));
            }
            self.file(item_key, item);
        }

        Ok(None)
    }

    /// Produces the next key of the outer sequence.
    ///
    /// Keys already discovered by group pulls come first. Otherwise the
    /// source is read until an unseen key turns up; its triggering item moves
    /// into the new buffer, so the key's group yields it on its first pull.
    pub(crate) fn next_key(&mut self) -> Result<Option<S::Key>, GroupByError<S::Error>> {
        if let Some(key) = self.pending.pop_front() {
            trace!(pending = self.pending.len(), "outer sequence took a pending key");
            return Ok(Some(key));
        }

        while let Some((key, item)) = self.pull()? {
            match self.buffers.entry(key) {
                Entry::Occupied(mut buffer) => buffer.get_mut().push_back(item),
                Entry::Vacant(slot) => {
                    let key = slot.key().clone();
                    let mut buffer = VecDeque::with_capacity(self.buffer_capacity);
                    buffer.push_back(item);
                    slot.insert(buffer);
                    trace!(
                        keys = self.buffers.len(),
                        position = self.pulled - 1,
                        "outer sequence discovered a key"
                    );
                    return Ok(Some(key));
                }
            }
        }

        Ok(None)
    }

    /// Reads one item (the stalled one first) and computes its key.
    ///
    /// On selector failure the item goes back into the stall slot and no
    /// other state changes.
    fn pull(&mut self) -> Pulled<I, S> {
        let item = match self.stalled.take() {
            Some(item) => item,
            None => match self.source.next() {
                Some(item) => {
                    self.pulled += 1;
                    item
                }
                None => {
                    if !self.source_done {
                        self.source_done = true;
                        debug!(
                            pulled = self.pulled,
                            keys = self.buffers.len(),
                            "source exhausted"
                        );
                    }
                    return Ok(None);
                }
            },
        };

        match self.selector.select(&item) {
            Ok(key) => Ok(Some((key, item))),
            Err(error) => {
                let position = self.pulled - 1;
                debug!(position, "key selector failed, item stalled");
                self.stalled = Some(item);
                Err(GroupByError::selector(error, position))
            }
        }
    }

    /// Buffers an off-key item, queueing its key if this is the first sighting.
    fn file(&mut self, key: S::Key, item: I::Item) {
        match self.buffers.entry(key) {
            Entry::Occupied(mut buffer) => buffer.get_mut().push_back(item),
            Entry::Vacant(slot) => {
                self.pending.push_back(slot.key().clone());
                let mut buffer = VecDeque::with_capacity(self.buffer_capacity);
                buffer.push_back(item);
                slot.insert(buffer);
                trace!(
                    keys = self.buffers.len(),
                    pending = self.pending.len(),
                    position = self.pulled - 1,
                    "group pull discovered a key"
                );
            }
        }
    }
}
