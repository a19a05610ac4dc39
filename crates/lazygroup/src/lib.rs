//! Lazy, on-demand grouping of an iterator by key.
//!
//! [`lazy_group_by`] partitions a sequence into groups without consuming it
//! up front. Keys come out in first-occurrence order, and each [`Group`]
//! yields the items for its key in source order. All consumers share one
//! cursor over the source: pulling from any of them reads only as far as that
//! consumer needs, and items that belong to other keys are buffered until
//! their own group asks for them.
//!
//! ```rust
//! use lazygroup::lazy_group_by;
//!
//! let grouped = lazy_group_by([1, 2, 1, 3, 2, 1], |n: &i32| *n);
//!
//! let twos: Vec<_> = grouped.get_group(&2).unwrap().collect();
//! assert_eq!(twos, [2, 2]);
//!
//! let keys: Vec<_> = grouped.keys().collect();
//! assert_eq!(keys, [1, 2, 3]);
//!
//! let ones: Vec<_> = grouped.get_group(&1).unwrap().collect();
//! assert_eq!(ones, [1, 1, 1]);
//! ```
//!
//! Handles and groups are single-threaded (`!Send`). Calling back into the
//! grouping from inside the key selector panics.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod engine;
mod error;
mod ext;
mod group;
mod grouped;
mod options;
mod selector;

#[cfg(test)]
mod tests;

pub use error::GroupByError;
pub use ext::{LazyGroupByExt, lazy_group_by, try_lazy_group_by};
pub use group::{Group, TryGroup};
pub use grouped::{GroupMap, Grouped, Groups, Keys, TryGroups};
pub use options::GroupByOptions;
pub use selector::{KeyFn, KeySelector, TryKeyFn};
