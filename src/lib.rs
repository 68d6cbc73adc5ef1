//! Keyset ("cursor") pagination.
//!
//! Given a strict multi-column sort order, [`PredicateBuilder`] produces a
//! filter selecting exactly the records strictly after (or before) an anchor
//! record, expressible as a single indexed range query. [`Paginator`] wraps
//! it in the page protocol: resolve a [`Position`] into its anchor with one
//! unique-key lookup, fetch one ordered page and probe whether more exist.
//!
//! ```
//! use keyset_page::{fetch_page, MemoryCollection, PaginationDirection, Row, SortColumn, SortSpec};
//!
//! let posts = MemoryCollection::new("id", (1..=5).map(|id| Row::new().with("id", id).with("votes", id % 2)));
//! let spec = SortSpec::new(vec![SortColumn::desc("votes"), SortColumn::asc("id")])?;
//!
//! let first = fetch_page(&posts, &spec, None, PaginationDirection::After, 2)?;
//! let cursor = first.last_position("id");
//! let second = fetch_page(&posts, &spec, cursor.as_ref(), PaginationDirection::After, 2)?;
//! assert!(second.has_more);
//! # Ok::<(), keyset_page::Error>(())
//! ```

#[macro_use]
extern crate cfg_if;
#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate serde;

mod anchor;
mod builder;
mod collection;
mod config;
mod cursor;
mod error;
mod fetch;
mod page;
mod predicate;
mod sort;
mod value;

pub use crate::anchor::*;
pub use crate::builder::*;
pub use crate::collection::*;
pub use crate::config::*;
pub use crate::cursor::*;
pub use crate::error::*;
pub use crate::fetch::*;
pub use crate::page::*;
pub use crate::predicate::*;
pub use crate::sort::*;
pub use crate::value::*;

cfg_if! { if #[cfg(feature = "diesel")] {
    mod diesel;
    pub use crate::diesel::*;
} }
