// src/listing/mod.rs

//! Directory enumeration.
//!
//! - [`entry`] defines the immutable [`Entry`] handed to the engine.
//! - [`lister`] reads a directory once, filters it according to a
//!   [`ListingPolicy`] and returns the entries in byte-wise name order.

pub mod entry;
pub mod lister;

pub use entry::Entry;
pub use lister::{EntryLister, ListingPolicy, sort_entries};
