//! # credens-status — Bitstring Status Lists
//!
//! The revocation/suspension index for Credens credentials:
//!
//! - **StatusList** (`list.rs`): a fixed-capacity packed bitstring, one
//!   bit per credential, with bit-level-independent concurrent reads and
//!   writes backed by atomic words.
//! - **EncodedList** (`encoded.rs`): the published form — the packed
//!   bitstring gzip-compressed and base64url-encoded, so a 131,072-entry
//!   list serializes to a few hundred bytes when sparse.
//! - **StatusListEntry** (`entry.rs`): the credential-side pointer into a
//!   list (list id + index + purpose).
//! - **StatusRegistry** (`registry.rs`): an in-memory store of lists,
//!   one per issuer and purpose.
//!
//! A status list is read far more often than written: verification reads
//! one bit, revocation flips one bit. Capacity is fixed at creation;
//! growth means publishing a new list, never resizing in place.

pub mod encoded;
pub mod entry;
pub mod list;
pub mod registry;

pub use encoded::EncodedList;
pub use entry::StatusListEntry;
pub use list::{StatusList, StatusListError, StatusPurpose, DEFAULT_BIT_LENGTH};
pub use registry::StatusRegistry;
