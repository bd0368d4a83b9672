//! # Status Registry
//!
//! In-memory store of status lists, keyed by list identifier. An issuer
//! typically owns one revocation list and optionally one suspension list;
//! the registry hands out `Arc<StatusList>` so verification reads and
//! revocation writes share the same atomic bitstring without copying.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::list::{StatusList, StatusListError, StatusPurpose};

/// Concurrent in-memory registry of status lists.
#[derive(Debug, Default)]
pub struct StatusRegistry {
    lists: DashMap<String, Arc<StatusList>>,
}

impl StatusRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            lists: DashMap::new(),
        }
    }

    /// Create and register a fresh all-zero list for an issuer.
    ///
    /// The list id is derived from the issuer, the purpose, and a random
    /// suffix, so repeated calls never collide.
    pub fn create(
        &self,
        issuer: &str,
        purpose: StatusPurpose,
        bit_len: usize,
    ) -> Result<Arc<StatusList>, StatusListError> {
        let id = format!("{issuer}/status/{purpose}/{}", Uuid::new_v4());
        let list = Arc::new(StatusList::new(id.clone(), purpose, bit_len)?);
        self.lists.insert(id.clone(), Arc::clone(&list));
        info!(list_id = %id, %purpose, bit_len, "status list created");
        Ok(list)
    }

    /// Register an existing list under its own id, replacing any previous
    /// list with that id.
    pub fn insert(&self, list: StatusList) -> Arc<StatusList> {
        let list = Arc::new(list);
        self.lists.insert(list.id().to_string(), Arc::clone(&list));
        list
    }

    /// Look up a list by id.
    pub fn get(&self, list_id: &str) -> Option<Arc<StatusList>> {
        self.lists.get(list_id).map(|entry| Arc::clone(&entry))
    }

    /// Remove a list from the registry. Existing `Arc` handles stay valid.
    pub fn remove(&self, list_id: &str) -> Option<Arc<StatusList>> {
        self.lists.remove(list_id).map(|(_, list)| list)
    }

    /// Number of registered lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns true if no lists are registered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
