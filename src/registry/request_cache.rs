//! Request-scoped metadata cache.
//!
//! The request pipeline looks metadata up once per request and may need it
//! again at several points (input validation, status assignment, output
//! validation). Entries are keyed by request *identity* — an opaque id the
//! pipeline assigns — never by derivable values, so pooled/reused request
//! objects cannot observe a previous request's entry. The pipeline owns the
//! cache and must clear each entry explicitly when its request completes.

use std::collections::HashMap;

use crate::registry::{ActionMetadata, RouteTable};

/// Opaque identity of one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

/// Per-request cache of lookup results.
#[derive(Debug, Default)]
pub struct RequestMetadataCache {
    entries: HashMap<RequestId, ActionMetadata>,
}

impl RequestMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached metadata for `id`, consulting the table on a cache
    /// miss. Lookup misses are not cached: an unmatched route yields `None`
    /// every time, which is the signal to skip validation.
    pub fn get_or_lookup(
        &mut self,
        table: &RouteTable,
        id: RequestId,
        method: &str,
        path: &str,
    ) -> Option<&ActionMetadata> {
        if !self.entries.contains_key(&id) {
            if let Some(metadata) = table.lookup(method, path) {
                self.entries.insert(id, metadata.clone());
            }
        }
        self.entries.get(&id)
    }

    /// Drop the entry for a completed request.
    pub fn clear(&mut self, id: RequestId) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
