//! Synthesized type cache
//!
//! Maps a contract to its synthesized type. Synthesis runs under the entry
//! lock of the contract's shard, so concurrent first requests for the same
//! contract produce exactly one type. Failed syntheses are not cached; the
//! next request retries.

use crate::synthesizer::SynthesizedType;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use observable_proxy_core::{ContractId, ProxyResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Contract → synthesized type, filled on first use
#[derive(Default)]
pub struct TypeCache {
    types: DashMap<ContractId, Arc<SynthesizedType>>,
    syntheses: AtomicU64,
}

impl TypeCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached type for `contract`, if any
    pub fn get(&self, contract: &ContractId) -> Option<Arc<SynthesizedType>> {
        self.types.get(contract).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the cached type, or run `synthesize` and cache its result.
    ///
    /// `synthesize` runs at most once per contract among concurrent callers.
    pub fn get_or_synthesize<F>(
        &self,
        contract: ContractId,
        synthesize: F,
    ) -> ProxyResult<Arc<SynthesizedType>>
    where
        F: FnOnce() -> ProxyResult<SynthesizedType>,
    {
        // Fast path: no write lock once the type exists
        if let Some(ty) = self.get(&contract) {
            return Ok(ty);
        }

        match self.types.entry(contract) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let ty = Arc::new(synthesize()?);
                self.syntheses.fetch_add(1, Ordering::Relaxed);
                entry.insert(Arc::clone(&ty));
                Ok(ty)
            }
        }
    }

    /// Number of cached types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing has been synthesized yet
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Total successful syntheses
    pub fn syntheses(&self) -> u64 {
        self.syntheses.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for TypeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCache")
            .field("types", &self.types.len())
            .field("syntheses", &self.syntheses())
            .finish()
    }
}
