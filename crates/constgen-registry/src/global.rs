use crate::{id::QualifiedId, registry::MemoryRegistry};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

///
/// REGISTRY
/// the process-wide registry, filled by in-process registration
///

static REGISTRY: LazyLock<RwLock<MemoryRegistry>> =
    LazyLock::new(|| RwLock::new(MemoryRegistry::new()));

/// Acquire a write guard to the global registry.
pub fn registry_write() -> RwLockWriteGuard<'static, MemoryRegistry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire a read guard to the global registry.
pub fn registry_read() -> RwLockReadGuard<'static, MemoryRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Append one identifier to the global registry.
pub fn register(id: &QualifiedId) {
    registry_write().register(id);
}

/// Copy of the global registry, detached from the lock.
#[must_use]
pub fn snapshot() -> MemoryRegistry {
    registry_read().clone()
}
