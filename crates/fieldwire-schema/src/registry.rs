//! Process-wide schema cache.
//!
//! Schemas compile lazily on a type's first use, then live for the process
//! lifetime — there is no eviction and no hot reload of type definitions.
//! Lookups take a shared read lock so concurrent callers of already-compiled
//! types never contend; a cache miss upgrades to the write lock and
//! double-checks before compiling, so each type compiles at most once even
//! under a first-use race.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::compile::Schema;
use crate::error::Result;
use crate::record::Record;

type SchemaMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

fn cache() -> &'static RwLock<SchemaMap> {
    static CACHE: OnceLock<RwLock<SchemaMap>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get the compiled schema for `T`, compiling it on first use.
///
/// Compile errors are not cached: compilation is deterministic, so a type
/// that fails once fails identically on every subsequent call.
pub fn schema_of<T: Record>() -> Result<Arc<Schema<T>>> {
    let lock = cache();

    {
        let map = lock.read().unwrap_or_else(|e| e.into_inner());
        if let Some(found) = lookup::<T>(&map) {
            return Ok(found);
        }
    }

    let mut map = lock.write().unwrap_or_else(|e| e.into_inner());
    if let Some(found) = lookup::<T>(&map) {
        return Ok(found); // lost the race, reuse the winner's schema
    }

    let schema = Arc::new(Schema::<T>::compile()?);
    map.insert(TypeId::of::<T>(), schema.clone());
    tracing::debug!(
        type_name = schema.type_name(),
        entity_index = schema.entity_index(),
        field_count = schema.field_count(),
        "compiled record schema"
    );
    Ok(schema)
}

fn lookup<T: Record>(map: &SchemaMap) -> Option<Arc<Schema<T>>> {
    let entry = map.get(&TypeId::of::<T>())?;
    entry.clone().downcast::<Schema<T>>().ok()
}
