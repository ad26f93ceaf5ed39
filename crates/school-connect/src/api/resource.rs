use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::access::{Access, Viewer};
use super::ApiError;
use crate::store::{Record, SchoolStore, StoreError, Table};

/// A record type exposed as a list/detail HTTP resource.
///
/// Hooks default to no-ops; a resource overrides the ones its rows need.
pub trait Resource: Send + Sync + 'static {
    type Record: Record;
    /// Query parameters accepted by the list endpoint.
    type Filter: DeserializeOwned + Default + Send + 'static;

    /// Path segment below the group prefix.
    const PATH: &'static str;
    const ACCESS: Access;

    fn table(store: &SchoolStore) -> &Table<Self::Record>;

    fn ordering(a: &Self::Record, b: &Self::Record) -> Ordering;

    /// Base filter and per-caller scoping. Rows failing it behave as absent.
    fn visible(
        _store: &SchoolStore,
        _record: &Self::Record,
        _viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(true)
    }

    fn matches(_record: &Self::Record, _filter: &Self::Filter) -> bool {
        true
    }

    /// Fill derived and caller-owned fields before a write. `stored` is the
    /// current row on update.
    fn prepare(
        _store: &SchoolStore,
        _record: &mut Self::Record,
        _stored: Option<&Self::Record>,
        _viewer: &Viewer,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    fn check_references(_store: &SchoolStore, _record: &Self::Record) -> Result<(), StoreError> {
        Ok(())
    }

    fn after_create(_store: &SchoolStore, _record: &Self::Record) -> Result<(), StoreError> {
        Ok(())
    }

    /// Cascade and set-null actions, run after the row itself is gone.
    fn on_delete(_store: &SchoolStore, _record: &Self::Record) -> Result<(), StoreError> {
        Ok(())
    }

    /// Representation sent to clients.
    fn present(_store: &SchoolStore, record: &Self::Record) -> Result<Value, ApiError> {
        Ok(serde_json::to_value(record)?)
    }
}

/// Filter for resources whose list endpoint takes no parameters.
#[derive(Debug, Default, Deserialize)]
pub struct NoFilter {}

/// Add computed fields to a record's serialized object.
pub fn with_fields<R: Record>(
    record: &R,
    extra: impl IntoIterator<Item = (&'static str, Value)>,
) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        for (key, computed) in extra {
            fields.insert(key.to_string(), computed);
        }
    }
    Ok(value)
}
