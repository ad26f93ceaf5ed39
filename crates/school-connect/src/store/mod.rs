//! Constraint-aware in-process storage shared by every resource group.

mod record;
pub mod snapshot;
mod table;
pub mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::accounts::AccountTables;
use crate::academics::AcademicTables;
use crate::admissions::AdmissionTables;
use crate::content::ContentTables;
use crate::events::EventTables;
use crate::gallery::GalleryTables;
use crate::jobs::JobTables;
use crate::news::NewsTables;

pub(crate) use record::record_fields;
pub use record::{default_true, Record, RecordId, Timestamp, UniqueKey};
pub use snapshot::SnapshotError;
pub use table::Table;
pub use validate::ValidationError;

/// Failures raised by [`Table`] operations and reference checks.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{table}: a row with this {fields} already exists")]
    Duplicate {
        table: &'static str,
        fields: &'static str,
    },
    #[error("{table}: row {id} not found")]
    NotFound { table: &'static str, id: RecordId },
    #[error("{field}: {table} row {id} does not exist")]
    MissingReference {
        field: &'static str,
        table: &'static str,
        id: RecordId,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Foreign-key check: `id` must name a row of `table`.
pub fn ensure_exists<R: Record>(
    table: &Table<R>,
    field: &'static str,
    id: RecordId,
) -> Result<(), StoreError> {
    if table.contains(id)? {
        Ok(())
    } else {
        Err(StoreError::MissingReference {
            field,
            table: R::TABLE,
            id,
        })
    }
}

/// Nullable foreign-key check.
pub fn ensure_optional<R: Record>(
    table: &Table<R>,
    field: &'static str,
    id: Option<RecordId>,
) -> Result<(), StoreError> {
    match id {
        Some(id) => ensure_exists(table, field, id),
        None => Ok(()),
    }
}

/// Slug for `title` that no other row of `table` uses, suffixed `-2`, `-3`, ...
/// when the plain form is taken.
pub fn available_slug<R: Record>(
    table: &Table<R>,
    id: RecordId,
    title: &str,
    slug_of: impl Fn(&R) -> &str,
) -> Result<String, StoreError> {
    let base = validate::slugify(title);
    if base.is_empty() {
        return Err(ValidationError::new("slug", "could not derive a slug from the title").into());
    }
    let taken = |candidate: &str| {
        table
            .find(|row| row.id() != id && slug_of(row) == candidate)
            .map(|row| row.is_some())
    };
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken(&candidate)? {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    Ok(candidate)
}

/// Every table of the site, grouped the way the HTTP surface is.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SchoolStore {
    #[serde(default)]
    pub accounts: AccountTables,
    #[serde(default)]
    pub academics: AcademicTables,
    #[serde(default)]
    pub admissions: AdmissionTables,
    #[serde(default)]
    pub content: ContentTables,
    #[serde(default)]
    pub events: EventTables,
    #[serde(default)]
    pub gallery: GalleryTables,
    #[serde(default)]
    pub jobs: JobTables,
    #[serde(default)]
    pub news: NewsTables,
}

/// Row counts keyed by table name.
pub type RowCounts = BTreeMap<&'static str, usize>;

/// Implemented by each group's table bundle so the store can report sizes.
pub trait CountRows {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError>;
}

/// Record the size of one table.
pub(crate) fn tally<R: Record>(counts: &mut RowCounts, table: &Table<R>) -> Result<(), StoreError> {
    counts.insert(R::TABLE, table.len()?);
    Ok(())
}

impl SchoolStore {
    pub fn row_counts(&self) -> Result<RowCounts, StoreError> {
        let mut counts = RowCounts::new();
        self.accounts.count_rows(&mut counts)?;
        self.academics.count_rows(&mut counts)?;
        self.admissions.count_rows(&mut counts)?;
        self.content.count_rows(&mut counts)?;
        self.events.count_rows(&mut counts)?;
        self.gallery.count_rows(&mut counts)?;
        self.jobs.count_rows(&mut counts)?;
        self.news.count_rows(&mut counts)?;
        Ok(counts)
    }
}
