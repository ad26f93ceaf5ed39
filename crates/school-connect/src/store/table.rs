use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::record::{Record, RecordId};
use super::StoreError;

/// In-process table enforcing the record's unique keys and field validation.
///
/// Predicates passed to the query methods run while the table lock is held and
/// must not reach back into the same table.
pub struct Table<R> {
    rows: RwLock<HashMap<RecordId, R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Record> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.len().unwrap_or_default();
        f.debug_struct("Table")
            .field("table", &R::TABLE)
            .field("rows", &len)
            .finish()
    }
}

impl<R: Record> Table<R> {
    /// Build a table from previously stored rows, re-checking every constraint.
    pub fn from_rows(rows: Vec<R>) -> Result<Self, StoreError> {
        let table = Self::default();
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<RecordId, R>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", R::TABLE)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<RecordId, R>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable(format!("{} lock poisoned", R::TABLE)))
    }

    fn ensure_unique(rows: &HashMap<RecordId, R>, record: &R) -> Result<(), StoreError> {
        let keys = record.unique_keys();
        if keys.is_empty() {
            return Ok(());
        }
        for other in rows.values().filter(|other| other.id() != record.id()) {
            for theirs in other.unique_keys() {
                if keys.contains(&theirs) {
                    return Err(StoreError::Duplicate {
                        table: R::TABLE,
                        fields: theirs.fields,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn insert(&self, record: R) -> Result<R, StoreError> {
        record.validate()?;
        let mut rows = self.write()?;
        if rows.contains_key(&record.id()) {
            return Err(StoreError::Duplicate {
                table: R::TABLE,
                fields: "id",
            });
        }
        Self::ensure_unique(&rows, &record)?;
        rows.insert(record.id(), record.clone());
        Ok(record)
    }

    /// Overwrite an existing row. Counters come from the row as stored at the
    /// moment of the write, not from the caller's copy.
    pub fn replace(&self, mut record: R) -> Result<R, StoreError> {
        record.validate()?;
        let mut rows = self.write()?;
        let Some(current) = rows.get(&record.id()) else {
            return Err(StoreError::NotFound {
                table: R::TABLE,
                id: record.id(),
            });
        };
        record.sync_counters(current);
        Self::ensure_unique(&rows, &record)?;
        rows.insert(record.id(), record.clone());
        Ok(record)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    pub fn contains(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn all(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub fn select(&self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    pub fn find(&self, predicate: impl Fn(&R) -> bool) -> Result<Option<R>, StoreError> {
        Ok(self.read()?.values().find(|row| predicate(row)).cloned())
    }

    pub fn count(&self, predicate: impl Fn(&R) -> bool) -> Result<usize, StoreError> {
        Ok(self.read()?.values().filter(|row| predicate(row)).count())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    pub fn remove(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn remove_where(&self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        let mut rows = self.write()?;
        let doomed: Vec<RecordId> = rows
            .values()
            .filter(|row| predicate(row))
            .map(Record::id)
            .collect();
        Ok(doomed.iter().filter_map(|id| rows.remove(id)).collect())
    }

    /// In-place edit of matching rows without re-validation; used for
    /// reference clean-up (set null, counters) that cannot break constraints.
    pub fn modify_where(
        &self,
        predicate: impl Fn(&R) -> bool,
        mut edit: impl FnMut(&mut R),
    ) -> Result<usize, StoreError> {
        let mut rows = self.write()?;
        let mut touched = 0;
        for row in rows.values_mut().filter(|row| predicate(row)) {
            edit(row);
            touched += 1;
        }
        Ok(touched)
    }
}

impl<R: Record> Serialize for Table<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rows = self.all().map_err(serde::ser::Error::custom)?;
        rows.sort_by_key(Record::id);
        rows.serialize(serializer)
    }
}

impl<'de, R: Record> Deserialize<'de> for Table<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<R>::deserialize(deserializer)?;
        Table::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use super::*;
    use crate::store::validate::{self, ValidationError};
    use crate::store::{record_fields, Timestamp, UniqueKey};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Badge {
        id: RecordId,
        code: String,
        level: u8,
        awarded: u32,
        created_at: Timestamp,
    }

    impl Record for Badge {
        const TABLE: &'static str = "badges";

        record_fields!(created: created_at, counters: [awarded]);

        fn unique_keys(&self) -> Vec<UniqueKey> {
            vec![UniqueKey::folded("code", &self.code)]
        }

        fn validate(&self) -> Result<(), ValidationError> {
            validate::within("level", self.level, 1, 3)
        }
    }

    fn badge(code: &str) -> Badge {
        let mut badge = Badge {
            code: code.to_string(),
            level: 1,
            ..Badge::default()
        };
        badge.assign(Uuid::new_v4(), Utc::now());
        badge
    }

    #[test]
    fn insert_rejects_folded_duplicates_and_invalid_rows() {
        let table = Table::default();
        table.insert(badge("Reader")).unwrap();

        let err = table.insert(badge(" reader ")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { fields: "code", .. }));

        let mut loud = badge("Speaker");
        loud.level = 9;
        assert!(matches!(table.insert(loud), Err(StoreError::Invalid(_))));
        assert_eq!(table.len().unwrap(), 1);
    }

    #[test]
    fn replace_keeps_its_own_key_but_not_anothers() {
        let table = Table::default();
        let reader = table.insert(badge("Reader")).unwrap();
        table.insert(badge("Writer")).unwrap();

        let mut renamed = reader.clone();
        renamed.level = 2;
        assert_eq!(table.replace(renamed).unwrap().level, 2);

        let mut clash = reader.clone();
        clash.code = "WRITER".to_string();
        assert!(matches!(
            table.replace(clash),
            Err(StoreError::Duplicate { fields: "code", .. })
        ));
        assert!(matches!(
            table.replace(badge("Ghost")),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn replace_takes_counters_from_the_stored_row() {
        let table = Table::default();
        let reader = table.insert(badge("Reader")).unwrap();
        let stale = reader.clone();

        table
            .modify_where(|row| row.id == reader.id, |row| row.awarded += 2)
            .unwrap();
        let mut edited = stale;
        edited.level = 3;
        let saved = table.replace(edited).unwrap();

        assert_eq!(saved.awarded, 2);
        assert_eq!(table.get(reader.id).unwrap().unwrap().awarded, 2);
    }

    #[test]
    fn remove_where_returns_the_removed_rows() {
        let table = Table::default();
        for code in ["Reader", "Writer", "Runner"] {
            table.insert(badge(code)).unwrap();
        }

        let mut removed: Vec<String> = table
            .remove_where(|row| row.code.starts_with('R'))
            .unwrap()
            .into_iter()
            .map(|row| row.code)
            .collect();
        removed.sort();

        assert_eq!(removed, ["Reader", "Runner"]);
        assert_eq!(table.len().unwrap(), 1);
        assert!(table.find(|row| row.code == "Writer").unwrap().is_some());
    }
}
