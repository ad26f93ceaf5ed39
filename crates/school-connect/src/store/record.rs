use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::validate::ValidationError;

pub type RecordId = Uuid;
pub type Timestamp = DateTime<Utc>;

/// A row type persisted in a [`Table`](super::Table).
///
/// The serde representation doubles as the transport and snapshot format.
/// Fields the server owns (`id`, timestamps, caller-derived references) are
/// listed in `READ_ONLY`, stripped from client payloads before decoding, and
/// filled in by the methods [`record_fields!`] generates. They carry
/// `#[serde(default)]` so a stripped payload still decodes.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;
    const READ_ONLY: &'static [&'static str];

    fn id(&self) -> RecordId;

    /// Stamp identity and timestamps on a freshly decoded row.
    fn assign(&mut self, id: RecordId, now: Timestamp);

    /// Copy server-owned fields from the stored row into a decoded replacement.
    fn carry_over(&mut self, stored: &Self, now: Timestamp);

    /// Take counters maintained by other writes from the row currently stored.
    /// Runs under the table's write lock on replace.
    fn sync_counters(&mut self, current: &Self);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Value of one unique (or composite unique) constraint for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub fields: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn single(fields: &'static str, value: impl ToString) -> Self {
        Self {
            fields,
            value: value.to_string(),
        }
    }

    /// Case-insensitive key, used for e-mail addresses.
    pub fn folded(fields: &'static str, value: &str) -> Self {
        Self {
            fields,
            value: value.trim().to_lowercase(),
        }
    }

    pub fn composite<const N: usize>(fields: &'static str, parts: [String; N]) -> Self {
        Self {
            fields,
            value: parts.join("\u{1f}"),
        }
    }
}

/// Implements the identity/timestamp half of [`Record`].
///
/// `keep` lists further server-owned fields that survive updates untouched.
/// `counters` are server-owned too, but other requests move them, so a
/// replacement always takes their latest stored value.
macro_rules! record_fields {
    (
        created: $created:ident
        $(, updated: $updated:ident)?
        $(, keep: [$($keep:ident),* $(,)?])?
        $(, counters: [$($counter:ident),* $(,)?])?
        $(,)?
    ) => {
        const READ_ONLY: &'static [&'static str] = &[
            "id",
            stringify!($created),
            $(stringify!($updated),)?
            $($(stringify!($keep),)*)?
            $($(stringify!($counter),)*)?
        ];

        fn id(&self) -> $crate::store::RecordId {
            self.id
        }

        fn assign(&mut self, id: $crate::store::RecordId, now: $crate::store::Timestamp) {
            self.id = id;
            self.$created = now;
            $(self.$updated = now;)?
        }

        fn carry_over(&mut self, stored: &Self, now: $crate::store::Timestamp) {
            let _ = now;
            self.id = stored.id;
            self.$created = stored.$created;
            $(self.$updated = now;)?
            $($(self.$keep = stored.$keep.clone();)*)?
            $($(self.$counter = stored.$counter;)*)?
        }

        fn sync_counters(&mut self, current: &Self) {
            let _ = current;
            $($(self.$counter = current.$counter;)*)?
        }
    };
}

pub(crate) use record_fields;

/// Serde default for `is_active` style flags.
pub fn default_true() -> bool {
    true
}
