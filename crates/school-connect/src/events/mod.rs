//! School events, their categories and attendee registrations.

mod domain;
mod resources;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::{resource_routes, ApiState};
use crate::store::{tally, CountRows, RecordId, RowCounts, SchoolStore, StoreError, Table};

pub use domain::{Event, EventCategory, EventRegistration, RegistrationStatus};
pub use resources::{EventCategories, EventRegistrations, Events};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTables {
    pub categories: Table<EventCategory>,
    pub events: Table<Event>,
    pub registrations: Table<EventRegistration>,
}

impl CountRows for EventTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.categories)?;
        tally(counts, &self.events)?;
        tally(counts, &self.registrations)
    }
}

/// Drop a deleted user's registrations and unlink the events they created.
pub(crate) fn forget_user(store: &SchoolStore, user: RecordId) -> Result<(), StoreError> {
    let events = &store.events;
    events
        .registrations
        .remove_where(|registration| registration.user == user)?;
    events.events.modify_where(
        |event| event.created_by == Some(user),
        |event| event.created_by = None,
    )?;
    Ok(())
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .merge(resource_routes::<EventCategories>())
        .merge(resource_routes::<Events>())
        .merge(resource_routes::<EventRegistrations>())
}
