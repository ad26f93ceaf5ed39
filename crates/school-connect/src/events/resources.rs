use std::cmp::Ordering;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::domain::{Event, EventCategory, EventRegistration, RegistrationStatus};
use crate::api::resource::with_fields;
use crate::api::{Access, ApiError, NoFilter, Resource, Viewer};
use crate::store::{ensure_exists, ensure_optional, RecordId, SchoolStore, StoreError, Table};

pub struct EventCategories;

impl Resource for EventCategories {
    type Record = EventCategory;
    type Filter = NoFilter;

    const PATH: &'static str = "categories";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<EventCategory> {
        &store.events.categories
    }

    fn ordering(a: &EventCategory, b: &EventCategory) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn on_delete(store: &SchoolStore, category: &EventCategory) -> Result<(), StoreError> {
        store.events.events.modify_where(
            |event| event.category == Some(category.id),
            |event| event.category = None,
        )?;
        Ok(())
    }
}

fn active_registrations(store: &SchoolStore, event: RecordId) -> Result<usize, StoreError> {
    store.events.registrations.count(|registration| {
        registration.event == event && registration.status != RegistrationStatus::Cancelled
    })
}

/// Deadline and capacity checks for taking a seat at `event`. A missing event
/// is left to the reference check.
fn admit(store: &SchoolStore, event: RecordId) -> Result<(), ApiError> {
    let Some(event) = store.events.events.get(event)? else {
        return Ok(());
    };
    if event.registration_closed(Utc::now()) {
        debug!(event = %event.id, "registration after deadline refused");
        return Err(ApiError::invalid("event", "Registration deadline has passed."));
    }
    if let Some(capacity) = event.max_attendees {
        if active_registrations(store, event.id)? >= capacity as usize {
            debug!(event = %event.id, capacity, "registration for full event refused");
            return Err(ApiError::invalid("event", "Event is full."));
        }
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<RecordId>,
    pub featured: Option<bool>,
    pub upcoming: Option<bool>,
}

pub struct Events;

impl Resource for Events {
    type Record = Event;
    type Filter = EventFilter;

    const PATH: &'static str = "events";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Event> {
        &store.events.events
    }

    fn ordering(a: &Event, b: &Event) -> Ordering {
        b.event_date.cmp(&a.event_date)
    }

    fn visible(_: &SchoolStore, event: &Event, _: &Viewer) -> Result<bool, StoreError> {
        Ok(event.is_published)
    }

    fn matches(event: &Event, filter: &EventFilter) -> bool {
        filter.category.map_or(true, |id| event.category == Some(id))
            && filter
                .featured
                .map_or(true, |featured| event.is_featured == featured)
            && filter
                .upcoming
                .map_or(true, |upcoming| event.is_upcoming(Utc::now()) == upcoming)
    }

    fn prepare(
        _: &SchoolStore,
        event: &mut Event,
        stored: Option<&Event>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            event.created_by = viewer.user_id();
        }
        Ok(())
    }

    fn check_references(store: &SchoolStore, event: &Event) -> Result<(), StoreError> {
        ensure_optional(&store.events.categories, "category", event.category)
    }

    fn on_delete(store: &SchoolStore, event: &Event) -> Result<(), StoreError> {
        store
            .events
            .registrations
            .remove_where(|registration| registration.event == event.id)?;
        Ok(())
    }

    fn present(store: &SchoolStore, event: &Event) -> Result<Value, ApiError> {
        let now = Utc::now();
        with_fields(
            event,
            [
                ("is_past", json!(event.is_past(now))),
                ("is_upcoming", json!(event.is_upcoming(now))),
                ("registrations_count", json!(active_registrations(store, event.id)?)),
            ],
        )
    }
}

pub struct EventRegistrations;

impl Resource for EventRegistrations {
    type Record = EventRegistration;
    type Filter = NoFilter;

    const PATH: &'static str = "registrations";
    const ACCESS: Access = Access::Authenticated;

    fn table(store: &SchoolStore) -> &Table<EventRegistration> {
        &store.events.registrations
    }

    fn ordering(a: &EventRegistration, b: &EventRegistration) -> Ordering {
        b.registration_date.cmp(&a.registration_date)
    }

    fn visible(
        _: &SchoolStore,
        registration: &EventRegistration,
        viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(viewer.owns_or_staff(registration.user))
    }

    fn prepare(
        store: &SchoolStore,
        registration: &mut EventRegistration,
        stored: Option<&EventRegistration>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        match stored {
            None => {
                registration.user = viewer.require_user()?.user_id;
                admit(store, registration.event)
            }
            Some(stored) if registration.event != stored.event => Err(ApiError::invalid(
                "event",
                "A registration cannot move to another event.",
            )),
            // A cancelled row holds no seat, so reviving it must find one again.
            Some(stored)
                if stored.status == RegistrationStatus::Cancelled
                    && registration.status != RegistrationStatus::Cancelled =>
            {
                admit(store, registration.event)
            }
            Some(_) => Ok(()),
        }
    }

    fn check_references(
        store: &SchoolStore,
        registration: &EventRegistration,
    ) -> Result<(), StoreError> {
        ensure_exists(&store.events.events, "event", registration.event)
    }
}
