use std::cmp::Ordering;

use chrono::{Datelike, Utc};
use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::domain::{
    JobApplication, JobApplicationDocument, JobCategory, JobInterview, JobPosition,
};
use crate::api::handlers::cascade;
use crate::api::resource::with_fields;
use crate::api::{Access, ApiError, NoFilter, Resource, Viewer};
use crate::store::{
    available_slug, ensure_exists, ensure_optional, RecordId, SchoolStore, StoreError, Table,
};

const NUMBER_ATTEMPTS: usize = 32;

pub struct JobCategories;

impl Resource for JobCategories {
    type Record = JobCategory;
    type Filter = NoFilter;

    const PATH: &'static str = "categories";
    const ACCESS: Access = Access::ReadOnlyPublic;

    fn table(store: &SchoolStore) -> &Table<JobCategory> {
        &store.jobs.categories
    }

    fn ordering(a: &JobCategory, b: &JobCategory) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn on_delete(store: &SchoolStore, category: &JobCategory) -> Result<(), StoreError> {
        store.jobs.positions.modify_where(
            |position| position.category == Some(category.id),
            |position| position.category = None,
        )?;
        Ok(())
    }
}

pub struct JobPositions;

impl Resource for JobPositions {
    type Record = JobPosition;
    type Filter = NoFilter;

    const PATH: &'static str = "positions";
    const ACCESS: Access = Access::ReadOnlyPublic;

    fn table(store: &SchoolStore) -> &Table<JobPosition> {
        &store.jobs.positions
    }

    fn ordering(a: &JobPosition, b: &JobPosition) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn prepare(
        store: &SchoolStore,
        position: &mut JobPosition,
        stored: Option<&JobPosition>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        if position.slug.trim().is_empty() {
            position.slug = available_slug(
                &store.jobs.positions,
                position.id,
                &position.title,
                |row| row.slug.as_str(),
            )?;
        }
        if stored.is_none() {
            position.posted_by = viewer.user_id();
        }
        Ok(())
    }

    fn check_references(store: &SchoolStore, position: &JobPosition) -> Result<(), StoreError> {
        ensure_optional(&store.jobs.categories, "category", position.category)
    }

    fn on_delete(store: &SchoolStore, position: &JobPosition) -> Result<(), StoreError> {
        cascade::<JobApplications>(store, |application| application.position == position.id)?;
        Ok(())
    }

    fn present(store: &SchoolStore, position: &JobPosition) -> Result<Value, ApiError> {
        let category_name = match position.category {
            Some(id) => store.jobs.categories.get(id)?.map(|category| category.name),
            None => None,
        };
        with_fields(
            position,
            [
                ("category_name", json!(category_name)),
                ("is_published", json!(position.is_published())),
                ("salary_range", json!(position.salary_range())),
            ],
        )
    }
}

/// Draw an unused `JOB<year>-<nnnnn>` application number.
pub fn next_application_number(store: &SchoolStore) -> Result<String, ApiError> {
    let year = Utc::now().year();
    let mut rng = rand::thread_rng();
    for _ in 0..NUMBER_ATTEMPTS {
        let candidate = format!("JOB{year}-{}", rng.gen_range(10000..=99999));
        let taken = store
            .jobs
            .applications
            .find(|row| row.application_number == candidate)?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
    }
    warn!(year, "job application number space exhausted");
    Err(ApiError::Internal(
        "could not allocate an application number".to_string(),
    ))
}

/// Whether `viewer` may see rows hanging off `application`.
fn application_visible(
    store: &SchoolStore,
    application: RecordId,
    viewer: &Viewer,
) -> Result<bool, StoreError> {
    if viewer.is_staff() {
        return Ok(true);
    }
    Ok(store
        .jobs
        .applications
        .get(application)?
        .is_some_and(|row| viewer.owns_or_staff(row.applicant)))
}

pub struct JobApplications;

impl Resource for JobApplications {
    type Record = JobApplication;
    type Filter = NoFilter;

    const PATH: &'static str = "applications";
    const ACCESS: Access = Access::Authenticated;

    fn table(store: &SchoolStore) -> &Table<JobApplication> {
        &store.jobs.applications
    }

    fn ordering(a: &JobApplication, b: &JobApplication) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn visible(
        _: &SchoolStore,
        application: &JobApplication,
        viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(viewer.owns_or_staff(application.applicant))
    }

    fn prepare(
        store: &SchoolStore,
        application: &mut JobApplication,
        stored: Option<&JobApplication>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        match stored {
            None => {
                application.applicant = viewer.require_user()?.user_id;
                application.application_number = next_application_number(store)?;
            }
            Some(stored) if stored.position != application.position => {
                return Err(ApiError::invalid(
                    "position",
                    "The position of an application cannot be changed.",
                ));
            }
            Some(_) => {}
        }
        if application.submitted_at.is_none() && application.is_submitted() {
            application.submitted_at = Some(Utc::now());
        }
        Ok(())
    }

    fn check_references(
        store: &SchoolStore,
        application: &JobApplication,
    ) -> Result<(), StoreError> {
        ensure_exists(&store.jobs.positions, "position", application.position)?;
        ensure_optional(&store.accounts.users, "reviewed_by", application.reviewed_by)
    }

    fn after_create(store: &SchoolStore, application: &JobApplication) -> Result<(), StoreError> {
        store.jobs.positions.modify_where(
            |position| position.id == application.position,
            |position| position.applications_count += 1,
        )?;
        debug!(position = %application.position, "applications count raised");
        Ok(())
    }

    fn on_delete(store: &SchoolStore, application: &JobApplication) -> Result<(), StoreError> {
        let jobs = &store.jobs;
        jobs.positions.modify_where(
            |position| position.id == application.position,
            |position| {
                position.applications_count = position.applications_count.saturating_sub(1)
            },
        )?;
        jobs.documents
            .remove_where(|document| document.application == application.id)?;
        jobs.interviews
            .remove_where(|interview| interview.application == application.id)?;
        Ok(())
    }

    fn present(store: &SchoolStore, application: &JobApplication) -> Result<Value, ApiError> {
        let position_title = store
            .jobs
            .positions
            .get(application.position)?
            .map(|position| position.title);
        with_fields(
            application,
            [
                ("position_title", json!(position_title)),
                ("full_name", json!(application.full_name())),
                ("is_submitted", json!(application.is_submitted())),
            ],
        )
    }
}

pub struct JobApplicationDocuments;

impl Resource for JobApplicationDocuments {
    type Record = JobApplicationDocument;
    type Filter = NoFilter;

    const PATH: &'static str = "documents";
    const ACCESS: Access = Access::Authenticated;

    fn table(store: &SchoolStore) -> &Table<JobApplicationDocument> {
        &store.jobs.documents
    }

    fn ordering(a: &JobApplicationDocument, b: &JobApplicationDocument) -> Ordering {
        b.uploaded_at.cmp(&a.uploaded_at)
    }

    fn visible(
        store: &SchoolStore,
        document: &JobApplicationDocument,
        viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        application_visible(store, document.application, viewer)
    }

    fn prepare(
        store: &SchoolStore,
        document: &mut JobApplicationDocument,
        _: Option<&JobApplicationDocument>,
        viewer: &Viewer,
    ) -> Result<(), ApiError> {
        let exists = store.jobs.applications.contains(document.application)?;
        if exists && !application_visible(store, document.application, viewer)? {
            return Err(ApiError::invalid(
                "application",
                "You can only attach documents to your own applications.",
            ));
        }
        Ok(())
    }

    fn check_references(
        store: &SchoolStore,
        document: &JobApplicationDocument,
    ) -> Result<(), StoreError> {
        ensure_exists(&store.jobs.applications, "application", document.application)
    }
}

pub struct JobInterviews;

impl Resource for JobInterviews {
    type Record = JobInterview;
    type Filter = NoFilter;

    const PATH: &'static str = "interviews";
    const ACCESS: Access = Access::StaffManaged;

    fn table(store: &SchoolStore) -> &Table<JobInterview> {
        &store.jobs.interviews
    }

    fn ordering(a: &JobInterview, b: &JobInterview) -> Ordering {
        b.scheduled_date.cmp(&a.scheduled_date)
    }

    fn visible(
        store: &SchoolStore,
        interview: &JobInterview,
        viewer: &Viewer,
    ) -> Result<bool, StoreError> {
        application_visible(store, interview.application, viewer)
    }

    fn check_references(store: &SchoolStore, interview: &JobInterview) -> Result<(), StoreError> {
        ensure_exists(&store.jobs.applications, "application", interview.application)?;
        ensure_optional(&store.accounts.users, "interviewer", interview.interviewer)
    }
}

