use std::cmp::Ordering;

use chrono::{Datelike, Utc};
use rand::Rng;
use serde_json::{json, Value};
use tracing::warn;

use super::domain::{
    AdmissionForm, InterviewSubject, InterviewSubjectTemplate, KgStdApplication,
    PlusOneApplication,
};
use crate::api::handlers::cascade;
use crate::api::resource::with_fields;
use crate::api::{Access, ApiError, NoFilter, Resource, Viewer};
use crate::store::{ensure_exists, RecordId, SchoolStore, StoreError, Table};

const NUMBER_ATTEMPTS: usize = 32;

/// Draw an unused `MHS<year>-<nnnn>` number, unique over both application
/// tables. The number is reserved before it is returned.
pub fn next_application_number(store: &SchoolStore) -> Result<String, ApiError> {
    let year = Utc::now().year();
    let mut issued = store
        .admissions
        .issued_numbers
        .lock()
        .map_err(|_| StoreError::Unavailable("application numbers lock poisoned".to_string()))?;
    let mut rng = rand::thread_rng();
    for _ in 0..NUMBER_ATTEMPTS {
        let candidate = format!("MHS{year}-{}", rng.gen_range(1000..=9999));
        if !issued.contains(&candidate) && !application_number_taken(store, &candidate)? {
            issued.insert(candidate.clone());
            return Ok(candidate);
        }
    }
    warn!(year, "application number space exhausted");
    Err(ApiError::Internal(
        "could not allocate an application number".to_string(),
    ))
}

fn application_number_taken(store: &SchoolStore, number: &str) -> Result<bool, StoreError> {
    let admissions = &store.admissions;
    Ok(admissions
        .kg_std
        .find(|row| row.application_number == number)?
        .is_some()
        || admissions
            .plus_one
            .find(|row| row.application_number == number)?
            .is_some())
}

fn forget_marks(store: &SchoolStore, application: RecordId) -> Result<(), StoreError> {
    store
        .admissions
        .marks
        .remove_where(|mark| mark.application_id == application)?;
    Ok(())
}

pub struct AdmissionForms;

impl Resource for AdmissionForms {
    type Record = AdmissionForm;
    type Filter = NoFilter;

    const PATH: &'static str = "forms";
    const ACCESS: Access = Access::ReadOnlyPublic;

    fn table(store: &SchoolStore) -> &Table<AdmissionForm> {
        &store.admissions.forms
    }

    fn ordering(a: &AdmissionForm, b: &AdmissionForm) -> Ordering {
        a.form_type.cmp(&b.form_type)
    }
}

pub struct KgStdApplications;

impl Resource for KgStdApplications {
    type Record = KgStdApplication;
    type Filter = NoFilter;

    const PATH: &'static str = "kg-std-applications";
    const ACCESS: Access = Access::SubmitOnly;

    fn table(store: &SchoolStore) -> &Table<KgStdApplication> {
        &store.admissions.kg_std
    }

    fn ordering(a: &KgStdApplication, b: &KgStdApplication) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn prepare(
        store: &SchoolStore,
        application: &mut KgStdApplication,
        stored: Option<&KgStdApplication>,
        _: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            application.application_number = next_application_number(store)?;
        }
        Ok(())
    }

    fn on_delete(store: &SchoolStore, application: &KgStdApplication) -> Result<(), StoreError> {
        forget_marks(store, application.id)
    }
}

pub struct PlusOneApplications;

impl Resource for PlusOneApplications {
    type Record = PlusOneApplication;
    type Filter = NoFilter;

    const PATH: &'static str = "plus-one-applications";
    const ACCESS: Access = Access::SubmitOnly;

    fn table(store: &SchoolStore) -> &Table<PlusOneApplication> {
        &store.admissions.plus_one
    }

    fn ordering(a: &PlusOneApplication, b: &PlusOneApplication) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn prepare(
        store: &SchoolStore,
        application: &mut PlusOneApplication,
        stored: Option<&PlusOneApplication>,
        _: &Viewer,
    ) -> Result<(), ApiError> {
        if stored.is_none() {
            application.application_number = next_application_number(store)?;
        }
        Ok(())
    }

    fn on_delete(store: &SchoolStore, application: &PlusOneApplication) -> Result<(), StoreError> {
        forget_marks(store, application.id)
    }

    fn present(_: &SchoolStore, application: &PlusOneApplication) -> Result<Value, ApiError> {
        with_fields(
            application,
            [("subjects_list", json!(application.subjects_list()))],
        )
    }
}

pub struct InterviewSubjects;

impl Resource for InterviewSubjects {
    type Record = InterviewSubject;
    type Filter = NoFilter;

    const PATH: &'static str = "interview-subjects";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<InterviewSubject> {
        &store.admissions.subjects
    }

    fn ordering(a: &InterviewSubject, b: &InterviewSubject) -> Ordering {
        a.subject_name.cmp(&b.subject_name)
    }

    fn visible(
        _: &SchoolStore,
        subject: &InterviewSubject,
        _: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(subject.is_active)
    }

    fn on_delete(store: &SchoolStore, subject: &InterviewSubject) -> Result<(), StoreError> {
        cascade::<InterviewSubjectTemplates>(store, |template| template.subject == subject.id)?;
        Ok(())
    }
}

pub struct InterviewSubjectTemplates;

impl Resource for InterviewSubjectTemplates {
    type Record = InterviewSubjectTemplate;
    type Filter = NoFilter;

    const PATH: &'static str = "interview-subject-templates";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<InterviewSubjectTemplate> {
        &store.admissions.templates
    }

    fn ordering(a: &InterviewSubjectTemplate, b: &InterviewSubjectTemplate) -> Ordering {
        a.template_name.cmp(&b.template_name)
    }

    fn visible(
        _: &SchoolStore,
        template: &InterviewSubjectTemplate,
        _: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(template.is_active)
    }

    fn check_references(
        store: &SchoolStore,
        template: &InterviewSubjectTemplate,
    ) -> Result<(), StoreError> {
        ensure_exists(&store.admissions.subjects, "subject", template.subject)
    }
}
