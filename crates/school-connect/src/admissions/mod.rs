//! Admission intake (KG/STD and Plus One) and interview scoring.

mod domain;
pub mod marks;
mod resources;

use std::collections::HashSet;
use std::sync::Mutex;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::{resource_routes, ApiState};
use crate::store::{tally, CountRows, RowCounts, StoreError, Table};

pub use domain::{
    AdmissionForm, ApplicableFor, ApplicationStatus, Difficulty, FormType, Gender,
    InterviewMark, InterviewSubject, InterviewSubjectTemplate, KgStdApplication,
    PlusOneApplication, QuestionType, Stream,
};
pub use resources::{
    next_application_number, AdmissionForms, InterviewSubjectTemplates, InterviewSubjects,
    KgStdApplications, PlusOneApplications,
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionTables {
    pub forms: Table<AdmissionForm>,
    pub kg_std: Table<KgStdApplication>,
    pub plus_one: Table<PlusOneApplication>,
    pub subjects: Table<InterviewSubject>,
    pub templates: Table<InterviewSubjectTemplate>,
    pub marks: Table<InterviewMark>,
    /// Numbers handed out since start-up, held so that two submissions racing
    /// through the same draw cannot both take one number.
    #[serde(skip)]
    issued_numbers: Mutex<HashSet<String>>,
}

impl CountRows for AdmissionTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.forms)?;
        tally(counts, &self.kg_std)?;
        tally(counts, &self.plus_one)?;
        tally(counts, &self.subjects)?;
        tally(counts, &self.templates)?;
        tally(counts, &self.marks)
    }
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route(
            "/interview-subjects/save_marks",
            post(marks::save_marks_handler),
        )
        .route("/interview-subjects/marks", get(marks::list_marks_handler))
        .merge(resource_routes::<AdmissionForms>())
        .merge(resource_routes::<KgStdApplications>())
        .merge(resource_routes::<PlusOneApplications>())
        .merge(resource_routes::<InterviewSubjects>())
        .merge(resource_routes::<InterviewSubjectTemplates>())
}
