//! Careers board: open positions, applications and their follow-up.

mod domain;
mod resources;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::handlers::{cascade, collect, param_id, parse_choice, required_param};
use crate::api::{resource_routes, Action, ApiError, ApiState, Resource, Viewer};
use crate::store::{tally, CountRows, RecordId, RowCounts, SchoolStore, StoreError, Table};

pub use domain::{
    DocumentType, ExperienceLevel, InterviewStatus, InterviewType, JobApplication,
    JobApplicationDocument, JobApplicationStatus, JobCategory, JobInterview, JobPosition, JobType,
    PositionStatus,
};
pub use resources::{
    next_application_number, JobApplicationDocuments, JobApplications, JobCategories,
    JobInterviews, JobPositions,
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTables {
    pub categories: Table<JobCategory>,
    pub positions: Table<JobPosition>,
    pub applications: Table<JobApplication>,
    pub documents: Table<JobApplicationDocument>,
    pub interviews: Table<JobInterview>,
}

impl CountRows for JobTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.categories)?;
        tally(counts, &self.positions)?;
        tally(counts, &self.applications)?;
        tally(counts, &self.documents)?;
        tally(counts, &self.interviews)
    }
}

/// Withdraw a deleted user's applications and unlink the rows they staffed.
pub(crate) fn forget_user(store: &SchoolStore, user: RecordId) -> Result<(), StoreError> {
    cascade::<JobApplications>(store, |application| application.applicant == user)?;
    let jobs = &store.jobs;
    jobs.positions.modify_where(
        |position| position.posted_by == Some(user),
        |position| position.posted_by = None,
    )?;
    jobs.applications.modify_where(
        |application| application.reviewed_by == Some(user),
        |application| application.reviewed_by = None,
    )?;
    jobs.interviews.modify_where(
        |interview| interview.interviewer == Some(user),
        |interview| interview.interviewer = None,
    )?;
    Ok(())
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/positions/published", get(published_positions))
        .route("/positions/by_type", get(positions_by_type))
        .route("/applications/by_status", get(applications_by_status))
        .route("/applications/by_position", get(applications_by_position))
        .merge(resource_routes::<JobCategories>())
        .merge(resource_routes::<JobPositions>())
        .merge(resource_routes::<JobApplications>())
        .merge(resource_routes::<JobApplicationDocuments>())
        .merge(resource_routes::<JobInterviews>())
}

async fn published_positions(
    State(state): State<ApiState>,
    viewer: Viewer,
) -> Result<Json<Vec<Value>>, ApiError> {
    let today = Utc::now().date_naive();
    let positions = collect::<JobPositions>(&state.store, &viewer, |position| {
        position.is_open(today)
    })?;
    Ok(Json(positions))
}

#[derive(Debug, Default, Deserialize)]
struct TypeQuery {
    #[serde(rename = "type")]
    employment_type: Option<String>,
}

async fn positions_by_type(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<TypeQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    let raw = required_param(query.employment_type, "Type parameter required")?;
    let Some(employment_type) = parse_choice::<JobType>(&raw) else {
        return Ok(Json(Vec::new()));
    };
    let positions = collect::<JobPositions>(&state.store, &viewer, |position| {
        position.is_published() && position.employment_type == employment_type
    })?;
    Ok(Json(positions))
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationQuery {
    status: Option<String>,
    position: Option<String>,
}

async fn applications_by_status(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    JobApplications::ACCESS.authorize(Action::List, &viewer)?;
    let Query(query) = query?;
    let raw = required_param(query.status, "Status parameter required")?;
    let Some(status) = parse_choice::<JobApplicationStatus>(&raw) else {
        return Ok(Json(Vec::new()));
    };
    let applications = collect::<JobApplications>(&state.store, &viewer, |application| {
        application.status == status
    })?;
    Ok(Json(applications))
}

async fn applications_by_position(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    JobApplications::ACCESS.authorize(Action::List, &viewer)?;
    let Query(query) = query?;
    let raw = required_param(query.position, "Position parameter required")?;
    let position = param_id(&raw, "position")?;
    let applications = collect::<JobApplications>(&state.store, &viewer, |application| {
        application.position == position
    })?;
    Ok(Json(applications))
}
