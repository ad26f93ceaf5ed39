//! Departments, programs, courses, faculty and the weekly timetable.

mod domain;
mod resources;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::{resource_routes, ApiState};
use crate::store::{tally, CountRows, RowCounts, StoreError, Table};

pub use domain::{
    Course, CourseType, Department, EmploymentType, Faculty, Program, ProgramType, Timetable,
    Weekday,
};
pub use resources::{Courses, Departments, FacultyMembers, Programs, Timetables};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicTables {
    pub departments: Table<Department>,
    pub programs: Table<Program>,
    pub courses: Table<Course>,
    pub faculty: Table<Faculty>,
    pub timetables: Table<Timetable>,
}

impl CountRows for AcademicTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.departments)?;
        tally(counts, &self.programs)?;
        tally(counts, &self.courses)?;
        tally(counts, &self.faculty)?;
        tally(counts, &self.timetables)
    }
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .merge(resource_routes::<Departments>())
        .merge(resource_routes::<Programs>())
        .merge(resource_routes::<Courses>())
        .merge(resource_routes::<FacultyMembers>())
        .merge(resource_routes::<Timetables>())
}
