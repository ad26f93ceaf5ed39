use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{Course, Department, Faculty, Program, Timetable, Weekday};
use crate::api::handlers::cascade;
use crate::api::resource::with_fields;
use crate::api::{Access, ApiError, NoFilter, Resource, Viewer};
use crate::store::{ensure_exists, RecordId, SchoolStore, StoreError, Table};

pub struct Departments;

impl Resource for Departments {
    type Record = Department;
    type Filter = NoFilter;

    const PATH: &'static str = "departments";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Department> {
        &store.academics.departments
    }

    fn ordering(a: &Department, b: &Department) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn visible(_: &SchoolStore, department: &Department, _: &Viewer) -> Result<bool, StoreError> {
        Ok(department.is_active)
    }

    fn on_delete(store: &SchoolStore, department: &Department) -> Result<(), StoreError> {
        cascade::<Programs>(store, |program| program.department == department.id)?;
        cascade::<FacultyMembers>(store, |member| member.department == department.id)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentFilter {
    pub department: Option<RecordId>,
}

pub struct Programs;

impl Resource for Programs {
    type Record = Program;
    type Filter = DepartmentFilter;

    const PATH: &'static str = "programs";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Program> {
        &store.academics.programs
    }

    fn ordering(a: &Program, b: &Program) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn visible(_: &SchoolStore, program: &Program, _: &Viewer) -> Result<bool, StoreError> {
        Ok(program.is_active)
    }

    fn matches(program: &Program, filter: &DepartmentFilter) -> bool {
        filter.department.map_or(true, |id| program.department == id)
    }

    fn check_references(store: &SchoolStore, program: &Program) -> Result<(), StoreError> {
        ensure_exists(&store.academics.departments, "department", program.department)
    }

    fn on_delete(store: &SchoolStore, program: &Program) -> Result<(), StoreError> {
        cascade::<Courses>(store, |course| course.program == program.id)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub program: Option<RecordId>,
}

pub struct Courses;

impl Resource for Courses {
    type Record = Course;
    type Filter = CourseFilter;

    const PATH: &'static str = "courses";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Course> {
        &store.academics.courses
    }

    fn ordering(a: &Course, b: &Course) -> Ordering {
        a.program
            .cmp(&b.program)
            .then_with(|| a.semester.cmp(&b.semester))
            .then_with(|| a.name.cmp(&b.name))
    }

    fn visible(_: &SchoolStore, course: &Course, _: &Viewer) -> Result<bool, StoreError> {
        Ok(course.is_active)
    }

    fn matches(course: &Course, filter: &CourseFilter) -> bool {
        filter.program.map_or(true, |id| course.program == id)
    }

    fn prepare(
        _: &SchoolStore,
        course: &mut Course,
        _: Option<&Course>,
        _: &Viewer,
    ) -> Result<(), ApiError> {
        course.prerequisites.sort_unstable();
        course.prerequisites.dedup();
        Ok(())
    }

    fn check_references(store: &SchoolStore, course: &Course) -> Result<(), StoreError> {
        ensure_exists(&store.academics.programs, "program", course.program)?;
        for prerequisite in &course.prerequisites {
            ensure_exists(&store.academics.courses, "prerequisites", *prerequisite)?;
        }
        Ok(())
    }

    fn on_delete(store: &SchoolStore, course: &Course) -> Result<(), StoreError> {
        cascade::<Timetables>(store, |slot| slot.course == course.id)?;
        store.academics.courses.modify_where(
            |other| other.prerequisites.contains(&course.id),
            |other| other.prerequisites.retain(|id| *id != course.id),
        )?;
        Ok(())
    }
}

pub struct FacultyMembers;

impl Resource for FacultyMembers {
    type Record = Faculty;
    type Filter = DepartmentFilter;

    const PATH: &'static str = "faculty";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Faculty> {
        &store.academics.faculty
    }

    fn ordering(a: &Faculty, b: &Faculty) -> Ordering {
        a.first_name
            .cmp(&b.first_name)
            .then_with(|| a.last_name.cmp(&b.last_name))
    }

    fn visible(_: &SchoolStore, member: &Faculty, _: &Viewer) -> Result<bool, StoreError> {
        Ok(member.is_active)
    }

    fn matches(member: &Faculty, filter: &DepartmentFilter) -> bool {
        filter.department.map_or(true, |id| member.department == id)
    }

    fn check_references(store: &SchoolStore, member: &Faculty) -> Result<(), StoreError> {
        ensure_exists(&store.academics.departments, "department", member.department)
    }

    fn on_delete(store: &SchoolStore, member: &Faculty) -> Result<(), StoreError> {
        cascade::<Timetables>(store, |slot| slot.faculty == member.id)?;
        Ok(())
    }

    fn present(_: &SchoolStore, member: &Faculty) -> Result<Value, ApiError> {
        with_fields(member, [("full_name", json!(member.full_name()))])
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimetableFilter {
    pub course: Option<RecordId>,
    pub faculty: Option<RecordId>,
    pub day_of_week: Option<Weekday>,
}

pub struct Timetables;

impl Resource for Timetables {
    type Record = Timetable;
    type Filter = TimetableFilter;

    const PATH: &'static str = "timetables";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Timetable> {
        &store.academics.timetables
    }

    fn ordering(a: &Timetable, b: &Timetable) -> Ordering {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
    }

    fn matches(slot: &Timetable, filter: &TimetableFilter) -> bool {
        filter.course.map_or(true, |id| slot.course == id)
            && filter.faculty.map_or(true, |id| slot.faculty == id)
            && filter.day_of_week.map_or(true, |day| slot.day_of_week == day)
    }

    fn check_references(store: &SchoolStore, slot: &Timetable) -> Result<(), StoreError> {
        ensure_exists(&store.academics.courses, "course", slot.course)?;
        ensure_exists(&store.academics.faculty, "faculty", slot.faculty)
    }

    fn present(_: &SchoolStore, slot: &Timetable) -> Result<Value, ApiError> {
        with_fields(slot, [("duration_minutes", json!(slot.duration_minutes()))])
    }
}
