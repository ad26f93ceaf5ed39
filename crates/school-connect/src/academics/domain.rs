use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked, ValidationError};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp, UniqueKey};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Department {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub head_of_department: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for Department {
    const TABLE: &'static str = "departments";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("code", &self.code)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::text("code", &self.code, 20)?;
        validate::max_chars("head_of_department", &self.head_of_department, 255)?;
        validate::optional_email("contact_email", &self.contact_email)?;
        validate::max_chars("contact_phone", &self.contact_phone, 20)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    #[default]
    Undergraduate,
    Postgraduate,
    Diploma,
    Certificate,
    Professional,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub department: RecordId,
    #[serde(default)]
    pub description: String,
    pub program_type: ProgramType,
    pub duration_years: u32,
    #[serde(default)]
    pub duration_months: u32,
    #[serde(default)]
    pub credits_required: Option<u32>,
    #[serde(default)]
    pub tuition_fee: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for Program {
    const TABLE: &'static str = "programs";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("code", &self.code)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::text("code", &self.code, 20)?;
        if let Some(fee) = self.tuition_fee {
            validate::at_least("tuition_fee", fee, 0.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    #[default]
    Core,
    Elective,
    Prerequisite,
    Capstone,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub program: RecordId,
    #[serde(default)]
    pub description: String,
    pub course_type: CourseType,
    pub credits: u32,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub prerequisites: Vec<RecordId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for Course {
    const TABLE: &'static str = "courses";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("code", &self.code)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::text("code", &self.code, 20)?;
        validate::max_chars("semester", &self.semester, 20)?;
        if self.prerequisites.contains(&self.id) {
            return Err(ValidationError::new(
                "prerequisites",
                "a course cannot be its own prerequisite",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Visiting,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Faculty {
    #[serde(default)]
    pub id: RecordId,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: RecordId,
    pub designation: String,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub specialization: String,
    pub employment_type: EmploymentType,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub office_location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Faculty {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Faculty {
    const TABLE: &'static str = "faculty";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::single("employee_id", &self.employee_id),
            UniqueKey::folded("email", &self.email),
        ]
    }

    fn validate(&self) -> Checked {
        validate::text("employee_id", &self.employee_id, 20)?;
        validate::text("first_name", &self.first_name, 100)?;
        validate::text("last_name", &self.last_name, 100)?;
        validate::email("email", &self.email)?;
        validate::max_chars("phone", &self.phone, 20)?;
        validate::text("designation", &self.designation, 100)?;
        validate::optional_url("photo_url", self.photo_url.as_deref())
    }
}

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    #[serde(default)]
    pub id: RecordId,
    pub course: RecordId,
    pub faculty: RecordId,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub building: String,
    pub semester: String,
    pub academic_year: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Timetable {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl Record for Timetable {
    const TABLE: &'static str = "timetables";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::composite(
            "course, day_of_week, start_time, semester, academic_year",
            [
                self.course.to_string(),
                self.day_of_week.as_str().to_string(),
                self.start_time.to_string(),
                self.semester.clone(),
                self.academic_year.clone(),
            ],
        )]
    }

    fn validate(&self) -> Checked {
        if self.end_time <= self.start_time {
            return Err(ValidationError::new(
                "end_time",
                "end time must be after the start time",
            ));
        }
        validate::text("semester", &self.semester, 20)?;
        validate::text("academic_year", &self.academic_year, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> Timetable {
        Timetable {
            semester: "1".into(),
            academic_year: "2024-25".into(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            ..Timetable::default()
        }
    }

    #[test]
    fn timetable_duration_and_ordering() {
        let lesson = slot("09:00:00", "10:15:00");
        assert_eq!(lesson.duration_minutes(), 75);
        assert!(lesson.validate().is_ok());

        let backwards = slot("11:00:00", "10:00:00");
        assert_eq!(backwards.validate().unwrap_err().field, "end_time");
        assert!(Weekday::Monday < Weekday::Friday);
    }

    #[test]
    fn course_cannot_require_itself() {
        let mut course = Course {
            name: "Physics".into(),
            code: "PHY1".into(),
            ..Course::default()
        };
        course.id = RecordId::new_v4();
        course.prerequisites.push(course.id);
        assert_eq!(course.validate().unwrap_err().field, "prerequisites");
    }
}
