use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked, ValidationError};
use crate::store::{record_fields, Record, RecordId, Timestamp, UniqueKey};

fn default_color() -> String {
    "#8B5CF6".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCategory {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for JobCategory {
    const TABLE: &'static str = "job_categories";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("name", &self.name)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 100)?;
        validate::hex_color("color", &self.color)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Executive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    #[default]
    Draft,
    Published,
    Closed,
    Filled,
    Cancelled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosition {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub category: Option<RecordId>,
    pub department: String,
    pub location: String,
    pub employment_type: JobType,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default = "default_currency")]
    pub salary_currency: String,
    #[serde(default)]
    pub is_salary_negotiable: bool,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PositionStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_remote_allowed: bool,
    #[serde(default)]
    pub posted_by: Option<RecordId>,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default)]
    pub applications_count: u32,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl JobPosition {
    pub fn is_published(&self) -> bool {
        self.status == PositionStatus::Published
    }

    /// Published with a deadline on or after `today`. Positions without a
    /// deadline are not advertised as open.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.is_published()
            && self
                .application_deadline
                .is_some_and(|deadline| deadline >= today)
    }

    pub fn salary_range(&self) -> String {
        let positive = |value: Option<f64>| value.filter(|amount| *amount > 0.0);
        match (positive(self.salary_min), positive(self.salary_max)) {
            (Some(min), Some(max)) => format!(
                "{} {} - {}",
                self.salary_currency,
                thousands(min),
                thousands(max)
            ),
            (Some(min), None) => format!("{} {}+", self.salary_currency, thousands(min)),
            _ => "Salary not specified".to_string(),
        }
    }
}

/// Whole amount with comma grouping: `45000.0` becomes `45,000`.
fn thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if amount < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

impl Record for JobPosition {
    const TABLE: &'static str = "job_positions";

    record_fields!(
        created: created_at,
        updated: updated_at,
        keep: [posted_by],
        counters: [views_count, applications_count],
    );

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("slug", &self.slug)]
    }

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::slug("slug", &self.slug)?;
        validate::max_chars("slug", &self.slug, 255)?;
        validate::required("description", &self.description)?;
        validate::required("requirements", &self.requirements)?;
        validate::required("responsibilities", &self.responsibilities)?;
        validate::text("department", &self.department, 100)?;
        validate::text("location", &self.location, 255)?;
        validate::text("salary_currency", &self.salary_currency, 10)?;
        if let Some(min) = self.salary_min {
            validate::at_least("salary_min", min, 0.0)?;
        }
        validate::ordered("salary_max", self.salary_min, self.salary_max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    Offered,
    Accepted,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobApplication {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub application_number: String,
    pub position: RecordId,
    #[serde(default)]
    pub applicant: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub current_position: String,
    #[serde(default)]
    pub current_company: String,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub expected_salary: Option<f64>,
    #[serde(default)]
    pub availability_date: Option<NaiveDate>,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub status: JobApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
    #[serde(default)]
    pub reviewed_by: Option<RecordId>,
    #[serde(default)]
    pub reviewed_at: Option<Timestamp>,
    #[serde(default)]
    pub interview_date: Option<Timestamp>,
    #[serde(default)]
    pub interview_notes: String,
    #[serde(default)]
    pub decision_date: Option<Timestamp>,
    #[serde(default)]
    pub decision_notes: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl JobApplication {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_submitted(&self) -> bool {
        self.status != JobApplicationStatus::Draft
    }
}

impl Record for JobApplication {
    const TABLE: &'static str = "job_applications";

    record_fields!(
        created: created_at,
        updated: updated_at,
        keep: [application_number, applicant, submitted_at],
    );

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::single("application_number", &self.application_number),
            UniqueKey::composite(
                "position, applicant",
                [self.position.to_string(), self.applicant.to_string()],
            ),
        ]
    }

    fn validate(&self) -> Checked {
        validate::text("first_name", &self.first_name, 100)?;
        validate::text("last_name", &self.last_name, 100)?;
        validate::email("email", &self.email)?;
        validate::text("phone_number", &self.phone_number, 20)?;
        validate::required("address", &self.address)?;
        if let Some(salary) = self.expected_salary {
            validate::at_least("expected_salary", salary, 0.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Resume,
    CoverLetter,
    Portfolio,
    Certificate,
    Transcript,
    Reference,
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobApplicationDocument {
    #[serde(default)]
    pub id: RecordId,
    pub application: RecordId,
    pub document_type: DocumentType,
    pub title: String,
    pub file_url: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Timestamp,
}

impl Record for JobApplicationDocument {
    const TABLE: &'static str = "job_application_documents";

    record_fields!(created: uploaded_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::url("file_url", &self.file_url)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Phone,
    Video,
    #[default]
    InPerson,
    Panel,
    Technical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

fn default_duration() -> u32 {
    60
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobInterview {
    #[serde(default)]
    pub id: RecordId,
    pub application: RecordId,
    pub interview_type: InterviewType,
    pub scheduled_date: Timestamp,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub interviewer: Option<RecordId>,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for JobInterview {
    const TABLE: &'static str = "job_interviews";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        if self.duration_minutes == 0 {
            return Err(ValidationError::new("duration_minutes", "must be greater than 0"));
        }
        validate::max_chars("location", &self.location, 255)?;
        validate::optional_url("meeting_link", Some(self.meeting_link.as_str()))?;
        if let Some(rating) = self.rating {
            validate::within("rating", rating, 0, 10)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> JobPosition {
        JobPosition {
            title: "Physics Teacher".into(),
            slug: "physics-teacher".into(),
            salary_currency: "INR".into(),
            ..JobPosition::default()
        }
    }

    #[test]
    fn salary_range_formats_known_bounds() {
        let mut job = position();
        assert_eq!(job.salary_range(), "Salary not specified");
        job.salary_min = Some(25000.0);
        assert_eq!(job.salary_range(), "INR 25,000+");
        job.salary_max = Some(1250000.0);
        assert_eq!(job.salary_range(), "INR 25,000 - 1,250,000");
        job.salary_min = Some(0.0);
        assert_eq!(job.salary_range(), "Salary not specified");
    }

    #[test]
    fn open_positions_respect_the_deadline() {
        let today: NaiveDate = "2025-05-10".parse().unwrap();
        let mut job = position();
        assert!(!job.is_open(today));
        job.status = PositionStatus::Published;
        assert!(!job.is_open(today));
        job.application_deadline = Some(today);
        assert!(job.is_open(today));
        job.application_deadline = today.pred_opt();
        assert!(!job.is_open(today));
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(123456.4), "123,456");
    }
}
