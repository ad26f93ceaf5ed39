use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::validate::{self, Checked, ValidationError};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp, UniqueKey};

/// The two admission streams; also tags interview marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    #[default]
    KgStd,
    PlusOne,
}

impl FormType {
    pub fn as_str(self) -> &'static str {
        match self {
            FormType::KgStd => "kg_std",
            FormType::PlusOne => "plus_one",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Waitlisted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    #[default]
    Science,
    Commerce,
    Humanities,
}

/// Opening window and academic year of one admission stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdmissionForm {
    #[serde(default)]
    pub id: RecordId,
    pub form_type: FormType,
    pub academic_year: String,
    #[serde(default)]
    pub opens_on: Option<NaiveDate>,
    #[serde(default)]
    pub closes_on: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for AdmissionForm {
    const TABLE: &'static str = "admission_forms";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("form_type", self.form_type.as_str())]
    }

    fn validate(&self) -> Checked {
        validate::text("academic_year", &self.academic_year, 20)?;
        validate::ordered("closes_on", self.opens_on, self.closes_on)
    }
}

/// Fields both application kinds share.
struct Applicant<'a> {
    student_name: &'a str,
    parent_name: &'a str,
    parent_email: &'a str,
    parent_phone: &'a str,
    address: &'a str,
}

impl Applicant<'_> {
    fn validate(&self) -> Checked {
        validate::text("student_name", self.student_name, 255)?;
        validate::text("parent_name", self.parent_name, 255)?;
        validate::email("parent_email", self.parent_email)?;
        validate::text("parent_phone", self.parent_phone, 20)?;
        validate::required("address", self.address)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KgStdApplication {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub application_number: String,
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub address: String,
    #[serde(default)]
    pub previous_school: Option<String>,
    pub grade_applying_for: String,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub documents_submitted: bool,
    #[serde(default)]
    pub interview_scheduled: bool,
    #[serde(default)]
    pub interview_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for KgStdApplication {
    const TABLE: &'static str = "kg_std_applications";

    record_fields!(created: created_at, updated: updated_at, keep: [application_number]);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("application_number", &self.application_number)]
    }

    fn validate(&self) -> Checked {
        Applicant {
            student_name: &self.student_name,
            parent_name: &self.parent_name,
            parent_email: &self.parent_email,
            parent_phone: &self.parent_phone,
            address: &self.address,
        }
        .validate()?;
        validate::text("grade_applying_for", &self.grade_applying_for, 50)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlusOneApplication {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub application_number: String,
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub address: String,
    pub previous_school: String,
    pub sslc_marks: f64,
    pub stream_preference: Stream,
    pub subjects_selected: String,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub documents_submitted: bool,
    #[serde(default)]
    pub entrance_exam_score: Option<f64>,
    #[serde(default)]
    pub interview_scheduled: bool,
    #[serde(default)]
    pub interview_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl PlusOneApplication {
    pub fn subjects_list(&self) -> Vec<String> {
        validate::split_list(&self.subjects_selected)
    }
}

impl Record for PlusOneApplication {
    const TABLE: &'static str = "plus_one_applications";

    record_fields!(created: created_at, updated: updated_at, keep: [application_number]);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("application_number", &self.application_number)]
    }

    fn validate(&self) -> Checked {
        Applicant {
            student_name: &self.student_name,
            parent_name: &self.parent_name,
            parent_email: &self.parent_email,
            parent_phone: &self.parent_phone,
            address: &self.address,
        }
        .validate()?;
        validate::text("previous_school", &self.previous_school, 255)?;
        validate::within("sslc_marks", self.sslc_marks, 0.0, 100.0)?;
        validate::required("subjects_selected", &self.subjects_selected)?;
        if let Some(score) = self.entrance_exam_score {
            validate::within("entrance_exam_score", score, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicableFor {
    KgStd,
    PlusOne,
    #[default]
    Both,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewSubject {
    #[serde(default)]
    pub id: RecordId,
    pub subject_name: String,
    pub subject_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub applicable_for: ApplicableFor,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for InterviewSubject {
    const TABLE: &'static str = "interview_subjects";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("subject_code", &self.subject_code)]
    }

    fn validate(&self) -> Checked {
        validate::text("subject_name", &self.subject_name, 255)?;
        validate::text("subject_code", &self.subject_code, 50)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    #[default]
    ShortAnswer,
    Essay,
    Practical,
    Oral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

fn default_marks() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewSubjectTemplate {
    #[serde(default)]
    pub id: RecordId,
    pub template_name: String,
    pub subject: RecordId,
    pub question_text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default)]
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for InterviewSubjectTemplate {
    const TABLE: &'static str = "interview_subject_templates";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("template_name", &self.template_name, 255)?;
        validate::required("question_text", &self.question_text)?;
        validate::at_least("marks", self.marks, 1)
    }
}

/// Score of one interview subject for one application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewMark {
    #[serde(default)]
    pub id: RecordId,
    pub application_id: RecordId,
    pub application_type: FormType,
    pub subject_name: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Record for InterviewMark {
    const TABLE: &'static str = "interview_marks";

    record_fields!(created: created_at);

    fn validate(&self) -> Checked {
        validate::text("subject_name", &self.subject_name, 255)?;
        if self.max_marks <= 0.0 {
            return Err(ValidationError::new("max_marks", "must be greater than 0"));
        }
        validate::within("marks_obtained", self.marks_obtained, 0.0, self.max_marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_must_fit_their_maximum() {
        let mark = |obtained: f64, max: f64| InterviewMark {
            subject_name: "English".into(),
            marks_obtained: obtained,
            max_marks: max,
            ..InterviewMark::default()
        };
        assert!(mark(18.5, 25.0).validate().is_ok());
        assert_eq!(mark(26.0, 25.0).validate().unwrap_err().field, "marks_obtained");
        assert_eq!(mark(-1.0, 25.0).validate().unwrap_err().field, "marks_obtained");
        assert_eq!(mark(0.0, 0.0).validate().unwrap_err().field, "max_marks");
    }

    #[test]
    fn subjects_list_splits_selection() {
        let application = PlusOneApplication {
            subjects_selected: "Physics, Chemistry,,Maths ".into(),
            ..PlusOneApplication::default()
        };
        assert_eq!(application.subjects_list(), vec!["Physics", "Chemistry", "Maths"]);
    }
}
