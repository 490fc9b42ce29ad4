//! Student entity model, DTOs, filters, and aggregate rows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use registry_core::types::{DbId, Timestamp};

/// Lifecycle status of a student row. Stored as TEXT; `Deleted` is the
/// soft-delete marker and is excluded from all normal reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    Active,
    Inactive,
    Deleted,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Active => "Active",
            StudentStatus::Inactive => "Inactive",
            StudentStatus::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(StudentStatus::Active),
            "Inactive" => Ok(StudentStatus::Inactive),
            "Deleted" => Ok(StudentStatus::Deleted),
            other => Err(format!("unknown student status: {other}")),
        }
    }
}

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub course: String,
    pub academic_year: String,
    pub semester: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub registration_date: Timestamp,
    pub last_modified: Timestamp,
    pub status: String,
}

/// Fully validated insert payload. Built by the student service after
/// validation and ID assignment; never deserialized from client input.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub course: String,
    pub academic_year: String,
    pub semester: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Partial update payload. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub course: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub status: Option<StudentStatus>,
}

/// Recognized list filters. Strings are pre-sanitized by the service.
#[derive(Debug, Clone)]
pub struct StudentFilter {
    /// Case-insensitive substring over first_name/last_name/email/student_id.
    pub search: Option<String>,
    pub course: Option<String>,
    pub academic_year: Option<String>,
    pub gender: Option<String>,
    pub semester: Option<String>,
    /// Rows must match this status exactly. Defaults to Active; admin
    /// tooling may ask for Inactive or Deleted rows explicitly.
    pub status: StudentStatus,
}

impl Default for StudentFilter {
    fn default() -> Self {
        Self {
            search: None,
            course: None,
            academic_year: None,
            gender: None,
            semester: None,
            status: StudentStatus::Active,
        }
    }
}

/// One `GROUP BY` bucket in the statistics report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: i64,
}

/// One day of the 30-day registration histogram.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Aggregate statistics over active students.
#[derive(Debug, Clone, Serialize)]
pub struct StudentStats {
    pub total_students: i64,
    pub total_courses: i64,
    pub by_course: Vec<GroupCount>,
    pub by_year: Vec<GroupCount>,
    pub by_gender: Vec<GroupCount>,
    pub recent_registrations: Vec<DailyCount>,
}
