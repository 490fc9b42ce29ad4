//! Student service: business rules spanning validation and persistence.
//!
//! Handlers pass raw client input here. The service collects field
//! validation errors (all of them, not just the first), sanitizes text,
//! assigns student IDs, translates unique-index violations into
//! user-facing conflicts, and appends audit entries for mutations.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use registry_core::error::CoreError;
use registry_core::pagination::{clamp_page, clamp_per_page, PaginationMeta};
use registry_core::sanitize::clean_opt;
use registry_core::student_id::{self, MAX_GENERATION_ATTEMPTS};
use registry_core::types::DbId;
use registry_core::validation::{
    age_on, validate_date_of_birth, validate_email, validate_name, validate_phone, FieldError,
};

use registry_db::models::audit::NewAuditEntry;
use registry_db::models::student::{
    NewStudent, Student, StudentFilter, StudentPatch, StudentStats, StudentStatus,
};
use registry_db::repositories::{AuditRepo, StudentRepo};

use crate::error::{unique_constraint, AppError, AppResult};
use crate::query::StudentListParams;

/// Raw registration payload as submitted by the client. Every field is
/// optional at the type level so the required-field check can report all
/// missing fields instead of failing at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterStudentInput {
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// ISO date (`YYYY-MM-DD`); malformed values fail validation, never
    /// deserialization.
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub course: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl RegisterStudentInput {
    /// Scrub every field up front. Validation must see exactly the values
    /// that would be stored; cleaning after the checks would let markup
    /// stripping turn a passing value into a failing one.
    fn cleaned(self) -> Self {
        Self {
            student_id: clean_opt(self.student_id.as_deref()),
            first_name: clean_opt(self.first_name.as_deref()),
            last_name: clean_opt(self.last_name.as_deref()),
            email: clean_opt(self.email.as_deref()),
            phone: clean_opt(self.phone.as_deref()),
            date_of_birth: clean_opt(self.date_of_birth.as_deref()),
            gender: clean_opt(self.gender.as_deref()),
            course: clean_opt(self.course.as_deref()),
            academic_year: clean_opt(self.academic_year.as_deref()),
            semester: clean_opt(self.semester.as_deref()),
            address: clean_opt(self.address.as_deref()),
            city: clean_opt(self.city.as_deref()),
            state: clean_opt(self.state.as_deref()),
            zip_code: clean_opt(self.zip_code.as_deref()),
        }
    }
}

/// Raw partial-update payload. Only supplied fields are validated and
/// applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub course: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub status: Option<String>,
}

impl UpdateStudentInput {
    /// Same scrub-before-validate rule as registration. A field cleaned
    /// down to nothing counts as not supplied.
    fn cleaned(self) -> Self {
        Self {
            first_name: clean_opt(self.first_name.as_deref()),
            last_name: clean_opt(self.last_name.as_deref()),
            email: clean_opt(self.email.as_deref()),
            phone: clean_opt(self.phone.as_deref()),
            date_of_birth: clean_opt(self.date_of_birth.as_deref()),
            gender: clean_opt(self.gender.as_deref()),
            course: clean_opt(self.course.as_deref()),
            academic_year: clean_opt(self.academic_year.as_deref()),
            semester: clean_opt(self.semester.as_deref()),
            address: clean_opt(self.address.as_deref()),
            city: clean_opt(self.city.as_deref()),
            state: clean_opt(self.state.as_deref()),
            zip_code: clean_opt(self.zip_code.as_deref()),
            status: clean_opt(self.status.as_deref()),
        }
    }
}

/// A student as rendered in API responses: the row plus the age computed
/// from `date_of_birth` at response time (age is never stored).
#[derive(Debug, Clone, Serialize)]
pub struct StudentRecord {
    #[serde(flatten)]
    pub student: Student,
    pub age: Option<i32>,
}

impl StudentRecord {
    fn on(student: Student, today: NaiveDate) -> Self {
        let age = age_on(student.date_of_birth, today);
        Self { student, age }
    }
}

/// A page of students plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub students: Vec<StudentRecord>,
    pub pagination: PaginationMeta,
}

/// Orchestrates student lifecycle operations.
pub struct StudentService;

impl StudentService {
    /// Register a new student.
    ///
    /// Validation failures are collected across all fields. When no
    /// student ID is supplied, one is generated as `STU<year><4 digits>`
    /// and inserts are retried (bounded) on generated-ID collision; the
    /// partial unique indexes remain the authoritative guard.
    pub async fn register(
        pool: &PgPool,
        actor: Option<DbId>,
        input: RegisterStudentInput,
    ) -> AppResult<Student> {
        let today = Utc::now().date_naive();
        let input = input.cleaned();

        let errors = registration_errors(&input, today);
        if !errors.is_empty() {
            return Err(CoreError::InvalidFields(errors).into());
        }

        // The error collection above guarantees presence and shape of the
        // required fields.
        let date_of_birth = parse_date(input.date_of_birth.as_deref().unwrap_or_default())
            .ok_or_else(|| {
                AppError::InternalError("date of birth failed to re-parse".into())
            })?;
        let email = input.email.clone().unwrap_or_default();

        // Pre-check for a friendlier error before attempting the insert.
        // The unique index still closes the race window.
        if StudentRepo::email_exists(pool, &email, None).await? {
            return Err(CoreError::Conflict("Email already registered".into()).into());
        }

        let supplied_id = input.student_id.clone();
        if let Some(ref sid) = supplied_id {
            if StudentRepo::student_id_exists(pool, sid).await? {
                return Err(CoreError::Conflict("Student ID already exists".into()).into());
            }
        }

        let template = NewStudent {
            student_id: String::new(),
            first_name: input.first_name.clone().unwrap_or_default(),
            last_name: input.last_name.clone().unwrap_or_default(),
            email,
            phone: input.phone.clone(),
            date_of_birth,
            gender: input.gender.clone().unwrap_or_default(),
            course: input.course.clone().unwrap_or_default(),
            academic_year: input.academic_year.clone().unwrap_or_default(),
            semester: input.semester.clone().unwrap_or_default(),
            address: input.address.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            zip_code: input.zip_code.clone(),
        };

        let student = Self::insert_with_id_allocation(pool, template, supplied_id, today).await?;

        Self::audit(
            pool,
            actor,
            "CREATE",
            student.id,
            None,
            serde_json::to_value(&student).ok(),
        )
        .await;

        Ok(student)
    }

    /// Insert the student, allocating a generated ID with bounded retries
    /// when the client did not supply one.
    async fn insert_with_id_allocation(
        pool: &PgPool,
        template: NewStudent,
        supplied_id: Option<String>,
        today: NaiveDate,
    ) -> AppResult<Student> {
        let generated = supplied_id.is_none();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let candidate = match supplied_id {
                Some(ref sid) => sid.clone(),
                None => student_id::random_id(today.year()),
            };
            let new_student = NewStudent {
                student_id: candidate,
                ..template.clone()
            };

            match StudentRepo::insert(pool, &new_student).await {
                Ok(student) => return Ok(student),
                Err(err) => match unique_constraint(&err) {
                    Some("uq_students_email") => {
                        return Err(
                            CoreError::Conflict("Email already registered".into()).into()
                        );
                    }
                    Some("uq_students_student_id") if generated => {
                        if attempts >= MAX_GENERATION_ATTEMPTS {
                            tracing::error!(
                                attempts,
                                "exhausted student ID generation attempts"
                            );
                            return Err(CoreError::Internal(
                                "Failed to allocate a unique student ID".into(),
                            )
                            .into());
                        }
                        tracing::debug!(attempts, "generated student ID collided; retrying");
                    }
                    Some("uq_students_student_id") => {
                        return Err(
                            CoreError::Conflict("Student ID already exists".into()).into()
                        );
                    }
                    _ => return Err(err.into()),
                },
            }
        }
    }

    /// Fetch one student with computed age. NotFound for missing or
    /// soft-deleted rows.
    pub async fn get(pool: &PgPool, id: DbId) -> AppResult<StudentRecord> {
        let student = StudentRepo::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Student",
                id,
            })?;
        Ok(StudentRecord::on(student, Utc::now().date_naive()))
    }

    /// Apply a partial update. Only the supplied fields are validated.
    pub async fn update(
        pool: &PgPool,
        actor: Option<DbId>,
        id: DbId,
        input: UpdateStudentInput,
    ) -> AppResult<Student> {
        let today = Utc::now().date_naive();
        let input = input.cleaned();

        let (patch, errors) = build_patch(&input, today);
        if !errors.is_empty() {
            return Err(CoreError::InvalidFields(errors).into());
        }

        if let Some(ref email) = patch.email {
            if StudentRepo::email_exists(pool, email, Some(id)).await? {
                return Err(CoreError::Conflict("Email already registered".into()).into());
            }
        }

        let before = StudentRepo::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Student",
                id,
            })?;

        let updated = StudentRepo::update(pool, id, &patch)
            .await
            .map_err(translate_conflict)?
            .ok_or(CoreError::NotFound {
                entity: "Student",
                id,
            })?;

        Self::audit(
            pool,
            actor,
            "UPDATE",
            id,
            serde_json::to_value(&before).ok(),
            serde_json::to_value(&updated).ok(),
        )
        .await;

        Ok(updated)
    }

    /// Soft-delete one student. A second delete of the same row reports
    /// NotFound so duplicate audit entries are impossible.
    pub async fn delete(pool: &PgPool, actor: Option<DbId>, id: DbId) -> AppResult<()> {
        let deleted = StudentRepo::soft_delete(pool, id).await?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "Student",
                id,
            }
            .into());
        }

        Self::audit(pool, actor, "DELETE", id, None, None).await;
        Ok(())
    }

    /// Soft-delete a batch. Empty input is a bad request; rows already
    /// deleted do not count toward the returned total.
    pub async fn bulk_delete(
        pool: &PgPool,
        actor: Option<DbId>,
        ids: &[DbId],
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::BadRequest(
                "Student IDs required for bulk delete".into(),
            ));
        }

        let deleted = StudentRepo::bulk_soft_delete(pool, ids).await?;

        for &id in &deleted {
            Self::audit(pool, actor, "DELETE", id, None, None).await;
        }

        Ok(deleted.len() as u64)
    }

    /// Filtered, paginated search with per-row computed age.
    pub async fn search(pool: &PgPool, params: &StudentListParams) -> AppResult<StudentPage> {
        let status = match params.status.as_deref() {
            None => StudentStatus::Active,
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid status filter: {raw}")))?,
        };

        let filter = StudentFilter {
            search: clean_opt(params.search.as_deref()),
            course: clean_opt(params.course.as_deref()),
            academic_year: clean_opt(params.year.as_deref()),
            gender: clean_opt(params.gender.as_deref()),
            semester: clean_opt(params.semester.as_deref()),
            status,
        };

        let page = clamp_page(params.page);
        let per_page = clamp_per_page(params.limit);

        let (rows, total) = StudentRepo::list(pool, &filter, page, per_page).await?;

        let today = Utc::now().date_naive();
        let students = rows
            .into_iter()
            .map(|s| StudentRecord::on(s, today))
            .collect();

        Ok(StudentPage {
            students,
            pagination: PaginationMeta::new(page, per_page, total),
        })
    }

    /// Aggregate statistics over active students.
    pub async fn stats(pool: &PgPool) -> AppResult<StudentStats> {
        Ok(StudentRepo::stats(pool).await?)
    }

    /// Append an audit entry. Audit failures are logged and swallowed;
    /// they never fail the request that triggered them.
    async fn audit(
        pool: &PgPool,
        actor: Option<DbId>,
        action: &str,
        record_id: DbId,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) {
        let entry = NewAuditEntry {
            user_id: actor,
            action: action.to_string(),
            table_name: "students".to_string(),
            record_id: Some(record_id),
            old_values,
            new_values,
        };
        if let Err(err) = AuditRepo::record(pool, &entry).await {
            tracing::warn!(error = %err, action, record_id, "failed to record audit entry");
        }
    }
}

/// Translate a student unique violation raised during update into the
/// matching user-facing conflict.
fn translate_conflict(err: sqlx::Error) -> AppError {
    match unique_constraint(&err) {
        Some("uq_students_email") => {
            CoreError::Conflict("Email already registered".into()).into()
        }
        Some("uq_students_student_id") => {
            CoreError::Conflict("Student ID already exists".into()).into()
        }
        _ => err.into(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Collect every field error in a registration payload: required-field
/// presence first, then shape checks on whatever is present. Expects the
/// payload to be cleaned already, so cleaning cannot change a validated
/// value afterwards.
fn registration_errors(input: &RegisterStudentInput, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let required: &[(&str, &Option<String>)] = &[
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
        ("email", &input.email),
        ("date_of_birth", &input.date_of_birth),
        ("gender", &input.gender),
        ("course", &input.course),
        ("academic_year", &input.academic_year),
        ("semester", &input.semester),
    ];
    for (field, value) in required {
        if value.is_none() {
            errors.push(FieldError::new(*field, format!("Field '{field}' is required")));
        }
    }

    if let Some(first_name) = input.first_name.as_deref() {
        if let Err(msg) = validate_name(first_name) {
            errors.push(FieldError::new("first_name", format!("First name {msg}")));
        }
    }
    if let Some(last_name) = input.last_name.as_deref() {
        if let Err(msg) = validate_name(last_name) {
            errors.push(FieldError::new("last_name", format!("Last name {msg}")));
        }
    }
    if let Some(email) = input.email.as_deref() {
        if let Err(msg) = validate_email(email) {
            errors.push(FieldError::new("email", format!("Email {msg}")));
        }
    }
    if let Some(phone) = input.phone.as_deref() {
        if let Err(msg) = validate_phone(phone) {
            errors.push(FieldError::new("phone", format!("Phone {msg}")));
        }
    }
    if let Some(raw_dob) = input.date_of_birth.as_deref() {
        match parse_date(raw_dob) {
            None => errors.push(FieldError::new(
                "date_of_birth",
                "Date of birth must be a valid date in YYYY-MM-DD format",
            )),
            Some(dob) => {
                if let Err(msg) = validate_date_of_birth(dob, today) {
                    errors.push(FieldError::new("date_of_birth", format!("Date of birth {msg}")));
                }
            }
        }
    }
    if let Some(sid) = input.student_id.as_deref() {
        if !student_id::is_valid_format(sid) {
            errors.push(FieldError::new(
                "student_id",
                "Student ID must match the format STU<year><4 digits>",
            ));
        }
    }

    errors
}

/// Validate the supplied fields of a cleaned update payload and build the
/// repository patch. Fields not present are neither validated nor changed.
fn build_patch(input: &UpdateStudentInput, today: NaiveDate) -> (StudentPatch, Vec<FieldError>) {
    let mut errors = Vec::new();
    let mut patch = StudentPatch::default();

    if let Some(first_name) = input.first_name.as_deref() {
        match validate_name(first_name) {
            Ok(()) => patch.first_name = Some(first_name.to_string()),
            Err(msg) => errors.push(FieldError::new("first_name", format!("First name {msg}"))),
        }
    }
    if let Some(last_name) = input.last_name.as_deref() {
        match validate_name(last_name) {
            Ok(()) => patch.last_name = Some(last_name.to_string()),
            Err(msg) => errors.push(FieldError::new("last_name", format!("Last name {msg}"))),
        }
    }
    if let Some(email) = input.email.as_deref() {
        match validate_email(email) {
            Ok(()) => patch.email = Some(email.to_string()),
            Err(msg) => errors.push(FieldError::new("email", format!("Email {msg}"))),
        }
    }
    if let Some(phone) = input.phone.as_deref() {
        match validate_phone(phone) {
            Ok(()) => patch.phone = Some(phone.to_string()),
            Err(msg) => errors.push(FieldError::new("phone", format!("Phone {msg}"))),
        }
    }
    if let Some(raw_dob) = input.date_of_birth.as_deref() {
        match parse_date(raw_dob) {
            None => errors.push(FieldError::new(
                "date_of_birth",
                "Date of birth must be a valid date in YYYY-MM-DD format",
            )),
            Some(dob) => match validate_date_of_birth(dob, today) {
                Ok(()) => patch.date_of_birth = Some(dob),
                Err(msg) => {
                    errors.push(FieldError::new("date_of_birth", format!("Date of birth {msg}")))
                }
            },
        }
    }
    if let Some(status) = input.status.as_deref() {
        match status.parse::<StudentStatus>() {
            Ok(parsed) => patch.status = Some(parsed),
            Err(_) => errors.push(FieldError::new(
                "status",
                "Status must be Active, Inactive, or Deleted",
            )),
        }
    }

    patch.gender = input.gender.clone();
    patch.course = input.course.clone();
    patch.academic_year = input.academic_year.clone();
    patch.semester = input.semester.clone();
    patch.address = input.address.clone();
    patch.city = input.city.clone();
    patch.state = input.state.clone();
    patch.zip_code = input.zip_code.clone();

    (patch, errors)
}
