//! Repository for the `students` table.
//!
//! Every read excludes soft-deleted rows unless the caller filters by
//! status explicitly. Email and student-ID uniqueness is enforced by the
//! partial unique indexes `uq_students_email` and `uq_students_student_id`
//! (scoped to `status <> 'Deleted'`), so `insert` is the single
//! serialization point for the uniqueness race; the `*_exists` pre-checks
//! are an optimization only.

use sqlx::PgPool;

use registry_core::types::DbId;

use crate::models::student::{
    DailyCount, GroupCount, NewStudent, Student, StudentFilter, StudentPatch, StudentStats,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, first_name, last_name, email, phone, \
    date_of_birth, gender, course, academic_year, semester, \
    address, city, state, zip_code, registration_date, last_modified, status";

/// Shared WHERE clause for filtered list/count queries. Optional filters
/// use the `$n IS NULL OR` pattern so a single prepared statement covers
/// every filter combination; user input is always bound, never spliced.
const FILTER_CLAUSE: &str = "status = $1 \
    AND ($2::TEXT IS NULL OR first_name ILIKE '%' || $2 || '%' \
         OR last_name ILIKE '%' || $2 || '%' \
         OR email ILIKE '%' || $2 || '%' \
         OR student_id ILIKE '%' || $2 || '%') \
    AND ($3::TEXT IS NULL OR course = $3) \
    AND ($4::TEXT IS NULL OR academic_year = $4) \
    AND ($5::TEXT IS NULL OR gender = $5) \
    AND ($6::TEXT IS NULL OR semester = $6)";

/// Provides CRUD and reporting operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    ///
    /// `registration_date`, `last_modified`, and `status = 'Active'` come
    /// from column defaults. A duplicate email or student_id among
    /// non-deleted rows surfaces as a unique-violation database error
    /// carrying the constraint name; the service layer translates it.
    pub async fn insert(pool: &PgPool, input: &NewStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students
                (student_id, first_name, last_name, email, phone,
                 date_of_birth, gender, course, academic_year, semester,
                 address, city, state, zip_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.student_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.date_of_birth)
            .bind(&input.gender)
            .bind(&input.course)
            .bind(&input.academic_year)
            .bind(&input.semester)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .fetch_one(pool)
            .await
    }

    /// Find a student by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM students WHERE id = $1 AND status <> 'Deleted'");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a non-deleted row already uses this email, optionally
    /// ignoring one row (the student being updated).
    pub async fn email_exists(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM students
                WHERE email = $1 AND status <> 'Deleted'
                  AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a non-deleted row already uses this external student ID.
    pub async fn student_id_exists(pool: &PgPool, student_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM students
                WHERE student_id = $1 AND status <> 'Deleted'
             )",
        )
        .bind(student_id)
        .fetch_one(pool)
        .await
    }

    /// List students matching `filter`, newest registrations first (ties
    /// broken by id descending for determinism), plus the total count of
    /// matching rows for pagination metadata.
    ///
    /// `page` and `per_page` must already be clamped by the caller
    /// (`registry_core::pagination`).
    pub async fn list(
        pool: &PgPool,
        filter: &StudentFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Student>, i64), sqlx::Error> {
        let total_query = format!("SELECT COUNT(*) FROM students WHERE {FILTER_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&total_query)
            .bind(filter.status.as_str())
            .bind(&filter.search)
            .bind(&filter.course)
            .bind(&filter.academic_year)
            .bind(&filter.gender)
            .bind(&filter.semester)
            .fetch_one(pool)
            .await?;

        let rows_query = format!(
            "SELECT {COLUMNS} FROM students WHERE {FILTER_CLAUSE} \
             ORDER BY registration_date DESC, id DESC \
             LIMIT $7 OFFSET $8"
        );
        let rows = sqlx::query_as::<_, Student>(&rows_query)
            .bind(filter.status.as_str())
            .bind(&filter.search)
            .bind(&filter.course)
            .bind(&filter.academic_year)
            .bind(&filter.gender)
            .bind(&filter.semester)
            .bind(per_page)
            .bind(registry_core::pagination::offset(page, per_page))
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Apply a partial update. Only non-`None` fields in `patch` are
    /// changed; `last_modified` is always refreshed. Returns `None` when
    /// the student does not exist or is soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                date_of_birth = COALESCE($6, date_of_birth),
                gender = COALESCE($7, gender),
                course = COALESCE($8, course),
                academic_year = COALESCE($9, academic_year),
                semester = COALESCE($10, semester),
                address = COALESCE($11, address),
                city = COALESCE($12, city),
                state = COALESCE($13, state),
                zip_code = COALESCE($14, zip_code),
                status = COALESCE($15, status),
                last_modified = NOW()
             WHERE id = $1 AND status <> 'Deleted'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&patch.first_name)
            .bind(&patch.last_name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(patch.date_of_birth)
            .bind(&patch.gender)
            .bind(&patch.course)
            .bind(&patch.academic_year)
            .bind(&patch.semester)
            .bind(&patch.address)
            .bind(&patch.city)
            .bind(&patch.state)
            .bind(&patch.zip_code)
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a student. Returns `true` if a row was marked deleted;
    /// a second call on the same row returns `false` so the caller reports
    /// NotFound instead of succeeding twice.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students SET status = 'Deleted', last_modified = NOW() \
             WHERE id = $1 AND status <> 'Deleted'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a batch of students, returning the ids of rows that
    /// actually changed. Rows already deleted (or absent) are omitted so
    /// callers can report and audit exactly what happened.
    pub async fn bulk_soft_delete(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE students SET status = 'Deleted', last_modified = NOW() \
             WHERE id = ANY($1) AND status <> 'Deleted' \
             RETURNING id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Aggregate statistics over active students: totals, grouped counts,
    /// and a 30-day registration histogram. Reporting query, not a hot path.
    pub async fn stats(pool: &PgPool) -> Result<StudentStats, sqlx::Error> {
        let total_students: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE status = 'Active'")
                .fetch_one(pool)
                .await?;

        let total_courses: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT course) FROM students WHERE status = 'Active'")
                .fetch_one(pool)
                .await?;

        let by_course = sqlx::query_as::<_, GroupCount>(
            "SELECT course AS label, COUNT(*) AS count FROM students \
             WHERE status = 'Active' GROUP BY course ORDER BY count DESC, label",
        )
        .fetch_all(pool)
        .await?;

        let by_year = sqlx::query_as::<_, GroupCount>(
            "SELECT academic_year AS label, COUNT(*) AS count FROM students \
             WHERE status = 'Active' GROUP BY academic_year ORDER BY label",
        )
        .fetch_all(pool)
        .await?;

        let by_gender = sqlx::query_as::<_, GroupCount>(
            "SELECT gender AS label, COUNT(*) AS count FROM students \
             WHERE status = 'Active' GROUP BY gender ORDER BY label",
        )
        .fetch_all(pool)
        .await?;

        let recent_registrations = sqlx::query_as::<_, DailyCount>(
            "SELECT registration_date::DATE AS date, COUNT(*) AS count FROM students \
             WHERE status = 'Active' AND registration_date >= NOW() - INTERVAL '30 days' \
             GROUP BY registration_date::DATE ORDER BY date DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(StudentStats {
            total_students,
            total_courses,
            by_course,
            by_year,
            by_gender,
            recent_registrations,
        })
    }
}
