//! Repository for the `projects` table.

use promis_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_name, department_type, department_category, institution, \
     department, duration_start, duration_end, tec, tec_currency, awarded_amount, \
     revised_date, start_date, estimated_end_date, project_extended, extended_date, \
     extension_pdf, return_periods_start, return_periods_end, funding_source, \
     capital_works, location, land_location, responsible_dept, project_image, \
     project_pdf, npd_date, cabinet_papers_no, cabinet_papers_date, remarks, \
     is_draft, created_by, created_at, updated_at";

/// Provides CRUD and visibility-scoped listing for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `created_by`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        created_by: DbId,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (
                project_name, department_type, department_category, institution,
                department, duration_start, duration_end, tec, tec_currency,
                awarded_amount, revised_date, start_date, estimated_end_date,
                project_extended, extended_date, extension_pdf,
                return_periods_start, return_periods_end, funding_source,
                capital_works, location, land_location, responsible_dept,
                project_image, project_pdf, npd_date, cabinet_papers_no,
                cabinet_papers_date, remarks, is_draft, created_by)
             VALUES ($1, COALESCE($2, 'Local'), $3, $4, $5, $6, $7, $8,
                COALESCE($9, 'LKR'), $10, $11, $12, $13, COALESCE($14, 'No'),
                $15, $16, $17, $18, $19, COALESCE($20, FALSE), $21, $22, $23,
                $24, $25, $26, $27, $28, $29, COALESCE($30, FALSE), $31)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.project_name)
            .bind(&input.department_type)
            .bind(&input.department_category)
            .bind(&input.institution)
            .bind(&input.department)
            .bind(input.duration_start)
            .bind(input.duration_end)
            .bind(input.tec)
            .bind(&input.tec_currency)
            .bind(input.awarded_amount)
            .bind(input.revised_date)
            .bind(input.start_date)
            .bind(input.estimated_end_date)
            .bind(&input.project_extended)
            .bind(input.extended_date)
            .bind(&input.extension_pdf)
            .bind(input.return_periods_start)
            .bind(input.return_periods_end)
            .bind(&input.funding_source)
            .bind(input.capital_works)
            .bind(&input.location)
            .bind(&input.land_location)
            .bind(&input.responsible_dept)
            .bind(&input.project_image)
            .bind(&input.project_pdf)
            .bind(input.npd_date)
            .bind(&input.cabinet_papers_no)
            .bind(input.cabinet_papers_date)
            .bind(&input.remarks)
            .bind(input.is_draft)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by exact name. Used by the record resolution service
    /// when a reference is not id-shaped.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE project_name = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List every project, most recently created first. Admin view.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List projects visible to a non-admin user: own projects plus projects
    /// of the same institution.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: DbId,
        institution_id: Option<&str>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE created_by = $1 OR ($2::text IS NOT NULL AND institution = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(institution_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    /// `created_by` is deliberately untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                project_name = COALESCE($2, project_name),
                department_type = COALESCE($3, department_type),
                department_category = COALESCE($4, department_category),
                institution = COALESCE($5, institution),
                department = COALESCE($6, department),
                duration_start = COALESCE($7, duration_start),
                duration_end = COALESCE($8, duration_end),
                tec = COALESCE($9, tec),
                tec_currency = COALESCE($10, tec_currency),
                awarded_amount = COALESCE($11, awarded_amount),
                revised_date = COALESCE($12, revised_date),
                start_date = COALESCE($13, start_date),
                estimated_end_date = COALESCE($14, estimated_end_date),
                project_extended = COALESCE($15, project_extended),
                extended_date = COALESCE($16, extended_date),
                extension_pdf = COALESCE($17, extension_pdf),
                return_periods_start = COALESCE($18, return_periods_start),
                return_periods_end = COALESCE($19, return_periods_end),
                funding_source = COALESCE($20, funding_source),
                capital_works = COALESCE($21, capital_works),
                location = COALESCE($22, location),
                land_location = COALESCE($23, land_location),
                responsible_dept = COALESCE($24, responsible_dept),
                project_image = COALESCE($25, project_image),
                project_pdf = COALESCE($26, project_pdf),
                npd_date = COALESCE($27, npd_date),
                cabinet_papers_no = COALESCE($28, cabinet_papers_no),
                cabinet_papers_date = COALESCE($29, cabinet_papers_date),
                remarks = COALESCE($30, remarks),
                is_draft = COALESCE($31, is_draft),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.project_name)
            .bind(&input.department_type)
            .bind(&input.department_category)
            .bind(&input.institution)
            .bind(&input.department)
            .bind(input.duration_start)
            .bind(input.duration_end)
            .bind(input.tec)
            .bind(&input.tec_currency)
            .bind(input.awarded_amount)
            .bind(input.revised_date)
            .bind(input.start_date)
            .bind(input.estimated_end_date)
            .bind(&input.project_extended)
            .bind(input.extended_date)
            .bind(&input.extension_pdf)
            .bind(input.return_periods_start)
            .bind(input.return_periods_end)
            .bind(&input.funding_source)
            .bind(input.capital_works)
            .bind(&input.location)
            .bind(&input.land_location)
            .bind(&input.responsible_dept)
            .bind(&input.project_image)
            .bind(&input.project_pdf)
            .bind(input.npd_date)
            .bind(&input.cabinet_papers_no)
            .bind(input.cabinet_papers_date)
            .bind(&input.remarks)
            .bind(input.is_draft)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID. Progress records cascade via the foreign key.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
