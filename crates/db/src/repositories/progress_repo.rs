//! Repository for the `progress_records` table.
//!
//! The derived cumulative percentage is computed by the caller (from
//! `promis_core::calc`) against the merged field values and written
//! unconditionally, so it can never drift from its inputs.

use promis_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::{
    CreateProgressRecord, ProgressFilter, ProgressRecord, UpdateProgressRecord,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, progress_name, main_objective, location, funding_source, \
     total_cost_original, total_cost_current, awarded_amount, revised_end_date, \
     overall_target, progress_as_of_prev_dec_percentage, target_year, target_month, \
     progress_date, current_year_descriptive_target, quarter1_target_percentage, \
     quarter2_target_percentage, quarter3_target_percentage, quarter4_target_percentage, \
     year_end_progress_description, year_end_progress_percentage, \
     cumulative_target_at_year_end, cumulative_progress_description_at_year_end, \
     cumulative_progress_percentage_of_overall_target, physical_progress_image1, \
     physical_progress_image2, physical_progress_image3, physical_target_failure_reasons, \
     contractors, consultants, allocation_current_year, expenditure_target, \
     imprest_requested, imprest_received, actual_expenditure, bills_in_hand, \
     price_escalation, cumulative_expenditure_at_year_end, \
     financial_target_failure_reasons, status, created_at, updated_at";

/// Provides CRUD and filtered listing for progress records.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Insert a new progress record for `project_id`.
    ///
    /// `cumulative` is the server-computed derived percentage; input payloads
    /// never carry it.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProgressRecord,
        cumulative: Option<f64>,
    ) -> Result<ProgressRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress_records (
                project_id, progress_name, main_objective, location, funding_source,
                total_cost_original, total_cost_current, awarded_amount, revised_end_date,
                overall_target, progress_as_of_prev_dec_percentage, target_year,
                target_month, progress_date, current_year_descriptive_target,
                quarter1_target_percentage, quarter2_target_percentage,
                quarter3_target_percentage, quarter4_target_percentage,
                year_end_progress_description, year_end_progress_percentage,
                cumulative_target_at_year_end, cumulative_progress_description_at_year_end,
                cumulative_progress_percentage_of_overall_target,
                physical_progress_image1, physical_progress_image2,
                physical_progress_image3, physical_target_failure_reasons,
                contractors, consultants, allocation_current_year, expenditure_target,
                imprest_requested, imprest_received, actual_expenditure, bills_in_hand,
                price_escalation, cumulative_expenditure_at_year_end,
                financial_target_failure_reasons, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                COALESCE($12, EXTRACT(YEAR FROM NOW())::int), $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27,
                $28, $29, $30, $31, $32, $33, $34, $35, $36, $37, $38, $39,
                COALESCE($40, 'draft'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(project_id)
            .bind(&input.progress_name)
            .bind(&input.main_objective)
            .bind(&input.location)
            .bind(&input.funding_source)
            .bind(input.total_cost_original)
            .bind(input.total_cost_current)
            .bind(input.awarded_amount)
            .bind(input.revised_end_date)
            .bind(&input.overall_target)
            .bind(input.progress_as_of_prev_dec_percentage)
            .bind(input.target_year)
            .bind(&input.target_month)
            .bind(input.progress_date)
            .bind(&input.current_year_descriptive_target)
            .bind(input.quarter1_target_percentage)
            .bind(input.quarter2_target_percentage)
            .bind(input.quarter3_target_percentage)
            .bind(input.quarter4_target_percentage)
            .bind(&input.year_end_progress_description)
            .bind(input.year_end_progress_percentage)
            .bind(&input.cumulative_target_at_year_end)
            .bind(&input.cumulative_progress_description_at_year_end)
            .bind(cumulative)
            .bind(&input.physical_progress_image1)
            .bind(&input.physical_progress_image2)
            .bind(&input.physical_progress_image3)
            .bind(&input.physical_target_failure_reasons)
            .bind(&input.contractors)
            .bind(&input.consultants)
            .bind(input.allocation_current_year)
            .bind(input.expenditure_target)
            .bind(input.imprest_requested)
            .bind(input.imprest_received)
            .bind(input.actual_expenditure)
            .bind(input.bills_in_hand)
            .bind(input.price_escalation)
            .bind(input.cumulative_expenditure_at_year_end)
            .bind(&input.financial_target_failure_reasons)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a progress record by its own ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress_records WHERE id = $1");
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List progress records with optional status/project filters, in
    /// creation order.
    pub async fn list(
        pool: &PgPool,
        filter: &ProgressFilter,
    ) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_records
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR project_id = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(&filter.status)
            .bind(filter.project_id)
            .fetch_all(pool)
            .await
    }

    /// List every progress record for a project, in creation order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_records WHERE project_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a draft save. Only non-`None` fields in `input` are applied;
    /// the derived percentage is always rewritten from `cumulative`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProgressRecord,
        cumulative: Option<f64>,
    ) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE progress_records SET
                progress_name = COALESCE($2, progress_name),
                main_objective = COALESCE($3, main_objective),
                location = COALESCE($4, location),
                funding_source = COALESCE($5, funding_source),
                total_cost_original = COALESCE($6, total_cost_original),
                total_cost_current = COALESCE($7, total_cost_current),
                awarded_amount = COALESCE($8, awarded_amount),
                revised_end_date = COALESCE($9, revised_end_date),
                overall_target = COALESCE($10, overall_target),
                progress_as_of_prev_dec_percentage = COALESCE($11, progress_as_of_prev_dec_percentage),
                target_year = COALESCE($12, target_year),
                target_month = COALESCE($13, target_month),
                progress_date = COALESCE($14, progress_date),
                current_year_descriptive_target = COALESCE($15, current_year_descriptive_target),
                quarter1_target_percentage = COALESCE($16, quarter1_target_percentage),
                quarter2_target_percentage = COALESCE($17, quarter2_target_percentage),
                quarter3_target_percentage = COALESCE($18, quarter3_target_percentage),
                quarter4_target_percentage = COALESCE($19, quarter4_target_percentage),
                year_end_progress_description = COALESCE($20, year_end_progress_description),
                year_end_progress_percentage = COALESCE($21, year_end_progress_percentage),
                cumulative_target_at_year_end = COALESCE($22, cumulative_target_at_year_end),
                cumulative_progress_description_at_year_end = COALESCE($23, cumulative_progress_description_at_year_end),
                cumulative_progress_percentage_of_overall_target = $24,
                physical_progress_image1 = COALESCE($25, physical_progress_image1),
                physical_progress_image2 = COALESCE($26, physical_progress_image2),
                physical_progress_image3 = COALESCE($27, physical_progress_image3),
                physical_target_failure_reasons = COALESCE($28, physical_target_failure_reasons),
                contractors = COALESCE($29, contractors),
                consultants = COALESCE($30, consultants),
                allocation_current_year = COALESCE($31, allocation_current_year),
                expenditure_target = COALESCE($32, expenditure_target),
                imprest_requested = COALESCE($33, imprest_requested),
                imprest_received = COALESCE($34, imprest_received),
                actual_expenditure = COALESCE($35, actual_expenditure),
                bills_in_hand = COALESCE($36, bills_in_hand),
                price_escalation = COALESCE($37, price_escalation),
                cumulative_expenditure_at_year_end = COALESCE($38, cumulative_expenditure_at_year_end),
                financial_target_failure_reasons = COALESCE($39, financial_target_failure_reasons),
                status = COALESCE($40, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(id)
            .bind(&input.progress_name)
            .bind(&input.main_objective)
            .bind(&input.location)
            .bind(&input.funding_source)
            .bind(input.total_cost_original)
            .bind(input.total_cost_current)
            .bind(input.awarded_amount)
            .bind(input.revised_end_date)
            .bind(&input.overall_target)
            .bind(input.progress_as_of_prev_dec_percentage)
            .bind(input.target_year)
            .bind(&input.target_month)
            .bind(input.progress_date)
            .bind(&input.current_year_descriptive_target)
            .bind(input.quarter1_target_percentage)
            .bind(input.quarter2_target_percentage)
            .bind(input.quarter3_target_percentage)
            .bind(input.quarter4_target_percentage)
            .bind(&input.year_end_progress_description)
            .bind(input.year_end_progress_percentage)
            .bind(&input.cumulative_target_at_year_end)
            .bind(&input.cumulative_progress_description_at_year_end)
            .bind(cumulative)
            .bind(&input.physical_progress_image1)
            .bind(&input.physical_progress_image2)
            .bind(&input.physical_progress_image3)
            .bind(&input.physical_target_failure_reasons)
            .bind(&input.contractors)
            .bind(&input.consultants)
            .bind(input.allocation_current_year)
            .bind(input.expenditure_target)
            .bind(input.imprest_requested)
            .bind(input.imprest_received)
            .bind(input.actual_expenditure)
            .bind(input.bills_in_hand)
            .bind(input.price_escalation)
            .bind(input.cumulative_expenditure_at_year_end)
            .bind(&input.financial_target_failure_reasons)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Set the workflow status. The caller has already validated the
    /// transition against the lifecycle rules.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE progress_records SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a progress record by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM progress_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
