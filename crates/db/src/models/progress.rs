//! Progress record entity model and DTOs.
//!
//! A project has zero or more progress records, listed in creation order.
//! Field ownership (which role may write what) lives in
//! `promis_core::policy`; this module only describes the persisted shape.

use promis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `progress_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressRecord {
    pub id: DbId,
    pub project_id: DbId,

    // Descriptive
    pub progress_name: Option<String>,
    pub main_objective: Option<String>,
    pub location: Option<String>,
    pub funding_source: Option<String>,

    // Cost snapshot
    pub total_cost_original: Option<f64>,
    pub total_cost_current: Option<f64>,
    pub awarded_amount: Option<f64>,
    pub revised_end_date: Option<Timestamp>,

    // Physical progress
    pub overall_target: Option<String>,
    pub progress_as_of_prev_dec_percentage: Option<f64>,
    pub target_year: Option<i32>,
    pub target_month: Option<String>,
    pub progress_date: Option<Timestamp>,
    pub current_year_descriptive_target: Option<String>,
    pub quarter1_target_percentage: Option<f64>,
    pub quarter2_target_percentage: Option<f64>,
    pub quarter3_target_percentage: Option<f64>,
    pub quarter4_target_percentage: Option<f64>,
    pub year_end_progress_description: Option<String>,
    pub year_end_progress_percentage: Option<f64>,
    pub cumulative_target_at_year_end: Option<String>,
    pub cumulative_progress_description_at_year_end: Option<String>,
    /// Server-derived; recomputed on every save, never taken from input.
    pub cumulative_progress_percentage_of_overall_target: Option<f64>,
    pub physical_progress_image1: Option<String>,
    pub physical_progress_image2: Option<String>,
    pub physical_progress_image3: Option<String>,
    pub physical_target_failure_reasons: Option<String>,
    /// JSON-encoded list of contractor names.
    pub contractors: Option<String>,
    /// JSON-encoded list of consultant names.
    pub consultants: Option<String>,

    // Financial progress
    pub allocation_current_year: Option<f64>,
    pub expenditure_target: Option<f64>,
    pub imprest_requested: Option<f64>,
    pub imprest_received: Option<f64>,
    pub actual_expenditure: Option<f64>,
    pub bills_in_hand: Option<f64>,
    pub price_escalation: Option<f64>,
    pub cumulative_expenditure_at_year_end: Option<f64>,
    pub financial_target_failure_reasons: Option<String>,

    /// Workflow discriminator: `draft` or `submitted`.
    pub status: String,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a progress record. `project_id` is resolved by the
/// handler (id or name reference) before this is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProgressRecord {
    pub progress_name: Option<String>,
    pub main_objective: Option<String>,
    pub location: Option<String>,
    pub funding_source: Option<String>,
    pub total_cost_original: Option<f64>,
    pub total_cost_current: Option<f64>,
    pub awarded_amount: Option<f64>,
    pub revised_end_date: Option<Timestamp>,
    pub overall_target: Option<String>,
    pub progress_as_of_prev_dec_percentage: Option<f64>,
    pub target_year: Option<i32>,
    pub target_month: Option<String>,
    pub progress_date: Option<Timestamp>,
    pub current_year_descriptive_target: Option<String>,
    pub quarter1_target_percentage: Option<f64>,
    pub quarter2_target_percentage: Option<f64>,
    pub quarter3_target_percentage: Option<f64>,
    pub quarter4_target_percentage: Option<f64>,
    pub year_end_progress_description: Option<String>,
    pub year_end_progress_percentage: Option<f64>,
    pub cumulative_target_at_year_end: Option<String>,
    pub cumulative_progress_description_at_year_end: Option<String>,
    pub physical_progress_image1: Option<String>,
    pub physical_progress_image2: Option<String>,
    pub physical_progress_image3: Option<String>,
    pub physical_target_failure_reasons: Option<String>,
    pub contractors: Option<String>,
    pub consultants: Option<String>,
    pub allocation_current_year: Option<f64>,
    pub expenditure_target: Option<f64>,
    pub imprest_requested: Option<f64>,
    pub imprest_received: Option<f64>,
    pub actual_expenditure: Option<f64>,
    pub bills_in_hand: Option<f64>,
    pub price_escalation: Option<f64>,
    pub cumulative_expenditure_at_year_end: Option<f64>,
    pub financial_target_failure_reasons: Option<String>,
    pub status: Option<String>,
}

/// DTO for a draft save. All fields optional; only non-`None` fields are
/// applied (payloads have already been screened by the access policy).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProgressRecord {
    pub progress_name: Option<String>,
    pub main_objective: Option<String>,
    pub location: Option<String>,
    pub funding_source: Option<String>,
    pub total_cost_original: Option<f64>,
    pub total_cost_current: Option<f64>,
    pub awarded_amount: Option<f64>,
    pub revised_end_date: Option<Timestamp>,
    pub overall_target: Option<String>,
    pub progress_as_of_prev_dec_percentage: Option<f64>,
    pub target_year: Option<i32>,
    pub target_month: Option<String>,
    pub progress_date: Option<Timestamp>,
    pub current_year_descriptive_target: Option<String>,
    pub quarter1_target_percentage: Option<f64>,
    pub quarter2_target_percentage: Option<f64>,
    pub quarter3_target_percentage: Option<f64>,
    pub quarter4_target_percentage: Option<f64>,
    pub year_end_progress_description: Option<String>,
    pub year_end_progress_percentage: Option<f64>,
    pub cumulative_target_at_year_end: Option<String>,
    pub cumulative_progress_description_at_year_end: Option<String>,
    pub physical_progress_image1: Option<String>,
    pub physical_progress_image2: Option<String>,
    pub physical_progress_image3: Option<String>,
    pub physical_target_failure_reasons: Option<String>,
    pub contractors: Option<String>,
    pub consultants: Option<String>,
    pub allocation_current_year: Option<f64>,
    pub expenditure_target: Option<f64>,
    pub imprest_requested: Option<f64>,
    pub imprest_received: Option<f64>,
    pub actual_expenditure: Option<f64>,
    pub bills_in_hand: Option<f64>,
    pub price_escalation: Option<f64>,
    pub cumulative_expenditure_at_year_end: Option<f64>,
    pub financial_target_failure_reasons: Option<String>,
    pub status: Option<String>,
}

/// Optional filters for progress listing (`?status=&project_id=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressFilter {
    pub status: Option<String>,
    pub project_id: Option<DbId>,
}
