//! Project entity model and DTOs.

use promis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub project_name: String,

    // Department information
    pub department_type: String,
    pub department_category: Option<String>,
    /// Free-text institution key; drives institution-scoped visibility.
    pub institution: Option<String>,
    pub department: Option<String>,

    // Duration range
    pub duration_start: Option<Timestamp>,
    pub duration_end: Option<Timestamp>,

    // Financial information
    pub tec: Option<f64>,
    pub tec_currency: String,
    pub awarded_amount: Option<f64>,
    pub revised_date: Option<Timestamp>,

    // Timeline
    pub start_date: Timestamp,
    pub estimated_end_date: Timestamp,
    pub project_extended: String,
    pub extended_date: Option<Timestamp>,
    pub extension_pdf: Option<String>,

    // Return periods
    pub return_periods_start: Option<Timestamp>,
    pub return_periods_end: Option<Timestamp>,

    // Funding and location
    pub funding_source: Option<String>,
    pub capital_works: bool,
    pub location: Option<String>,
    pub land_location: Option<String>,
    pub responsible_dept: Option<String>,

    // Stored-file references
    pub project_image: Option<String>,
    pub project_pdf: Option<String>,

    // Cabinet information
    pub npd_date: Option<Timestamp>,
    pub cabinet_papers_no: Option<String>,
    pub cabinet_papers_date: Option<Timestamp>,

    pub remarks: Option<String>,
    pub is_draft: bool,

    /// Exclusive creator reference; never reassigned after creation.
    pub created_by: Option<DbId>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. `created_by` comes from the request
/// identity, never from the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub project_name: String,
    pub department_type: Option<String>,
    pub department_category: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub duration_start: Option<Timestamp>,
    pub duration_end: Option<Timestamp>,
    pub tec: Option<f64>,
    pub tec_currency: Option<String>,
    pub awarded_amount: Option<f64>,
    pub revised_date: Option<Timestamp>,
    pub start_date: Timestamp,
    pub estimated_end_date: Timestamp,
    pub project_extended: Option<String>,
    pub extended_date: Option<Timestamp>,
    pub extension_pdf: Option<String>,
    pub return_periods_start: Option<Timestamp>,
    pub return_periods_end: Option<Timestamp>,
    pub funding_source: Option<String>,
    pub capital_works: Option<bool>,
    pub location: Option<String>,
    pub land_location: Option<String>,
    pub responsible_dept: Option<String>,
    pub project_image: Option<String>,
    pub project_pdf: Option<String>,
    pub npd_date: Option<Timestamp>,
    pub cabinet_papers_no: Option<String>,
    pub cabinet_papers_date: Option<Timestamp>,
    pub remarks: Option<String>,
    pub is_draft: Option<bool>,
}

/// DTO for updating an existing project. All fields are optional; only
/// non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub project_name: Option<String>,
    pub department_type: Option<String>,
    pub department_category: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub duration_start: Option<Timestamp>,
    pub duration_end: Option<Timestamp>,
    pub tec: Option<f64>,
    pub tec_currency: Option<String>,
    pub awarded_amount: Option<f64>,
    pub revised_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub estimated_end_date: Option<Timestamp>,
    pub project_extended: Option<String>,
    pub extended_date: Option<Timestamp>,
    pub extension_pdf: Option<String>,
    pub return_periods_start: Option<Timestamp>,
    pub return_periods_end: Option<Timestamp>,
    pub funding_source: Option<String>,
    pub capital_works: Option<bool>,
    pub location: Option<String>,
    pub land_location: Option<String>,
    pub responsible_dept: Option<String>,
    pub project_image: Option<String>,
    pub project_pdf: Option<String>,
    pub npd_date: Option<Timestamp>,
    pub cabinet_papers_no: Option<String>,
    pub cabinet_papers_date: Option<Timestamp>,
    pub remarks: Option<String>,
    pub is_draft: Option<bool>,
}
