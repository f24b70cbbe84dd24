use crate::hospital::AutonomyCheck;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

// Raw CSV rows. Everything is optional text; the loader owns validation and
// turns these into typed graph records.

#[derive(Debug, Deserialize)]
pub struct RawBuildingRow {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "households")]
    pub households: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSegmentRow {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "material")]
    pub material: Option<String>,
    #[serde(rename = "length_m")]
    pub length_m: Option<String>,
    #[serde(rename = "damaged")]
    pub damaged: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEdgeRow {
    #[serde(rename = "node_a")]
    pub node_a: Option<String>,
    #[serde(rename = "node_b")]
    pub node_b: Option<String>,
    #[serde(rename = "segment_id")]
    pub segment_id: Option<String>,
}

// Rendered output rows, exported to CSV and previewed as Markdown tables.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PlanRow {
    #[serde(rename = "SegmentId")]
    #[tabled(rename = "SegmentId")]
    pub segment_id: String,
    #[serde(rename = "Material")]
    #[tabled(rename = "Material")]
    pub material: String,
    #[serde(rename = "LengthM")]
    #[tabled(rename = "LengthM")]
    pub length_m: String,
    #[serde(rename = "MaterialCost")]
    #[tabled(rename = "MaterialCost")]
    pub material_cost: String,
    #[serde(rename = "LaborCost")]
    #[tabled(rename = "LaborCost")]
    pub labor_cost: String,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost")]
    pub total_cost: String,
    #[serde(rename = "DurationHours")]
    #[tabled(rename = "DurationHours")]
    pub duration_hours: String,
    #[serde(rename = "Beneficiaries")]
    #[tabled(rename = "Beneficiaries")]
    pub beneficiaries: u64,
    #[serde(rename = "HospitalPath")]
    #[tabled(rename = "HospitalPath")]
    pub hospital_path: bool,
    #[serde(rename = "Phase")]
    #[tabled(rename = "Phase")]
    pub phase: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PhaseSummaryRow {
    #[serde(rename = "Phase")]
    #[tabled(rename = "Phase")]
    pub phase: usize,
    #[serde(rename = "Segments")]
    #[tabled(rename = "Segments")]
    pub segment_count: usize,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost")]
    pub total_cost: String,
    #[serde(rename = "MaterialCost")]
    #[tabled(rename = "MaterialCost")]
    pub material_cost: String,
    #[serde(rename = "LaborCost")]
    #[tabled(rename = "LaborCost")]
    pub labor_cost: String,
    #[serde(rename = "Beneficiaries")]
    #[tabled(rename = "Beneficiaries")]
    pub beneficiaries: u64,
    #[serde(rename = "CriticalDurationH")]
    #[tabled(rename = "CriticalDurationH")]
    pub critical_duration_hours: String,
    #[serde(rename = "PctOfTotal")]
    #[tabled(rename = "PctOfTotal")]
    pub pct_of_total: String,
}

/// Global figures exported to `summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub damaged_segments: usize,
    pub total_cost: f64,
    pub total_beneficiaries: u64,
    pub hospital: AutonomyCheck,
}
