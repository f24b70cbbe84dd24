//! Repair cost and crew-duration model.
//!
//! Pure arithmetic over a closed set of line materials. Labor hours are total
//! work: crew size changes duration, never cost. The breakdown for each
//! segment is computed once at graph build time and cached on the segment.

use crate::error::{PlanError, PlanResult};
use std::fmt;
use std::str::FromStr;

/// Daily wage per worker, paid over an 8-hour day (37.5 per worker-hour).
pub const WORKER_DAILY_RATE: f64 = 300.0;
pub const HOURS_PER_DAY: f64 = 8.0;
/// Hard cap on simultaneous workers per segment.
pub const MAX_WORKERS_PER_SEGMENT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Aerial,
    SemiAerial,
    Conduit,
}

impl MaterialKind {
    /// Material cost per meter of line.
    pub fn rate_per_meter(self) -> f64 {
        match self {
            MaterialKind::Aerial => 500.0,
            MaterialKind::SemiAerial => 750.0,
            MaterialKind::Conduit => 900.0,
        }
    }

    /// Total worker-hours needed per meter, independent of crew size.
    pub fn hours_per_meter(self) -> f64 {
        match self {
            MaterialKind::Aerial => 2.0,
            MaterialKind::SemiAerial => 4.0,
            MaterialKind::Conduit => 5.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialKind::Aerial => "aerial",
            MaterialKind::SemiAerial => "semi-aerial",
            MaterialKind::Conduit => "conduit",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialKind {
    type Err = PlanError;

    fn from_str(s: &str) -> PlanResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aerial" => Ok(MaterialKind::Aerial),
            "semi-aerial" | "semi_aerial" => Ok(MaterialKind::SemiAerial),
            "conduit" => Ok(MaterialKind::Conduit),
            other => Err(PlanError::InvalidInput(format!(
                "unknown material kind: {other:?} (expected aerial, semi-aerial, or conduit)"
            ))),
        }
    }
}

/// Fully derived cost figures for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub material_cost: f64,
    /// Total worker-hours of repair work.
    pub labor_hours: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    /// Wall-clock hours with the model's crew on the segment.
    pub duration_hours: f64,
}

/// Cost model parameterized on available crew size.
///
/// The planner always runs with the full 4-worker crew; the knob exists
/// because a smaller crew stretches duration proportionally while leaving
/// every cost figure untouched.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    crew_size: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            crew_size: MAX_WORKERS_PER_SEGMENT,
        }
    }
}

impl CostModel {
    pub fn with_crew(crew_size: u32) -> PlanResult<Self> {
        if crew_size == 0 {
            return Err(PlanError::InvalidInput(
                "crew size must be at least 1".to_string(),
            ));
        }
        Ok(CostModel {
            crew_size: crew_size.min(MAX_WORKERS_PER_SEGMENT),
        })
    }

    pub fn crew_size(&self) -> u32 {
        self.crew_size
    }

    pub fn breakdown(&self, material: MaterialKind, length_m: f64) -> PlanResult<CostBreakdown> {
        // NaN fails this comparison too, which is what we want.
        if !(length_m > 0.0) {
            return Err(PlanError::InvalidInput(format!(
                "segment length must be positive, got {length_m}"
            )));
        }
        let material_cost = material.rate_per_meter() * length_m;
        let labor_hours = material.hours_per_meter() * length_m;
        let labor_cost = labor_hours * (WORKER_DAILY_RATE / HOURS_PER_DAY);
        let duration_hours = labor_hours / f64::from(self.crew_size);
        Ok(CostBreakdown {
            material_cost,
            labor_hours,
            labor_cost,
            total_cost: material_cost + labor_cost,
            duration_hours,
        })
    }
}
