//! Error taxonomy for the planner.
//!
//! Everything that can abort a run is represented here so `main` can report a
//! single error chain. Graph-construction violations (duplicate ids, dangling
//! endpoint references) indicate corrupted upstream data and are fatal, as is
//! a missing hospital path. The hospital autonomy-margin breach is *not* an
//! error; it is a warning-level diagnostic attached to the plan.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Malformed record, unknown material kind, non-positive length, or a
    /// dataset that lacks the required source/hospital nodes.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two nodes or two segments share an identifier.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// A segment endpoint names a node that was never loaded.
    #[error("segment {segment} references unknown node {node}")]
    DanglingReference { segment: String, node: String },

    /// The network is disconnected between the grid source and the hospital.
    #[error("no path from {from} to {to}: network is disconnected")]
    UnreachableNode { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
