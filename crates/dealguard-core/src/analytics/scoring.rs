use std::sync::Arc;

use arrow::{array::StringArray, error::ArrowError};
use serde::Serialize;

use crate::table::Table;

pub const PRIORITY_COLUMN: &str = "AccountPriority";
pub const LIKELIHOOD_COLUMN: &str = "ActivationLikelihoodBand";
pub const RISK_COLUMN: &str = "StallingRisk";

pub const STALLED: &str = "Stalled";
pub const AT_RISK: &str = "At Risk";

const ADVANCED_STAGES: &[&str] = &["proposal", "negotiation", "closed-won"];
const STALLED_STATUSES: &[&str] = &["on-hold", "paused"];

/// Human-readable rules behind the three score columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoringDefinitions {
    pub account_priority: &'static str,
    pub activation_likelihood_band: &'static str,
    pub stalling_risk: &'static str,
}

pub const SCORING_DEFINITIONS: ScoringDefinitions = ScoringDefinitions {
    account_priority: "High: EstimatedValue >= 100,000; Medium: >= 50,000; else Low",
    activation_likelihood_band: "High: Stage in Proposal/Negotiation/Closed-Won and Probability >= 70; Medium: Probability >= 40; else Low",
    stalling_risk: "Stalled: Status On-Hold/Paused; At Risk: Probability < 20; else OK",
};

pub fn score_priority(estimated_value: Option<f64>) -> &'static str {
    match estimated_value {
        Some(v) if v >= 100_000.0 => "High",
        Some(v) if v >= 50_000.0 => "Medium",
        _ => "Low",
    }
}

pub fn score_activation_likelihood(stage: Option<&str>, probability: Option<f64>) -> &'static str {
    let stage = stage.unwrap_or_default().to_lowercase();
    match probability {
        Some(p) if p >= 70.0 && ADVANCED_STAGES.contains(&stage.as_str()) => "High",
        Some(p) if p >= 40.0 => "Medium",
        _ => "Low",
    }
}

pub fn detect_stalling_risk(status: Option<&str>, probability: Option<f64>) -> &'static str {
    let status = status.unwrap_or_default().to_lowercase();
    if STALLED_STATUSES.contains(&status.as_str()) {
        return STALLED;
    }
    match probability {
        Some(p) if p < 20.0 => AT_RISK,
        _ => "OK",
    }
}

fn text_values(table: &Table, column: &str) -> Vec<Option<String>> {
    match table.string_column(column) {
        Some(strings) => strings.iter().map(|v| v.map(str::to_string)).collect(),
        None => vec![None; table.num_rows()],
    }
}

/// Append the three score columns.
///
/// A missing `EstimatedValue` scores Low. A missing `Probability` counts as 0,
/// while a null probability never satisfies a threshold.
pub fn score_table(table: &Table) -> Result<Table, ArrowError> {
    let rows = table.num_rows();
    let values = table
        .numeric_values("EstimatedValue")
        .unwrap_or_else(|| vec![None; rows]);
    let probabilities = table
        .numeric_values("Probability")
        .unwrap_or_else(|| vec![Some(0.0); rows]);
    let stages = text_values(table, "Stage");
    let statuses = text_values(table, "Status");

    let priority: StringArray = values.iter().map(|v| Some(score_priority(*v))).collect();
    let likelihood: StringArray = stages
        .iter()
        .zip(&probabilities)
        .map(|(stage, p)| Some(score_activation_likelihood(stage.as_deref(), *p)))
        .collect();
    let risk: StringArray = statuses
        .iter()
        .zip(&probabilities)
        .map(|(status, p)| Some(detect_stalling_risk(status.as_deref(), *p)))
        .collect();

    table
        .append_column(PRIORITY_COLUMN, Arc::new(priority))?
        .append_column(LIKELIHOOD_COLUMN, Arc::new(likelihood))?
        .append_column(RISK_COLUMN, Arc::new(risk))
}
