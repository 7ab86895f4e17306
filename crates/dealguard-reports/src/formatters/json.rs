use chrono::Local;
use dealguard_core::{
    analytics::{AnalyticsOutcome, DataQualitySummary, SuccessMetrics},
    AuditRecord, ValidationReport,
};
use serde::Serialize;
use serde_json::Error;

use crate::Reporter;

/// Collects every result of a run and renders them as one JSON document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    audit: Option<AuditRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analytics: Option<AnalyticsSummary>,
    artifacts: Vec<Artifact>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsSummary {
    metrics: SuccessMetrics,
    quality: DataQualitySummary,
    top_opportunities: usize,
    top_risks: usize,
}

#[derive(Serialize)]
struct Artifact {
    label: String,
    path: String,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            audit: None,
            validation: None,
            analytics: None,
            artifacts: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self, _command: &str) {}

    fn on_loading(&self, _path: &str) {}

    fn on_cleaning_result(&mut self, audit: &AuditRecord) {
        self.audit = Some(audit.clone());
    }

    fn on_validation_result(&mut self, report: &ValidationReport) {
        self.validation = Some(report.clone());
    }

    fn on_analytics_result(&mut self, outcome: &AnalyticsOutcome) {
        self.analytics = Some(AnalyticsSummary {
            metrics: outcome.metrics.clone(),
            quality: outcome.quality.clone(),
            top_opportunities: outcome.top_opportunities.num_rows(),
            top_risks: outcome.top_risks.num_rows(),
        });
    }

    fn on_artifact(&mut self, label: &str, path: &str) {
        self.artifacts.push(Artifact {
            label: label.to_string(),
            path: path.to_string(),
        });
    }

    fn on_complete(&self, _passed: bool) {
        match self.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render JSON report: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealguard_core::TransformationResult;

    #[test]
    fn test_json_contains_only_seen_sections() {
        let mut formatter = JsonFormatter::new("0.1.0".to_string());
        let mut audit = AuditRecord::new(2);
        audit.record(TransformationResult::applied("AUTOFIX-001", "Trim Headers and Values", 2));
        audit.finish(2);
        formatter.on_cleaning_result(&audit);
        formatter.on_artifact("cleaned", "out/cleaned.csv");

        let json: serde_json::Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["audit"]["originalRowCount"], 2);
        assert_eq!(json["artifacts"][0]["path"], "out/cleaned.csv");
        assert!(json.get("validation").is_none());
        assert!(json.get("analytics").is_none());
    }
}
