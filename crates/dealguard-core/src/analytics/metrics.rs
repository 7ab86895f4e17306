use std::collections::BTreeMap;

use arrow::{array::Array, error::ArrowError};
use serde::Serialize;

use crate::{table::Table, utils::hasher::new_key_set};

/// Headline KPIs. A KPI whose source column is absent is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuccessMetrics {
    pub total_opportunities: usize,
    pub total_estimated_value: Option<f64>,
    pub closed_won_count: Option<usize>,
    pub closed_lost_count: Option<usize>,
    pub avg_probability: Option<f64>,
}

impl SuccessMetrics {
    pub fn compute(table: &Table) -> Self {
        let stage_count = |canonical: &str| {
            table
                .string_column("Stage")
                .map(|stages| stages.iter().filter(|s| *s == Some(canonical)).count())
        };

        let total_estimated_value = table
            .numeric_values("EstimatedValue")
            .map(|values| values.into_iter().flatten().sum::<f64>());

        let avg_probability = table.numeric_values("Probability").and_then(|values| {
            let present: Vec<f64> = values.into_iter().flatten().collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        });

        Self {
            total_opportunities: table.num_rows(),
            total_estimated_value,
            closed_won_count: stage_count("Closed-Won"),
            closed_lost_count: stage_count("Closed-Lost"),
            avg_probability,
        }
    }
}

/// Contents of `data-quality-summary.json`. Keys stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualitySummary {
    pub missing_values: BTreeMap<String, usize>,
    /// Rows identical to an earlier row
    pub duplicates: usize,
    pub row_count: usize,
}

impl DataQualitySummary {
    pub fn compute(table: &Table) -> Result<Self, ArrowError> {
        let missing_values = table
            .column_names()
            .into_iter()
            .zip(table.columns())
            .map(|(name, array)| (name, array.null_count()))
            .collect();

        let mut seen = new_key_set();
        let mut duplicates = 0;
        for row in 0..table.num_rows() {
            if !seen.insert(table.row_key(row)?) {
                duplicates += 1;
            }
        }

        Ok(Self {
            missing_values,
            duplicates,
            row_count: table.num_rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_metrics() {
        let table = Table::from_strings(vec![
            ("Stage", vec![Some("Closed-Won"), Some("Closed-Lost"), Some("Closed-Won")]),
            ("EstimatedValue", vec![Some("1000"), None, Some("500.5")]),
            ("Probability", vec![Some("100"), Some("0"), None]),
        ])
        .unwrap();
        let kpis = SuccessMetrics::compute(&table);
        assert_eq!(kpis.total_opportunities, 3);
        assert_eq!(kpis.total_estimated_value, Some(1500.5));
        assert_eq!(kpis.closed_won_count, Some(2));
        assert_eq!(kpis.closed_lost_count, Some(1));
        assert_eq!(kpis.avg_probability, Some(50.0));

        let json = serde_json::to_value(&kpis).unwrap();
        assert_eq!(json["TotalOpportunities"], 3);
        assert_eq!(json["ClosedWonCount"], 2);
    }

    #[test]
    fn test_success_metrics_absent_columns() {
        let table = Table::from_strings(vec![("OpportunityID", vec![Some("OPP-1")])]).unwrap();
        let kpis = SuccessMetrics::compute(&table);
        assert_eq!(kpis.total_estimated_value, None);
        assert_eq!(kpis.closed_won_count, None);
        assert_eq!(kpis.avg_probability, None);
    }

    #[test]
    fn test_data_quality_summary() {
        let table = Table::from_strings(vec![
            ("OpportunityID", vec![Some("OPP-1"), Some("OPP-1"), None]),
            ("Stage", vec![Some("Lead"), Some("Lead"), None]),
        ])
        .unwrap();
        let summary = DataQualitySummary::compute(&table).unwrap();
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.missing_values["Stage"], 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["missing_values"]["OpportunityID"], 1);
        assert_eq!(json["row_count"], 3);
        assert!(json.get("rowCount").is_none());
    }
}
