//! Phase-1 analytics: rule-based scoring, KPIs, a data-quality summary and
//! ranked opportunity/risk lists over a cleaned table.

pub mod metrics;
pub mod ranking;
pub mod scoring;

use arrow::error::ArrowError;
use tracing::info;

pub use metrics::{DataQualitySummary, SuccessMetrics};
pub use scoring::{ScoringDefinitions, SCORING_DEFINITIONS};

use crate::table::Table;

#[derive(Debug, Clone)]
pub struct AnalyticsOutcome {
    /// Input table with the score columns appended
    pub scored: Table,
    pub metrics: SuccessMetrics,
    pub quality: DataQualitySummary,
    pub top_opportunities: Table,
    pub top_risks: Table,
}

pub fn analyze(table: &Table) -> Result<AnalyticsOutcome, ArrowError> {
    let scored = scoring::score_table(table)?;
    let metrics = SuccessMetrics::compute(table);
    let quality = DataQualitySummary::compute(table)?;
    let top_opportunities = ranking::top_opportunities(&scored)?;
    let top_risks = ranking::top_risks(&scored)?;
    info!(
        rows = table.num_rows(),
        risks = top_risks.num_rows(),
        "analytics computed"
    );

    Ok(AnalyticsOutcome {
        scored,
        metrics,
        quality,
        top_opportunities,
        top_risks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty_table() {
        let table = Table::from_strings(vec![("OpportunityID", vec![]), ("Stage", vec![])])
            .unwrap();
        let outcome = analyze(&table).unwrap();
        assert_eq!(outcome.metrics.total_opportunities, 0);
        assert_eq!(outcome.top_opportunities.num_rows(), 0);
        assert_eq!(outcome.top_risks.num_rows(), 0);
        assert_eq!(outcome.scored.num_columns(), 5);
    }
}
