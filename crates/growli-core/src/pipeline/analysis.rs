use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::benchmarks::BenchmarkTable;
use crate::diagnostic::DiagnosticReport;
use crate::indicators::{IndicatorSet, TrendSummary};
use crate::projection::ProjectionSet;
use crate::snapshot::{FinancialSnapshot, StrategicSnapshot, Tier, WorkingCapitalSnapshot};
use crate::types::{with_metadata, ComputationOutput};
use crate::GrowliResult;

use super::tiers::{run_tier1, run_tier2, run_tier3, AnalysisMeta, TierOutcome};
use super::view::TierView;

/// Everything a business disclosed in one sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub meta: AnalysisMeta,
    #[serde(alias = "nivel1")]
    pub tier1: FinancialSnapshot,
    #[serde(default, alias = "nivel2")]
    pub tier2: Option<WorkingCapitalSnapshot>,
    #[serde(default, alias = "nivel3")]
    pub tier3: Option<StrategicSnapshot>,
}

/// Final result of a full analysis: per-tier views plus the diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub meta: AnalysisMeta,
    /// Highest tier actually computed
    pub reached: Tier,
    pub views: Vec<TierView>,
    pub indicators: IndicatorSet,
    #[serde(default)]
    pub trend: Option<TrendSummary>,
    #[serde(default)]
    pub projections: Option<ProjectionSet>,
    pub diagnostic: DiagnosticReport,
}

/// Run every tier up to `meta.max_tier`, then diagnose.
///
/// A tier whose snapshot is absent is skipped with a warning; tier 3 can
/// still run on top of tier 1. Assumptions from all tiers are reported in
/// order.
pub fn analyze(
    request: &AnalysisRequest,
    table: &BenchmarkTable,
) -> GrowliResult<ComputationOutput<AnalysisResult>> {
    let max = request.meta.max_tier;
    let first = run_tier1(&request.meta, &request.tier1, table)?;
    let mut warnings = first.warnings;
    let mut outcome: TierOutcome = first.result;

    if max >= Tier::Intermediate {
        match &request.tier2 {
            Some(snapshot) => {
                let out = run_tier2(&outcome, snapshot, table)?;
                warnings.extend(out.warnings);
                outcome = out.result;
            }
            None => warnings.push(skipped(Tier::Intermediate)),
        }
    }
    if max >= Tier::Advanced {
        match &request.tier3 {
            Some(snapshot) => {
                let out = run_tier3(&outcome, snapshot, table)?;
                warnings.extend(out.warnings);
                outcome = out.result;
            }
            None => warnings.push(skipped(Tier::Advanced)),
        }
    }
    for w in &warnings {
        warn!(warning = %w, "analysis warning");
    }

    let diagnostic = outcome.diagnose(table);
    info!(
        sector = %outcome.meta.sector,
        reached = outcome.tier.number(),
        score = diagnostic.score,
        "analysis complete"
    );

    let assumptions = outcome.assumptions.to_vec();
    let result = AnalysisResult {
        meta: outcome.meta,
        reached: outcome.tier,
        views: outcome.views,
        indicators: outcome.indicators,
        trend: outcome.trend,
        projections: outcome.projections,
        diagnostic,
    };
    Ok(with_metadata(
        "Progressive tiered diagnosis: indicators, imputed defaults, scenarios and action plan",
        assumptions,
        warnings,
        result,
    ))
}

fn skipped(tier: Tier) -> String {
    format!("No data supplied for {tier} - skipped")
}
