use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::benchmarks::BenchmarkTable;
use crate::indicators::IndicatorSet;
use crate::snapshot::Tier;

use super::action_plan::{action_plan, ActionPlan, PlanContext};
use super::findings::{self, Opportunity};
use super::gaps::{analyze_gaps, GapAnalysis};
use super::scoring::{score, ScoreBreakdown};

/// Everything the diagnostic reads.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticContext<'a> {
    pub indicators: &'a IndicatorSet,
    pub sector: &'a str,
    /// Highest tier whose indicators are in `indicators`
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// 0..=100
    pub score: u8,
    pub score_breakdown: ScoreBreakdown,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub prioritized_actions: Vec<String>,
    pub summary: Vec<String>,
    pub gap_analysis: GapAnalysis,
    pub opportunities: Vec<Opportunity>,
    pub action_plan: ActionPlan,
    pub sector_strategies: Vec<String>,
}

/// Score the business, register its problems against the sector profile and
/// derive findings and the action plan from them.
pub fn diagnose(ctx: &DiagnosticContext<'_>, table: &BenchmarkTable) -> DiagnosticReport {
    let profile = table.benchmarks(ctx.sector);
    let breakdown = score(ctx.indicators);
    let gaps = analyze_gaps(ctx.indicators, profile);
    let found = findings::findings(ctx.indicators, profile);
    let plan = action_plan(&PlanContext {
        gaps: &gaps,
        indicators: ctx.indicators,
        tier: ctx.tier,
        family: profile.family,
    });

    debug!(
        sector = %profile.code,
        tier = ctx.tier.number(),
        score = breakdown.total(),
        problems = gaps.len(),
        "diagnostic built"
    );

    DiagnosticReport {
        score: breakdown.total(),
        score_breakdown: breakdown,
        strengths: found.strengths,
        concerns: found.concerns,
        prioritized_actions: findings::prioritized_actions(&gaps),
        summary: findings::summary(ctx.indicators),
        opportunities: findings::opportunities(ctx.indicators),
        gap_analysis: gaps,
        action_plan: plan,
        sector_strategies: table.strategies(ctx.sector).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Indicator, IndicatorValue};
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_for_tier1_indicators() {
        let table = BenchmarkTable::standard();
        let set = IndicatorSet::new()
            .extended_with([
                (Indicator::Revenue, IndicatorValue::Value(dec!(100000))),
                (Indicator::FixedCosts, IndicatorValue::Value(dec!(25000))),
                (Indicator::GrossMargin, IndicatorValue::Value(dec!(35))),
                (Indicator::OperatingResult, IndicatorValue::Value(dec!(10000))),
                (Indicator::OperatingMargin, IndicatorValue::Value(dec!(10))),
                (Indicator::ImmediateLiquidity, IndicatorValue::Value(dec!(1.6))),
                (Indicator::CashRunwayDays, IndicatorValue::Value(dec!(48))),
                (Indicator::WorkingCapital, IndicatorValue::Value(dec!(40000))),
            ])
            .unwrap();
        let report = diagnose(
            &DiagnosticContext {
                indicators: &set,
                sector: "educacao",
                tier: Tier::Basic,
            },
            &table,
        );
        // 20 liquidity + 25 margin + 15 working capital
        assert_eq!(report.score, 60);
        assert!(report.gap_analysis.is_empty());
        assert!(report.prioritized_actions.is_empty());
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.sector_strategies[0], "Reduce tuition delinquency");
        assert_eq!(report.action_plan.days_30.len(), 4);
    }

    #[test]
    fn test_unknown_sector_uses_fallback_strategies() {
        let table = BenchmarkTable::standard();
        let set = IndicatorSet::new();
        let report = diagnose(
            &DiagnosticContext {
                indicators: &set,
                sector: "lunar_mining",
                tier: Tier::Basic,
            },
            &table,
        );
        assert_eq!(report.score, 0);
        assert_eq!(
            report.sector_strategies,
            vec![
                "Keep tight control of cash flow".to_string(),
                "Invest in differentiation".to_string(),
            ]
        );
    }
}
