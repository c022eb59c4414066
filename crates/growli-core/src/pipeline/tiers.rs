use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::benchmarks::BenchmarkTable;
use crate::diagnostic::{diagnose, DiagnosticContext, DiagnosticReport};
use crate::error::GrowliError;
use crate::imputation::{
    AssumptionLog, CompletedBasic, CompletedStrategic, CompletedWorkingCapital, Imputable,
};
use crate::indicators::basic::compute_basic;
use crate::indicators::strategic::{compute_strategic, revenue_trend};
use crate::indicators::working_capital::compute_working_capital;
use crate::indicators::{IndicatorSet, TrendSummary};
use crate::projection::{project, ProjectionBaseline, ProjectionSet};
use crate::snapshot::{FinancialSnapshot, StrategicSnapshot, Tier, WorkingCapitalSnapshot};
use crate::types::{with_metadata, ComputationOutput};
use crate::GrowliResult;

use super::view::{tier1_view, tier2_view, tier3_view, TierView};

/// Payment terms the projection assumes when tier 2 was skipped.
const DEFAULT_TERMS_DAYS: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Who the analysis is for and which month it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMeta {
    #[serde(default, alias = "empresa")]
    pub company: Option<String>,
    #[serde(alias = "setor")]
    pub sector: String,
    /// Brazilian state (UF)
    #[serde(default, alias = "estado")]
    pub state: Option<String>,
    #[serde(alias = "mes")]
    pub reference_month: u32,
    #[serde(alias = "ano")]
    pub reference_year: i32,
    #[serde(alias = "nivel_maximo_preenchido")]
    pub max_tier: Tier,
}

impl AnalysisMeta {
    /// First day of the reference month.
    pub fn reference_date(&self) -> GrowliResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.reference_year, self.reference_month, 1).ok_or_else(|| {
            GrowliError::InvalidInput {
                field: "reference_month".into(),
                reason: format!(
                    "{}/{} is not a valid reference month",
                    self.reference_month, self.reference_year
                ),
            }
        })
    }

    pub fn validate(&self) -> GrowliResult<()> {
        if self.sector.trim().is_empty() {
            return Err(GrowliError::InvalidInput {
                field: "sector".into(),
                reason: "sector code is required".into(),
            });
        }
        self.reference_date().map(|_| ())
    }
}

/// State of an analysis after a tier has run. Each tier entry point takes
/// the previous outcome and returns a new one; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierOutcome {
    pub meta: AnalysisMeta,
    /// Last tier that ran
    pub tier: Tier,
    pub basic: CompletedBasic,
    #[serde(default)]
    pub working_capital: Option<CompletedWorkingCapital>,
    #[serde(default)]
    pub strategic: Option<CompletedStrategic>,
    pub indicators: IndicatorSet,
    /// Every assumption made so far, in imputation order
    pub assumptions: AssumptionLog,
    #[serde(default)]
    pub trend: Option<TrendSummary>,
    #[serde(default)]
    pub projections: Option<ProjectionSet>,
    /// One view per tier run, in order
    pub views: Vec<TierView>,
}

impl TierOutcome {
    /// Projection starting point. Tier 2 and 3 figures that were not
    /// supplied read as zero (30-day terms, no target margin).
    pub fn baseline(&self) -> ProjectionBaseline {
        let wc = self.working_capital.as_ref();
        let strategic = self.strategic.as_ref();
        ProjectionBaseline {
            revenue: self.basic.revenue,
            cost_of_goods: self.basic.cost_of_goods,
            fixed_costs: self.basic.fixed_costs,
            variable_cost_pct: strategic.map_or(Decimal::ZERO, |s| s.variable_cost_pct),
            monthly_taxes: wc.map_or(Decimal::ZERO, |w| w.tax_expense),
            financial_expenses: wc.map_or(Decimal::ZERO, |w| w.financial_expenses),
            collection_days: wc.map_or(DEFAULT_TERMS_DAYS, |w| w.collection_days),
            payment_days: wc.map_or(DEFAULT_TERMS_DAYS, |w| w.payment_days),
            opening_cash: self.basic.disponibilities(),
            target_gross_margin_pct: strategic.map(|s| s.target_gross_margin_pct),
        }
    }

    /// Diagnostic report for the indicators accumulated so far.
    pub fn diagnose(&self, table: &BenchmarkTable) -> DiagnosticReport {
        diagnose(
            &DiagnosticContext {
                indicators: &self.indicators,
                sector: &self.meta.sector,
                tier: self.tier,
            },
            table,
        )
    }

    /// The view of the last tier that ran.
    pub fn latest_view(&self) -> Option<&TierView> {
        self.views.last()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn missing<const N: usize>(fields: [(&str, bool); N]) -> Vec<String> {
    fields
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect()
}

fn missing_basic(s: &FinancialSnapshot) -> Vec<String> {
    missing([
        ("cost_of_goods", s.cost_of_goods.is_some()),
        ("receivables_30d", s.receivables_30d.is_some()),
        ("payables_30d", s.payables_30d.is_some()),
    ])
}

fn missing_working_capital(s: &WorkingCapitalSnapshot) -> Vec<String> {
    missing([
        ("collection_days", s.collection_days.is_some()),
        ("payment_days", s.payment_days.is_some()),
        ("inventory", s.inventory.is_some()),
        ("financial_expenses", s.financial_expenses.is_some()),
        ("tax_expense", s.tax_expense.is_some()),
        ("headcount", s.headcount.is_some()),
    ])
}

fn missing_strategic(s: &StrategicSnapshot) -> Vec<String> {
    missing([
        ("tax_rate_pct", s.tax_rate_pct.is_some()),
        ("variable_cost_pct", s.variable_cost_pct.is_some()),
        ("capex_planned", s.capex_planned.is_some()),
        ("fixed_assets", s.fixed_assets.is_some()),
        ("equity", s.equity.is_some()),
        ("target_collection_days", s.target_collection_days.is_some()),
    ])
}

/// Warnings about figures that are valid but look wrong together.
fn coherence_warnings(basic: &CompletedBasic) -> Vec<String> {
    let mut warnings = Vec::new();
    if basic.revenue > Decimal::ZERO {
        if basic.cost_of_goods > basic.revenue {
            warnings.push("Cost of goods exceeds revenue - check the figures".to_string());
        }
        let margin = (basic.revenue - basic.cost_of_goods) / basic.revenue * dec!(100);
        if margin < dec!(10) {
            warnings.push("Gross margin below 10% - critical situation".to_string());
        }
    }
    warnings
}

fn sequence_error(expected: &str, found: Tier) -> GrowliError {
    GrowliError::TierSequence {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tier entry points
// ---------------------------------------------------------------------------

/// Run tier 1: impute the basic snapshot and compute margins, break-even,
/// liquidity and cash runway.
pub fn run_tier1(
    meta: &AnalysisMeta,
    snapshot: &FinancialSnapshot,
    table: &BenchmarkTable,
) -> GrowliResult<ComputationOutput<TierOutcome>> {
    meta.validate()?;
    snapshot.validate()?;

    let (basic, log) = snapshot.impute(&meta.sector, table);
    let indicators = compute_basic(&IndicatorSet::new(), &basic)?;

    let mut warnings = coherence_warnings(&basic);
    if !table.is_known(&meta.sector) {
        warnings.push(format!(
            "Sector '{}' is not recognised - general benchmarks were used",
            meta.sector
        ));
    }
    for w in &warnings {
        warn!(tier = 1, warning = %w, "coherence warning");
    }
    debug!(
        tier = 1,
        sector = %meta.sector,
        assumptions = log.len(),
        indicators = indicators.len(),
        "tier computed"
    );

    let view = tier1_view(&indicators, log.to_vec(), missing_basic(snapshot));
    let outcome = TierOutcome {
        meta: meta.clone(),
        tier: Tier::Basic,
        basic,
        working_capital: None,
        strategic: None,
        indicators,
        assumptions: log.clone(),
        trend: None,
        projections: None,
        views: vec![view],
    };

    Ok(with_metadata(
        "Tier 1: gross margin, operating result, break-even, immediate liquidity and cash runway",
        log.to_vec(),
        warnings,
        outcome,
    ))
}

/// Run tier 2 on a tier 1 outcome: working-capital cycle, debt and the
/// cash released by better collection and payment terms.
pub fn run_tier2(
    prior: &TierOutcome,
    snapshot: &WorkingCapitalSnapshot,
    table: &BenchmarkTable,
) -> GrowliResult<ComputationOutput<TierOutcome>> {
    if prior.tier != Tier::Basic {
        return Err(sequence_error("tier 1 (basic)", prior.tier));
    }
    snapshot.validate()?;

    let (wc, log) = snapshot.impute(&prior.meta.sector, table);
    let indicators = compute_working_capital(&prior.indicators, &wc)?;

    let mut assumptions = prior.assumptions.clone();
    assumptions.append(&log);
    debug!(
        tier = 2,
        sector = %prior.meta.sector,
        assumptions = log.len(),
        indicators = indicators.len(),
        "tier computed"
    );

    let mut views = prior.views.clone();
    views.push(tier2_view(
        &indicators,
        log.to_vec(),
        missing_working_capital(snapshot),
    ));
    let outcome = TierOutcome {
        tier: Tier::Intermediate,
        working_capital: Some(wc),
        indicators,
        assumptions,
        views,
        ..prior.clone()
    };

    Ok(with_metadata(
        "Tier 2: DSO/DPO/DIO cycles, working capital need, leverage, interest coverage and term simulations",
        log.to_vec(),
        Vec::new(),
        outcome,
    ))
}

/// Run tier 3 on a tier 1 or tier 2 outcome: revenue trend, returns, capex
/// payback and the six-month scenarios.
pub fn run_tier3(
    prior: &TierOutcome,
    snapshot: &StrategicSnapshot,
    table: &BenchmarkTable,
) -> GrowliResult<ComputationOutput<TierOutcome>> {
    if prior.tier == Tier::Advanced {
        return Err(sequence_error("tier 1 or tier 2", prior.tier));
    }
    snapshot.validate()?;

    let (strategic, log) = snapshot.impute(&prior.meta.sector, table);
    let indicators = compute_strategic(&prior.indicators, &strategic)?;
    let trend = revenue_trend(&strategic.revenue_last_3_months);

    let mut warnings = Vec::new();
    if prior.working_capital.is_none() {
        warnings.push(
            "Tier 2 figures not supplied - projections assume 30-day terms and no taxes or \
             financial expenses"
                .to_string(),
        );
    }

    let mut assumptions = prior.assumptions.clone();
    assumptions.append(&log);

    let mut next = TierOutcome {
        tier: Tier::Advanced,
        strategic: Some(strategic),
        indicators,
        assumptions,
        trend: Some(trend),
        ..prior.clone()
    };
    let projections = project(&next.baseline()).with_calendar(next.meta.reference_date()?);
    debug!(
        tier = 3,
        sector = %next.meta.sector,
        assumptions = log.len(),
        trend = ?next.trend.as_ref().map(|t| t.trend),
        "tier computed"
    );

    next.views.push(tier3_view(
        &next.indicators,
        &projections,
        log.to_vec(),
        missing_strategic(snapshot),
    ));
    next.projections = Some(projections);

    Ok(with_metadata(
        "Tier 3: revenue trend, ROA/ROE, capex payback and six-month favorable/neutral/adverse scenarios",
        log.to_vec(),
        warnings,
        next,
    ))
}
