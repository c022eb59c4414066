use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::set::{Indicator, IndicatorSet, IndicatorValue};
use super::working_capital::{dso_reduction_impact, DEFAULT_BAD_DEBT_RATE};
use crate::imputation::CompletedStrategic;
use crate::types::{Money, Percent, Rate};
use crate::GrowliResult;

/// Share of the current annual operating result a capex plan is assumed to
/// add each year.
pub const CAPEX_PROFIT_UPLIFT: Rate = dec!(0.10);

/// Mean month-over-month change (%) beyond which revenue is trending.
const TREND_BAND: Percent = dec!(2);

// ---------------------------------------------------------------------------
// Revenue trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTrend {
    Growth,
    Stable,
    Decline,
}

impl RevenueTrend {
    pub fn from_change(mean_change_pct: Percent) -> Self {
        if mean_change_pct > TREND_BAND {
            RevenueTrend::Growth
        } else if mean_change_pct < -TREND_BAND {
            RevenueTrend::Decline
        } else {
            RevenueTrend::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub average: Money,
    /// Mean month-over-month change (%)
    pub mean_change_pct: Percent,
    pub trend: RevenueTrend,
}

/// Average and trend of a monthly revenue series (oldest first). Transitions
/// out of a zero month carry no percentage and are skipped.
pub fn revenue_trend(series: &[Money]) -> TrendSummary {
    if series.len() < 2 {
        return TrendSummary {
            average: series.first().copied().unwrap_or(Decimal::ZERO),
            mean_change_pct: Decimal::ZERO,
            trend: RevenueTrend::Stable,
        };
    }

    let average = series.iter().copied().sum::<Decimal>() / Decimal::from(series.len());
    let changes: Vec<Percent> = series
        .windows(2)
        .filter(|pair| pair[0] > Decimal::ZERO)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * dec!(100))
        .collect();
    let mean_change_pct = if changes.is_empty() {
        Decimal::ZERO
    } else {
        changes.iter().copied().sum::<Decimal>() / Decimal::from(changes.len())
    };

    TrendSummary {
        average,
        mean_change_pct,
        trend: RevenueTrend::from_change(mean_change_pct),
    }
}

// ---------------------------------------------------------------------------
// Returns and payback
// ---------------------------------------------------------------------------

/// Annualized operating result / total assets x 100.
pub fn roa(monthly_operating_result: Money, total_assets: Money) -> IndicatorValue {
    if total_assets <= Decimal::ZERO {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(monthly_operating_result * dec!(12) / total_assets * dec!(100))
}

/// Annualized net result / equity x 100.
pub fn roe(
    monthly_operating_result: Money,
    financial_expenses: Money,
    taxes: Money,
    equity: Money,
) -> IndicatorValue {
    if equity <= Decimal::ZERO {
        return IndicatorValue::NotApplicable;
    }
    let net = monthly_operating_result - financial_expenses - taxes;
    IndicatorValue::Value(net * dec!(12) / equity * dec!(100))
}

/// Years for the annual profit uplift to repay the capex.
pub fn capex_payback(capex: Money, annual_incremental_profit: Money) -> IndicatorValue {
    if annual_incremental_profit <= Decimal::ZERO || capex.is_zero() {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(capex / annual_incremental_profit)
}

pub fn debt_to_assets(total_debt: Option<Money>, total_assets: Money) -> IndicatorValue {
    match total_debt {
        Some(debt) if total_assets > Decimal::ZERO => {
            IndicatorValue::Value(debt / total_assets * dec!(100))
        }
        _ => IndicatorValue::NotApplicable,
    }
}

// ---------------------------------------------------------------------------
// Tier 3 cluster
// ---------------------------------------------------------------------------

/// Extend the tier 1 (and, when present, tier 2) set with strategic
/// indicators. Tier 2 figures that are missing read as zero, except where
/// a formula has no meaning without them.
pub fn compute_strategic(
    prior: &IndicatorSet,
    input: &CompletedStrategic,
) -> GrowliResult<IndicatorSet> {
    let revenue = prior.require(Indicator::Revenue)?;
    let op = prior.require(Indicator::OperatingResult)?;
    let trend = revenue_trend(&input.revenue_last_3_months);

    let total_assets = input.fixed_assets + prior.value_or_zero(Indicator::WorkingCapitalNeed);
    let financial_expenses = prior.value_or_zero(Indicator::FinancialExpenses);
    let taxes = prior.value_or_zero(Indicator::TaxExpense);

    let target_dso_release = match prior.value(Indicator::Dso) {
        Some(dso) if dso > input.target_collection_days => IndicatorValue::Value(
            dso_reduction_impact(revenue, dso - input.target_collection_days, DEFAULT_BAD_DEBT_RATE),
        ),
        Some(_) => IndicatorValue::Value(Decimal::ZERO),
        None => IndicatorValue::NotApplicable,
    };

    prior.extended_with([
        (Indicator::AverageRevenue, trend.average.into()),
        (Indicator::RevenueTrendChange, trend.mean_change_pct.into()),
        (Indicator::TotalAssets, total_assets.into()),
        (Indicator::Roa, roa(op, total_assets)),
        (Indicator::Roe, roe(op, financial_expenses, taxes, input.equity)),
        (
            Indicator::CapexPayback,
            capex_payback(input.capex_planned, op * dec!(12) * CAPEX_PROFIT_UPLIFT),
        ),
        (
            Indicator::DebtToAssets,
            debt_to_assets(prior.value(Indicator::TotalDebt), total_assets),
        ),
        (Indicator::TargetDsoRelease, target_dso_release),
        (Indicator::TaxRate, input.tax_rate_pct.into()),
        (Indicator::VariableCostPct, input.variable_cost_pct.into()),
    ])
}
