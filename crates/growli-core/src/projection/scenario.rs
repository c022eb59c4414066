use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::working_capital::{
    dpo_extension_impact, dso_reduction_impact, DEFAULT_BAD_DEBT_RATE,
};
use crate::types::{Days, Money, Percent, Rate};

/// Projection horizon. Fixed: the engine never projects further out.
pub const HORIZON_MONTHS: u32 = 6;

/// Cost ratio assumed when there is no revenue to derive one from.
const FALLBACK_COST_RATIO: Rate = dec!(0.65);
/// Adverse-scenario margin erosion, in margin points (0.02 = 2pp).
const ADVERSE_MARGIN_EROSION: Rate = dec!(0.02);
const ADVERSE_MARGIN_FLOOR: Rate = dec!(0.05);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Favorable,
    Neutral,
    Adverse,
}

/// How a scenario derives monthly cost from revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginPolicy {
    /// Cost driven to the target gross margin (current margin if none)
    Target,
    /// Cost ratio held at the current one
    HoldCurrent,
    /// Current margin minus 2pp, floored at 5%
    Erode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub kind: ScenarioKind,
    /// Monthly revenue growth, compounded
    pub growth_rate: Rate,
    /// Change in collection days (negative collects faster)
    pub dso_shift: Days,
    /// Change in payment days (positive pays later)
    pub dpo_shift: Days,
    pub margin_policy: MarginPolicy,
}

impl ScenarioParams {
    pub fn favorable() -> Self {
        ScenarioParams {
            kind: ScenarioKind::Favorable,
            growth_rate: dec!(0.08),
            dso_shift: dec!(-10),
            dpo_shift: dec!(5),
            margin_policy: MarginPolicy::Target,
        }
    }

    pub fn neutral() -> Self {
        ScenarioParams {
            kind: ScenarioKind::Neutral,
            growth_rate: Decimal::ZERO,
            dso_shift: Decimal::ZERO,
            dpo_shift: Decimal::ZERO,
            margin_policy: MarginPolicy::HoldCurrent,
        }
    }

    pub fn adverse() -> Self {
        ScenarioParams {
            kind: ScenarioKind::Adverse,
            growth_rate: dec!(-0.10),
            dso_shift: dec!(10),
            dpo_shift: dec!(-5),
            margin_policy: MarginPolicy::Erode,
        }
    }
}

/// Starting point of a projection, taken from the latest tier outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBaseline {
    pub revenue: Money,
    pub cost_of_goods: Money,
    pub fixed_costs: Money,
    /// Variable expenses as % of revenue
    #[serde(default)]
    pub variable_cost_pct: Percent,
    #[serde(default)]
    pub monthly_taxes: Money,
    #[serde(default)]
    pub financial_expenses: Money,
    pub collection_days: Days,
    pub payment_days: Days,
    pub opening_cash: Money,
    /// Gross margin (%) the favorable scenario steers toward
    #[serde(default)]
    pub target_gross_margin_pct: Option<Percent>,
}

/// One projected month. Monetary values are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMonth {
    /// 1-based month index
    pub month: u32,
    pub revenue: Money,
    pub cost: Money,
    pub gross_margin_pct: Percent,
    pub variable_expenses: Money,
    pub operating_result: Money,
    /// Closing cash balance
    pub cash_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub growth_rate: Rate,
    /// Collection and payment days after the scenario's shift
    pub collection_days: Days,
    pub payment_days: Days,
    pub months: Vec<ProjectedMonth>,
    pub ending_cash: Money,
    pub lowest_cash: Money,
    /// First month whose closing balance is negative, if any
    pub first_negative_month: Option<u32>,
    pub guidance: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    /// One label per projected month ("Month 1" or "2025-07")
    pub labels: Vec<String>,
    pub favorable: Scenario,
    pub neutral: Scenario,
    pub adverse: Scenario,
}

impl ProjectionSet {
    pub fn scenarios(&self) -> [&Scenario; 3] {
        [&self.favorable, &self.neutral, &self.adverse]
    }

    /// Relabel months with the calendar months following `reference`.
    pub fn with_calendar(mut self, reference: NaiveDate) -> Self {
        self.labels = (1..=HORIZON_MONTHS)
            .map(|m| match reference.checked_add_months(Months::new(m)) {
                Some(date) => date.format("%Y-%m").to_string(),
                None => format!("Month {m}"),
            })
            .collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the baseline under the favorable, neutral and adverse scenarios.
///
/// Each month compounds revenue by the growth rate, derives cost from the
/// scenario's margin policy, and rolls the cash balance forward by the
/// operating result net of taxes and financial expenses. The one-off cash
/// effect of the DSO/DPO shift lands in month 1 only.
pub fn project(baseline: &ProjectionBaseline) -> ProjectionSet {
    debug!(
        horizon = HORIZON_MONTHS,
        has_target_margin = baseline.target_gross_margin_pct.is_some(),
        "projecting scenarios"
    );
    ProjectionSet {
        labels: (1..=HORIZON_MONTHS).map(|m| format!("Month {m}")).collect(),
        favorable: run_scenario(baseline, &ScenarioParams::favorable()),
        neutral: run_scenario(baseline, &ScenarioParams::neutral()),
        adverse: run_scenario(baseline, &ScenarioParams::adverse()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current gross margin as a fraction (0.35 = 35%).
fn current_margin(baseline: &ProjectionBaseline) -> Rate {
    if baseline.revenue > Decimal::ZERO {
        (baseline.revenue - baseline.cost_of_goods) / baseline.revenue
    } else {
        Decimal::ONE - FALLBACK_COST_RATIO
    }
}

/// Gross margin fraction the scenario applies every month.
fn scenario_margin(baseline: &ProjectionBaseline, policy: MarginPolicy) -> Rate {
    match policy {
        MarginPolicy::Target => match baseline.target_gross_margin_pct {
            Some(target) => target / dec!(100),
            None => current_margin(baseline),
        },
        MarginPolicy::HoldCurrent => {
            let cost_ratio = if baseline.revenue > Decimal::ZERO {
                baseline.cost_of_goods / baseline.revenue
            } else {
                FALLBACK_COST_RATIO
            };
            Decimal::ONE - cost_ratio
        }
        MarginPolicy::Erode => {
            (current_margin(baseline) - ADVERSE_MARGIN_EROSION).max(ADVERSE_MARGIN_FLOOR)
        }
    }
}

fn guidance(kind: ScenarioKind) -> Vec<String> {
    let lines: &[&str] = match kind {
        ScenarioKind::Favorable => &[
            "Use the momentum to gain market share",
            "Invest in marketing",
            "Negotiate volume terms with suppliers",
        ],
        ScenarioKind::Neutral => &[
            "Keep the focus on efficiency",
            "Pursue incremental improvements",
            "Invest in customer relationships",
        ],
        ScenarioKind::Adverse => &[
            "Priority: preserve cash",
            "Reduce fixed costs",
            "Renegotiate contracts",
        ],
    };
    lines.iter().map(|s| s.to_string()).collect()
}

fn run_scenario(baseline: &ProjectionBaseline, params: &ScenarioParams) -> Scenario {
    let margin = scenario_margin(baseline, params.margin_policy);
    let growth = Decimal::ONE + params.growth_rate;

    let mut revenue = baseline.revenue;
    let mut cash = baseline.opening_cash;
    let mut months = Vec::with_capacity(HORIZON_MONTHS as usize);

    for month in 1..=HORIZON_MONTHS {
        revenue *= growth;
        let cost = revenue * (Decimal::ONE - margin);
        let variable_expenses = revenue * baseline.variable_cost_pct / dec!(100);
        let gross_margin_pct = if revenue > Decimal::ZERO {
            (revenue - cost) / revenue * dec!(100)
        } else {
            Decimal::ZERO
        };
        let operating_result = revenue - cost - baseline.fixed_costs - variable_expenses;

        cash += operating_result - baseline.monthly_taxes - baseline.financial_expenses;
        if month == 1 {
            // Faster collection (negative shift) and later payment (positive
            // shift) release cash once; the opposite shifts absorb it.
            cash += dso_reduction_impact(revenue, -params.dso_shift, DEFAULT_BAD_DEBT_RATE);
            cash += dpo_extension_impact(cost, params.dpo_shift);
        }

        months.push(ProjectedMonth {
            month,
            revenue: revenue.round_dp(2),
            cost: cost.round_dp(2),
            gross_margin_pct: gross_margin_pct.round_dp(2),
            variable_expenses: variable_expenses.round_dp(2),
            operating_result: operating_result.round_dp(2),
            cash_balance: cash.round_dp(2),
        });
    }

    let ending_cash = months
        .last()
        .map(|m| m.cash_balance)
        .unwrap_or(baseline.opening_cash);
    let lowest_cash = months
        .iter()
        .map(|m| m.cash_balance)
        .min()
        .unwrap_or(baseline.opening_cash);
    let first_negative_month = months
        .iter()
        .find(|m| m.cash_balance < Decimal::ZERO)
        .map(|m| m.month);

    Scenario {
        kind: params.kind,
        growth_rate: params.growth_rate,
        collection_days: (baseline.collection_days + params.dso_shift).max(Decimal::ZERO),
        payment_days: (baseline.payment_days + params.dpo_shift).max(Decimal::ZERO),
        months,
        ending_cash,
        lowest_cash,
        first_negative_month,
        guidance: guidance(params.kind),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
