//! Presentation contract: the KPI cards, charts and tables the front-end
//! renders for each tier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format;
use crate::indicators::classification::classify;
use crate::indicators::{Classification, Indicator, IndicatorSet, IndicatorValue};
use crate::projection::{ProjectionSet, Scenario, ScenarioKind};
use crate::snapshot::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    Currency,
    Percent,
    Number,
    Days,
}

impl DisplayFormat {
    pub fn render(&self, value: Decimal) -> String {
        match self {
            DisplayFormat::Currency => format::brl(value),
            DisplayFormat::Percent => format::percent(value),
            DisplayFormat::Number => format::ratio(value),
            DisplayFormat::Days => format::days(value),
        }
    }
}

/// One indicator card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub indicator: Indicator,
    /// `null` when not applicable
    pub value: IndicatorValue,
    pub format: DisplayFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chart {
    Bar {
        title: String,
        labels: Vec<String>,
        values: Vec<Decimal>,
    },
    Line {
        title: String,
        labels: Vec<String>,
        series: Vec<Series>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything the front-end shows for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierView {
    pub tier: Tier,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    pub tables: Vec<TableView>,
    /// Assumptions made while completing this tier's input
    pub assumptions: Vec<String>,
    /// Optional inputs the user left blank
    pub missing: Vec<String>,
    /// Invitation to fill in the next tier, absent at the last tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<String>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn kpi(set: &IndicatorSet, indicator: Indicator, format: DisplayFormat) -> Option<Kpi> {
    let value = set.get(indicator)?;
    Some(Kpi {
        name: indicator.label().to_string(),
        indicator,
        value,
        format,
        classification: classify(indicator, set),
    })
}

/// Like [`kpi`], but cards whose value is not applicable are left out.
fn applicable_kpi(set: &IndicatorSet, indicator: Indicator, format: DisplayFormat) -> Option<Kpi> {
    kpi(set, indicator, format).filter(|k| k.value.is_applicable())
}

fn money_row(set: &IndicatorSet, indicator: Indicator) -> Vec<String> {
    vec![
        indicator.label().to_string(),
        format::brl(set.value_or_zero(indicator)),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn tier1_view(set: &IndicatorSet, assumptions: Vec<String>, missing: Vec<String>) -> TierView {
    let kpis = [
        kpi(set, Indicator::GrossMargin, DisplayFormat::Percent),
        kpi(set, Indicator::OperatingResult, DisplayFormat::Currency),
        kpi(set, Indicator::CashRunwayDays, DisplayFormat::Days),
        kpi(set, Indicator::ImmediateLiquidity, DisplayFormat::Number),
        kpi(set, Indicator::BreakEven, DisplayFormat::Currency),
    ]
    .into_iter()
    .flatten()
    .collect();

    let flows = Chart::Bar {
        title: "Inflows vs outflows (R$)".to_string(),
        labels: strings(&["Revenue", "Cost of goods", "Fixed costs"]),
        values: vec![
            set.value_or_zero(Indicator::Revenue),
            set.value_or_zero(Indicator::CostOfGoods),
            set.value_or_zero(Indicator::FixedCosts),
        ],
    };

    let summary = TableView {
        title: "Financial summary".to_string(),
        columns: strings(&["Item", "Value"]),
        rows: [
            Indicator::Revenue,
            Indicator::CostOfGoods,
            Indicator::FixedCosts,
            Indicator::Disponibilities,
            Indicator::Receivables30d,
            Indicator::Payables30d,
        ]
        .into_iter()
        .map(|indicator| money_row(set, indicator))
        .collect(),
    };

    TierView {
        tier: Tier::Basic,
        kpis,
        charts: vec![flows],
        tables: vec![summary],
        assumptions,
        missing,
        invitation: Some(
            "Add collection and payment periods, inventory and debt to see your cash cycle \
             and how much working capital better terms would release."
                .to_string(),
        ),
    }
}

pub(crate) fn tier2_view(set: &IndicatorSet, assumptions: Vec<String>, missing: Vec<String>) -> TierView {
    let kpis = [
        kpi(set, Indicator::CashConversionCycle, DisplayFormat::Days),
        kpi(set, Indicator::WorkingCapitalNeed, DisplayFormat::Currency),
        kpi(set, Indicator::Leverage, DisplayFormat::Number),
        applicable_kpi(set, Indicator::InterestCoverage, DisplayFormat::Number),
        applicable_kpi(set, Indicator::RevenuePerHead, DisplayFormat::Currency),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut labels = vec!["DSO".to_string()];
    let mut values = vec![set.value_or_zero(Indicator::Dso)];
    if let Some(dio) = set.value(Indicator::Dio) {
        labels.push("DIO".to_string());
        values.push(dio);
    }
    labels.push("DPO".to_string());
    values.push(set.value_or_zero(Indicator::Dpo));
    let periods = Chart::Bar {
        title: "Operating periods (days)".to_string(),
        labels,
        values,
    };

    let dso = set.value_or_zero(Indicator::DsoReductionImpact);
    let dpo = set.value_or_zero(Indicator::DpoExtensionImpact);
    let simulations = TableView {
        title: "Cash impact simulations".to_string(),
        columns: strings(&["Action", "Impact"]),
        rows: vec![
            vec!["Reduce DSO by 10 days".to_string(), format!("+{}", format::brl(dso))],
            vec!["Extend DPO by 7 days".to_string(), format!("+{}", format::brl(dpo))],
            vec!["Total potential".to_string(), format!("+{}", format::brl(dso + dpo))],
        ],
    };

    TierView {
        tier: Tier::Intermediate,
        kpis,
        charts: vec![periods],
        tables: vec![simulations],
        assumptions,
        missing,
        invitation: Some(
            "Add your last three months of revenue, planned investments and targets to see \
             six-month scenarios and a 30/60/90-day plan."
                .to_string(),
        ),
    }
}

fn scenario_name(kind: ScenarioKind) -> &'static str {
    match kind {
        ScenarioKind::Favorable => "Favorable",
        ScenarioKind::Neutral => "Neutral",
        ScenarioKind::Adverse => "Adverse",
    }
}

fn revenue_series(scenario: &Scenario) -> Series {
    Series {
        name: scenario_name(scenario.kind).to_string(),
        values: scenario.months.iter().map(|m| m.revenue).collect(),
    }
}

fn scenario_row(scenario: &Scenario) -> Vec<String> {
    let last_revenue = scenario
        .months
        .last()
        .map_or(Decimal::ZERO, |m| m.revenue);
    vec![
        scenario_name(scenario.kind).to_string(),
        format::percent(scenario.growth_rate * Decimal::ONE_HUNDRED),
        format::brl_whole(last_revenue),
        format::brl_whole(scenario.ending_cash),
        format::brl_whole(scenario.lowest_cash),
        scenario
            .first_negative_month
            .map_or_else(|| "-".to_string(), |m| m.to_string()),
    ]
}

pub(crate) fn tier3_view(
    set: &IndicatorSet,
    projections: &ProjectionSet,
    assumptions: Vec<String>,
    missing: Vec<String>,
) -> TierView {
    let kpis = [
        applicable_kpi(set, Indicator::Roa, DisplayFormat::Percent),
        applicable_kpi(set, Indicator::Roe, DisplayFormat::Percent),
        applicable_kpi(set, Indicator::CapexPayback, DisplayFormat::Number),
        applicable_kpi(set, Indicator::DebtToAssets, DisplayFormat::Percent),
    ]
    .into_iter()
    .flatten()
    .collect();

    let revenue = Chart::Line {
        title: "Revenue projection (6 months)".to_string(),
        labels: projections.labels.clone(),
        series: projections.scenarios().into_iter().map(revenue_series).collect(),
    };
    let cash = Chart::Line {
        title: "Cash balance projection (6 months)".to_string(),
        labels: projections.labels.clone(),
        series: projections
            .scenarios()
            .into_iter()
            .map(|s| Series {
                name: scenario_name(s.kind).to_string(),
                values: s.months.iter().map(|m| m.cash_balance).collect(),
            })
            .collect(),
    };

    let scenarios = TableView {
        title: "Scenario summary".to_string(),
        columns: strings(&[
            "Scenario",
            "Monthly growth",
            "Month 6 revenue",
            "Ending cash",
            "Lowest cash",
            "First negative month",
        ]),
        rows: projections.scenarios().into_iter().map(scenario_row).collect(),
    };

    TierView {
        tier: Tier::Advanced,
        kpis,
        charts: vec![revenue, cash],
        tables: vec![scenarios],
        assumptions,
        missing,
        invitation: None,
    }
}
