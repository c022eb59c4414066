use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::GrowliError;
use crate::GrowliResult;

// ---------------------------------------------------------------------------
// IndicatorValue
// ---------------------------------------------------------------------------

/// Result of one indicator formula. `NotApplicable` marks a failed
/// precondition (zero denominator, missing base) and is never coerced to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Value(Decimal),
    NotApplicable,
}

impl IndicatorValue {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            IndicatorValue::Value(v) => Some(*v),
            IndicatorValue::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, IndicatorValue::Value(_))
    }
}

impl From<Decimal> for IndicatorValue {
    fn from(value: Decimal) -> Self {
        IndicatorValue::Value(value)
    }
}

impl From<Option<Decimal>> for IndicatorValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(IndicatorValue::NotApplicable, IndicatorValue::Value)
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Value(v) => write!(f, "{v}"),
            IndicatorValue::NotApplicable => write!(f, "n/a"),
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator names
// ---------------------------------------------------------------------------

/// Every indicator the engine can produce, declared in tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    // Tier 1
    Revenue,
    CostOfGoods,
    FixedCosts,
    Disponibilities,
    Receivables30d,
    Payables30d,
    GrossMargin,
    OperatingResult,
    OperatingMargin,
    BreakEven,
    ImmediateLiquidity,
    CashRunwayDays,
    WorkingCapital,
    // Tier 2
    Dso,
    Dpo,
    Dio,
    OperatingCycle,
    CashConversionCycle,
    WorkingCapitalNeed,
    Inventory,
    TotalDebt,
    Leverage,
    InterestCoverage,
    RevenuePerHead,
    InventoryTurnover,
    DsoReductionImpact,
    DpoExtensionImpact,
    FinancialExpenses,
    TaxExpense,
    // Tier 3
    AverageRevenue,
    RevenueTrendChange,
    TotalAssets,
    Roa,
    Roe,
    CapexPayback,
    DebtToAssets,
    TargetDsoRelease,
    TaxRate,
    VariableCostPct,
}

impl Indicator {
    /// Human-readable label used by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Revenue => "Gross Revenue",
            Indicator::CostOfGoods => "Cost of Goods Sold",
            Indicator::FixedCosts => "Fixed Costs",
            Indicator::Disponibilities => "Cash and Bank",
            Indicator::Receivables30d => "Receivables (30d)",
            Indicator::Payables30d => "Payables (30d)",
            Indicator::GrossMargin => "Gross Margin",
            Indicator::OperatingResult => "Operating Result",
            Indicator::OperatingMargin => "Operating Margin",
            Indicator::BreakEven => "Break-even Revenue",
            Indicator::ImmediateLiquidity => "Immediate Liquidity",
            Indicator::CashRunwayDays => "Cash Runway",
            Indicator::WorkingCapital => "Working Capital",
            Indicator::Dso => "Collection Period (DSO)",
            Indicator::Dpo => "Payment Period (DPO)",
            Indicator::Dio => "Inventory Days (DIO)",
            Indicator::OperatingCycle => "Operating Cycle",
            Indicator::CashConversionCycle => "Cash Conversion Cycle",
            Indicator::WorkingCapitalNeed => "Working Capital Need",
            Indicator::Inventory => "Inventory",
            Indicator::TotalDebt => "Total Debt",
            Indicator::Leverage => "Leverage",
            Indicator::InterestCoverage => "Interest Coverage",
            Indicator::RevenuePerHead => "Revenue per Employee",
            Indicator::InventoryTurnover => "Inventory Turnover",
            Indicator::DsoReductionImpact => "Cash Released by DSO -10 days",
            Indicator::DpoExtensionImpact => "Cash Released by DPO +7 days",
            Indicator::FinancialExpenses => "Financial Expenses",
            Indicator::TaxExpense => "Taxes",
            Indicator::AverageRevenue => "Average Revenue (3 months)",
            Indicator::RevenueTrendChange => "Average Monthly Revenue Change",
            Indicator::TotalAssets => "Total Assets",
            Indicator::Roa => "ROA (annual)",
            Indicator::Roe => "ROE (annual)",
            Indicator::CapexPayback => "Capex Payback",
            Indicator::DebtToAssets => "Debt to Assets",
            Indicator::TargetDsoRelease => "Cash Released at Target DSO",
            Indicator::TaxRate => "Tax Rate",
            Indicator::VariableCostPct => "Variable Expenses",
        }
    }
}

// ---------------------------------------------------------------------------
// IndicatorSet
// ---------------------------------------------------------------------------

/// Append-only mapping from indicator to value. Each tier calculator returns
/// a superset of the set it was given; existing entries are never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    values: BTreeMap<Indicator, IndicatorValue>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new indicator. Re-recording an existing one is an error.
    pub fn insert(
        &mut self,
        indicator: Indicator,
        value: impl Into<IndicatorValue>,
    ) -> GrowliResult<()> {
        if self.values.contains_key(&indicator) {
            return Err(GrowliError::IndicatorOverwrite(format!("{indicator:?}")));
        }
        self.values.insert(indicator, value.into());
        Ok(())
    }

    /// A copy of this set extended with `entries`.
    pub fn extended_with<I>(&self, entries: I) -> GrowliResult<IndicatorSet>
    where
        I: IntoIterator<Item = (Indicator, IndicatorValue)>,
    {
        let mut next = self.clone();
        for (indicator, value) in entries {
            next.insert(indicator, value)?;
        }
        Ok(next)
    }

    pub fn get(&self, indicator: Indicator) -> Option<IndicatorValue> {
        self.values.get(&indicator).copied()
    }

    /// The numeric value, if recorded and applicable.
    pub fn value(&self, indicator: Indicator) -> Option<Decimal> {
        self.get(indicator).and_then(|v| v.value())
    }

    /// Like [`IndicatorSet::value`], but a missing or inapplicable entry
    /// reads as zero.
    pub fn value_or_zero(&self, indicator: Indicator) -> Decimal {
        self.value(indicator).unwrap_or(Decimal::ZERO)
    }

    /// A value an earlier tier must have produced.
    pub fn require(&self, indicator: Indicator) -> GrowliResult<Decimal> {
        self.value(indicator).ok_or_else(|| {
            GrowliError::InsufficientData(format!(
                "indicator {indicator:?} is required from an earlier tier"
            ))
        })
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.values.contains_key(&indicator)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, IndicatorValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}
