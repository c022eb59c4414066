use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::set::{Indicator, IndicatorSet, IndicatorValue};
use crate::imputation::CompletedWorkingCapital;
use crate::types::{Days, Money, Rate};
use crate::GrowliResult;

/// Reported when there is no revenue to measure debt against.
pub const LEVERAGE_SENTINEL: Decimal = dec!(999.99);
/// Share of accelerated collections assumed lost to default.
pub const DEFAULT_BAD_DEBT_RATE: Rate = dec!(0.05);
/// Collection-period reduction simulated at tier 2.
pub const SIMULATED_DSO_REDUCTION: Days = dec!(10);
/// Payment-period extension simulated at tier 2.
pub const SIMULATED_DPO_EXTENSION: Days = dec!(7);

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Inventory days: inventory / monthly COGS x 30.
pub fn dio(inventory: Money, monthly_cogs: Money) -> IndicatorValue {
    if monthly_cogs.is_zero() || inventory.is_zero() {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(inventory * dec!(30) / monthly_cogs)
}

/// DIO (zero when not applicable) + DSO.
pub fn operating_cycle(dio: IndicatorValue, dso: Days) -> Days {
    dio.value().unwrap_or(Decimal::ZERO) + dso
}

/// Operating cycle - DPO. Negative cycles are favourable and kept as-is.
pub fn cash_conversion_cycle(operating_cycle: Days, dpo: Days) -> Days {
    operating_cycle - dpo
}

/// NCG: inventory + receivables - payables.
pub fn working_capital_need(inventory: Money, receivables: Money, payables: Money) -> Money {
    inventory + receivables - payables
}

/// Total debt / monthly revenue.
pub fn leverage(total_debt: Money, revenue: Money) -> Decimal {
    if revenue.is_zero() {
        return LEVERAGE_SENTINEL;
    }
    total_debt / revenue
}

/// Operating result / financial expenses. Having no interest to pay is not a
/// coverage failure, so zero expenses yield `NotApplicable`.
pub fn interest_coverage(operating_result: Money, financial_expenses: Money) -> IndicatorValue {
    if financial_expenses.is_zero() {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(operating_result / financial_expenses)
}

pub fn revenue_per_head(revenue: Money, headcount: u32) -> IndicatorValue {
    if headcount == 0 {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(revenue / Decimal::from(headcount))
}

/// Annual turns: monthly COGS x 12 / inventory.
pub fn inventory_turnover(monthly_cogs: Money, inventory: Money) -> IndicatorValue {
    if inventory.is_zero() {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(monthly_cogs * dec!(12) / inventory)
}

/// Cash released by collecting `delta_days` faster, net of expected default.
pub fn dso_reduction_impact(monthly_revenue: Money, delta_days: Days, bad_debt_rate: Rate) -> Money {
    monthly_revenue * delta_days * (Decimal::ONE - bad_debt_rate) / dec!(30)
}

/// Cash released by paying suppliers `delta_days` later.
pub fn dpo_extension_impact(monthly_cogs: Money, delta_days: Days) -> Money {
    monthly_cogs * delta_days / dec!(30)
}

// ---------------------------------------------------------------------------
// Tier 2 cluster
// ---------------------------------------------------------------------------

/// Extend the tier 1 set with working-capital and debt indicators.
pub fn compute_working_capital(
    prior: &IndicatorSet,
    input: &CompletedWorkingCapital,
) -> GrowliResult<IndicatorSet> {
    let revenue = prior.require(Indicator::Revenue)?;
    let cogs = prior.require(Indicator::CostOfGoods)?;
    let receivables = prior.require(Indicator::Receivables30d)?;
    let payables = prior.require(Indicator::Payables30d)?;
    let op = prior.require(Indicator::OperatingResult)?;

    let dio = dio(input.inventory, cogs);
    let cycle = operating_cycle(dio, input.collection_days);

    prior.extended_with([
        (Indicator::Dso, input.collection_days.into()),
        (Indicator::Dpo, input.payment_days.into()),
        (Indicator::Dio, dio),
        (Indicator::OperatingCycle, cycle.into()),
        (
            Indicator::CashConversionCycle,
            cash_conversion_cycle(cycle, input.payment_days).into(),
        ),
        (
            Indicator::WorkingCapitalNeed,
            working_capital_need(input.inventory, receivables, payables).into(),
        ),
        (Indicator::Inventory, input.inventory.into()),
        (Indicator::TotalDebt, input.total_debt.into()),
        (Indicator::Leverage, leverage(input.total_debt, revenue).into()),
        (
            Indicator::InterestCoverage,
            interest_coverage(op, input.financial_expenses),
        ),
        (
            Indicator::RevenuePerHead,
            revenue_per_head(revenue, input.headcount),
        ),
        (
            Indicator::InventoryTurnover,
            inventory_turnover(cogs, input.inventory),
        ),
        (
            Indicator::DsoReductionImpact,
            dso_reduction_impact(revenue, SIMULATED_DSO_REDUCTION, DEFAULT_BAD_DEBT_RATE).into(),
        ),
        (
            Indicator::DpoExtensionImpact,
            dpo_extension_impact(cogs, SIMULATED_DPO_EXTENSION).into(),
        ),
        (Indicator::FinancialExpenses, input.financial_expenses.into()),
        (Indicator::TaxExpense, input.tax_expense.into()),
    ])
}
