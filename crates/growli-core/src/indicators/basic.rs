use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::set::{Indicator, IndicatorSet, IndicatorValue};
use crate::imputation::CompletedBasic;
use crate::types::{Days, Money, Percent};
use crate::GrowliResult;

/// Reported when there are no short-term payables to cover.
pub const LIQUIDITY_SENTINEL: Decimal = dec!(999.99);
/// Reported when there are no fixed costs to burn through.
pub const RUNWAY_SENTINEL: Days = dec!(999.0);

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// (revenue - cost) / revenue x 100. Zero when revenue is zero.
pub fn gross_margin(revenue: Money, cost_of_goods: Money) -> Percent {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (revenue - cost_of_goods) / revenue * dec!(100)
}

pub fn operating_result(revenue: Money, cost_of_goods: Money, fixed_costs: Money) -> Money {
    revenue - cost_of_goods - fixed_costs
}

/// Operating result as % of revenue. Zero when revenue is zero.
pub fn operating_margin(operating_result: Money, revenue: Money) -> Percent {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    operating_result / revenue * dec!(100)
}

/// Revenue at which the contribution margin covers fixed costs.
/// Not applicable without revenue or without a positive contribution margin.
pub fn break_even(fixed_costs: Money, revenue: Money, cost_of_goods: Money) -> IndicatorValue {
    if revenue.is_zero() {
        return IndicatorValue::NotApplicable;
    }
    let contribution_margin = Decimal::ONE - cost_of_goods / revenue;
    if contribution_margin <= Decimal::ZERO {
        return IndicatorValue::NotApplicable;
    }
    IndicatorValue::Value(fixed_costs / contribution_margin)
}

/// Disponibilities / payables due in 30 days.
pub fn immediate_liquidity(disponibilities: Money, payables_30d: Money) -> Decimal {
    if payables_30d.is_zero() {
        return LIQUIDITY_SENTINEL;
    }
    disponibilities / payables_30d
}

/// Days the net short-term cash position covers fixed costs.
pub fn cash_runway_days(
    disponibilities: Money,
    receivables_30d: Money,
    payables_30d: Money,
    fixed_costs: Money,
) -> Days {
    if fixed_costs.is_zero() {
        return RUNWAY_SENTINEL;
    }
    let net_cash = disponibilities + receivables_30d - payables_30d;
    // net / (fixed / 30), multiplied first so whole-day results stay exact
    net_cash * dec!(30) / fixed_costs
}

pub fn working_capital(disponibilities: Money, receivables_30d: Money, payables_30d: Money) -> Money {
    disponibilities + receivables_30d - payables_30d
}

// ---------------------------------------------------------------------------
// Tier 1 cluster
// ---------------------------------------------------------------------------

/// Extend `prior` with the tier 1 indicators.
pub fn compute_basic(prior: &IndicatorSet, input: &CompletedBasic) -> GrowliResult<IndicatorSet> {
    let disponibilities = input.disponibilities();
    let op = operating_result(input.revenue, input.cost_of_goods, input.fixed_costs);

    prior.extended_with([
        (Indicator::Revenue, input.revenue.into()),
        (Indicator::CostOfGoods, input.cost_of_goods.into()),
        (Indicator::FixedCosts, input.fixed_costs.into()),
        (Indicator::Disponibilities, disponibilities.into()),
        (Indicator::Receivables30d, input.receivables_30d.into()),
        (Indicator::Payables30d, input.payables_30d.into()),
        (
            Indicator::GrossMargin,
            gross_margin(input.revenue, input.cost_of_goods).into(),
        ),
        (Indicator::OperatingResult, op.into()),
        (
            Indicator::OperatingMargin,
            operating_margin(op, input.revenue).into(),
        ),
        (
            Indicator::BreakEven,
            break_even(input.fixed_costs, input.revenue, input.cost_of_goods),
        ),
        (
            Indicator::ImmediateLiquidity,
            immediate_liquidity(disponibilities, input.payables_30d).into(),
        ),
        (
            Indicator::CashRunwayDays,
            cash_runway_days(
                disponibilities,
                input.receivables_30d,
                input.payables_30d,
                input.fixed_costs,
            )
            .into(),
        ),
        (
            Indicator::WorkingCapital,
            working_capital(disponibilities, input.receivables_30d, input.payables_30d).into(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CompletedBasic {
        CompletedBasic {
            revenue: dec!(100000),
            cost_of_goods: dec!(65000),
            fixed_costs: dec!(25000),
            cash: dec!(10000),
            bank_balance: dec!(40000),
            receivables_30d: dec!(20000),
            payables_30d: dec!(0),
        }
    }

    #[test]
    fn test_gross_margin_example() {
        assert_eq!(gross_margin(dec!(100000), dec!(65000)), dec!(35));
    }

    #[test]
    fn test_gross_margin_zero_revenue() {
        assert_eq!(gross_margin(Decimal::ZERO, dec!(500)), Decimal::ZERO);
    }

    #[test]
    fn test_gross_margin_can_be_negative() {
        assert_eq!(gross_margin(dec!(100), dec!(150)), dec!(-50));
    }

    #[test]
    fn test_break_even_example() {
        let be = break_even(dec!(25000), dec!(100000), dec!(65000))
            .value()
            .unwrap();
        assert!((be - dec!(71428.57)).abs() < Decimal::ONE);
    }

    #[test]
    fn test_break_even_not_applicable() {
        assert_eq!(
            break_even(dec!(25000), Decimal::ZERO, Decimal::ZERO),
            IndicatorValue::NotApplicable
        );
        assert_eq!(
            break_even(dec!(25000), dec!(100), dec!(100)),
            IndicatorValue::NotApplicable
        );
        assert_eq!(
            break_even(dec!(25000), dec!(100), dec!(120)),
            IndicatorValue::NotApplicable
        );
    }

    #[test]
    fn test_liquidity_sentinel() {
        assert_eq!(immediate_liquidity(dec!(50000), Decimal::ZERO), dec!(999.99));
        assert_eq!(immediate_liquidity(dec!(50000), dec!(40000)), dec!(1.25));
    }

    #[test]
    fn test_cash_runway_example() {
        assert_eq!(
            cash_runway_days(dec!(30000), dec!(20000), dec!(10000), dec!(30000)),
            dec!(40)
        );
        assert_eq!(
            cash_runway_days(dec!(30000), dec!(0), dec!(0), Decimal::ZERO),
            RUNWAY_SENTINEL
        );
    }

    #[test]
    fn test_operating_result_may_be_negative() {
        assert_eq!(operating_result(dec!(100), dec!(80), dec!(50)), dec!(-30));
        assert_eq!(operating_margin(dec!(-30), dec!(100)), dec!(-30));
    }

    #[test]
    fn test_compute_basic_populates_tier1() {
        let set = compute_basic(&IndicatorSet::new(), &input()).unwrap();
        assert_eq!(set.value(Indicator::GrossMargin), Some(dec!(35)));
        assert_eq!(set.value(Indicator::OperatingResult), Some(dec!(10000)));
        assert_eq!(set.value(Indicator::OperatingMargin), Some(dec!(10)));
        assert_eq!(set.value(Indicator::ImmediateLiquidity), Some(dec!(999.99)));
        assert_eq!(set.value(Indicator::WorkingCapital), Some(dec!(70000)));
        assert_eq!(set.value(Indicator::CashRunwayDays), Some(dec!(84)));
        assert_eq!(set.len(), 13);
    }

    #[test]
    fn test_compute_basic_twice_is_rejected() {
        let once = compute_basic(&IndicatorSet::new(), &input()).unwrap();
        assert!(compute_basic(&once, &input()).is_err());
    }
}
