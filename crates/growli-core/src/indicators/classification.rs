use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::set::{Indicator, IndicatorSet, IndicatorValue};

/// Traffic-light label for an indicator card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Ok,
    Warning,
    Critical,
}

/// `Ok` at or above `ok`, `Warning` at or above `warning`, else `Critical`.
fn at_least(value: Decimal, ok: Decimal, warning: Decimal) -> Classification {
    if value >= ok {
        Classification::Ok
    } else if value >= warning {
        Classification::Warning
    } else {
        Classification::Critical
    }
}

/// `Ok` at or below `ok`, `Warning` at or below `warning`, else `Critical`.
fn at_most(value: Decimal, ok: Decimal, warning: Decimal) -> Classification {
    if value <= ok {
        Classification::Ok
    } else if value <= warning {
        Classification::Warning
    } else {
        Classification::Critical
    }
}

pub fn gross_margin(margin_pct: Decimal) -> Classification {
    at_least(margin_pct, dec!(30), dec!(20))
}

pub fn operating_result(result: Decimal, revenue: Decimal) -> Classification {
    if result <= Decimal::ZERO || revenue.is_zero() {
        return Classification::Critical;
    }
    if result / revenue * dec!(100) > dec!(10) {
        Classification::Ok
    } else {
        Classification::Warning
    }
}

pub fn cash_runway(days: Decimal) -> Classification {
    at_least(days, dec!(30), dec!(10))
}

pub fn immediate_liquidity(liquidity: Decimal) -> Classification {
    at_least(liquidity, dec!(1.0), dec!(0.5))
}

pub fn break_even(break_even: IndicatorValue, revenue: Decimal) -> Classification {
    match break_even {
        IndicatorValue::Value(be) if !revenue.is_zero() => {
            let share = be / revenue * dec!(100);
            if share < dec!(70) {
                Classification::Ok
            } else if share < dec!(100) {
                Classification::Warning
            } else {
                Classification::Critical
            }
        }
        _ => Classification::Critical,
    }
}

pub fn cash_conversion_cycle(days: Decimal) -> Classification {
    at_most(days, dec!(10), dec!(30))
}

pub fn leverage(leverage: Decimal) -> Classification {
    if leverage < dec!(1.0) {
        Classification::Ok
    } else if leverage < dec!(2.0) {
        Classification::Warning
    } else {
        Classification::Critical
    }
}

/// No interest to pay counts as healthy.
pub fn interest_coverage(coverage: IndicatorValue) -> Classification {
    match coverage {
        IndicatorValue::NotApplicable => Classification::Ok,
        IndicatorValue::Value(c) => at_least(c, dec!(3.0), dec!(1.5)),
    }
}

pub fn roa(roa_pct: Decimal) -> Classification {
    at_least(roa_pct, dec!(10), dec!(5))
}

pub fn roe(roe_pct: Decimal) -> Classification {
    at_least(roe_pct, dec!(15), dec!(8))
}

pub fn capex_payback(years: Decimal) -> Classification {
    at_most(years, dec!(3), dec!(5))
}

/// Classify `indicator` from the values in `set`. `None` for indicators
/// that carry no traffic light, or whose value is missing.
pub fn classify(indicator: Indicator, set: &IndicatorSet) -> Option<Classification> {
    let value = set.get(indicator)?;
    match indicator {
        Indicator::GrossMargin => value.value().map(gross_margin),
        Indicator::OperatingResult => {
            let revenue = set.value(Indicator::Revenue)?;
            value.value().map(|op| operating_result(op, revenue))
        }
        Indicator::CashRunwayDays => value.value().map(cash_runway),
        Indicator::ImmediateLiquidity => value.value().map(immediate_liquidity),
        Indicator::BreakEven => Some(break_even(value, set.value(Indicator::Revenue)?)),
        Indicator::CashConversionCycle => value.value().map(cash_conversion_cycle),
        Indicator::Leverage => value.value().map(leverage),
        Indicator::InterestCoverage => Some(interest_coverage(value)),
        Indicator::Roa => value.value().map(roa),
        Indicator::Roe => value.value().map(roe),
        Indicator::CapexPayback => value.value().map(capex_payback),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidity_bands() {
        assert_eq!(immediate_liquidity(dec!(1.0)), Classification::Ok);
        assert_eq!(immediate_liquidity(dec!(0.5)), Classification::Warning);
        assert_eq!(immediate_liquidity(dec!(0.49)), Classification::Critical);
    }

    #[test]
    fn test_cash_cycle_bands() {
        assert_eq!(cash_conversion_cycle(dec!(-10)), Classification::Ok);
        assert_eq!(cash_conversion_cycle(dec!(10)), Classification::Ok);
        assert_eq!(cash_conversion_cycle(dec!(30)), Classification::Warning);
        assert_eq!(cash_conversion_cycle(dec!(31)), Classification::Critical);
    }

    #[test]
    fn test_operating_result_bands() {
        assert_eq!(operating_result(dec!(11), dec!(100)), Classification::Ok);
        assert_eq!(operating_result(dec!(10), dec!(100)), Classification::Warning);
        assert_eq!(operating_result(dec!(0), dec!(100)), Classification::Critical);
        assert_eq!(operating_result(dec!(5), dec!(0)), Classification::Critical);
    }

    #[test]
    fn test_break_even_bands() {
        let be = |v| IndicatorValue::Value(v);
        assert_eq!(break_even(be(dec!(69000)), dec!(100000)), Classification::Ok);
        assert_eq!(break_even(be(dec!(71428.57)), dec!(100000)), Classification::Warning);
        assert_eq!(break_even(be(dec!(100000)), dec!(100000)), Classification::Critical);
        assert_eq!(
            break_even(IndicatorValue::NotApplicable, dec!(100000)),
            Classification::Critical
        );
    }

    #[test]
    fn test_interest_coverage_absent_is_ok() {
        assert_eq!(interest_coverage(IndicatorValue::NotApplicable), Classification::Ok);
        assert_eq!(interest_coverage(IndicatorValue::Value(dec!(1.5))), Classification::Warning);
        assert_eq!(interest_coverage(IndicatorValue::Value(dec!(1.4))), Classification::Critical);
    }

    #[test]
    fn test_leverage_strict_bounds() {
        assert_eq!(leverage(dec!(0.99)), Classification::Ok);
        assert_eq!(leverage(dec!(1.0)), Classification::Warning);
        assert_eq!(leverage(dec!(2.0)), Classification::Critical);
    }

    #[test]
    fn test_classify_dispatch() {
        let mut set = IndicatorSet::new();
        set.insert(Indicator::Revenue, dec!(100000)).unwrap();
        set.insert(Indicator::GrossMargin, dec!(25)).unwrap();
        set.insert(Indicator::InterestCoverage, IndicatorValue::NotApplicable)
            .unwrap();
        assert_eq!(classify(Indicator::GrossMargin, &set), Some(Classification::Warning));
        assert_eq!(classify(Indicator::InterestCoverage, &set), Some(Classification::Ok));
        assert_eq!(classify(Indicator::Revenue, &set), None);
        assert_eq!(classify(Indicator::Roa, &set), None);
    }
}
