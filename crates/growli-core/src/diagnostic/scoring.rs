use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::indicators::{Indicator, IndicatorSet};

/// Points awarded per bucket. Maxima: liquidity 25, margin 30, working
/// capital 20, leverage 15, return on equity 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub liquidity: u8,
    pub margin: u8,
    pub working_capital: u8,
    pub leverage: u8,
    pub return_on_equity: u8,
}

impl ScoreBreakdown {
    /// Sum of the buckets, clamped to 0..=100.
    pub fn total(&self) -> u8 {
        let sum = u16::from(self.liquidity)
            + u16::from(self.margin)
            + u16::from(self.working_capital)
            + u16::from(self.leverage)
            + u16::from(self.return_on_equity);
        sum.min(100) as u8
    }
}

/// First band whose threshold `value` reaches (`>=`), else 0.
fn band_at_least(value: Option<Decimal>, bands: &[(Decimal, u8)]) -> u8 {
    value
        .and_then(|v| bands.iter().find(|(threshold, _)| v >= *threshold))
        .map_or(0, |(_, points)| *points)
}

/// First band whose ceiling `value` stays within (`<=`), else 0.
fn band_at_most(value: Option<Decimal>, bands: &[(Decimal, u8)]) -> u8 {
    value
        .and_then(|v| bands.iter().find(|(ceiling, _)| v <= *ceiling))
        .map_or(0, |(_, points)| *points)
}

fn working_capital_points(set: &IndicatorSet) -> u8 {
    let Some(wc) = set.value(Indicator::WorkingCapital) else {
        return 0;
    };
    if wc <= Decimal::ZERO {
        return 0;
    }
    match set.value(Indicator::WorkingCapitalNeed) {
        Some(ncg) if wc > ncg * dec!(1.5) => 20,
        _ => 15,
    }
}

/// Score the indicators accumulated so far. Indicators that are missing or
/// not applicable award no points.
pub fn score(set: &IndicatorSet) -> ScoreBreakdown {
    ScoreBreakdown {
        liquidity: band_at_least(
            set.value(Indicator::ImmediateLiquidity),
            &[(dec!(2.0), 25), (dec!(1.5), 20), (dec!(1.0), 10)],
        ),
        margin: band_at_least(
            set.value(Indicator::OperatingMargin),
            &[(dec!(15), 30), (dec!(10), 25), (dec!(5), 15), (dec!(0), 5)],
        ),
        working_capital: working_capital_points(set),
        leverage: band_at_most(
            set.value(Indicator::Leverage),
            &[(dec!(1.0), 15), (dec!(2.0), 10), (dec!(3.0), 5)],
        ),
        return_on_equity: band_at_least(
            set.value(Indicator::Roe),
            &[(dec!(20), 10), (dec!(10), 7), (dec!(5), 4)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorValue;

    fn set(entries: &[(Indicator, IndicatorValue)]) -> IndicatorSet {
        IndicatorSet::new().extended_with(entries.iter().copied()).unwrap()
    }

    fn v(d: Decimal) -> IndicatorValue {
        IndicatorValue::Value(d)
    }

    #[test]
    fn test_empty_set_scores_zero() {
        assert_eq!(score(&IndicatorSet::new()).total(), 0);
    }

    #[test]
    fn test_perfect_score_is_100() {
        let s = score(&set(&[
            (Indicator::ImmediateLiquidity, v(dec!(999.99))),
            (Indicator::OperatingMargin, v(dec!(20))),
            (Indicator::WorkingCapital, v(dec!(100000))),
            (Indicator::WorkingCapitalNeed, v(dec!(10000))),
            (Indicator::Leverage, v(dec!(0.5))),
            (Indicator::Roe, v(dec!(25))),
        ]));
        assert_eq!(s.liquidity, 25);
        assert_eq!(s.working_capital, 20);
        assert_eq!(s.total(), 100);
    }

    #[test]
    fn test_graduated_bands() {
        let s = score(&set(&[
            (Indicator::ImmediateLiquidity, v(dec!(1.2))),
            (Indicator::OperatingMargin, v(dec!(7))),
            (Indicator::WorkingCapital, v(dec!(1000))),
            (Indicator::WorkingCapitalNeed, v(dec!(5000))),
            (Indicator::Leverage, v(dec!(2.5))),
            (Indicator::Roe, v(dec!(12))),
        ]));
        assert_eq!(
            s,
            ScoreBreakdown {
                liquidity: 10,
                margin: 15,
                working_capital: 15,
                leverage: 5,
                return_on_equity: 7,
            }
        );
        assert_eq!(s.total(), 52);
    }

    #[test]
    fn test_tier1_only_caps_at_70() {
        let s = score(&set(&[
            (Indicator::ImmediateLiquidity, v(dec!(3))),
            (Indicator::OperatingMargin, v(dec!(40))),
            (Indicator::WorkingCapital, v(dec!(50000))),
        ]));
        assert_eq!(s.total(), 70);
    }

    #[test]
    fn test_negative_and_not_applicable_award_nothing() {
        let s = score(&set(&[
            (Indicator::ImmediateLiquidity, v(dec!(0.2))),
            (Indicator::OperatingMargin, v(dec!(-12))),
            (Indicator::WorkingCapital, v(dec!(-100))),
            (Indicator::WorkingCapitalNeed, v(dec!(-1000))),
            (Indicator::Leverage, v(dec!(999.99))),
            (Indicator::Roe, IndicatorValue::NotApplicable),
        ]));
        assert_eq!(s.total(), 0);
    }

    #[test]
    fn test_mixed_inputs_sum_exact_breakdown() {
        let na = IndicatorValue::NotApplicable;
        // (liquidity, operating margin, working capital, NCG, leverage, ROE) -> buckets
        let cases = [
            (v(dec!(1.2)), v(dec!(7)), v(dec!(1000)), na, v(dec!(2.5)), v(dec!(-4)), [10, 15, 15, 5, 0]),
            (v(dec!(1.5)), v(dec!(0)), v(dec!(0)), na, v(dec!(3.0)), v(dec!(5)), [20, 5, 0, 5, 4]),
            (
                v(dec!(0.99)),
                v(dec!(15)),
                v(dec!(30000)),
                v(dec!(19999)),
                v(dec!(1.0)),
                v(dec!(20)),
                [0, 30, 20, 15, 10],
            ),
            (v(dec!(2.0)), v(dec!(9.99)), v(dec!(10)), na, na, v(dec!(9.99)), [25, 15, 15, 0, 4]),
        ];
        for (liq, margin, wc, ncg, leverage, roe, expected) in cases {
            let s = score(&set(&[
                (Indicator::ImmediateLiquidity, liq),
                (Indicator::OperatingMargin, margin),
                (Indicator::WorkingCapital, wc),
                (Indicator::WorkingCapitalNeed, ncg),
                (Indicator::Leverage, leverage),
                (Indicator::Roe, roe),
            ]));
            let buckets = [
                s.liquidity,
                s.margin,
                s.working_capital,
                s.leverage,
                s.return_on_equity,
            ];
            assert_eq!(buckets, expected);
            let sum: u16 = expected.iter().map(|p| u16::from(*p)).sum();
            assert!(sum < 100);
            assert_eq!(u16::from(s.total()), sum);
        }
    }
}
