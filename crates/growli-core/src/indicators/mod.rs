//! Indicator calculators, one cluster per disclosure tier, plus the
//! append-only [`IndicatorSet`] they accumulate into and the traffic-light
//! classification bands.

pub mod basic;
pub mod classification;
pub mod set;
pub mod strategic;
pub mod working_capital;

pub use classification::Classification;
pub use set::{Indicator, IndicatorSet, IndicatorValue};
pub use strategic::{RevenueTrend, TrendSummary};
