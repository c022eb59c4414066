use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::SectorProfile;
use crate::format;
use crate::indicators::{Indicator, IndicatorSet, RevenueTrend};
use crate::types::{Money, Percent};

use super::gaps::{GapAnalysis, ProblemTag};

const MAX_PRIORITIZED_ACTIONS: usize = 5;
const MAX_SUMMARY_SENTENCES: usize = 5;
/// Gross margin below which a +1pp improvement is offered as an opportunity.
const MARGIN_OPPORTUNITY_CEILING: Percent = dec!(30);

/// Strengths and concerns, each a short sentence carrying the figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl Findings {
    fn strength(&mut self, text: String) {
        self.strengths.push(text);
    }

    fn concern(&mut self, text: String) {
        self.concerns.push(text);
    }
}

/// A quantified improvement the business could pursue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub description: String,
    /// Monthly cash or profit effect (R$)
    pub impact: Money,
    /// Impact as a share of monthly revenue
    pub impact_pct: Percent,
    pub action: String,
}

/// Classify the headline indicators into strengths and concerns against
/// the sector profile.
pub fn findings(set: &IndicatorSet, profile: &SectorProfile) -> Findings {
    let mut out = Findings::default();

    if let Some(liq) = set.value(Indicator::ImmediateLiquidity) {
        if liq >= profile.liquidity_target {
            out.strength(format!("Strong immediate liquidity ({})", format::ratio(liq)));
        } else if liq < dec!(1.0) {
            out.concern(format!("Immediate liquidity is critical ({})", format::ratio(liq)));
        }
    }

    if let Some(margin) = set.value(Indicator::OperatingMargin) {
        if margin >= profile.net_margin_target {
            out.strength(format!("Healthy operating margin ({})", format::percent(margin)));
        } else if margin < Decimal::ZERO {
            out.concern("The business is operating at a loss".to_string());
        }
    }

    if let Some(wc) = set.value(Indicator::WorkingCapital) {
        if wc > Decimal::ZERO {
            out.strength(format!("Positive working capital ({})", format::brl(wc)));
        } else {
            out.concern("Negative working capital".to_string());
        }
    }

    if let Some(gm) = set.value(Indicator::GrossMargin) {
        if gm >= profile.targets.gross_margin {
            out.strength(format!(
                "Gross margin at or above the sector target ({})",
                format::percent(gm)
            ));
        } else if gm < dec!(20) {
            out.concern(format!("Gross margin is critical ({})", format::percent(gm)));
        }
    }

    if let Some(runway) = set.value(Indicator::CashRunwayDays) {
        if runway >= dec!(30) {
            out.strength(format!("Comfortable cash runway ({})", format::days(runway)));
        } else if runway < dec!(10) {
            out.concern(format!("Cash runway is critical ({})", format::days(runway)));
        }
    }

    if let Some(cycle) = set.value(Indicator::CashConversionCycle) {
        let target = profile.targets.cash_cycle;
        if cycle <= target {
            out.strength(format!("Efficient cash conversion cycle ({})", format::days(cycle)));
        } else if cycle > target + dec!(20) {
            out.concern(format!("Long cash conversion cycle ({})", format::days(cycle)));
        }
    }

    if let Some(coverage) = set.value(Indicator::InterestCoverage) {
        if coverage >= dec!(3.0) {
            out.strength(format!(
                "Operating result covers interest {}x",
                format::ratio(coverage)
            ));
        } else if coverage < dec!(2.0) {
            out.concern(format!(
                "Interest coverage is low ({}x)",
                format::ratio(coverage)
            ));
        }
    }

    if let Some(dta) = set.value(Indicator::DebtToAssets) {
        if dta <= profile.debt_ratio_ceiling {
            out.strength(format!("Debt under control ({} of assets)", format::percent(dta)));
        } else {
            out.concern(format!("High indebtedness ({} of assets)", format::percent(dta)));
        }
    }

    if let Some(change) = set.value(Indicator::RevenueTrendChange) {
        match RevenueTrend::from_change(change) {
            RevenueTrend::Growth => out.strength(format!(
                "Revenue growing {} a month on average",
                format::percent(change)
            )),
            RevenueTrend::Decline => out.concern(format!(
                "Revenue falling {} a month on average",
                format::percent(change.abs())
            )),
            RevenueTrend::Stable => {}
        }
    }

    out
}

fn short_action(tag: ProblemTag) -> &'static str {
    match tag {
        ProblemTag::LiquidityCritical => "URGENT: raise cash or cut short-term obligations",
        ProblemTag::LiquidityLow => "Strengthen cash by bringing receivables forward",
        ProblemTag::MarginCritical => "Review pricing and cost structure immediately",
        ProblemTag::MarginLow => "Raise prices or renegotiate supplier costs",
        ProblemTag::CollectionHigh => "Shorten the collection period with an active dunning routine",
        ProblemTag::CollectionElevated => "Tighten collection terms for new sales",
        ProblemTag::PaymentShort => "Negotiate longer payment terms with suppliers",
        ProblemTag::CycleLong => "Shorten the cash conversion cycle",
        ProblemTag::RunwayCritical => "CRITICAL: secure working capital for the coming weeks",
        ProblemTag::RunwayLow => "Build a larger cash cushion",
        ProblemTag::DebtHigh => "Avoid new debt and prioritise amortisation",
        ProblemTag::InterestCoverageLow => "Restructure expensive debt",
        ProblemTag::OperatingLoss => "Cut non-essential expenses until break-even",
        ProblemTag::InventorySlow => "Clear slow-moving inventory",
    }
}

/// One imperative per ranked problem, most urgent first.
pub fn prioritized_actions(gaps: &GapAnalysis) -> Vec<String> {
    gaps.ranked
        .iter()
        .take(MAX_PRIORITIZED_ACTIONS)
        .map(|tag| short_action(*tag).to_string())
        .collect()
}

/// Short narrative of the business's position.
pub fn summary(set: &IndicatorSet) -> Vec<String> {
    let mut lines = Vec::new();

    let gm = set.value_or_zero(Indicator::GrossMargin);
    lines.push(if gm >= dec!(30) {
        format!(
            "Healthy gross margin of {}, showing good cost control.",
            format::percent(gm)
        )
    } else if gm >= dec!(20) {
        format!(
            "Gross margin of {} is adequate but leaves room for optimisation.",
            format::percent(gm)
        )
    } else {
        format!(
            "Critical gross margin of {}: prioritise a review of prices and costs.",
            format::percent(gm)
        )
    });

    let runway = set.value_or_zero(Indicator::CashRunwayDays);
    lines.push(if runway >= dec!(30) {
        format!("Comfortable cash runway ({}).", format::days(runway))
    } else if runway >= dec!(10) {
        format!("Moderate cash runway ({}): keep watching it.", format::days(runway))
    } else {
        format!(
            "Critical cash runway ({}): prioritise cash generation.",
            format::days(runway)
        )
    });

    if let Some(cycle) = set.value(Indicator::CashConversionCycle) {
        lines.push(if cycle <= dec!(10) {
            "Optimised cash conversion cycle, working capital is well managed.".to_string()
        } else if cycle <= dec!(30) {
            format!(
                "A cash conversion cycle of {} leaves room to improve terms.",
                format::days(cycle)
            )
        } else {
            format!(
                "A long cash conversion cycle ({}) ties up significant working capital.",
                format::days(cycle)
            )
        });
    }

    if let Some(coverage) = set.value(Indicator::InterestCoverage) {
        if coverage < dec!(2.0) {
            lines.push("Interest coverage is worrying: renegotiate debt or reduce costs.".to_string());
        } else if coverage >= dec!(3.0) {
            lines.push("Good capacity to honour financial commitments.".to_string());
        }
    }

    if let Some(change) = set.value(Indicator::RevenueTrendChange) {
        match RevenueTrend::from_change(change) {
            RevenueTrend::Growth => lines.push(
                "Revenue is on a growth path: invest in capacity and controls.".to_string(),
            ),
            RevenueTrend::Decline => lines.push(
                "Revenue is falling: urgent commercial action is needed.".to_string(),
            ),
            RevenueTrend::Stable => {}
        }
    }

    lines.truncate(MAX_SUMMARY_SENTENCES);
    lines
}

fn share_of_revenue(impact: Money, revenue: Money) -> Percent {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (impact * dec!(100) / revenue).round_dp(2)
}

/// Quantified improvements: collect 10 days sooner, pay 7 days later, and
/// one more point of gross margin when the margin is thin.
pub fn opportunities(set: &IndicatorSet) -> Vec<Opportunity> {
    let revenue = set.value_or_zero(Indicator::Revenue);
    let mut out = Vec::new();

    if let Some(impact) = set
        .value(Indicator::DsoReductionImpact)
        .filter(|i| *i > Decimal::ZERO)
    {
        out.push(Opportunity {
            description: "Reduce the collection period (DSO) by 10 days".to_string(),
            impact: impact.round_dp(2),
            impact_pct: share_of_revenue(impact, revenue),
            action: "Run proactive collections and offer early-payment discounts".to_string(),
        });
    }

    if let Some(impact) = set
        .value(Indicator::DpoExtensionImpact)
        .filter(|i| *i > Decimal::ZERO)
    {
        out.push(Opportunity {
            description: "Negotiate a payment period (DPO) 7 days longer".to_string(),
            impact: impact.round_dp(2),
            impact_pct: share_of_revenue(impact, revenue),
            action: "Renegotiate with the main suppliers and consolidate purchases".to_string(),
        });
    }

    let gm = set.value_or_zero(Indicator::GrossMargin);
    if gm < MARGIN_OPPORTUNITY_CEILING {
        out.push(Opportunity {
            description: "Raise gross margin by 1 percentage point".to_string(),
            impact: (revenue * dec!(0.01)).round_dp(2),
            impact_pct: dec!(1.0),
            action: "Review prices, negotiate costs and drop low-margin products".to_string(),
        });
    }

    out
}
