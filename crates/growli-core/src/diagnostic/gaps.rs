use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::benchmarks::SectorProfile;
use crate::indicators::{Indicator, IndicatorSet};
use crate::types::Money;

/// Cash runway (days) gap analysis aims for.
const RUNWAY_TARGET: Decimal = dec!(45);
const LEVERAGE_TARGET: Decimal = dec!(1.5);
const COVERAGE_TARGET: Decimal = dec!(3.0);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Opportunity,
}

/// Named problems gap analysis can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemTag {
    LiquidityCritical,
    LiquidityLow,
    MarginCritical,
    MarginLow,
    CollectionHigh,
    CollectionElevated,
    PaymentShort,
    CycleLong,
    RunwayCritical,
    RunwayLow,
    DebtHigh,
    InterestCoverageLow,
    OperatingLoss,
    InventorySlow,
}

impl ProblemTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemTag::LiquidityCritical => "liquidity_critical",
            ProblemTag::LiquidityLow => "liquidity_low",
            ProblemTag::MarginCritical => "margin_critical",
            ProblemTag::MarginLow => "margin_low",
            ProblemTag::CollectionHigh => "collection_high",
            ProblemTag::CollectionElevated => "collection_elevated",
            ProblemTag::PaymentShort => "payment_short",
            ProblemTag::CycleLong => "cycle_long",
            ProblemTag::RunwayCritical => "runway_critical",
            ProblemTag::RunwayLow => "runway_low",
            ProblemTag::DebtHigh => "debt_high",
            ProblemTag::InterestCoverageLow => "interest_coverage_low",
            ProblemTag::OperatingLoss => "operating_loss",
            ProblemTag::InventorySlow => "inventory_slow",
        }
    }
}

/// One registered problem: where the indicator is, where it should be, and
/// what closing the gap is worth per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub severity: Severity,
    pub current: Decimal,
    pub target: Decimal,
    pub gap: Decimal,
    /// Estimated monetary impact (R$), where one can be estimated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Money>,
}

impl Gap {
    fn new(severity: Severity, current: Decimal, target: Decimal, gap: Decimal) -> Self {
        Gap {
            severity,
            current,
            target,
            gap,
            impact: None,
        }
    }

    fn with_impact(mut self, impact: Money) -> Self {
        self.impact = Some(impact.round_dp(2));
        self
    }
}

/// Registered problems plus their urgency ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub problems: BTreeMap<ProblemTag, Gap>,
    /// Severity first, then larger impact, then name
    pub ranked: Vec<ProblemTag>,
}

impl GapAnalysis {
    fn from_problems(problems: BTreeMap<ProblemTag, Gap>) -> Self {
        let mut ranked: Vec<ProblemTag> = problems.keys().copied().collect();
        ranked.sort_by(|a, b| {
            let (ga, gb) = (&problems[a], &problems[b]);
            ga.severity
                .cmp(&gb.severity)
                .then_with(|| {
                    let ia = ga.impact.unwrap_or(Decimal::ZERO);
                    let ib = gb.impact.unwrap_or(Decimal::ZERO);
                    ib.cmp(&ia)
                })
                .then_with(|| a.as_str().cmp(b.as_str()))
        });
        GapAnalysis { problems, ranked }
    }

    pub fn get(&self, tag: ProblemTag) -> Option<&Gap> {
        self.problems.get(&tag)
    }

    pub fn contains(&self, tag: ProblemTag) -> bool {
        self.problems.contains_key(&tag)
    }

    /// The first of `tags` that was registered, with its gap.
    pub fn first_of(&self, tags: &[ProblemTag]) -> Option<(ProblemTag, &Gap)> {
        tags.iter()
            .find_map(|tag| self.problems.get(tag).map(|gap| (*tag, gap)))
    }

    pub fn ranked(&self) -> impl Iterator<Item = (ProblemTag, &Gap)> + '_ {
        self.ranked
            .iter()
            .filter_map(|tag| self.problems.get(tag).map(|gap| (*tag, gap)))
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Compare the indicators against the sector profile and register every
/// problem whose unfavourable gap exceeds its tolerance. Working-capital
/// problems are only considered when tier 2 figures are present and the
/// driving indicator is positive.
pub fn analyze_gaps(set: &IndicatorSet, profile: &SectorProfile) -> GapAnalysis {
    let mut problems = BTreeMap::new();
    let targets = &profile.targets;

    let revenue = set.value_or_zero(Indicator::Revenue);
    let fixed = set.value_or_zero(Indicator::FixedCosts);
    let has_tier2 = set.contains(Indicator::Dso);

    // Liquidity
    if let Some(liq) = set.value(Indicator::ImmediateLiquidity) {
        let gap = targets.liquidity - liq;
        if liq < dec!(0.6) {
            problems.insert(
                ProblemTag::LiquidityCritical,
                Gap::new(Severity::Critical, liq, targets.liquidity, gap).with_impact(fixed * gap),
            );
        } else if liq < dec!(1.0) {
            problems.insert(
                ProblemTag::LiquidityLow,
                Gap::new(Severity::High, liq, targets.liquidity, gap).with_impact(fixed * gap),
            );
        }
    }

    // Gross margin against the family target
    if let Some(gm) = set.value(Indicator::GrossMargin) {
        let gap = targets.gross_margin - gm;
        let impact = revenue * gap / dec!(100);
        if gm < dec!(20) {
            problems.insert(
                ProblemTag::MarginCritical,
                Gap::new(Severity::Critical, gm, targets.gross_margin, gap).with_impact(impact),
            );
        } else if gm < targets.gross_margin {
            problems.insert(
                ProblemTag::MarginLow,
                Gap::new(Severity::Medium, gm, targets.gross_margin, gap).with_impact(impact),
            );
        }
    }

    if has_tier2 {
        detect_working_capital(set, profile, revenue, &mut problems);
    }

    // Cash runway
    if let Some(runway) = set.value(Indicator::CashRunwayDays) {
        let gap = RUNWAY_TARGET - runway;
        let impact = fixed * gap / dec!(30);
        if runway < dec!(15) {
            problems.insert(
                ProblemTag::RunwayCritical,
                Gap::new(Severity::Critical, runway, RUNWAY_TARGET, gap).with_impact(impact),
            );
        } else if runway < dec!(30) {
            problems.insert(
                ProblemTag::RunwayLow,
                Gap::new(Severity::Medium, runway, RUNWAY_TARGET, gap).with_impact(impact),
            );
        }
    }

    // Debt
    if has_tier2 {
        if let Some(leverage) = set.value(Indicator::Leverage) {
            if leverage > dec!(2.0) {
                problems.insert(
                    ProblemTag::DebtHigh,
                    Gap::new(Severity::High, leverage, LEVERAGE_TARGET, leverage - LEVERAGE_TARGET),
                );
            }
        }
    }
    if let Some(coverage) = set.value(Indicator::InterestCoverage) {
        if coverage < dec!(2.0) {
            let severity = if coverage < dec!(1.5) {
                Severity::High
            } else {
                Severity::Medium
            };
            problems.insert(
                ProblemTag::InterestCoverageLow,
                Gap::new(severity, coverage, COVERAGE_TARGET, COVERAGE_TARGET - coverage),
            );
        }
    }

    // Operating loss
    if let Some(op) = set.value(Indicator::OperatingResult) {
        if op < Decimal::ZERO {
            problems.insert(
                ProblemTag::OperatingLoss,
                Gap::new(Severity::Critical, op, fixed * dec!(0.3), op.abs()).with_impact(op.abs()),
            );
        }
    }

    GapAnalysis::from_problems(problems)
}

fn detect_working_capital(
    set: &IndicatorSet,
    profile: &SectorProfile,
    revenue: Money,
    problems: &mut BTreeMap<ProblemTag, Gap>,
) {
    let targets = &profile.targets;
    let daily_revenue = revenue / dec!(30);

    if let Some(dso) = set.value(Indicator::Dso).filter(|d| *d > Decimal::ZERO) {
        let target = targets.collection_days;
        let gap = dso - target;
        if dso > target + dec!(15) {
            problems.insert(
                ProblemTag::CollectionHigh,
                Gap::new(Severity::High, dso, target, gap).with_impact(daily_revenue * gap),
            );
        } else if dso > target {
            problems.insert(
                ProblemTag::CollectionElevated,
                Gap::new(Severity::Medium, dso, target, gap).with_impact(daily_revenue * gap),
            );
        }
    }

    if let Some(dpo) = set.value(Indicator::Dpo).filter(|d| *d > Decimal::ZERO) {
        let target = targets.payment_days;
        if dpo < target - dec!(10) {
            let gap = target - dpo;
            problems.insert(
                ProblemTag::PaymentShort,
                Gap::new(Severity::Opportunity, dpo, target, gap)
                    .with_impact(revenue * dec!(0.7) / dec!(30) * gap),
            );
        }
    }

    if let Some(cycle) = set
        .value(Indicator::CashConversionCycle)
        .filter(|c| *c > Decimal::ZERO)
    {
        let target = targets.cash_cycle;
        if cycle > target + dec!(20) {
            let gap = cycle - target;
            problems.insert(
                ProblemTag::CycleLong,
                Gap::new(Severity::High, cycle, target, gap)
                    .with_impact(daily_revenue * gap * dec!(0.6)),
            );
        }
    }

    let turn_target = profile.inventory_turn_target;
    if let Some(turnover) = set.value(Indicator::InventoryTurnover) {
        if turn_target > Decimal::ZERO && turnover < turn_target {
            let inventory = set.value_or_zero(Indicator::Inventory);
            let cogs = set.value_or_zero(Indicator::CostOfGoods);
            let excess = inventory - cogs * dec!(12) / turn_target;
            problems.insert(
                ProblemTag::InventorySlow,
                Gap::new(Severity::Medium, turnover, turn_target, turn_target - turnover)
                    .with_impact(excess),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::BenchmarkTable;
    use crate::indicators::IndicatorValue;

    fn v(d: Decimal) -> IndicatorValue {
        IndicatorValue::Value(d)
    }

    fn set(entries: &[(Indicator, IndicatorValue)]) -> IndicatorSet {
        IndicatorSet::new().extended_with(entries.iter().copied()).unwrap()
    }

    fn healthy_tier1() -> Vec<(Indicator, IndicatorValue)> {
        vec![
            (Indicator::Revenue, v(dec!(90000))),
            (Indicator::CostOfGoods, v(dec!(45000))),
            (Indicator::FixedCosts, v(dec!(30000))),
            (Indicator::GrossMargin, v(dec!(50))),
            (Indicator::OperatingResult, v(dec!(15000))),
            (Indicator::ImmediateLiquidity, v(dec!(2))),
            (Indicator::CashRunwayDays, v(dec!(60))),
        ]
    }

    #[test]
    fn test_healthy_business_has_no_problems() {
        let table = BenchmarkTable::standard();
        let gaps = analyze_gaps(&set(&healthy_tier1()), table.benchmarks("saude"));
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_liquidity_thresholds() {
        let table = BenchmarkTable::standard();
        let mut entries = healthy_tier1();
        entries[5] = (Indicator::ImmediateLiquidity, v(dec!(0.5)));
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        let gap = gaps.get(ProblemTag::LiquidityCritical).unwrap();
        assert_eq!(gap.severity, Severity::Critical);
        assert_eq!(gap.gap, dec!(1.0));
        assert_eq!(gap.impact, Some(dec!(30000)));

        entries[5] = (Indicator::ImmediateLiquidity, v(dec!(0.8)));
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        assert_eq!(gaps.get(ProblemTag::LiquidityLow).unwrap().severity, Severity::High);
        assert!(!gaps.contains(ProblemTag::LiquidityCritical));
    }

    #[test]
    fn test_margin_against_family_target() {
        let table = BenchmarkTable::standard();
        let mut entries = healthy_tier1();
        // services family targets 50%; 45% is low but not critical
        entries[3] = (Indicator::GrossMargin, v(dec!(45)));
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("servicos_domesticos"));
        let gap = gaps.get(ProblemTag::MarginLow).unwrap();
        assert_eq!(gap.target, dec!(50));
        assert_eq!(gap.impact, Some(dec!(4500)));
        // the general family only targets 35%
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        assert!(!gaps.contains(ProblemTag::MarginLow));
    }

    #[test]
    fn test_working_capital_problems_need_tier2() {
        let table = BenchmarkTable::standard();
        let mut entries = healthy_tier1();
        entries.extend([
            (Indicator::Dso, v(dec!(60))),
            (Indicator::Dpo, v(dec!(20))),
            (Indicator::CashConversionCycle, v(dec!(70))),
            (Indicator::Inventory, v(dec!(90000))),
            (Indicator::InventoryTurnover, v(dec!(6))),
            (Indicator::Leverage, v(dec!(2.5))),
            (Indicator::InterestCoverage, v(dec!(1.8))),
        ]);
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        // general family: dso 35, dpo 45, cycle 25
        let collection = gaps.get(ProblemTag::CollectionHigh).unwrap();
        assert_eq!(collection.gap, dec!(25));
        assert_eq!(collection.impact, Some(dec!(75000)));
        let payment = gaps.get(ProblemTag::PaymentShort).unwrap();
        assert_eq!(payment.severity, Severity::Opportunity);
        assert_eq!(payment.impact, Some(dec!(52500)));
        assert_eq!(gaps.get(ProblemTag::CycleLong).unwrap().impact, Some(dec!(81000)));
        assert!(gaps.contains(ProblemTag::DebtHigh));
        assert_eq!(
            gaps.get(ProblemTag::InterestCoverageLow).unwrap().severity,
            Severity::Medium
        );
        // turnover 6 meets the target
        assert!(!gaps.contains(ProblemTag::InventorySlow));
    }

    #[test]
    fn test_inventory_slow_impact() {
        let table = BenchmarkTable::standard();
        let mut entries = healthy_tier1();
        entries.extend([
            (Indicator::Dso, v(dec!(20))),
            (Indicator::Inventory, v(dec!(180000))),
            (Indicator::InventoryTurnover, v(dec!(3))),
        ]);
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        // 180000 - 45000 x 12 / 6
        assert_eq!(gaps.get(ProblemTag::InventorySlow).unwrap().impact, Some(dec!(90000)));
    }

    #[test]
    fn test_ranking_by_severity_then_impact_then_name() {
        let table = BenchmarkTable::standard();
        let entries = vec![
            (Indicator::Revenue, v(dec!(60000))),
            (Indicator::CostOfGoods, v(dec!(54000))),
            (Indicator::FixedCosts, v(dec!(30000))),
            (Indicator::GrossMargin, v(dec!(10))),
            (Indicator::OperatingResult, v(dec!(-24000))),
            (Indicator::ImmediateLiquidity, v(dec!(0.3))),
            (Indicator::CashRunwayDays, v(dec!(20))),
        ];
        let gaps = analyze_gaps(&set(&entries), table.benchmarks("saude"));
        let ranked: Vec<ProblemTag> = gaps.ranked.clone();
        assert_eq!(
            ranked,
            vec![
                // liquidity 30000 x 1.2 = 36000, loss 24000, margin 60000 x 25% = 15000
                ProblemTag::LiquidityCritical,
                ProblemTag::OperatingLoss,
                ProblemTag::MarginCritical,
                ProblemTag::RunwayLow,
            ]
        );
    }

    #[test]
    fn test_ranking_ties_break_on_name() {
        let mut problems = BTreeMap::new();
        problems.insert(
            ProblemTag::RunwayLow,
            Gap::new(Severity::Medium, dec!(1), dec!(2), dec!(1)),
        );
        problems.insert(
            ProblemTag::InterestCoverageLow,
            Gap::new(Severity::Medium, dec!(1), dec!(2), dec!(1)),
        );
        let gaps = GapAnalysis::from_problems(problems);
        assert_eq!(
            gaps.ranked,
            vec![ProblemTag::InterestCoverageLow, ProblemTag::RunwayLow]
        );
    }
}
