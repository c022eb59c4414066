//! 30/60/90-day action plan.
//!
//! Each horizon is four slots. A slot walks its templates in order and
//! renders the first one whose trigger fires, falling back to a generic
//! best-practice action, so every horizon always yields four actions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::benchmarks::SectorFamily;
use crate::format;
use crate::indicators::{Indicator, IndicatorSet};
use crate::snapshot::Tier;

use super::gaps::{Gap, GapAnalysis, ProblemTag};

/// Capex payback (years) a business case must beat. Exactly 18 months does not.
const CAPEX_CASE_MAX_YEARS: Decimal = dec!(1.5);
const GROWTH_TARGET_PCT: Decimal = dec!(25);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub title: String,
    pub method: String,
    pub expected_outcome: String,
    pub priority: Priority,
    /// Problem that selected this action; `None` for generic actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<ProblemTag>,
}

impl Action {
    fn new(
        title: impl Into<String>,
        method: impl Into<String>,
        expected_outcome: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Action {
            title: title.into(),
            method: method.into(),
            expected_outcome: expected_outcome.into(),
            priority,
            trigger: None,
        }
    }
}

/// Exactly four actions per horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub days_30: Vec<Action>,
    pub days_60: Vec<Action>,
    pub days_90: Vec<Action>,
}

impl ActionPlan {
    pub fn horizons(&self) -> [(&'static str, &[Action]); 3] {
        [
            ("30 days", self.days_30.as_slice()),
            ("60 days", self.days_60.as_slice()),
            ("90 days", self.days_90.as_slice()),
        ]
    }
}

/// What the templates read from: registered problems plus the indicators
/// their text is parameterized with.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub gaps: &'a GapAnalysis,
    pub indicators: &'a IndicatorSet,
    pub tier: Tier,
    pub family: SectorFamily,
}

impl PlanContext<'_> {
    fn value(&self, indicator: Indicator) -> Decimal {
        self.indicators.value_or_zero(indicator)
    }

    fn revenue(&self) -> Decimal {
        self.value(Indicator::Revenue)
    }

    fn fixed_costs(&self) -> Decimal {
        self.value(Indicator::FixedCosts)
    }

    fn gross_margin(&self) -> Decimal {
        self.value(Indicator::GrossMargin)
    }

    fn runway(&self) -> Decimal {
        self.value(Indicator::CashRunwayDays)
    }

    fn liquidity(&self) -> Decimal {
        self.value(Indicator::ImmediateLiquidity)
    }

    fn in_crisis(&self) -> bool {
        self.gaps.contains(ProblemTag::LiquidityCritical)
            || self.gaps.contains(ProblemTag::RunwayCritical)
    }
}

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

type Render = fn(&PlanContext<'_>) -> Action;
type RenderGap = fn(&PlanContext<'_>, &Gap) -> Action;
type Predicate = fn(&PlanContext<'_>) -> bool;

enum Template {
    /// Fires on the first of these problems that was registered.
    OnProblem(&'static [ProblemTag], RenderGap),
    When(Predicate, Render),
}

struct Slot {
    templates: &'static [Template],
    fallback: Render,
}

impl Slot {
    fn select(&self, ctx: &PlanContext<'_>) -> Action {
        for template in self.templates {
            match template {
                Template::OnProblem(tags, render) => {
                    if let Some((tag, gap)) = ctx.gaps.first_of(tags) {
                        let mut action = render(ctx, gap);
                        action.trigger = Some(tag);
                        return action;
                    }
                }
                Template::When(applies, render) => {
                    if applies(ctx) {
                        return render(ctx);
                    }
                }
            }
        }
        (self.fallback)(ctx)
    }
}

const PLAN_30: [Slot; 4] = [
    Slot {
        templates: &[
            Template::OnProblem(
                &[ProblemTag::LiquidityCritical, ProblemTag::RunwayCritical],
                cash_emergency,
            ),
            Template::OnProblem(&[ProblemTag::CollectionHigh], shorten_collection),
        ],
        fallback: daily_cash_control,
    },
    Slot {
        templates: &[
            Template::OnProblem(
                &[ProblemTag::MarginCritical, ProblemTag::MarginLow],
                raise_margin,
            ),
            Template::OnProblem(&[ProblemTag::OperatingLoss], emergency_cuts),
        ],
        fallback: map_variable_costs,
    },
    Slot {
        templates: &[Template::OnProblem(&[ProblemTag::PaymentShort], extend_payment_terms)],
        fallback: renegotiate_suppliers,
    },
    Slot {
        templates: &[Template::OnProblem(
            &[ProblemTag::InterestCoverageLow],
            restructure_debt,
        )],
        fallback: spending_approval,
    },
];

const PLAN_60: [Slot; 4] = [
    Slot {
        templates: &[],
        fallback: kpi_dashboard,
    },
    Slot {
        templates: &[
            Template::OnProblem(&[ProblemTag::CycleLong], shorten_cycle),
            Template::OnProblem(&[ProblemTag::InventorySlow], clear_slow_inventory),
            Template::When(has_working_capital_data, abc_inventory),
        ],
        fallback: purchasing_controls,
    },
    Slot {
        templates: &[],
        fallback: channel_profitability,
    },
    Slot {
        templates: &[],
        fallback: renegotiate_fixed_costs,
    },
];

const PLAN_90: [Slot; 4] = [
    Slot {
        templates: &[Template::When(needs_capital, capital_raise)],
        fallback: emergency_reserve,
    },
    Slot {
        templates: &[Template::When(ready_to_grow, growth_plan)],
        fallback: consolidate_operation,
    },
    Slot {
        templates: &[
            Template::When(has_quick_capex_payback, capex_business_case),
            Template::When(has_strategic_data, automation_review),
        ],
        fallback: capacity_study,
    },
    Slot {
        templates: &[],
        fallback: team_training,
    },
];

fn run(slots: &[Slot; 4], ctx: &PlanContext<'_>) -> Vec<Action> {
    slots.iter().map(|slot| slot.select(ctx)).collect()
}

/// Build the 30/60/90-day plan for the registered problems.
pub fn action_plan(ctx: &PlanContext<'_>) -> ActionPlan {
    ActionPlan {
        days_30: run(&PLAN_30, ctx),
        days_60: run(&PLAN_60, ctx),
        days_90: run(&PLAN_90, ctx),
    }
}

// ---------------------------------------------------------------------------
// 30 days: cash, margin, suppliers, governance
// ---------------------------------------------------------------------------

fn cash_emergency(ctx: &PlanContext<'_>, _gap: &Gap) -> Action {
    Action::new(
        "URGENT: securitise receivables or raise short-term capital",
        format!(
            "Current liquidity ({}) is critical. Consider factoring receivables or an emergency \
             credit line to cover the next {} of operation until cash flow normalises.",
            format::ratio(ctx.liquidity()),
            format::days(ctx.runway()),
        ),
        "Raise liquidity to 1,50 and secure 45 days of runway",
        Priority::High,
    )
}

fn shorten_collection(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    let cut = gap.gap.min(dec!(15)).trunc();
    Action::new(
        format!(
            "Cut the collection period from {} to {}",
            format::days(gap.current),
            format::days(gap.current - cut),
        ),
        format!(
            "The average collection period ({}) is {} above the sector benchmark ({}). \
             Run a dunning routine with contact every 3 days and offer a 2-3% discount for \
             payment within 10 days.",
            format::days(gap.current),
            format::days(gap.gap),
            format::days(gap.target),
        ),
        format!(
            "Release roughly {} of working capital",
            format::brl(gap.impact.unwrap_or_default() * dec!(0.5))
        ),
        Priority::High,
    )
}

fn daily_cash_control(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Put daily cash control and a weekly projection in place",
        format!(
            "With a runway of {}, close the cash position every day with a 7-day projection. \
             Set alerts for when the projected balance drops below {}.",
            format::days(ctx.runway()),
            format::brl(ctx.fixed_costs()),
        ),
        "Spot cash shortfalls 7 days ahead and avoid surprises",
        Priority::High,
    )
}

fn raise_margin(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    let goal = (gap.current + dec!(5)).min(gap.target);
    Action::new(
        format!(
            "Raise gross margin from {} to {}",
            format::percent(gap.current),
            format::percent(goal),
        ),
        format!(
            "Gross margin ({}) is {} points below the sector ({}). Map the 3 lowest-margin \
             products or services and reprice them by 8-12% or drop them, then ask the main \
             supplier for a 5% discount for payment within 15 days.",
            format::percent(gap.current),
            format::ratio(gap.gap),
            format::percent(gap.target),
        ),
        format!(
            "Additional profit of roughly {} a month",
            format::brl(gap.impact.unwrap_or_default() * dec!(0.15))
        ),
        Priority::High,
    )
}

fn emergency_cuts(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    Action::new(
        "Reverse the operating loss with emergency cuts",
        format!(
            "Operating loss of {}. Cut or suspend non-essential spending (consultancies, \
             subscriptions, underperforming marketing) and freeze hiring until break-even.",
            format::brl(gap.gap),
        ),
        "Eliminate the operating loss and build a minimum safety margin",
        Priority::High,
    )
}

fn map_variable_costs(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Map and trim variable costs per product or service",
        "List every sales-related cost (commissions, freight, packaging, fees) for the 5 main \
         products or services and find 2-3 immediate reductions of 3-5%.",
        format!(
            "Estimated saving of {} a month",
            format::brl(ctx.revenue() * dec!(0.03))
        ),
        Priority::Medium,
    )
}

fn extend_payment_terms(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    let extra = gap.gap.min(dec!(15)).trunc();
    Action::new(
        format!(
            "Negotiate payment terms from {} to {}",
            format::days(gap.current),
            format::days(gap.current + extra),
        ),
        format!(
            "The average payment period ({}) is below the market ({}). Ask the 5 largest \
             suppliers for {} more while keeping volume discounts.",
            format::days(gap.current),
            format::days(gap.target),
            format::days(extra),
        ),
        format!(
            "Release roughly {} of working capital",
            format::brl(gap.impact.unwrap_or_default() * dec!(0.6))
        ),
        Priority::High,
    )
}

fn renegotiate_suppliers(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Renegotiate terms with the main suppliers",
        "Review the commercial terms of the 3 largest suppliers. Look for an extra 3-5% \
         discount on consolidated orders, a quarterly volume bonus or a better product mix.",
        format!(
            "Estimated saving of {} a month",
            format::brl(ctx.revenue() * dec!(0.02))
        ),
        Priority::Medium,
    )
}

fn restructure_debt(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    Action::new(
        "Restructure high-interest debt",
        format!(
            "Interest coverage of {}x shows financial expenses eating into the operating \
             result. Renegotiate loans above 2,5% a month, consolidate card debt into a cheaper \
             line and look at loan portability.",
            format::ratio(gap.current),
        ),
        "Cut financial expenses by 20-30% over the next 2 months",
        Priority::High,
    )
}

fn spending_approval(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Standardise approval of expenses above a limit",
        format!(
            "Expenses above {} need approval with a justification and estimated return. \
             Answer a 3-question checklist before any new recurring cost.",
            format::brl(ctx.fixed_costs() * dec!(0.1)),
        ),
        "Avoid unnecessary spending and build cost awareness",
        Priority::Medium,
    )
}

// ---------------------------------------------------------------------------
// 60 days: structural efficiency
// ---------------------------------------------------------------------------

fn kpi_dashboard(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Automate tracking of the main KPIs",
        format!(
            "Build a dashboard refreshed weekly with liquidity ({}), gross margin ({}), cash \
             runway ({}), operating result and cash cycle. Send it every Monday with alerts \
             for deviations above 10%.",
            format::ratio(ctx.liquidity()),
            format::percent(ctx.gross_margin()),
            format::days(ctx.runway()),
        ),
        "Cut weekly analysis from 3-4 hours to 30 minutes and spot problems early",
        Priority::High,
    )
}

fn has_working_capital_data(ctx: &PlanContext<'_>) -> bool {
    ctx.tier >= Tier::Intermediate
}

fn shorten_cycle(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    Action::new(
        format!(
            "Shorten the cash conversion cycle from {} to {}",
            format::days(gap.current),
            format::days(gap.target + dec!(5)),
        ),
        format!(
            "The cycle ({}) is {} above the benchmark ({}). Carry through the 30-day \
             collection and payment actions, promote items idle for more than 45 days and \
             adjust reorder points to avoid overstock.",
            format::days(gap.current),
            format::days(gap.gap),
            format::days(gap.target),
        ),
        format!(
            "Release roughly {} of tied-up working capital",
            format::brl(gap.impact.unwrap_or_default() * dec!(0.7))
        ),
        Priority::High,
    )
}

fn clear_slow_inventory(_ctx: &PlanContext<'_>, gap: &Gap) -> Action {
    Action::new(
        format!(
            "Raise inventory turnover from {}x to {}x a year",
            format::ratio(gap.current),
            format::ratio(gap.target),
        ),
        "Run progressive-discount sales on items idle for more than 60 days, trim the mix and \
         base purchases on the last 30 days of actual sales.",
        format!(
            "Free up to {} held in excess inventory",
            format::brl(gap.impact.unwrap_or_default().max(Decimal::ZERO))
        ),
        Priority::High,
    )
}

fn abc_inventory(_ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Optimise working capital with an ABC inventory review",
        "Class A items (20% of items, 80% of value) turn in 45 days, class B in 60 days, and \
         class C is cleared within 30 days with progressive discounts. Adjust reorder points \
         of class A items to avoid stock-outs.",
        "Raise inventory turnover by 15-25% and free tied-up capital",
        Priority::High,
    )
}

fn purchasing_controls(_ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Structure purchasing and inventory controls",
        "Track inflow, outflow, balance, reorder point and preferred supplier for the 20 main \
         items. Review orders every two weeks against the last 30 days of sales.",
        "Full visibility of inventory and less idle capital",
        Priority::High,
    )
}

fn channel_profitability(ctx: &PlanContext<'_>) -> Action {
    let unit = if ctx.family.sells_goods() {
        "product"
    } else {
        "service"
    };
    Action::new(
        format!("Calculate the real margin per {unit} and sales channel"),
        format!(
            "Go beyond the average gross margin ({}). Compute the real margin of each {unit} \
             and channel net of freight, commissions, taxes, returns and packaging, and find \
             the 20% that generate 80% of profit.",
            format::percent(ctx.gross_margin()),
        ),
        format!("Find the {unit}s and channels with a real margin above 30% to focus sales on"),
        Priority::High,
    )
}

fn renegotiate_fixed_costs(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Review and renegotiate recurring fixed costs",
        format!(
            "With fixed costs of {} a month, review rent (above 15% of revenue), energy and \
             telecom, software subscriptions and insurance quotes from 3 brokers.",
            format::brl(ctx.fixed_costs()),
        ),
        format!(
            "Save 10-15%, about {} a month",
            format::brl(ctx.fixed_costs() * dec!(0.125))
        ),
        Priority::Medium,
    )
}

// ---------------------------------------------------------------------------
// 90 days: capital structure and growth
// ---------------------------------------------------------------------------

fn needs_capital(ctx: &PlanContext<'_>) -> bool {
    ctx.in_crisis() || ctx.value(Indicator::Leverage) > dec!(1.5)
}

fn capital_raise(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Structure a capital raise or debt restructuring",
        format!(
            "With liquidity at {} and a runway of {}, prepare an executive pack with the last 12 \
             months and a 12-month projection. Seek an investor or partner contribution of {}, \
             or a long-term working capital line with a 6-month grace period.",
            format::ratio(ctx.liquidity()),
            format::days(ctx.runway()),
            format::brl(ctx.fixed_costs() * dec!(6)),
        ),
        "Capitalise the business or bring the cost of capital below 1,8% a month",
        Priority::High,
    )
}

fn emergency_reserve(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Build an emergency reserve worth 3 months of operation",
        format!(
            "The financial position allows a safety cushion. Target: {}. Set aside 10-15% of \
             the monthly operating result in a dedicated account until it is reached.",
            format::brl(ctx.fixed_costs() * dec!(3)),
        ),
        "Secure 90 days of autonomy for unexpected events",
        Priority::High,
    )
}

fn ready_to_grow(ctx: &PlanContext<'_>) -> bool {
    ctx.value(Indicator::OperatingResult) > Decimal::ZERO && ctx.gross_margin() > dec!(25)
}

fn growth_plan(ctx: &PlanContext<'_>) -> Action {
    let annual = ctx.revenue() * dec!(12);
    let goal = annual * (Decimal::ONE + GROWTH_TARGET_PCT / dec!(100));
    Action::new(
        format!("Build a {}% annual growth plan", GROWTH_TARGET_PCT),
        format!(
            "On a solid base (gross margin {}, positive operating result), set targets per \
             channel to take annual revenue from {} to {}, allocating the sales budget by each \
             channel's track record.",
            format::percent(ctx.gross_margin()),
            format::brl(annual),
            format::brl(goal),
        ),
        "Organised growth of 20-30% a year with profitability preserved",
        Priority::Medium,
    )
}

fn consolidate_operation(_ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Consolidate the operation before growing",
        "Lock in the margin and cycle gains of the previous 60 days, document the critical \
         processes on one page each and train 2-3 key people to reduce dependence on the \
         owner.",
        "A structured operation ready to scale safely",
        Priority::High,
    )
}

fn capex_payback_years(ctx: &PlanContext<'_>) -> Option<Decimal> {
    ctx.indicators.value(Indicator::CapexPayback)
}

fn has_quick_capex_payback(ctx: &PlanContext<'_>) -> bool {
    ctx.tier == Tier::Advanced
        && capex_payback_years(ctx).is_some_and(|years| years < CAPEX_CASE_MAX_YEARS)
}

fn capex_business_case(ctx: &PlanContext<'_>) -> Action {
    let months = capex_payback_years(ctx).unwrap_or_default() * dec!(12);
    Action::new(
        format!(
            "Assess the planned capex with a {}-month payback",
            months.round()
        ),
        "Refine the business case: phase the outlay month by month, use 70% of the optimistic \
         gains, define success indicators and a stop point, and simulate the next 24 months of \
         cash flow.",
        "A grounded decision on the strategic investment",
        Priority::Medium,
    )
}

fn has_strategic_data(ctx: &PlanContext<'_>) -> bool {
    ctx.tier == Tier::Advanced
}

fn automation_review(_ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Map automation and economy-of-scale opportunities",
        "Find the bottlenecks that limit growth: repetitive manual work, unconnected systems, \
         rework. Assess 2-3 improvements costing up to 3 months of operating profit with a \
         payback under 12 months.",
        "A pipeline of investments ranked by return",
        Priority::Low,
    )
}

fn capacity_study(ctx: &PlanContext<'_>) -> Action {
    Action::new(
        "Assess investment in capacity or efficiency",
        format!(
            "With revenue of {} a month, map investments that could lift capacity by 30%, cut \
             operating costs by 15% or reduce returns and rework. Favour a payback under 12 \
             months.",
            format::brl(ctx.revenue()),
        ),
        "An investment roadmap for the next 6-12 months",
        Priority::Low,
    )
}

fn team_training(ctx: &PlanContext<'_>) -> Action {
    let kpis = match ctx.tier {
        Tier::Basic => 3,
        Tier::Intermediate => 5,
        Tier::Advanced => 8,
    };
    Action::new(
        "Train the key team in financial management and KPIs",
        format!(
            "Train 2-3 people (operations, sales, finance) to read the business's {kpis} main \
             KPIs. Hold a monthly 1-hour review where each proposes one improvement, and tie \
             bonuses to the financial targets."
        ),
        "Less dependence on the owner and a more engaged team",
        Priority::Low,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::BenchmarkTable;
    use crate::diagnostic::gaps::analyze_gaps;
    use crate::indicators::IndicatorValue;

    fn v(d: Decimal) -> IndicatorValue {
        IndicatorValue::Value(d)
    }

    fn set(entries: &[(Indicator, IndicatorValue)]) -> IndicatorSet {
        IndicatorSet::new().extended_with(entries.iter().copied()).unwrap()
    }

    fn plan_for(set: &IndicatorSet, tier: Tier, sector: &str) -> ActionPlan {
        let table = BenchmarkTable::standard();
        let profile = table.benchmarks(sector);
        let gaps = analyze_gaps(set, profile);
        action_plan(&PlanContext {
            gaps: &gaps,
            indicators: set,
            tier,
            family: profile.family,
        })
    }

    fn healthy() -> Vec<(Indicator, IndicatorValue)> {
        vec![
            (Indicator::Revenue, v(dec!(100000))),
            (Indicator::CostOfGoods, v(dec!(55000))),
            (Indicator::FixedCosts, v(dec!(25000))),
            (Indicator::GrossMargin, v(dec!(45))),
            (Indicator::OperatingResult, v(dec!(20000))),
            (Indicator::ImmediateLiquidity, v(dec!(2))),
            (Indicator::CashRunwayDays, v(dec!(60))),
        ]
    }

    fn distressed() -> Vec<(Indicator, IndicatorValue)> {
        vec![
            (Indicator::Revenue, v(dec!(60000))),
            (Indicator::CostOfGoods, v(dec!(54000))),
            (Indicator::FixedCosts, v(dec!(30000))),
            (Indicator::GrossMargin, v(dec!(10))),
            (Indicator::OperatingResult, v(dec!(-24000))),
            (Indicator::ImmediateLiquidity, v(dec!(0.3))),
            (Indicator::CashRunwayDays, v(dec!(5))),
            (Indicator::Dso, v(dec!(90))),
            (Indicator::Dpo, v(dec!(10))),
            (Indicator::CashConversionCycle, v(dec!(80))),
            (Indicator::Inventory, v(dec!(200000))),
            (Indicator::InventoryTurnover, v(dec!(2))),
            (Indicator::Leverage, v(dec!(3))),
            (Indicator::InterestCoverage, v(dec!(0.5))),
        ]
    }

    fn assert_four_each(plan: &ActionPlan) {
        for (name, actions) in plan.horizons() {
            assert_eq!(actions.len(), 4, "{name} should have 4 actions");
        }
    }

    #[test]
    fn test_always_four_actions_per_horizon() {
        let cases = [
            (set(&[]), Tier::Basic),
            (set(&healthy()), Tier::Basic),
            (set(&healthy()), Tier::Advanced),
            (set(&distressed()), Tier::Intermediate),
            (set(&distressed()), Tier::Advanced),
        ];
        for (indicators, tier) in &cases {
            for sector in ["saude", "comercio_veiculos", "transformacao", "desconhecido"] {
                assert_four_each(&plan_for(indicators, *tier, sector));
            }
        }
    }

    #[test]
    fn test_healthy_business_gets_generic_actions() {
        let plan = plan_for(&set(&healthy()), Tier::Basic, "saude");
        assert!(plan
            .horizons()
            .iter()
            .all(|(_, actions)| actions.iter().all(|a| a.trigger.is_none())));
        assert_eq!(
            plan.days_30[0].title,
            "Put daily cash control and a weekly projection in place"
        );
        assert_eq!(plan.days_90[0].title, "Build an emergency reserve worth 3 months of operation");
        assert_eq!(plan.days_90[1].title, "Build a 25% annual growth plan");
        assert!(plan.days_90[1].method.contains("R$ 1.200.000,00"));
        assert!(plan.days_90[1].method.contains("R$ 1.500.000,00"));
    }

    #[test]
    fn test_distressed_business_gets_targeted_actions() {
        let plan = plan_for(&set(&distressed()), Tier::Intermediate, "saude");
        let triggers: Vec<Option<ProblemTag>> =
            plan.days_30.iter().map(|a| a.trigger).collect();
        assert_eq!(
            triggers,
            vec![
                Some(ProblemTag::LiquidityCritical),
                Some(ProblemTag::MarginCritical),
                Some(ProblemTag::PaymentShort),
                Some(ProblemTag::InterestCoverageLow),
            ]
        );
        assert!(plan.days_30[0].method.contains("0,30"));
        assert_eq!(plan.days_30[1].title, "Raise gross margin from 10,0% to 15,0%");
        assert_eq!(plan.days_60[1].trigger, Some(ProblemTag::CycleLong));
        assert_eq!(
            plan.days_90[0].title,
            "Structure a capital raise or debt restructuring"
        );
        assert_eq!(
            plan.days_90[1].title,
            "Consolidate the operation before growing"
        );
    }

    #[test]
    fn test_collection_template_when_no_crisis() {
        let mut entries = healthy();
        entries.push((Indicator::Dso, v(dec!(70))));
        let plan = plan_for(&set(&entries), Tier::Intermediate, "saude");
        let first = &plan.days_30[0];
        assert_eq!(first.trigger, Some(ProblemTag::CollectionHigh));
        // general family benchmark is 35 days; the cut is capped at 15
        assert_eq!(first.title, "Cut the collection period from 70 days to 55 days");
        // ABC review applies once tier 2 figures exist
        assert_eq!(
            plan.days_60[1].title,
            "Optimise working capital with an ABC inventory review"
        );
    }

    #[test]
    fn test_operating_loss_without_margin_problem() {
        let entries = vec![
            (Indicator::Revenue, v(dec!(100000))),
            (Indicator::FixedCosts, v(dec!(60000))),
            (Indicator::GrossMargin, v(dec!(40))),
            (Indicator::OperatingResult, v(dec!(-20000))),
            (Indicator::ImmediateLiquidity, v(dec!(2))),
            (Indicator::CashRunwayDays, v(dec!(40))),
        ];
        let plan = plan_for(&set(&entries), Tier::Basic, "saude");
        assert_eq!(plan.days_30[1].trigger, Some(ProblemTag::OperatingLoss));
        assert!(plan.days_30[1].method.contains("R$ 20.000,00"));
    }

    #[test]
    fn test_capacity_slot_depends_on_tier_and_payback() {
        let mut entries = healthy();
        entries.push((Indicator::CapexPayback, v(dec!(1.25))));
        let plan = plan_for(&set(&entries), Tier::Advanced, "saude");
        assert_eq!(
            plan.days_90[2].title,
            "Assess the planned capex with a 15-month payback"
        );

        let mut entries = healthy();
        entries.push((Indicator::CapexPayback, IndicatorValue::NotApplicable));
        let plan = plan_for(&set(&entries), Tier::Advanced, "saude");
        assert_eq!(
            plan.days_90[2].title,
            "Map automation and economy-of-scale opportunities"
        );

        let mut entries = healthy();
        entries.push((Indicator::CapexPayback, v(dec!(1.5))));
        let plan = plan_for(&set(&entries), Tier::Advanced, "saude");
        assert_eq!(
            plan.days_90[2].title,
            "Map automation and economy-of-scale opportunities"
        );

        let plan = plan_for(&set(&healthy()), Tier::Basic, "saude");
        assert_eq!(plan.days_90[2].title, "Assess investment in capacity or efficiency");
        assert!(plan.days_90[3].method.contains("3 main"));
    }

    #[test]
    fn test_channel_unit_follows_family() {
        let plan = plan_for(&set(&healthy()), Tier::Basic, "comercio_veiculos");
        assert_eq!(
            plan.days_60[2].title,
            "Calculate the real margin per product and sales channel"
        );
        let plan = plan_for(&set(&healthy()), Tier::Basic, "saude");
        assert_eq!(
            plan.days_60[2].title,
            "Calculate the real margin per service and sales channel"
        );
    }
}
