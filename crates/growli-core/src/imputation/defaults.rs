use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::log::AssumptionLog;
use crate::benchmarks::BenchmarkTable;
use crate::snapshot::{FinancialSnapshot, StrategicSnapshot, WorkingCapitalSnapshot};
use crate::types::{Days, Money, Percent, Rate};

/// Cost of goods assumed when undisclosed, as a share of revenue.
pub const DEFAULT_COGS_RATIO: Rate = dec!(0.65);
/// Average Simples Nacional effective rate.
pub const DEFAULT_TAX_RATE_PCT: Percent = dec!(10);
pub const DEFAULT_VARIABLE_COST_PCT: Percent = dec!(5);
pub const DEFAULT_TARGET_DSO: Days = dec!(15);

// ---------------------------------------------------------------------------
// Completed inputs
// ---------------------------------------------------------------------------

/// Tier 1 figures with every optional field resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedBasic {
    pub revenue: Money,
    pub cost_of_goods: Money,
    pub fixed_costs: Money,
    pub cash: Money,
    pub bank_balance: Money,
    pub receivables_30d: Money,
    pub payables_30d: Money,
}

impl CompletedBasic {
    /// Cash plus checking account balance.
    pub fn disponibilities(&self) -> Money {
        self.cash + self.bank_balance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkingCapital {
    pub collection_days: Days,
    pub payment_days: Days,
    pub inventory: Money,
    pub total_debt: Money,
    pub financial_expenses: Money,
    pub tax_expense: Money,
    /// Zero when undisclosed
    pub headcount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedStrategic {
    pub revenue_last_3_months: Vec<Money>,
    pub tax_rate_pct: Percent,
    pub variable_cost_pct: Percent,
    pub capex_planned: Money,
    pub fixed_assets: Money,
    pub equity: Money,
    pub target_gross_margin_pct: Percent,
    pub target_collection_days: Days,
}

// ---------------------------------------------------------------------------
// Imputation
// ---------------------------------------------------------------------------

/// A tier snapshot whose gaps can be filled with defaults.
///
/// Imputation never fails. It does not validate either: negative values and
/// malformed series are rejected before this stage runs.
pub trait Imputable {
    type Completed;

    fn impute(&self, sector: &str, table: &BenchmarkTable) -> (Self::Completed, AssumptionLog);
}

impl Imputable for FinancialSnapshot {
    type Completed = CompletedBasic;

    fn impute(&self, _sector: &str, _table: &BenchmarkTable) -> (CompletedBasic, AssumptionLog) {
        let mut log = AssumptionLog::new();

        let cost_of_goods = self.cost_of_goods.unwrap_or_else(|| {
            log.record("Cost of goods sold estimated at 65% of revenue (initial default)");
            self.revenue * DEFAULT_COGS_RATIO
        });
        let receivables_30d = self.receivables_30d.unwrap_or_else(|| {
            log.record("Receivables due in 30 days not provided - assumed R$ 0");
            Decimal::ZERO
        });
        let payables_30d = self.payables_30d.unwrap_or_else(|| {
            log.record("Payables due in 30 days not provided - assumed R$ 0");
            Decimal::ZERO
        });

        let completed = CompletedBasic {
            revenue: self.revenue,
            cost_of_goods,
            fixed_costs: self.fixed_costs,
            cash: self.cash,
            bank_balance: self.bank_balance,
            receivables_30d,
            payables_30d,
        };
        (completed, log)
    }
}

impl Imputable for WorkingCapitalSnapshot {
    type Completed = CompletedWorkingCapital;

    fn impute(&self, sector: &str, table: &BenchmarkTable) -> (CompletedWorkingCapital, AssumptionLog) {
        let mut log = AssumptionLog::new();
        let (dso_default, dpo_default) = table.prazo_defaults(sector);

        let collection_days = self.collection_days.unwrap_or_else(|| {
            log.record(format!(
                "DSO estimated at {} days (sector default)",
                dso_default.normalize()
            ));
            dso_default
        });
        let payment_days = self.payment_days.unwrap_or_else(|| {
            log.record(format!(
                "DPO estimated at {} days (sector default)",
                dpo_default.normalize()
            ));
            dpo_default
        });
        let inventory = self.inventory.unwrap_or_else(|| {
            log.record("Inventory not provided - assumed R$ 0");
            Decimal::ZERO
        });

        // Financial expenses, taxes and headcount default silently.
        let completed = CompletedWorkingCapital {
            collection_days,
            payment_days,
            inventory,
            total_debt: self.total_debt,
            financial_expenses: self.financial_expenses.unwrap_or(Decimal::ZERO),
            tax_expense: self.tax_expense.unwrap_or(Decimal::ZERO),
            headcount: self.headcount.unwrap_or(0),
        };
        (completed, log)
    }
}

impl Imputable for StrategicSnapshot {
    type Completed = CompletedStrategic;

    fn impute(&self, _sector: &str, _table: &BenchmarkTable) -> (CompletedStrategic, AssumptionLog) {
        let mut log = AssumptionLog::new();

        let tax_rate_pct = self.tax_rate_pct.unwrap_or_else(|| {
            log.record("Tax rate estimated at 10% (Simples Nacional average)");
            DEFAULT_TAX_RATE_PCT
        });
        let variable_cost_pct = self.variable_cost_pct.unwrap_or_else(|| {
            log.record("Variable expenses estimated at 5% of revenue");
            DEFAULT_VARIABLE_COST_PCT
        });
        // Capex, fixed assets and equity default silently.
        let capex_planned = self.capex_planned.unwrap_or(Decimal::ZERO);
        let fixed_assets = self.fixed_assets.unwrap_or(Decimal::ZERO);
        let equity = self.equity.unwrap_or(Decimal::ZERO);
        let target_collection_days = self.target_collection_days.unwrap_or_else(|| {
            log.record("Target DSO set to 15 days");
            DEFAULT_TARGET_DSO
        });

        let completed = CompletedStrategic {
            revenue_last_3_months: self.revenue_last_3_months.clone(),
            tax_rate_pct,
            variable_cost_pct,
            capex_planned,
            fixed_assets,
            equity,
            target_gross_margin_pct: self.target_gross_margin_pct,
            target_collection_days,
        };
        (completed, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BenchmarkTable {
        BenchmarkTable::standard()
    }

    fn bare_basic() -> FinancialSnapshot {
        FinancialSnapshot {
            revenue: dec!(100000),
            cost_of_goods: None,
            fixed_costs: dec!(25000),
            cash: dec!(10000),
            bank_balance: dec!(40000),
            receivables_30d: None,
            payables_30d: None,
        }
    }

    fn bare_working_capital() -> WorkingCapitalSnapshot {
        WorkingCapitalSnapshot {
            collection_days: None,
            payment_days: None,
            inventory: None,
            total_debt: dec!(50000),
            financial_expenses: None,
            tax_expense: None,
            headcount: None,
        }
    }

    fn bare_strategic() -> StrategicSnapshot {
        StrategicSnapshot {
            revenue_last_3_months: vec![dec!(90000), dec!(95000), dec!(100000)],
            tax_rate_pct: None,
            variable_cost_pct: None,
            capex_planned: None,
            fixed_assets: None,
            equity: None,
            target_gross_margin_pct: dec!(40),
            target_collection_days: None,
        }
    }

    #[test]
    fn test_basic_imputes_cogs_at_65_percent() {
        let (completed, log) = bare_basic().impute("saude", &table());
        assert_eq!(completed.cost_of_goods, dec!(65000));
        assert_eq!(completed.receivables_30d, Decimal::ZERO);
        assert_eq!(completed.payables_30d, Decimal::ZERO);
        assert_eq!(completed.disponibilities(), dec!(50000));
        assert_eq!(
            log.entries(),
            &[
                "Cost of goods sold estimated at 65% of revenue (initial default)",
                "Receivables due in 30 days not provided - assumed R$ 0",
                "Payables due in 30 days not provided - assumed R$ 0",
            ]
        );
    }

    #[test]
    fn test_basic_supplied_fields_log_nothing() {
        let mut snap = bare_basic();
        snap.cost_of_goods = Some(dec!(50000));
        snap.receivables_30d = Some(dec!(0));
        snap.payables_30d = Some(dec!(12000));
        let (completed, log) = snap.impute("saude", &table());
        assert!(log.is_empty());
        assert_eq!(completed.cost_of_goods, dec!(50000));
        assert_eq!(completed.payables_30d, dec!(12000));
    }

    #[test]
    fn test_working_capital_uses_sector_prazos() {
        let (completed, log) = bare_working_capital().impute("construcao", &table());
        assert_eq!(completed.collection_days, dec!(60));
        assert_eq!(completed.payment_days, dec!(45));
        assert_eq!(
            log.entries(),
            &[
                "DSO estimated at 60 days (sector default)",
                "DPO estimated at 45 days (sector default)",
                "Inventory not provided - assumed R$ 0",
            ]
        );
    }

    #[test]
    fn test_working_capital_unknown_sector_falls_back_to_30_30() {
        let (completed, _) = bare_working_capital().impute("desconhecido", &table());
        assert_eq!(completed.collection_days, dec!(30));
        assert_eq!(completed.payment_days, dec!(30));
    }

    /// Known quirk: financial expenses and taxes are defaulted to zero
    /// without an assumption note, unlike inventory.
    #[test]
    fn test_working_capital_silent_zero_defaults() {
        let mut snap = bare_working_capital();
        snap.collection_days = Some(dec!(20));
        snap.payment_days = Some(dec!(25));
        snap.inventory = Some(dec!(1000));
        let (completed, log) = snap.impute("saude", &table());
        assert!(log.is_empty());
        assert_eq!(completed.financial_expenses, Decimal::ZERO);
        assert_eq!(completed.tax_expense, Decimal::ZERO);
        assert_eq!(completed.headcount, 0);
    }

    /// Known quirk: tax rate, variable cost and target DSO are logged while
    /// capex, fixed assets and equity are defaulted silently.
    #[test]
    fn test_strategic_logged_and_silent_defaults() {
        let (completed, log) = bare_strategic().impute("saude", &table());
        assert_eq!(completed.tax_rate_pct, dec!(10));
        assert_eq!(completed.variable_cost_pct, dec!(5));
        assert_eq!(completed.target_collection_days, dec!(15));
        assert_eq!(completed.capex_planned, Decimal::ZERO);
        assert_eq!(completed.fixed_assets, Decimal::ZERO);
        assert_eq!(completed.equity, Decimal::ZERO);
        assert_eq!(
            log.entries(),
            &[
                "Tax rate estimated at 10% (Simples Nacional average)",
                "Variable expenses estimated at 5% of revenue",
                "Target DSO set to 15 days",
            ]
        );
    }

    #[test]
    fn test_imputation_is_idempotent() {
        let snap = bare_basic();
        let first = snap.impute("saude", &table());
        let second = snap.impute("saude", &table());
        assert_eq!(first, second);
    }
}
