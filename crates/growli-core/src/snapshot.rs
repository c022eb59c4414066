use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::GrowliError;
use crate::types::{Days, Money, Percent};
use crate::GrowliResult;

// ---------------------------------------------------------------------------
// Disclosure tier
// ---------------------------------------------------------------------------

/// Progressive disclosure level. Serialized as its number (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Basic = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl Tier {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The tier after this one, if any.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Basic => Some(Tier::Intermediate),
            Tier::Intermediate => Some(Tier::Advanced),
            Tier::Advanced => None,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = GrowliError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Basic),
            2 => Ok(Tier::Intermediate),
            3 => Ok(Tier::Advanced),
            other => Err(GrowliError::InvalidInput {
                field: "tier".into(),
                reason: format!("expected 1, 2 or 3, got {other}"),
            }),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Basic => "basic",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
        };
        write!(f, "tier {} ({name})", self.number())
    }
}

// ---------------------------------------------------------------------------
// Tier input snapshots
// ---------------------------------------------------------------------------

/// Tier 1 (basic) figures for one reference month. Required for every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Gross monthly revenue
    #[serde(alias = "receita_bruta_mensal")]
    pub revenue: Money,
    /// Cost of goods sold / services rendered. Imputed when absent.
    #[serde(default, alias = "custo_vendas_mensal")]
    pub cost_of_goods: Option<Money>,
    /// Monthly fixed costs (rent, payroll, ...)
    #[serde(alias = "despesas_fixas_mensais")]
    pub fixed_costs: Money,
    /// Cash on hand
    #[serde(default, alias = "caixa")]
    pub cash: Money,
    /// Checking account balance
    #[serde(default, alias = "conta_corrente")]
    pub bank_balance: Money,
    #[serde(default, alias = "contas_a_receber_30d")]
    pub receivables_30d: Option<Money>,
    #[serde(default, alias = "contas_a_pagar_30d")]
    pub payables_30d: Option<Money>,
}

/// Tier 2 (intermediate) working-capital and debt figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingCapitalSnapshot {
    /// Average collection period (DSO)
    #[serde(default, alias = "prazo_medio_recebimento_dias")]
    pub collection_days: Option<Days>,
    /// Average payment period (DPO)
    #[serde(default, alias = "prazo_medio_pagamento_dias")]
    pub payment_days: Option<Days>,
    /// Inventory at cost
    #[serde(default, alias = "estoque_custo")]
    pub inventory: Option<Money>,
    #[serde(alias = "dividas_totais")]
    pub total_debt: Money,
    /// Monthly interest and bank charges
    #[serde(default, alias = "despesas_financeiras_mensais")]
    pub financial_expenses: Option<Money>,
    /// Monthly taxes paid
    #[serde(default, alias = "impostos_mensais")]
    pub tax_expense: Option<Money>,
    #[serde(default, alias = "numero_funcionarios")]
    pub headcount: Option<u32>,
}

/// Tier 3 (advanced) history, plans and targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicSnapshot {
    /// Revenue of the last three months, oldest first. Exactly 3 values.
    #[serde(alias = "receita_ultimos_3_meses")]
    pub revenue_last_3_months: Vec<Money>,
    #[serde(default, alias = "aliquota_impostos_percentual")]
    pub tax_rate_pct: Option<Percent>,
    /// Variable expenses as % of revenue
    #[serde(default, alias = "despesas_variaveis_percentual_receita")]
    pub variable_cost_pct: Option<Percent>,
    /// Capital expenditure planned for the next 6 months
    #[serde(default, alias = "capex_planejado_prox_6m")]
    pub capex_planned: Option<Money>,
    #[serde(default, alias = "imobilizado")]
    pub fixed_assets: Option<Money>,
    /// Shareholders' equity. May be negative.
    #[serde(default, alias = "patrimonio_liquido")]
    pub equity: Option<Money>,
    #[serde(alias = "meta_margem_bruta_percentual")]
    pub target_gross_margin_pct: Percent,
    #[serde(default, alias = "meta_prazo_recebimento_dias")]
    pub target_collection_days: Option<Days>,
}

// ---------------------------------------------------------------------------
// Structural checks
// ---------------------------------------------------------------------------

/// Largest money amount accepted (R$ 1 quadrillion). Keeps every ratio and
/// annualisation well inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Smallest non-zero money amount accepted.
pub const MIN_AMOUNT: Money = dec!(0.01);

/// Longest collection or payment period accepted (ten years).
pub const MAX_DAYS: Days = dec!(3650);

fn non_negative(field: &str, value: Decimal) -> GrowliResult<()> {
    if value < Decimal::ZERO {
        return Err(GrowliError::InvalidInput {
            field: field.into(),
            reason: "must be non-negative".into(),
        });
    }
    Ok(())
}

/// Zero, or between one cent and [`MAX_AMOUNT`] in absolute value.
fn bounded_amount(field: &str, value: Money) -> GrowliResult<()> {
    let magnitude = value.abs();
    if magnitude > MAX_AMOUNT {
        return Err(GrowliError::InvalidInput {
            field: field.into(),
            reason: format!("must not exceed {MAX_AMOUNT}"),
        });
    }
    if !magnitude.is_zero() && magnitude < MIN_AMOUNT {
        return Err(GrowliError::InvalidInput {
            field: field.into(),
            reason: "must be zero or at least one cent".into(),
        });
    }
    Ok(())
}

fn amount(field: &str, value: Money) -> GrowliResult<()> {
    non_negative(field, value)?;
    bounded_amount(field, value)
}

fn amount_opt(field: &str, value: Option<Money>) -> GrowliResult<()> {
    value.map_or(Ok(()), |v| amount(field, v))
}

fn days_opt(field: &str, value: Option<Days>) -> GrowliResult<()> {
    match value {
        Some(v) if v > MAX_DAYS => Err(GrowliError::InvalidInput {
            field: field.into(),
            reason: format!("must not exceed {MAX_DAYS} days"),
        }),
        Some(v) => non_negative(field, v),
        None => Ok(()),
    }
}

fn percentage_opt(field: &str, value: Option<Decimal>) -> GrowliResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO || v > Decimal::ONE_HUNDRED => {
            Err(GrowliError::InvalidInput {
                field: field.into(),
                reason: "must be between 0 and 100".into(),
            })
        }
        _ => Ok(()),
    }
}

impl FinancialSnapshot {
    /// Reject figures that upstream validation should already have refused.
    pub fn validate(&self) -> GrowliResult<()> {
        amount("revenue", self.revenue)?;
        amount_opt("cost_of_goods", self.cost_of_goods)?;
        amount("fixed_costs", self.fixed_costs)?;
        amount("cash", self.cash)?;
        amount("bank_balance", self.bank_balance)?;
        amount_opt("receivables_30d", self.receivables_30d)?;
        amount_opt("payables_30d", self.payables_30d)?;
        Ok(())
    }
}

impl WorkingCapitalSnapshot {
    pub fn validate(&self) -> GrowliResult<()> {
        days_opt("collection_days", self.collection_days)?;
        days_opt("payment_days", self.payment_days)?;
        amount_opt("inventory", self.inventory)?;
        amount("total_debt", self.total_debt)?;
        amount_opt("financial_expenses", self.financial_expenses)?;
        amount_opt("tax_expense", self.tax_expense)?;
        Ok(())
    }
}

impl StrategicSnapshot {
    pub fn validate(&self) -> GrowliResult<()> {
        if self.revenue_last_3_months.len() != 3 {
            return Err(GrowliError::InvalidInput {
                field: "revenue_last_3_months".into(),
                reason: format!(
                    "expected exactly 3 monthly values, got {}",
                    self.revenue_last_3_months.len()
                ),
            });
        }
        for value in &self.revenue_last_3_months {
            amount("revenue_last_3_months", *value)?;
        }
        percentage_opt("tax_rate_pct", self.tax_rate_pct)?;
        percentage_opt("variable_cost_pct", self.variable_cost_pct)?;
        percentage_opt("target_gross_margin_pct", Some(self.target_gross_margin_pct))?;
        amount_opt("capex_planned", self.capex_planned)?;
        amount_opt("fixed_assets", self.fixed_assets)?;
        if let Some(equity) = self.equity {
            bounded_amount("equity", equity)?;
        }
        days_opt("target_collection_days", self.target_collection_days)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategic(series: Vec<Decimal>) -> StrategicSnapshot {
        StrategicSnapshot {
            revenue_last_3_months: series,
            tax_rate_pct: None,
            variable_cost_pct: None,
            capex_planned: None,
            fixed_assets: None,
            equity: Some(dec!(-5000)),
            target_gross_margin_pct: dec!(40),
            target_collection_days: None,
        }
    }

    #[test]
    fn test_tier_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Tier::Intermediate).unwrap(), "2");
        let tier: Tier = serde_json::from_str("3").unwrap();
        assert_eq!(tier, Tier::Advanced);
        assert!(serde_json::from_str::<Tier>("4").is_err());
        assert_eq!(Tier::Basic.next(), Some(Tier::Intermediate));
        assert_eq!(Tier::Advanced.next(), None);
    }

    #[test]
    fn test_portuguese_aliases_deserialize() {
        let json = r#"{
            "receita_bruta_mensal": "100000",
            "custo_vendas_mensal": "65000",
            "despesas_fixas_mensais": "25000",
            "caixa": "10000",
            "conta_corrente": "40000"
        }"#;
        let snap: FinancialSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.revenue, dec!(100000));
        assert_eq!(snap.cost_of_goods, Some(dec!(65000)));
        assert_eq!(snap.bank_balance, dec!(40000));
        assert_eq!(snap.receivables_30d, None);
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let snap = FinancialSnapshot {
            revenue: dec!(-1),
            cost_of_goods: None,
            fixed_costs: dec!(0),
            cash: dec!(0),
            bank_balance: dec!(0),
            receivables_30d: None,
            payables_30d: None,
        };
        match snap.validate().unwrap_err() {
            GrowliError::InvalidInput { field, .. } => assert_eq!(field, "revenue"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_revenue_series_must_have_three_values() {
        let err = strategic(vec![dec!(1), dec!(2)]).validate().unwrap_err();
        assert!(err.to_string().contains("got 2"));
        assert!(strategic(vec![dec!(1), dec!(2), dec!(3)]).validate().is_ok());
    }

    #[test]
    fn test_negative_equity_is_allowed() {
        assert!(strategic(vec![dec!(0), dec!(0), dec!(0)]).validate().is_ok());
    }

    #[test]
    fn test_amounts_beyond_decimal_headroom_rejected() {
        let snap = FinancialSnapshot {
            revenue: Decimal::MAX,
            cost_of_goods: None,
            fixed_costs: dec!(1),
            cash: Decimal::MAX,
            bank_balance: dec!(0),
            receivables_30d: None,
            payables_30d: None,
        };
        match snap.validate().unwrap_err() {
            GrowliError::InvalidInput { field, .. } => assert_eq!(field, "revenue"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let at_limit = FinancialSnapshot {
            revenue: MAX_AMOUNT,
            cash: MAX_AMOUNT,
            ..snap
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_sub_cent_amounts_rejected() {
        let snap = FinancialSnapshot {
            revenue: dec!(0.001),
            cost_of_goods: Some(dec!(1000)),
            fixed_costs: dec!(0),
            cash: dec!(0),
            bank_balance: dec!(0),
            receivables_30d: None,
            payables_30d: None,
        };
        assert!(snap.validate().unwrap_err().to_string().contains("one cent"));
    }

    #[test]
    fn test_period_and_equity_bounds() {
        let wc = WorkingCapitalSnapshot {
            collection_days: Some(dec!(3651)),
            payment_days: None,
            inventory: None,
            total_debt: dec!(0),
            financial_expenses: None,
            tax_expense: None,
            headcount: None,
        };
        assert!(wc.validate().is_err());

        let mut snap = strategic(vec![dec!(1), dec!(2), dec!(3)]);
        snap.equity = Some(-Decimal::MAX);
        assert!(snap.validate().is_err());
    }
}
