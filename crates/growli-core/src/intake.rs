//! Adapter for figures pulled out of an uploaded statement (balance sheet
//! or income statement). The extractor hands over a flat map keyed by the
//! Portuguese line-item names; this module turns it into tier snapshots so
//! the normal pipeline (and its imputation) can run on it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GrowliError;
use crate::snapshot::{FinancialSnapshot, WorkingCapitalSnapshot};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::GrowliResult;

/// Below this share of recognised fields the extraction is flagged.
pub const MIN_CONFIDENCE: Decimal = dec!(0.7);

/// Number of line items the extractor searches for.
pub const EXTRACTED_FIELD_COUNT: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Flat field map produced by statement extraction. A zero means the line
/// item was not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, alias = "receita_bruta")]
    pub gross_revenue: Option<Money>,
    #[serde(default, alias = "custo_vendas")]
    pub cost_of_sales: Option<Money>,
    #[serde(default, alias = "despesas_operacionais")]
    pub operating_expenses: Option<Money>,
    #[serde(default, alias = "caixa")]
    pub cash: Option<Money>,
    #[serde(default, alias = "contas_receber")]
    pub receivables: Option<Money>,
    #[serde(default, alias = "fornecedores")]
    pub suppliers: Option<Money>,
    #[serde(default, alias = "estoque")]
    pub inventory: Option<Money>,
    #[serde(default, alias = "emprestimos_cp")]
    pub short_term_loans: Option<Money>,
    #[serde(default, alias = "emprestimos_lp")]
    pub long_term_loans: Option<Money>,
    #[serde(default, alias = "despesas_financeiras")]
    pub financial_expenses: Option<Money>,
    #[serde(default, alias = "impostos")]
    pub taxes: Option<Money>,
    #[serde(default, alias = "imobilizado")]
    pub fixed_assets: Option<Money>,
    /// Share of line items found, 0 to 1. Derived from the fields when
    /// absent.
    #[serde(default)]
    pub confidence_score: Option<Decimal>,
}

/// Snapshots recovered from a statement. Tier 3 needs a revenue series
/// that statements do not carry, so only fixed assets are passed along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSnapshots {
    pub basic: FinancialSnapshot,
    /// Present only when at least one tier 2 line item was found
    pub working_capital: Option<WorkingCapitalSnapshot>,
    pub fixed_assets: Option<Money>,
    pub fields_found: u32,
    pub confidence: Decimal,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Zero, negative or absent all mean "not found".
fn found(value: Option<Money>) -> Option<Money> {
    value.filter(|v| *v > Decimal::ZERO)
}

impl ExtractedFields {
    fn all(&self) -> [Option<Money>; EXTRACTED_FIELD_COUNT as usize] {
        [
            self.gross_revenue,
            self.cost_of_sales,
            self.operating_expenses,
            self.cash,
            self.receivables,
            self.suppliers,
            self.inventory,
            self.short_term_loans,
            self.long_term_loans,
            self.financial_expenses,
            self.taxes,
            self.fixed_assets,
        ]
    }

    pub fn fields_found(&self) -> u32 {
        self.all().into_iter().filter(|v| found(*v).is_some()).count() as u32
    }

    /// Reported confidence, or the share of fields found.
    pub fn confidence(&self) -> Decimal {
        self.confidence_score.unwrap_or_else(|| {
            Decimal::from(self.fields_found()) / Decimal::from(EXTRACTED_FIELD_COUNT)
        })
    }

    fn total_debt(&self) -> Option<Money> {
        match (found(self.short_term_loans), found(self.long_term_loans)) {
            (None, None) => None,
            (short, long) => Some(short.unwrap_or_default() + long.unwrap_or_default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Map an extraction result onto tier snapshots.
///
/// Revenue is mandatory. Every other line item that was not found becomes
/// `None` so that tier imputation fills it and logs the assumption.
pub fn snapshots_from_extraction(
    fields: &ExtractedFields,
) -> GrowliResult<ComputationOutput<ExtractedSnapshots>> {
    let revenue = found(fields.gross_revenue).ok_or_else(|| {
        GrowliError::InsufficientData(
            "gross revenue (receita_bruta) was not found in the document".into(),
        )
    })?;

    let confidence = fields.confidence();
    if confidence < Decimal::ZERO || confidence > Decimal::ONE {
        return Err(GrowliError::InvalidInput {
            field: "confidence_score".into(),
            reason: format!("must be between 0 and 1, got {confidence}"),
        });
    }

    let mut assumptions = Vec::new();
    let mut warnings = Vec::new();
    if confidence < MIN_CONFIDENCE {
        warnings.push(format!(
            "Low extraction confidence ({}%) - review the figures before relying on them",
            (confidence * dec!(100)).round()
        ));
    }

    let fixed_costs = found(fields.operating_expenses).unwrap_or_else(|| {
        assumptions.push("Operating expenses not found - fixed costs assumed R$ 0".to_string());
        Decimal::ZERO
    });
    if found(fields.cash).is_none() {
        assumptions.push("Cash not found - assumed R$ 0".to_string());
    }

    let basic = FinancialSnapshot {
        revenue,
        cost_of_goods: found(fields.cost_of_sales),
        fixed_costs,
        cash: found(fields.cash).unwrap_or_default(),
        bank_balance: Decimal::ZERO,
        receivables_30d: found(fields.receivables),
        payables_30d: found(fields.suppliers),
    };

    let inventory = found(fields.inventory);
    let total_debt = fields.total_debt();
    let financial_expenses = found(fields.financial_expenses);
    let tax_expense = found(fields.taxes);
    let has_tier2 = inventory.is_some()
        || total_debt.is_some()
        || financial_expenses.is_some()
        || tax_expense.is_some();
    let working_capital = has_tier2.then(|| WorkingCapitalSnapshot {
        collection_days: None,
        payment_days: None,
        inventory,
        total_debt: total_debt.unwrap_or_default(),
        financial_expenses,
        tax_expense,
        headcount: None,
    });

    let fields_found = fields.fields_found();
    for w in &warnings {
        warn!(warning = %w, "extraction warning");
    }
    debug!(fields_found, %confidence, has_tier2, "statement extraction mapped");

    Ok(with_metadata(
        "Statement extraction mapped to tier snapshots; missing line items left for imputation",
        assumptions,
        warnings,
        ExtractedSnapshots {
            basic,
            working_capital,
            fixed_assets: found(fields.fixed_assets),
            fields_found,
            confidence,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_revenue_is_insufficient_data() {
        let fields = ExtractedFields {
            gross_revenue: Some(Decimal::ZERO),
            cash: Some(dec!(1000)),
            ..Default::default()
        };
        assert!(matches!(
            snapshots_from_extraction(&fields),
            Err(GrowliError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_zero_fields_become_none() {
        let json = r#"{
            "receita_bruta": 120000,
            "custo_vendas": 0,
            "despesas_operacionais": 30000,
            "caixa": 15000,
            "contas_receber": 40000,
            "fornecedores": 0,
            "estoque": 0,
            "emprestimos_cp": 0,
            "emprestimos_lp": 0,
            "despesas_financeiras": 0,
            "impostos": 0,
            "imobilizado": 0,
            "confidence_score": 0.42
        }"#;
        let fields: ExtractedFields = serde_json::from_str(json).unwrap();
        let out = snapshots_from_extraction(&fields).unwrap();
        let snapshots = out.result;
        assert_eq!(snapshots.basic.revenue, dec!(120000));
        assert_eq!(snapshots.basic.cost_of_goods, None);
        assert_eq!(snapshots.basic.payables_30d, None);
        assert_eq!(snapshots.basic.receivables_30d, Some(dec!(40000)));
        assert!(snapshots.working_capital.is_none());
        assert_eq!(snapshots.fields_found, 4);
        assert_eq!(
            out.warnings,
            vec!["Low extraction confidence (42%) - review the figures before relying on them"
                .to_string()]
        );
    }

    #[test]
    fn test_confidence_derived_from_fields() {
        let fields = ExtractedFields {
            gross_revenue: Some(dec!(90000)),
            cost_of_sales: Some(dec!(50000)),
            operating_expenses: Some(dec!(20000)),
            cash: Some(dec!(8000)),
            receivables: Some(dec!(15000)),
            suppliers: Some(dec!(12000)),
            inventory: Some(dec!(25000)),
            short_term_loans: Some(dec!(10000)),
            long_term_loans: Some(dec!(30000)),
            financial_expenses: None,
            taxes: None,
            fixed_assets: None,
            confidence_score: None,
        };
        let out = snapshots_from_extraction(&fields).unwrap();
        assert_eq!(out.result.confidence, dec!(0.75));
        assert!(out.warnings.is_empty());
        let wc = out.result.working_capital.unwrap();
        assert_eq!(wc.total_debt, dec!(40000));
        assert_eq!(wc.inventory, Some(dec!(25000)));
        assert_eq!(wc.collection_days, None);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let fields = ExtractedFields {
            gross_revenue: Some(dec!(1000)),
            confidence_score: Some(dec!(1.5)),
            ..Default::default()
        };
        assert!(matches!(
            snapshots_from_extraction(&fields),
            Err(GrowliError::InvalidInput { .. })
        ));
    }
}
