use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (R$). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentages on a 0-100 scale (35.0 = 35%), as the indicators are reported.
pub type Percent = Decimal;

/// Day counts (DSO, DPO, runway, ...)
pub type Days = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    /// Assumptions logged while producing this result, in imputation order
    pub assumptions: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata.
///
/// No timing is recorded: identical inputs yield identical envelopes.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: Vec<String>,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
