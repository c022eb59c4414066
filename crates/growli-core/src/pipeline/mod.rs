//! Tier sequencing: validate, impute, compute, present. Each tier consumes
//! the previous tier's outcome and produces a new one.

pub mod analysis;
pub mod tiers;
pub mod view;

pub use analysis::{analyze, AnalysisRequest, AnalysisResult};
pub use tiers::{run_tier1, run_tier2, run_tier3, AnalysisMeta, TierOutcome};
pub use view::{Chart, DisplayFormat, Kpi, Series, TableView, TierView};
