use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use growli_core::benchmarks::BenchmarkTable;
use growli_core::intake::{snapshots_from_extraction, ExtractedFields};
use growli_core::pipeline::{self, AnalysisMeta, AnalysisRequest, TierOutcome};
use growli_core::projection::{project, ProjectionBaseline};
use growli_core::snapshot::{FinancialSnapshot, StrategicSnapshot, WorkingCapitalSnapshot};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn table() -> &'static BenchmarkTable {
    static TABLE: OnceLock<BenchmarkTable> = OnceLock::new();
    TABLE.get_or_init(BenchmarkTable::standard)
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Tier1Input {
    #[serde(flatten)]
    meta: AnalysisMeta,
    #[serde(alias = "nivel1")]
    tier1: FinancialSnapshot,
}

/// Tier 2 and 3 calls carry the previous tier's outcome alongside the new
/// snapshot, so the front-end can hold state between form steps.
#[derive(Deserialize)]
struct NextTierInput<S> {
    prior: TierOutcome,
    snapshot: S,
}

#[napi]
pub fn run_tier1(input_json: String) -> NapiResult<String> {
    let input: Tier1Input = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        pipeline::run_tier1(&input.meta, &input.tier1, table()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_tier2(input_json: String) -> NapiResult<String> {
    let input: NextTierInput<WorkingCapitalSnapshot> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        pipeline::run_tier2(&input.prior, &input.snapshot, table()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_tier3(input_json: String) -> NapiResult<String> {
    let input: NextTierInput<StrategicSnapshot> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        pipeline::run_tier3(&input.prior, &input.snapshot, table()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_analysis(input_json: String) -> NapiResult<String> {
    let request: AnalysisRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pipeline::analyze(&request, table()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Diagnostic report for a tier outcome returned by an earlier call.
#[napi]
pub fn diagnose_outcome(outcome_json: String) -> NapiResult<String> {
    let outcome: TierOutcome = serde_json::from_str(&outcome_json).map_err(to_napi_error)?;
    serde_json::to_string(&outcome.diagnose(table())).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection, benchmarks, intake
// ---------------------------------------------------------------------------

#[napi]
pub fn project_scenarios(baseline_json: String) -> NapiResult<String> {
    let baseline: ProjectionBaseline =
        serde_json::from_str(&baseline_json).map_err(to_napi_error)?;
    serde_json::to_string(&project(&baseline)).map_err(to_napi_error)
}

/// One sector's benchmarks, or every sector when `sector` is omitted.
#[napi]
pub fn sector_benchmarks(sector: Option<String>) -> NapiResult<String> {
    match sector {
        Some(code) => serde_json::to_string(table().benchmarks(&code)),
        None => serde_json::to_string(&table().sectors().collect::<Vec<_>>()),
    }
    .map_err(to_napi_error)
}

#[napi]
pub fn extract_snapshot(fields_json: String) -> NapiResult<String> {
    let fields: ExtractedFields = serde_json::from_str(&fields_json).map_err(to_napi_error)?;
    let output = snapshots_from_extraction(&fields).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
