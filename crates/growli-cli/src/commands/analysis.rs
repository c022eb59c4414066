use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use growli_core::benchmarks::BenchmarkTable;
use growli_core::pipeline::{self, AnalysisMeta, AnalysisRequest};
use growli_core::projection::{project, ProjectionBaseline};
use growli_core::snapshot::{FinancialSnapshot, Tier};

use crate::input;

/// Arguments for commands that only take a JSON request
#[derive(Args)]
pub struct InputArgs {
    /// Path to JSON input file (otherwise read from stdin)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a tier 1 run
#[derive(Args)]
pub struct Tier1Args {
    /// Path to JSON input file with meta and tier 1 fields (overrides flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Sector code (e.g. comercio_veiculos, saude)
    #[arg(long)]
    pub sector: Option<String>,

    /// Reference month (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Reference year
    #[arg(long)]
    pub year: Option<i32>,

    /// Gross monthly revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Monthly cost of goods sold (estimated when omitted)
    #[arg(long, alias = "cogs")]
    pub cost_of_goods: Option<Decimal>,

    /// Monthly fixed costs
    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    /// Cash on hand
    #[arg(long, default_value = "0")]
    pub cash: Decimal,

    /// Checking account balance
    #[arg(long, default_value = "0")]
    pub bank_balance: Decimal,

    /// Receivables due in the next 30 days
    #[arg(long)]
    pub receivables: Option<Decimal>,

    /// Payables due in the next 30 days
    #[arg(long)]
    pub payables: Option<Decimal>,
}

#[derive(serde::Deserialize)]
struct Tier1Request {
    #[serde(flatten)]
    meta: AnalysisMeta,
    #[serde(alias = "nivel1")]
    tier1: FinancialSnapshot,
}

pub fn run_tier1(args: Tier1Args, table: &BenchmarkTable) -> Result<Value, Box<dyn std::error::Error>> {
    let (meta, snapshot) = if args.input.is_some() || args.revenue.is_none() {
        let request: Tier1Request = input::read_request(args.input.as_deref(), "tier 1")?;
        (request.meta, request.tier1)
    } else {
        let meta = AnalysisMeta {
            company: None,
            sector: args.sector.ok_or("--sector is required (or provide --input)")?,
            state: None,
            reference_month: args.month.ok_or("--month is required (or provide --input)")?,
            reference_year: args.year.ok_or("--year is required (or provide --input)")?,
            max_tier: Tier::Basic,
        };
        let snapshot = FinancialSnapshot {
            revenue: args.revenue.ok_or("--revenue is required (or provide --input)")?,
            cost_of_goods: args.cost_of_goods,
            fixed_costs: args
                .fixed_costs
                .ok_or("--fixed-costs is required (or provide --input)")?,
            cash: args.cash,
            bank_balance: args.bank_balance,
            receivables_30d: args.receivables,
            payables_30d: args.payables,
        };
        (meta, snapshot)
    };

    let result = pipeline::run_tier1(&meta, &snapshot, table)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analyze(args: InputArgs, table: &BenchmarkTable) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AnalysisRequest = input::read_request(args.input.as_deref(), "analysis")?;
    let result = pipeline::analyze(&request, table)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_diagnose(args: InputArgs, table: &BenchmarkTable) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AnalysisRequest = input::read_request(args.input.as_deref(), "diagnosis")?;
    let output = pipeline::analyze(&request, table)?;
    Ok(serde_json::json!({
        "result": output.result.diagnostic,
        "assumptions": output.assumptions,
        "warnings": output.warnings,
        "methodology": "Score, findings, gap ranking, opportunities and 30/60/90-day action plan",
    }))
}

pub fn run_project(args: InputArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let baseline: ProjectionBaseline = input::read_request(args.input.as_deref(), "projection")?;
    Ok(serde_json::json!({ "result": project(&baseline) }))
}
