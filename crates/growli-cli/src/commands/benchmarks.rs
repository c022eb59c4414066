use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use growli_core::benchmarks::BenchmarkTable;
use growli_core::indicators::working_capital::{
    dpo_extension_impact, dso_reduction_impact, DEFAULT_BAD_DEBT_RATE,
};

/// Collection-period reduction simulated when `--days` is omitted.
const DEFAULT_DSO_REDUCTION_DAYS: Decimal = dec!(10);
/// Payment-period extension simulated when `--days` is omitted.
const DEFAULT_DPO_EXTENSION_DAYS: Decimal = dec!(7);

/// Arguments for the benchmark lookup
#[derive(Args)]
pub struct BenchmarksArgs {
    /// Sector code; lists every sector when omitted
    #[arg(long)]
    pub sector: Option<String>,
}

/// Arguments for the collection-period simulation
#[derive(Args)]
pub struct SimulateDsoArgs {
    /// Gross monthly revenue
    #[arg(long)]
    pub revenue: Decimal,

    /// Days by which the collection period is shortened [default: 10]
    #[arg(long)]
    pub days: Option<Decimal>,

    /// Share of accelerated receivables lost to default (0-1)
    #[arg(long)]
    pub bad_debt_rate: Option<Decimal>,
}

/// Arguments for the payment-period simulation
#[derive(Args)]
pub struct SimulateDpoArgs {
    /// Monthly cost of goods sold
    #[arg(long, alias = "cogs")]
    pub cost_of_goods: Decimal,

    /// Days by which supplier payment is extended [default: 7]
    #[arg(long)]
    pub days: Option<Decimal>,
}

pub fn run_benchmarks(args: BenchmarksArgs, table: &BenchmarkTable) -> Result<Value, Box<dyn std::error::Error>> {
    match args.sector {
        Some(sector) => {
            let mut warnings = Vec::new();
            if !table.is_known(&sector) {
                warnings.push(format!(
                    "Sector '{sector}' is not recognised - showing general benchmarks"
                ));
            }
            Ok(json!({
                "result": table.benchmarks(&sector),
                "warnings": warnings,
            }))
        }
        None => {
            let sectors: Vec<Value> = table
                .sectors()
                .map(|p| {
                    json!({
                        "code": p.code,
                        "name": p.name,
                        "family": p.family,
                        "dso_default": p.dso_default,
                        "dpo_default": p.dpo_default,
                        "liquidity_target": p.liquidity_target,
                        "net_margin_target": p.net_margin_target,
                    })
                })
                .collect();
            Ok(Value::Array(sectors))
        }
    }
}

pub fn run_simulate_dso(args: SimulateDsoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let days = args.days.unwrap_or(DEFAULT_DSO_REDUCTION_DAYS);
    if args.revenue < Decimal::ZERO || days < Decimal::ZERO {
        return Err("--revenue and --days must be non-negative".into());
    }
    let rate = args.bad_debt_rate.unwrap_or(DEFAULT_BAD_DEBT_RATE);
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err("--bad-debt-rate must be between 0 and 1".into());
    }
    let released = dso_reduction_impact(args.revenue, days, rate).round_dp(2);
    Ok(json!({
        "result": {
            "cash_released": released,
            "reduction_days": days,
            "bad_debt_rate": rate,
        },
        "methodology": "revenue x days x (1 - bad debt rate) / 30",
    }))
}

pub fn run_simulate_dpo(args: SimulateDpoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let days = args.days.unwrap_or(DEFAULT_DPO_EXTENSION_DAYS);
    if args.cost_of_goods < Decimal::ZERO || days < Decimal::ZERO {
        return Err("--cost-of-goods and --days must be non-negative".into());
    }
    let retained = dpo_extension_impact(args.cost_of_goods, days).round_dp(2);
    Ok(json!({
        "result": {
            "cash_retained": retained,
            "extension_days": days,
        },
        "methodology": "cost of goods x days / 30",
    }))
}
