//! Default imputation: fills optional fields the business left blank and
//! records a human-readable assumption for each substitution that the user
//! should be told about.

pub mod defaults;
pub mod log;

pub use defaults::{
    CompletedBasic, CompletedStrategic, CompletedWorkingCapital, Imputable,
    DEFAULT_COGS_RATIO, DEFAULT_TARGET_DSO, DEFAULT_TAX_RATE_PCT, DEFAULT_VARIABLE_COST_PCT,
};
pub use log::AssumptionLog;
