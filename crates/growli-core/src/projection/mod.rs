//! Six-month cash and revenue projection under three fixed scenarios.

pub mod scenario;

pub use scenario::{
    project, MarginPolicy, ProjectedMonth, ProjectionBaseline, ProjectionSet, Scenario,
    ScenarioKind, ScenarioParams, HORIZON_MONTHS,
};
