//! Health score, findings, gap analysis and the 30/60/90-day action plan
//! built from the final reached tier.

pub mod action_plan;
pub mod findings;
pub mod gaps;
pub mod report;
pub mod scoring;

pub use action_plan::{action_plan, Action, ActionPlan, PlanContext, Priority};
pub use findings::{Findings, Opportunity};
pub use gaps::{analyze_gaps, Gap, GapAnalysis, ProblemTag, Severity};
pub use report::{diagnose, DiagnosticContext, DiagnosticReport};
pub use scoring::{score, ScoreBreakdown};
