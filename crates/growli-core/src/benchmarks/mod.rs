//! Sector benchmark table: an immutable lookup from sector code to expected
//! ratios, prazo defaults and sector-specific strategies.

pub mod table;

pub use table::{BenchmarkTable, FamilyTargets, SectorFamily, SectorProfile};
