pub mod analysis;
pub mod benchmarks;
pub mod intake;
