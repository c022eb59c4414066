pub mod benchmarks;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod imputation;
pub mod indicators;
pub mod pipeline;
pub mod projection;
pub mod snapshot;
pub mod types;

#[cfg(feature = "intake")]
pub mod intake;

pub use error::GrowliError;
pub use types::*;

/// Standard result type for all growli operations
pub type GrowliResult<T> = Result<T, GrowliError>;
