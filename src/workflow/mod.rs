pub mod accumulator;
pub mod convergence;
pub mod run_ctx;

pub use accumulator::{Accumulator, ConvergenceState};
pub use convergence::{ConvergenceEngine, PhaseOutcome};
pub use run_ctx::{RunCtx, TargetCtx};
