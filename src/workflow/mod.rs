pub mod fill_flow;
pub mod job_ctx;
pub mod review;

pub use fill_flow::{FillFlow, FillSummary, NameLayout};
pub use job_ctx::JobCtx;
pub use review::{HoldOutcome, ReviewStep};
