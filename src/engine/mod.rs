mod codec;
mod completer;
mod error;
mod identity;
mod orchestrator;
mod scheduler;
mod types;
mod validation;

pub use orchestrator::{ConsolidationEngine, ConsolidationSettings};
pub use types::{ConsolidationOutcome, SignedTransaction};
pub use validation::{address_preview, precheck_inputs};
