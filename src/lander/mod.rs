mod error;
mod bundle;
mod rate_limit;
mod stack;

pub use bundle::{DEFAULT_MAX_BATCH_SIZE, build_batches};
pub use error::LanderError;
pub use rate_limit::RateLimiter;
pub use stack::BundleLander;
