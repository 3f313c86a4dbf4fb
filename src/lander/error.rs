use thiserror::Error;

use crate::api::BackendError;

#[derive(Debug, Error)]
pub enum LanderError {
    #[error("{0}")]
    Backend(#[from] BackendError),
}
