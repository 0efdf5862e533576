use thiserror::Error;

use orderflow_core::DomainError;
use orderflow_store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure surfaced by a service operation.
///
/// Domain errors are expected/recoverable and map to client errors at the
/// API boundary; store errors are unexpected and surface as server errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The domain error behind this failure, if it is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(err) => Some(err),
            ServiceError::Store(_) => None,
        }
    }
}
