use thiserror::Error;

/// Errors returned by the recognition and speech adapters.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The stage has no service behind it.
    #[error("{service} is not implemented")]
    NotImplemented { service: &'static str },

    /// The service refused the input (corrupt image, text too long, ...).
    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    /// Transport, throttling, credentials or any other failure.
    #[error("{service} request failed: {message}")]
    Backend {
        service: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ServiceError::NotImplemented { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
