use thiserror::Error;

use widelog_core::WideLogError;

/// Failure of one invocation driven by [`crate::WideLoggerMiddleware::run`].
///
/// The handler's own error is carried unchanged in `Handler`; logging
/// failures are only reported as `Logging` when the handler succeeded.
#[derive(Debug, Error)]
pub enum InvocationError<E> {
    #[error("handler failed: {0}")]
    Handler(E),

    #[error("wide log flush failed: {0}")]
    Logging(#[source] WideLogError),
}

impl<E> InvocationError<E> {
    pub fn is_handler(&self) -> bool {
        matches!(self, InvocationError::Handler(_))
    }

    /// The handler's error, if that is what failed.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            InvocationError::Handler(e) => Some(e),
            InvocationError::Logging(_) => None,
        }
    }
}
