//! `widelog-lambda` — AWS Lambda integration for the wide logger.
//!
//! The middleware wraps a [`WideLogger`](widelog_core::WideLogger) and hooks
//! the invocation lifecycle: every invocation, successful or not, ends with
//! exactly one flush. Optionally the Lambda context (function, account,
//! region, request id, X-Ray trace id) is added under `lambdaContext` first.

pub mod context;
pub mod error;
pub mod metadata;
pub mod middleware;
pub mod trace;

pub use context::{InvocationContext, LambdaContext};
pub use error::InvocationError;
pub use metadata::{CorrelationIds, LambdaFunction, LambdaMetadata, extract_lambda_context};
pub use middleware::{
    LAMBDA_CONTEXT_KEY, LifecycleHooks, MiddlewareOptions, Request, WideLoggerMiddleware,
    wide_logger_middleware,
};
pub use trace::{XRAY_TRACE_ID_VAR, XrayTraceData};
