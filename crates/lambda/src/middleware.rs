//! Invocation lifecycle middleware.
//!
//! The host calls three touchpoints around each invocation:
//!
//! ```text
//! before ─▶ handler ─┬─ Ok  ─▶ after    ─┐
//!                    └─ Err ─▶ on_error ─┴─▶ [add lambdaContext] ─▶ flush
//! ```
//!
//! `after` and `on_error` both end with exactly one flush, whether or not the
//! Lambda context is injected. The middleware never looks at the handler's
//! error; anything worth logging about it must be added by the handler
//! before it returns.

use widelog_core::{WideLogResult, WideLogger};

use crate::context::InvocationContext;
use crate::error::InvocationError;
use crate::metadata::extract_lambda_context;
use crate::trace::{XRAY_TRACE_ID_VAR, XrayTraceData};

/// Attribute under which the Lambda metadata is added.
pub const LAMBDA_CONTEXT_KEY: &str = "lambdaContext";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Middleware options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareOptions {
    /// Add `lambdaContext` before every flush. Off by default.
    pub inject_lambda_context: bool,
    /// Include `remainingTimeInMillis` in the injected metadata.
    pub include_remaining_time: bool,
    /// Environment variable holding the X-Ray trace header.
    pub trace_env_var: String,
}

impl MiddlewareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lambda_context(mut self) -> Self {
        self.inject_lambda_context = true;
        self
    }
}

impl Default for MiddlewareOptions {
    fn default() -> Self {
        Self {
            inject_lambda_context: false,
            include_remaining_time: true,
            trace_env_var: XRAY_TRACE_ID_VAR.to_string(),
        }
    }
}

/// What a touchpoint sees of the current invocation.
#[derive(Debug)]
pub struct Request<'a, E, C: ?Sized> {
    pub event: &'a E,
    pub context: &'a C,
}

impl<'a, E, C: ?Sized> Request<'a, E, C> {
    pub fn new(event: &'a E, context: &'a C) -> Self {
        Self { event, context }
    }
}

/// Extension points a host framework drives around each invocation.
pub trait LifecycleHooks<E, C>
where
    C: InvocationContext + ?Sized,
{
    /// Called before the handler runs.
    fn before(&mut self, _request: &Request<'_, E, C>) -> WideLogResult<()> {
        Ok(())
    }

    /// Called after the handler returned successfully.
    fn after(&mut self, request: &Request<'_, E, C>) -> WideLogResult<()>;

    /// Called after the handler failed.
    fn on_error(&mut self, request: &Request<'_, E, C>) -> WideLogResult<()>;
}

/// Owns the process-wide [`WideLogger`] and flushes it at the end of every
/// invocation.
pub struct WideLoggerMiddleware {
    logger: WideLogger,
    options: MiddlewareOptions,
    env: EnvLookup,
}

impl WideLoggerMiddleware {
    pub fn new(logger: WideLogger, options: MiddlewareOptions) -> Self {
        Self {
            logger,
            options,
            env: Box::new(|var| std::env::var(var).ok()),
        }
    }

    /// Read environment variables through `lookup` instead of the process
    /// environment.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    pub fn logger(&self) -> &WideLogger {
        &self.logger
    }

    /// The logger handlers add their attributes to.
    pub fn logger_mut(&mut self) -> &mut WideLogger {
        &mut self.logger
    }

    pub fn into_logger(self) -> WideLogger {
        self.logger
    }

    pub fn options(&self) -> &MiddlewareOptions {
        &self.options
    }

    /// Trace header currently visible to the middleware.
    pub fn xray_trace_data(&self) -> Option<XrayTraceData> {
        XrayTraceData::from_lookup(&self.options.trace_env_var, &self.env)
    }

    /// Drive one invocation: `before`, the handler, then `after` or
    /// `on_error`.
    ///
    /// A handler error is returned unchanged as [`InvocationError::Handler`],
    /// even if flushing afterwards failed (that failure is only logged).
    pub fn run<E, C, R, HErr, H>(
        &mut self,
        event: &E,
        context: &C,
        handler: H,
    ) -> Result<R, InvocationError<HErr>>
    where
        C: InvocationContext + ?Sized,
        H: FnOnce(&mut WideLogger, &E) -> Result<R, HErr>,
    {
        let request = Request::new(event, context);
        self.before(&request).map_err(InvocationError::Logging)?;

        match handler(&mut self.logger, event) {
            Ok(response) => {
                self.after(&request).map_err(InvocationError::Logging)?;
                Ok(response)
            }
            Err(err) => {
                if let Err(log_err) = self.on_error(&request) {
                    tracing::error!(
                        request_id = context.aws_request_id(),
                        error = %log_err,
                        "failed to flush wide log after handler error"
                    );
                }
                Err(InvocationError::Handler(err))
            }
        }
    }

    fn finish<C>(&mut self, context: &C) -> WideLogResult<()>
    where
        C: InvocationContext + ?Sized,
    {
        let injected = if self.options.inject_lambda_context {
            self.inject_lambda_context(context)
        } else {
            Ok(())
        };
        self.logger.flush()?;
        injected
    }

    fn inject_lambda_context<C>(&mut self, context: &C) -> WideLogResult<()>
    where
        C: InvocationContext + ?Sized,
    {
        let trace = self.xray_trace_data();
        let metadata =
            extract_lambda_context(context, trace.as_ref(), self.options.include_remaining_time);
        self.logger.add_serialize(LAMBDA_CONTEXT_KEY, &metadata)
    }
}

impl<E, C> LifecycleHooks<E, C> for WideLoggerMiddleware
where
    C: InvocationContext + ?Sized,
{
    fn before(&mut self, request: &Request<'_, E, C>) -> WideLogResult<()> {
        tracing::debug!(
            request_id = request.context.aws_request_id(),
            function = request.context.function_name(),
            "invocation started"
        );
        Ok(())
    }

    fn after(&mut self, request: &Request<'_, E, C>) -> WideLogResult<()> {
        self.finish(request.context)
    }

    fn on_error(&mut self, request: &Request<'_, E, C>) -> WideLogResult<()> {
        self.finish(request.context)
    }
}

impl core::fmt::Debug for WideLoggerMiddleware {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WideLoggerMiddleware")
            .field("logger", &self.logger)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Build the middleware for `logger`.
pub fn wide_logger_middleware(
    logger: WideLogger,
    options: MiddlewareOptions,
) -> WideLoggerMiddleware {
    WideLoggerMiddleware::new(logger, options)
}
