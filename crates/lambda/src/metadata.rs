//! The `lambdaContext` attribute injected by the middleware.

use serde::{Serialize, Serializer};

use crate::context::InvocationContext;
use crate::trace::XrayTraceData;

/// Snapshot of the invocation, serialized as:
///
/// ```text
/// {
///   "lambdaFunction": {"arn", "name", "memoryLimitInMB", "version"},
///   "awsAccountId", "awsRegion",
///   "correlationIds": {"awsRequestId", "xRayTraceId"},
///   "remainingTimeInMillis"
/// }
/// ```
///
/// Account and region are `null` when the ARN is too short to contain them;
/// `remainingTimeInMillis` is left out entirely when it was not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaMetadata {
    pub lambda_function: LambdaFunction,
    pub aws_account_id: Option<String>,
    pub aws_region: Option<String>,
    pub correlation_ids: CorrelationIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time_in_millis: Option<u64>,
}

/// `memoryLimitInMB` is written as a string, the way the runtime reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LambdaFunction {
    pub arn: String,
    pub name: String,
    #[serde(rename = "memoryLimitInMB", serialize_with = "as_string")]
    pub memory_limit_in_mb: u32,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationIds {
    pub aws_request_id: String,
    /// `Root` of the trace header, `null` when there is no trace.
    pub x_ray_trace_id: Option<String>,
}

fn as_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Collect the metadata for `context`.
///
/// `trace` is usually [`XrayTraceData::from_env`]. The remaining time is
/// sampled now, so call this as late as possible.
pub fn extract_lambda_context<C>(
    context: &C,
    trace: Option<&XrayTraceData>,
    include_remaining_time: bool,
) -> LambdaMetadata
where
    C: InvocationContext + ?Sized,
{
    LambdaMetadata {
        lambda_function: LambdaFunction {
            arn: context.invoked_function_arn().to_string(),
            name: context.function_name().to_string(),
            memory_limit_in_mb: context.memory_limit_in_mb(),
            version: context.function_version().to_string(),
        },
        aws_account_id: context.aws_account_id().map(str::to_string),
        aws_region: context.aws_region().map(str::to_string),
        correlation_ids: CorrelationIds {
            aws_request_id: context.aws_request_id().to_string(),
            x_ray_trace_id: trace.and_then(XrayTraceData::root).map(str::to_string),
        },
        remaining_time_in_millis: include_remaining_time
            .then(|| context.remaining_time_in_millis()),
    }
}
