//! Invocation context: what the host tells us about the running invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capabilities the middleware needs from the host's invocation context.
///
/// Implement this for whatever context type your runtime hands the handler.
pub trait InvocationContext {
    /// `arn:partition:service:region:account-id:function:name[:qualifier]`
    fn invoked_function_arn(&self) -> &str;

    fn function_name(&self) -> &str;

    fn memory_limit_in_mb(&self) -> u32;

    fn function_version(&self) -> &str;

    fn aws_request_id(&self) -> &str;

    /// Milliseconds left before the invocation times out.
    fn remaining_time_in_millis(&self) -> u64;

    /// ARN segment 4, if the ARN has one.
    fn aws_account_id(&self) -> Option<&str> {
        arn_segment(self.invoked_function_arn(), 4)
    }

    /// ARN segment 3, if the ARN has one.
    fn aws_region(&self) -> Option<&str> {
        arn_segment(self.invoked_function_arn(), 3)
    }
}

impl<C> InvocationContext for &C
where
    C: InvocationContext + ?Sized,
{
    fn invoked_function_arn(&self) -> &str {
        (**self).invoked_function_arn()
    }

    fn function_name(&self) -> &str {
        (**self).function_name()
    }

    fn memory_limit_in_mb(&self) -> u32 {
        (**self).memory_limit_in_mb()
    }

    fn function_version(&self) -> &str {
        (**self).function_version()
    }

    fn aws_request_id(&self) -> &str {
        (**self).aws_request_id()
    }

    fn remaining_time_in_millis(&self) -> u64 {
        (**self).remaining_time_in_millis()
    }
}

pub(crate) fn arn_segment(arn: &str, index: usize) -> Option<&str> {
    arn.split(':').nth(index)
}

/// Plain Lambda context with an absolute deadline, as the runtime API
/// reports it (`Lambda-Runtime-Deadline-Ms`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaContext {
    pub invoked_function_arn: String,
    pub function_name: String,
    #[serde(rename = "memoryLimitInMB")]
    pub memory_limit_in_mb: u32,
    pub function_version: String,
    pub aws_request_id: String,
    pub deadline: DateTime<Utc>,
}

impl LambdaContext {
    /// Build a context from the runtime's epoch-millisecond deadline.
    ///
    /// An out-of-range deadline is treated as already expired.
    pub fn from_deadline_ms(
        invoked_function_arn: impl Into<String>,
        function_name: impl Into<String>,
        memory_limit_in_mb: u32,
        function_version: impl Into<String>,
        aws_request_id: impl Into<String>,
        deadline_ms: i64,
    ) -> Self {
        let deadline = DateTime::from_timestamp_millis(deadline_ms).unwrap_or(DateTime::UNIX_EPOCH);
        Self {
            invoked_function_arn: invoked_function_arn.into(),
            function_name: function_name.into(),
            memory_limit_in_mb,
            function_version: function_version.into(),
            aws_request_id: aws_request_id.into(),
            deadline,
        }
    }

    /// Remaining time relative to `now`, clamped at zero.
    pub fn remaining_time_at(&self, now: DateTime<Utc>) -> u64 {
        let remaining = (self.deadline - now).num_milliseconds();
        u64::try_from(remaining).unwrap_or(0)
    }
}

impl InvocationContext for LambdaContext {
    fn invoked_function_arn(&self) -> &str {
        &self.invoked_function_arn
    }

    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn memory_limit_in_mb(&self) -> u32 {
        self.memory_limit_in_mb
    }

    fn function_version(&self) -> &str {
        &self.function_version
    }

    fn aws_request_id(&self) -> &str {
        &self.aws_request_id
    }

    fn remaining_time_in_millis(&self) -> u64 {
        self.remaining_time_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ARN: &str = "arn:aws:lambda:us-east-1:123456789012:function:a-lambda-function";

    fn context(deadline: DateTime<Utc>) -> LambdaContext {
        LambdaContext {
            invoked_function_arn: ARN.to_string(),
            function_name: "func".to_string(),
            memory_limit_in_mb: 128,
            function_version: "$LATEST".to_string(),
            aws_request_id: "req-1".to_string(),
            deadline,
        }
    }

    #[test]
    fn account_and_region_come_from_arn_segments() {
        let ctx = context(Utc::now());
        assert_eq!(ctx.aws_account_id(), Some("123456789012"));
        assert_eq!(ctx.aws_region(), Some("us-east-1"));
    }

    #[test]
    fn short_arn_has_no_account_or_region() {
        let mut ctx = context(Utc::now());
        ctx.invoked_function_arn = "arn:aws:lambda".to_string();
        assert_eq!(ctx.aws_region(), None);
        assert_eq!(ctx.aws_account_id(), None);
    }

    #[test]
    fn remaining_time_counts_down_and_clamps() {
        let now = Utc::now();
        let ctx = context(now + Duration::milliseconds(1500));

        assert_eq!(ctx.remaining_time_at(now), 1500);
        assert_eq!(ctx.remaining_time_at(now + Duration::seconds(5)), 0);
    }

    #[test]
    fn from_deadline_ms_uses_epoch_millis() {
        let ctx = LambdaContext::from_deadline_ms(ARN, "func", 256, "3", "req-2", 1_709_358_408_383);
        let now = DateTime::from_timestamp_millis(1_709_358_407_383).unwrap();

        assert_eq!(ctx.remaining_time_at(now), 1000);
        assert_eq!(ctx.memory_limit_in_mb(), 256);
    }

    #[test]
    fn deserializes_runtime_style_json() {
        let ctx: LambdaContext = serde_json::from_value(serde_json::json!({
            "invokedFunctionArn": ARN,
            "functionName": "func",
            "memoryLimitInMB": 100,
            "functionVersion": "1",
            "awsRequestId": "oo1",
            "deadline": "2024-03-02T05:46:48.383Z",
        }))
        .unwrap();

        assert_eq!(ctx.memory_limit_in_mb, 100);
        assert_eq!(ctx.aws_request_id(), "oo1");
    }
}
