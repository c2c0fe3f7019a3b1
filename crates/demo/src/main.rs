//! Simulates a handful of Lambda invocations sharing one wide logger.
//!
//! `WIDE ...` lines go to stdout; diagnostics go to stderr. Formatting is
//! configurable through `WIDE_LOG_FORMAT` / `WIDE_LOG_SEPARATOR`.

use anyhow::Context as _;
use chrono::{Duration, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use widelog_core::{LoggerConfig, WideLogger};
use widelog_lambda::{InvocationError, LambdaContext, MiddlewareOptions, wide_logger_middleware};

const EVENTS: &str = r#"[
    {"orderId": "ord-1001", "items": 3, "coupon": "SPRING"},
    {"orderId": "ord-1002", "items": 1},
    {"orderId": "ord-1003", "items": 0}
]"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEvent {
    order_id: String,
    items: u32,
    coupon: Option<String>,
}

#[derive(Debug, Error)]
enum OrderError {
    #[error("order {0} has no items")]
    Empty(String),
}

fn handle_order(logger: &mut WideLogger, event: &OrderEvent) -> Result<u32, OrderError> {
    logger.add("startEpoch", Utc::now().timestamp_millis());
    logger.add("orderId", event.order_id.as_str());
    logger.add("items", event.items);
    logger.add("coupon", event.coupon.clone());

    if event.items == 0 {
        let err = OrderError::Empty(event.order_id.clone());
        logger.add("error", err.to_string());
        return Err(err);
    }

    let total_cents = event.items * 250;
    logger.add("totalCents", total_cents);
    Ok(total_cents)
}

fn demo_context() -> LambdaContext {
    LambdaContext {
        invoked_function_arn: "arn:aws:lambda:eu-west-1:123456789012:function:orders-demo".into(),
        function_name: "orders-demo".into(),
        memory_limit_in_mb: 128,
        function_version: "$LATEST".into(),
        aws_request_id: Uuid::now_v7().to_string(),
        deadline: Utc::now() + Duration::seconds(3),
    }
}

fn main() -> anyhow::Result<()> {
    widelog_observability::init();

    let config = LoggerConfig::from_env()
        .context("invalid wide log configuration")?
        .persistent_attribute("service", "orders-demo");
    let logger = WideLogger::new(config);
    let mut middleware =
        wide_logger_middleware(logger, MiddlewareOptions::new().with_lambda_context());

    let events: Vec<OrderEvent> = serde_json::from_str(EVENTS).context("parse demo events")?;
    for event in &events {
        let context = demo_context();
        match middleware.run(event, &context, handle_order) {
            Ok(total_cents) => {
                tracing::info!(order_id = %event.order_id, total_cents, "invocation succeeded")
            }
            Err(InvocationError::Handler(err)) => {
                tracing::warn!(order_id = %event.order_id, error = %err, "invocation failed")
            }
            Err(err @ InvocationError::Logging(_)) => return Err(err.into()),
        }
    }

    Ok(())
}
