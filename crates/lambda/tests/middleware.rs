use serde_json::{Value, json};

use widelog_core::{KeyValueFormatter, LoggerConfig, MemorySink, WideLogger};
use widelog_lambda::{
    InvocationContext, InvocationError, LambdaContext, MiddlewareOptions, WideLoggerMiddleware,
    wide_logger_middleware,
};

const TRACE_HEADER: &str =
    "Root=1-65e3369e-3d1b296f5b08533f7e899187;Parent=45cac5110a610bc4;Sampled=0;Lineage=0439e26f:0";

struct TestEvent {
    kind: &'static str,
    name: &'static str,
    group: Option<&'static str>,
}

fn test_event() -> TestEvent {
    TestEvent {
        kind: "test",
        name: "thing",
        group: None,
    }
}

/// Context with a fixed remaining time so output is deterministic.
struct TestContext;

impl InvocationContext for TestContext {
    fn invoked_function_arn(&self) -> &str {
        "arn:aws:lambda:us-east-1:123456789012:function:a-lambda-function"
    }
    fn function_name(&self) -> &str {
        "func"
    }
    fn memory_limit_in_mb(&self) -> u32 {
        100
    }
    fn function_version(&self) -> &str {
        "1"
    }
    fn aws_request_id(&self) -> &str {
        "oo1"
    }
    fn remaining_time_in_millis(&self) -> u64 {
        1000
    }
}

#[derive(Debug, PartialEq)]
struct HandlerFailure(&'static str);

impl std::fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

fn record_event(logger: &mut WideLogger, event: &TestEvent) {
    logger.add("service", event.name);
    logger.add("startEpoch", 1_709_358_407_383u64);
    logger.add("group", event.group);
    logger.add("type", event.kind);
}

fn ok_handler(logger: &mut WideLogger, event: &TestEvent) -> Result<&'static str, HandlerFailure> {
    record_event(logger, event);
    Ok("done")
}

fn failing_handler(logger: &mut WideLogger, event: &TestEvent) -> Result<(), HandlerFailure> {
    record_event(logger, event);
    Err(HandlerFailure("lambda error"))
}

fn middleware_with(options: MiddlewareOptions, trace: Option<&'static str>) -> (WideLoggerMiddleware, MemorySink) {
    let sink = MemorySink::new();
    let logger = WideLogger::with_sink(LoggerConfig::new(), sink.clone());
    let mw = wide_logger_middleware(logger, options)
        .with_env_lookup(move |var| (var == "_X_AMZN_TRACE_ID").then(|| trace).flatten().map(str::to_string));
    (mw, sink)
}

const EVENT_OUTPUT: &str = r#"WIDE {"service":"thing","startEpoch":1709358407383,"group":null,"type":"test"}"#;

const CONTEXT_OUTPUT: &str = concat!(
    r#"WIDE {"service":"thing","startEpoch":1709358407383,"group":null,"type":"test","#,
    r#""lambdaContext":{"lambdaFunction":{"arn":"arn:aws:lambda:us-east-1:123456789012:function:a-lambda-function","#,
    r#""name":"func","memoryLimitInMB":"100","version":"1"},"awsAccountId":"123456789012","awsRegion":"us-east-1","#,
    r#""correlationIds":{"awsRequestId":"oo1","xRayTraceId":"1-65e3369e-3d1b296f5b08533f7e899187"},"#,
    r#""remainingTimeInMillis":1000}}"#,
);

fn parse_line(line: &str) -> Value {
    let body = line.strip_prefix("WIDE ").expect("line must carry the WIDE prefix");
    serde_json::from_str(body).expect("line body must be JSON")
}

#[test]
fn after_flushes_without_lambda_context_by_default() {
    let (mut mw, sink) = middleware_with(MiddlewareOptions::default(), Some(TRACE_HEADER));

    let response = mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    assert_eq!(response, "done");
    assert_eq!(sink.lines(), vec![EVENT_OUTPUT]);
    assert!(mw.logger().container().is_empty());
}

#[test]
fn on_error_flushes_and_returns_handler_error_unchanged() {
    let (mut mw, sink) = middleware_with(MiddlewareOptions::default(), Some(TRACE_HEADER));

    let err = mw.run(&test_event(), &TestContext, failing_handler).unwrap_err();

    assert!(err.is_handler());
    assert_eq!(err.into_handler_error(), Some(HandlerFailure("lambda error")));
    assert_eq!(sink.lines(), vec![EVENT_OUTPUT]);
}

#[test]
fn injects_lambda_context_from_after() {
    let options = MiddlewareOptions::new().with_lambda_context();
    let (mut mw, sink) = middleware_with(options, Some(TRACE_HEADER));

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    assert_eq!(sink.lines(), vec![CONTEXT_OUTPUT]);
}

#[test]
fn injects_lambda_context_from_on_error() {
    let options = MiddlewareOptions::new().with_lambda_context();
    let (mut mw, sink) = middleware_with(options, Some(TRACE_HEADER));

    let result = mw.run(&test_event(), &TestContext, failing_handler);

    assert!(matches!(result, Err(InvocationError::Handler(HandlerFailure("lambda error")))));
    assert_eq!(sink.lines(), vec![CONTEXT_OUTPUT]);
}

#[test]
fn trace_id_is_null_without_environment() {
    let options = MiddlewareOptions::new().with_lambda_context();
    let (mut mw, sink) = middleware_with(options, None);

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    let line = parse_line(&sink.last().unwrap());
    assert_eq!(line["lambdaContext"]["correlationIds"]["xRayTraceId"], Value::Null);
    assert_eq!(line["lambdaContext"]["awsAccountId"], json!("123456789012"));
    assert_eq!(line["lambdaContext"]["awsRegion"], json!("us-east-1"));
}

#[test]
fn bare_trace_value_is_used_as_root() {
    let options = MiddlewareOptions::new().with_lambda_context();
    let (mut mw, sink) = middleware_with(options, Some("  1-bare-root  "));

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    let line = parse_line(&sink.last().unwrap());
    assert_eq!(line["lambdaContext"]["correlationIds"]["xRayTraceId"], json!("1-bare-root"));
}

#[test]
fn sequential_invocations_do_not_leak_attributes() {
    let (mut mw, sink) = middleware_with(MiddlewareOptions::new().with_lambda_context(), None);

    mw.run(&test_event(), &TestContext, |logger, _event| {
        logger.add("onlyFirst", true);
        Ok::<_, HandlerFailure>(())
    })
    .unwrap();
    mw.run(&test_event(), &TestContext, |logger, _event| {
        logger.add("second", 2);
        Ok::<_, HandlerFailure>(())
    })
    .unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    let second = parse_line(&lines[1]);
    assert!(second.get("onlyFirst").is_none());
    assert_eq!(second["second"], json!(2));
    assert!(second.get("lambdaContext").is_some());
}

#[test]
fn persistent_attributes_appear_on_every_invocation() {
    let sink = MemorySink::new();
    let logger = WideLogger::with_sink(
        LoggerConfig::new().persistent_attribute("app", "orders"),
        sink.clone(),
    );
    let mut mw = WideLoggerMiddleware::new(logger, MiddlewareOptions::default())
        .with_env_lookup(|_| None);

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();
    mw.run(&test_event(), &TestContext, failing_handler).unwrap_err();

    for line in sink.lines() {
        assert!(line.starts_with(r#"WIDE {"app":"orders","service":"thing""#));
    }
    assert_eq!(sink.len(), 2);
}

#[test]
fn key_value_formatter_renders_lambda_context_inline() {
    let sink = MemorySink::new();
    let logger = WideLogger::with_sink(
        LoggerConfig::new().formatter(KeyValueFormatter::new()),
        sink.clone(),
    );
    let mut mw = wide_logger_middleware(logger, MiddlewareOptions::new().with_lambda_context())
        .with_env_lookup(|_| None);

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    let line = sink.last().unwrap();
    assert!(line.starts_with(r#"WIDE service="thing"|startEpoch=1709358407383|group=null|type="test"|lambdaContext={"#));
    assert!(line.ends_with(r#""remainingTimeInMillis":1000}"#));
}

#[test]
fn remaining_time_can_be_left_out() {
    let options = MiddlewareOptions {
        inject_lambda_context: true,
        include_remaining_time: false,
        ..MiddlewareOptions::default()
    };
    let (mut mw, sink) = middleware_with(options, None);

    mw.run(&test_event(), &TestContext, ok_handler).unwrap();

    let line = parse_line(&sink.last().unwrap());
    assert!(line["lambdaContext"].get("remainingTimeInMillis").is_none());
}

#[test]
fn works_with_concrete_lambda_context() {
    let ctx = LambdaContext::from_deadline_ms(
        "arn:aws:lambda:ap-southeast-2:000011112222:function:worker:prod",
        "worker",
        1024,
        "12",
        "req-abc",
        4_102_444_800_000,
    );
    let (mut mw, sink) = middleware_with(MiddlewareOptions::new().with_lambda_context(), None);

    mw.run(&(), &ctx, |logger, _| {
        logger.add("ok", true);
        Ok::<_, HandlerFailure>(())
    })
    .unwrap();

    let line = parse_line(&sink.last().unwrap());
    assert_eq!(line["lambdaContext"]["awsRegion"], json!("ap-southeast-2"));
    assert_eq!(line["lambdaContext"]["awsAccountId"], json!("000011112222"));
    assert_eq!(line["lambdaContext"]["lambdaFunction"]["memoryLimitInMB"], json!("1024"));
}
