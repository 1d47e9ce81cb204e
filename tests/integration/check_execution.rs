//! Integration tests for single check execution
//!
//! These tests verify that:
//! - Status validation and the two text rules produce the right outcomes
//! - A status mismatch suppresses the body rules
//! - Transport failures become ERROR outcomes instead of panics
//! - Probes carry the identifying User-Agent and don't follow redirects

use crate::helpers::{client_with_timeout, test_client};
use std::time::Duration;
use website_monitoring::{CheckRules, CheckSpec, Level, USER_AGENT, execute};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_passing_status_check() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;

    let spec = CheckSpec::status_only(format!("{}/health", mock_server.uri()), 200);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Ok);
    assert_eq!(outcome.target, spec.target);
    assert_eq!(outcome.message, "Status code: '200'");
}

#[tokio::test]
async fn test_status_mismatch_reports_both_codes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let spec = CheckSpec::status_only(format!("{}/health", mock_server.uri()), 200);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(outcome.message, "Status code mismatch. Got 500 instead of 200");
}

#[tokio::test]
async fn test_status_mismatch_suppresses_body_rules() {
    // The body would satisfy the text rule, but the status gate comes first.
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503).set_body_string("scheduled maintenance"))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        text_in_raw: Some("maintenance".to_string()),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/page", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(outcome.message, "Status code mismatch. Got 503 instead of 200");
}

#[tokio::test]
async fn test_raw_text_rule_passes_when_present() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("build 7 operational"))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        text_in_raw: Some("operational".to_string()),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/status", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Ok);
    assert_eq!(
        outcome.message,
        "Status code: '200'; String found: 'operational'"
    );
}

#[tokio::test]
async fn test_raw_text_rule_fails_when_absent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("build 7 operational"))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        text_in_raw: Some("maintenance".to_string()),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/status", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(
        outcome.message,
        "Status code: '200'; String not found: 'maintenance'"
    );
}

#[tokio::test]
async fn test_html_rule_sees_visible_text_only() {
    // "offline" only exists inside a script, so the rendered-text rule
    // must miss it while the raw rule still finds it.
    let body = r#"<html><head><script>var mode = "offline";</script></head>
        <body><h1>Systems nominal</h1></body></html>"#;

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        text_in_html: Some("offline".to_string()),
        text_in_raw: Some("offline".to_string()),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/page", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(
        outcome.message,
        "Status code: '200'; Text in HTML not found: 'offline'; String found: 'offline'"
    );
}

#[tokio::test]
async fn test_html_rule_passes_on_visible_text() {
    let body = "<html><body><h1>Welcome home</h1><p>All good.</p></body></html>";

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        text_in_html: Some("Welcome home".to_string()),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/page", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Ok);
    assert_eq!(
        outcome.message,
        "Status code: '200'; Text in HTML found: 'Welcome home'"
    );
}

#[tokio::test]
async fn test_connection_refused_is_an_error_outcome() {
    // Port 1 is reserved and nothing listens on it.
    let spec = CheckSpec::status_only("http://127.0.0.1:1/", 200);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert!(
        outcome.message.starts_with("Connection failed"),
        "unexpected message: {}",
        outcome.message
    );
}

#[tokio::test]
async fn test_timeout_is_an_error_outcome() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_string("Slow response"),
        )
        .mount(&mock_server)
        .await;

    let spec = CheckSpec::status_only(format!("{}/slow", mock_server.uri()), 200);
    let outcome = execute(&client_with_timeout(Duration::from_millis(250)), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(outcome.message, "Request timed out");
}

#[tokio::test]
async fn test_post_method_is_used_for_the_probe() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
        .mount(&mock_server)
        .await;

    let rules = CheckRules {
        method: "POST".to_string(),
        status: 201,
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(format!("{}/webhook", mock_server.uri()), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Ok);
    assert_eq!(outcome.message, "Status code: '201'");
}

#[tokio::test]
async fn test_invalid_method_is_an_error_outcome() {
    let mock_server = MockServer::start().await;

    let rules = CheckRules {
        method: "NOT A METHOD".to_string(),
        ..CheckRules::default()
    };
    let spec = CheckSpec::resolve(mock_server.uri(), rules);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(outcome.message, "Invalid request method: 'NOT A METHOD'");
}

#[tokio::test]
async fn test_redirects_are_reported_not_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/elsewhere"))
        .mount(&mock_server)
        .await;

    let spec = CheckSpec::status_only(format!("{}/moved", mock_server.uri()), 200);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Error);
    assert_eq!(outcome.message, "Status code mismatch. Got 301 instead of 200");
}

#[tokio::test]
async fn test_probe_sends_identifying_user_agent() {
    // The mock only matches when the User-Agent header is present, so a
    // passing outcome proves the header went out.
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let spec = CheckSpec::status_only(format!("{}/ua", mock_server.uri()), 200);
    let outcome = execute(&test_client(), &spec).await;

    assert_eq!(outcome.level, Level::Ok);
}
