//! Integration tests for `AdvisorClient` using wiremock HTTP mocks.

use buywise_client::{AdvisorClient, ClientError};
use buywise_core::{DetectOutcome, MemoryChoiceRequest, ProductData, ServerLocation};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AdvisorClient {
    AdvisorClient::new(ServerLocation::new(base_url), 5, "buywise-test/0.1")
        .expect("client construction should not fail")
}

fn sample_product() -> ProductData {
    ProductData {
        title: "Samsung Galaxy S23 Ultra".to_owned(),
        site: "amazon.com".to_owned(),
        url: "https://www.amazon.com/dp/B0BLP2PY6W".to_owned(),
        price: Some("$1199.99".to_owned()),
        reviews: vec!["Great phone!".to_owned(), "Love the camera".to_owned()],
        full_details: true,
        ..ProductData::default()
    }
}

fn analysis_json() -> serde_json::Value {
    json!({
        "confidence_score": 85,
        "confidence_level": "Very High Confidence",
        "sentiment_score": 0.75,
        "overall_sentiment": "Positive",
        "pros": ["Great camera", "Fast performance"],
        "cons": ["Expensive"],
        "review_count": 10,
        "warnings": ["Limited sample size (10 reviews) may affect confidence"]
    })
}

#[tokio::test]
async fn health_check_accepts_any_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .health_check()
        .await
        .expect("204 should count as alive");
}

#[tokio::test]
async fn health_check_reports_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).health_check().await.unwrap_err();
    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn health_check_reports_unreachable_server() {
    let err = test_client("http://127.0.0.1:1")
        .health_check()
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Unreachable { .. }),
        "expected Unreachable, got: {err:?}"
    );
}

#[tokio::test]
async fn detect_product_posts_product_and_parses_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/detect-product"))
        .and(body_partial_json(json!({
            "title": "Samsung Galaxy S23 Ultra",
            "site": "amazon.com",
            "full_details": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_json()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .detect_product(&sample_product())
        .await
        .expect("analysis should parse");

    let DetectOutcome::Complete(result) = outcome else {
        panic!("expected a complete analysis");
    };
    assert_eq!(result.review_count, 10);
    assert_eq!(result.overall_sentiment, "Positive");
    assert_eq!(result.cons, vec!["Expensive".to_owned()]);
}

#[tokio::test]
async fn detect_product_resolves_memory_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/detect-product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "memory_match_found",
            "existing_analysis": {
                "product_id": "Samsung Galaxy S23 Ultra_20250301_101500",
                "timestamp": "2025-03-01T10:15:00",
                "summary": "Positive, confidence 85"
            }
        })))
        .mount(&server)
        .await;

    let outcome = test_client(&server.uri())
        .detect_product(&sample_product())
        .await
        .expect("memory match should parse");

    match outcome {
        DetectOutcome::MemoryMatch(existing) => {
            assert_eq!(existing.product_id, "Samsung Galaxy S23 Ultra_20250301_101500");
            assert_eq!(existing.summary.as_deref(), Some("Positive, confidence 85"));
        }
        DetectOutcome::Complete(_) => panic!("expected a memory match"),
    }
}

#[tokio::test]
async fn detect_product_keeps_server_error_message_on_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/detect-product"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Missing required field: title" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .detect_product(&sample_product())
        .await
        .unwrap_err();

    match err {
        ClientError::UnexpectedStatus {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Missing required field: title"));
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn detect_product_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/detect-product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .detect_product(&sample_product())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Malformed { .. }),
        "expected Malformed, got: {err:?}"
    );
}

#[tokio::test]
async fn memory_choice_use_existing_sends_product_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/handle-memory-choice"))
        .and(body_json(json!({ "choice": "use_existing", "product_id": "X" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_json()))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .handle_memory_choice(&MemoryChoiceRequest::UseExisting {
            product_id: "X".to_owned(),
        })
        .await
        .expect("analysis should parse");
    assert!((result.confidence_score - 85.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn memory_choice_surfaces_server_error_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/handle-memory-choice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": "Stored analysis could not be loaded" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .handle_memory_choice(&MemoryChoiceRequest::UseExisting {
            product_id: "X".to_owned(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Server(message) => {
            assert_eq!(message, "Stored analysis could not be loaded");
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}
