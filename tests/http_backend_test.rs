mod common;

use checkout_flow::config::BackendConfig;
use checkout_flow::domain::order::PaymentMethod;
use checkout_flow::domain::ports::{CheckoutBackend, CodOrderRequest, VerificationRequest};
use checkout_flow::error::CheckoutError;
use checkout_flow::infrastructure::http::HttpCheckoutBackend;
use common::sample_draft;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpCheckoutBackend {
    HttpCheckoutBackend::new(BackendConfig {
        base_url: server.uri(),
        csrf_token: "csrf-abc".to_string(),
        request_timeout_secs: Some(5),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_place_cod_order_posts_form_with_csrf() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/place-cod-order"))
        .and(header("X-CSRFToken", "csrf-abc"))
        .and(body_string_contains("csrfmiddlewaretoken=csrf-abc"))
        .and(body_string_contains("total=19.99"))
        .and(body_string_contains("payment_mode=Cash+on+Delivery"))
        .and(body_string_contains("payment_id=COD-1700000000000"))
        .and(body_string_contains("fname=Asha+Rao"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "redirect_url": "/payment-success/COD-1700000000000/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend(&server)
        .place_cod_order(CodOrderRequest {
            draft: sample_draft("19.99", PaymentMethod::CashOnDelivery),
            payment_id: "COD-1700000000000".to_string(),
        })
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(
        response.redirect_url.as_deref(),
        Some("/payment-success/COD-1700000000000/")
    );
}

#[tokio::test]
async fn test_create_payment_session_sends_minor_units() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proceed-to-pay"))
        .and(header("X-CSRFToken", "csrf-abc"))
        .and(body_string_contains("csrfmiddlewaretoken=csrf-abc"))
        .and(body_string_contains("total=1999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "rzp_test_key",
            "amount": 1999,
            "order_id": "order_abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = backend(&server).create_payment_session(1999).await.unwrap();

    assert_eq!(session.key, "rzp_test_key");
    assert_eq!(session.amount, 1999);
    assert_eq!(session.order_id.as_deref(), Some("order_abc"));
}

#[tokio::test]
async fn test_session_without_key_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proceed-to-pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"amount": 1999})))
        .mount(&server)
        .await;

    let err = backend(&server).create_payment_session(1999).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Transport(_)));
}

#[tokio::test]
async fn test_verify_payment_forwards_widget_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-payment/"))
        .and(header("X-CSRFToken", "csrf-abc"))
        .and(body_string_contains("csrfmiddlewaretoken=csrf-abc"))
        .and(body_string_contains("payment_id=pay_123"))
        .and(body_string_contains("order_id=order_abc"))
        .and(body_string_contains("signature=sig_xyz"))
        .and(body_string_contains("phone=9876543210"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "payment_id": "pay_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend(&server)
        .verify_payment(VerificationRequest {
            payment_id: "pay_123".to_string(),
            order_id: "order_abc".to_string(),
            signature: "sig_xyz".to_string(),
            draft: sample_draft("19.99", PaymentMethod::HostedPayment),
        })
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.payment_id.as_deref(), Some("pay_123"));
}

#[tokio::test]
async fn test_error_status_with_json_body_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-payment/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "Signature mismatch"
        })))
        .mount(&server)
        .await;

    let response = backend(&server)
        .verify_payment(VerificationRequest {
            payment_id: "pay_123".to_string(),
            order_id: "order_abc".to_string(),
            signature: "bad".to_string(),
            draft: sample_draft("19.99", PaymentMethod::HostedPayment),
        })
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message.as_deref(), Some("Signature mismatch"));
}

#[tokio::test]
async fn test_html_error_page_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/place-cod-order"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .place_cod_order(CodOrderRequest {
            draft: sample_draft("19.99", PaymentMethod::CashOnDelivery),
            payment_id: "COD-1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Transport(_)));
}
