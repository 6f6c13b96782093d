//! End-to-end tests of the direct API against a mock gateway.

use std::time::Duration;

use akbank_pos::{
    Endpoints, PosConfig, PosError, VirtualPos,
    config::TRANSACTION_PATH,
    signer::PosSigner,
    transport::{HttpConfig, HttpTransport},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, header_exists, method, path},
};

fn pos_for(server: &MockServer) -> VirtualPos {
    VirtualPos::new("M1", "T1", "K", "TEST")
        .unwrap()
        .with_endpoints(Endpoints::new(server.uri(), format!("{}/securepay", server.uri())))
}

async fn mount(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(TRANSACTION_PATH))
        .and(header("content-type", "application/json"))
        .and(header_exists("auth-hash"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_auth_sends_signed_body() {
    let server = MockServer::start().await;
    mount(
        &server,
        200,
        json!({
            "txnCode": "1000",
            "responseCode": "VPS-0000",
            "responseMessage": "BASARILI",
            "transaction": {"authCode": "123456", "amount": 10.5, "currencyCode": 840}
        }),
    )
    .await;

    let pos = pos_for(&server);
    let mut request = pos.request();
    request.set_order_id("ORDER-1").set_card_number("4355084355084358");
    request.set_amount("10.5", "USD").unwrap();

    let response = pos.auth(request).await.unwrap();
    assert!(response.is_approved());
    assert_eq!(response.auth_code(), Some("123456"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let sent = &received[0];

    let body = String::from_utf8(sent.body.clone()).unwrap();
    assert!(body.contains(r#""amount":"10.50""#));
    assert!(body.contains(r#""currencyCode":840"#));

    let auth_hash = sent.headers.get("auth-hash").unwrap().to_str().unwrap();
    let signer = PosSigner::new("K").unwrap();
    assert_eq!(auth_hash, signer.sign_payload(&sent.body));

    let json: Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(json["version"], "1.00");
    assert_eq!(json["txnCode"], "1000");
    assert_eq!(json["terminal"]["merchantSafeId"], "M1");
    assert_eq!(json["terminal"]["terminalSafeId"], "T1");
    assert_eq!(json["transaction"]["motoInd"], 0);
    assert_eq!(json["randomNumber"].as_str().unwrap().len(), 128);
    assert!(json.get("lang").is_none());
}

#[tokio::test]
async fn test_each_operation_uses_its_txn_code() {
    let server = MockServer::start().await;
    mount(&server, 200, json!({"responseCode": "VPS-0000"})).await;
    let pos = pos_for(&server);

    pos.pre_auth(pos.request()).await.unwrap();
    pos.post_auth(pos.request()).await.unwrap();
    pos.refund(pos.request()).await.unwrap();
    pos.cancel(pos.request()).await.unwrap();
    pos.auth_3d(pos.request()).await.unwrap();
    pos.pre_auth_3d(pos.request()).await.unwrap();

    let codes: Vec<(String, bool)> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let json: Value = serde_json::from_slice(&r.body).unwrap();
            let has_moto = json["transaction"]["motoInd"] == 0;
            (json["txnCode"].as_str().unwrap().to_owned(), has_moto)
        })
        .collect();

    assert_eq!(
        codes,
        vec![
            ("1004".to_owned(), true),
            ("1005".to_owned(), false),
            ("1002".to_owned(), false),
            ("1003".to_owned(), false),
            ("1000".to_owned(), true),
            ("1004".to_owned(), true),
        ]
    );
}

#[tokio::test]
async fn test_every_dispatch_gets_a_fresh_nonce() {
    let server = MockServer::start().await;
    mount(&server, 200, json!({"responseCode": "VPS-0000"})).await;
    let pos = pos_for(&server);

    pos.refund(pos.request()).await.unwrap();
    pos.refund(pos.request()).await.unwrap();

    let nonces: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let json: Value = serde_json::from_slice(&r.body).unwrap();
            json["randomNumber"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_ne!(nonces[0], nonces[1]);
}

#[tokio::test]
async fn test_decline_is_a_normal_response() {
    let server = MockServer::start().await;
    mount(
        &server,
        200,
        json!({
            "responseCode": "VPS-1005",
            "responseMessage": "Do Not Honor",
            "hostResponseCode": "05"
        }),
    )
    .await;
    let pos = pos_for(&server);

    let response = pos.auth(pos.request()).await.unwrap();
    assert!(!response.is_approved());
    assert_eq!(response.host_response_code, "05");
}

#[tokio::test]
async fn test_error_status_carries_gateway_message() {
    let server = MockServer::start().await;
    mount(&server, 402, json!({"code": "05", "message": "Do Not Honor"})).await;
    let pos = pos_for(&server);

    let error = pos.auth(pos.request()).await.unwrap_err();
    assert!(matches!(error, PosError::Gateway { status: 402, .. }));
    assert_eq!(error.to_string(), "Do Not Honor");
}

#[tokio::test]
async fn test_error_envelope_on_success_status() {
    let server = MockServer::start().await;
    mount(&server, 200, json!({"error": {"code": "VPS-2001", "message": "Hash mismatch"}})).await;
    let pos = pos_for(&server);

    let error = pos.cancel(pos.request()).await.unwrap_err();
    assert!(error.is_gateway());
    assert_eq!(error.gateway_error().unwrap().code, "VPS-2001");
}

#[tokio::test]
async fn test_unreadable_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;
    let pos = pos_for(&server);

    let error = pos.refund(pos.request()).await.unwrap_err();
    assert!(matches!(
        error,
        PosError::UnexpectedStatus { status: 503, ref body } if body == "Service Unavailable"
    ));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"responseCode": "VPS-0000"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = HttpConfig { timeout_secs: 1, connect_timeout_secs: 1, ..HttpConfig::default() };
    let transport = HttpTransport::with_config(&config).unwrap();
    let pos = pos_for(&server).with_transport(transport);

    let error = pos.auth(pos.request()).await.unwrap_err();
    assert!(matches!(error, PosError::HttpError(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_client_from_config() {
    let server = MockServer::start().await;
    mount(&server, 200, json!({"responseCode": "VPS-0000"})).await;

    let config = PosConfig::from_toml(
        r#"
        merchant_safe_id = "M9"
        terminal_safe_id = "T9"
        secret_key = "config-key"
        environment = "TEST"

        [http]
        timeout_secs = 5
        "#,
    )
    .unwrap();
    let pos = VirtualPos::from_config(&config)
        .unwrap()
        .with_endpoints(Endpoints::new(server.uri(), format!("{}/securepay", server.uri())));

    pos.refund(pos.request()).await.unwrap();

    let sent = &server.received_requests().await.unwrap()[0];
    let auth_hash = sent.headers.get("auth-hash").unwrap().to_str().unwrap();
    assert_eq!(auth_hash, PosSigner::new("config-key").unwrap().sign_payload(&sent.body));
    let json: Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(json["terminal"]["merchantSafeId"], "M9");
}

#[tokio::test]
async fn test_shared_client_across_tasks() {
    let server = MockServer::start().await;
    mount(&server, 200, json!({"responseCode": "VPS-0000"})).await;
    let pos = std::sync::Arc::new(pos_for(&server));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pos = std::sync::Arc::clone(&pos);
            tokio::spawn(async move {
                let mut request = pos.request();
                request.set_order_id(format!("ORDER-{i}"));
                pos.auth(request).await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_approved());
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}
