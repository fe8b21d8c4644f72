use ethers::types::H256;
use mockito::Matcher;
use serde_json::json;
use web_tether::{
    config::PING_FEE_ETH,
    error::PingError,
    models::PingRequest,
    reporting::ReportClient,
    session::{AuthClient, SessionContext},
};

fn tx_hash() -> H256 {
    H256::from_low_u64_be(0xabc)
}

fn session() -> SessionContext {
    SessionContext::new("test-token", Some(31))
}

fn recorded_body() -> String {
    json!({
        "status": "recorded",
        "ping": { "pid": 7, "wid": 42, "is_up": true, "latency_ms": 82 },
    })
    .to_string()
}

#[tokio::test]
async fn report_matches_backend_wire_contract_exactly() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pings/ping/manual")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({
            "wid": 42,
            "url": "https://example.com",
            "tx_hash": format!("{:?}", tx_hash()),
            "fee_paid_numeric": PING_FEE_ETH,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recorded_body())
        .create_async()
        .await;

    let client = ReportClient::new(server.url(), session());
    let request = PingRequest::new(42, "https://example.com");

    let outcome = client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .expect("report should succeed");

    assert!(outcome.is_up);
    assert_eq!(outcome.latency_ms, Some(82));
    // No "code" key at all when none was supplied: the exact-body matcher
    // above already proved it.
    mock.assert_async().await;
}

#[tokio::test]
async fn same_hash_can_be_reported_twice() {
    // The client performs no dedupe: two invocations with one hash are two
    // backend calls. Whether the second is accepted is the backend's call.
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pings/ping/manual")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recorded_body())
        .expect(2)
        .create_async()
        .await;

    let client = ReportClient::new(server.url(), session());
    let request = PingRequest::new(42, "https://example.com");

    client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .expect("first report should succeed");
    client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .expect("second report should also be sent");

    mock.assert_async().await;
}

#[tokio::test]
async fn backend_conflict_on_reused_hash_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pings/ping/manual")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(json!({ "error": "Transaction code already used" }).to_string())
        .create_async()
        .await;

    let client = ReportClient::new(server.url(), session());
    let request = PingRequest::new(42, "https://example.com");

    let err = client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .unwrap_err();

    match err {
        PingError::ReportingFailed { message, tx_hash: hash } => {
            assert_eq!(message, "Transaction code already used");
            assert_eq!(hash, tx_hash());
        }
        other => panic!("expected ReportingFailed, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_backend_is_reporting_failure_with_hash() {
    // Nothing listens here.
    let client = ReportClient::new("http://127.0.0.1:1", session());
    let request = PingRequest::new(42, "https://example.com");

    let err = client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .unwrap_err();

    assert!(err.is_post_payment());
    assert_eq!(err.tx_hash(), Some(tx_hash()));
}

#[tokio::test]
async fn error_body_without_json_falls_back_to_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/pings/ping/manual")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = ReportClient::new(server.url(), session());
    let request = PingRequest::new(42, "https://example.com");

    let err = client
        .report_ping(&request, tx_hash(), PING_FEE_ETH)
        .await
        .unwrap_err();

    match err {
        PingError::ReportingFailed { message, .. } => {
            assert!(message.contains("500"), "unexpected message: {message}");
        }
        other => panic!("expected ReportingFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn available_sites_lists_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/websites/available-sites")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "wid": 42, "url": "https://example.com", "category": "tech" },
                { "wid": 43, "url": "https://example.org" },
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = ReportClient::new(server.url(), session());
    let sites = client.available_sites().await.expect("listing should parse");

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].wid, 42);
    assert_eq!(sites[0].category.as_deref(), Some("tech"));
    assert_eq!(sites[1].wid, 43);
    assert!(sites[1].category.is_none());
    mock.assert_async().await;
}

#[test]
fn login_builds_session_from_backend_token() {
    tokio_test::block_on(async {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(json!({
                "email": "validator@example.com",
                "password": "hunter2",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": "jwt-abc",
                    "user": { "id": 31, "email": "validator@example.com" },
                })
                .to_string(),
            )
            .create_async()
            .await;

        let auth = AuthClient::new(server.url());
        let session = auth
            .login("validator@example.com", "hunter2")
            .await
            .expect("login should succeed");

        assert_eq!(session.bearer(), "Bearer jwt-abc");
        assert_eq!(session.user_id, Some(31));
        mock.assert_async().await;
    });
}

#[test]
fn signup_posts_profile_and_yields_session() {
    tokio_test::block_on(async {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/signup")
            .match_body(Matcher::Json(json!({
                "name": "Validator One",
                "email": "validator@example.com",
                "password": "hunter2",
                "wallet_address": "0x1111111111111111111111111111111111111111",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": "jwt-new",
                    "user": { "id": 32 },
                })
                .to_string(),
            )
            .create_async()
            .await;

        let auth = AuthClient::new(server.url());
        let session = auth
            .signup(
                "Validator One",
                "validator@example.com",
                "hunter2",
                Some("0x1111111111111111111111111111111111111111"),
            )
            .await
            .expect("signup should succeed");

        assert_eq!(session.bearer(), "Bearer jwt-new");
        assert_eq!(session.user_id, Some(32));
        mock.assert_async().await;
    });
}

#[test]
fn rejected_credentials_carry_backend_message() {
    tokio_test::block_on(async {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": "Invalid credentials" }).to_string())
            .create_async()
            .await;

        let auth = AuthClient::new(server.url());
        let err = auth
            .login("validator@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(
            err.to_string().contains("Invalid credentials"),
            "unexpected error: {err}"
        );
    });
}
