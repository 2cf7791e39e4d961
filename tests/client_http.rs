//! HTTP-level tests for the Manifold client against a local mock server.

use manifold_check::check::{error_chain, run_basic_check, CheckOutcome};
use manifold_check::config::Config;
use manifold_check::error::{CheckError, ClientError};
use manifold_check::market::{ManifoldClient, SearchFilter};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ManifoldClient {
    ManifoldClient::new(&Config::with_api_url(format!("{}/v0", server.uri()))).unwrap()
}

#[tokio::test]
async fn get_markets_sends_limit_and_before() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/markets"))
        .and(query_param("limit", "2"))
        .and(query_param("before", "m0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "m1", "question": "First?", "probability": 0.25},
            {"id": "m2", "question": "Second?", "outcomeType": "BINARY"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let markets = client_for(&server)
        .get_markets(2, Some("m0"))
        .await
        .unwrap();

    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].id.as_deref(), Some("m1"));
    assert_eq!(markets[0].probability, Some(0.25));
    assert_eq!(markets[1].outcome_type.as_deref(), Some("BINARY"));
}

#[tokio::test]
async fn get_market_reads_single_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/market/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "question": "Will it snow?",
            "answers": []
        })))
        .mount(&server)
        .await;

    let market = client_for(&server).get_market("abc").await.unwrap();

    assert_eq!(market.question_or_unknown(), "Will it snow?");
    assert!(market.get("answers").is_some());
}

#[tokio::test]
async fn search_markets_sends_term_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/search-markets"))
        .and(query_param("term", "election"))
        .and(query_param("limit", "5"))
        .and(query_param("filter", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e1", "question": "Who wins the election?"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let markets = client_for(&server)
        .search_markets("election", 5, SearchFilter::Open)
        .await
        .unwrap();

    assert_eq!(markets.len(), 1);
}

#[tokio::test]
async fn bets_endpoints_send_user_and_contract_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/bets"))
        .and(query_param("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b1", "userId": "u1", "amount": 10, "outcome": "YES"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/bets"))
        .and(query_param("contractId", "m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b2", "contractId": "m1", "amount": 5.5, "outcome": "NO"},
            {"id": "b3", "contractId": "m1", "amount": 1, "outcome": "YES"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user_bets = client.get_user_bets(Some("alice"), 10).await.unwrap();
    let market_bets = client.get_market_bets("m1", 10).await.unwrap();

    assert_eq!(user_bets.len(), 1);
    assert_eq!(user_bets[0].amount, Some(10.0));
    assert_eq!(market_bets.len(), 2);
    assert_eq!(market_bets[0].contract_id.as_deref(), Some("m1"));
}

#[tokio::test]
async fn get_user_reads_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/user/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "alice",
            "name": "Alice",
            "balance": 1234.5
        })))
        .mount(&server)
        .await;

    let user = client_for(&server).get_user("alice").await.unwrap();

    assert_eq!(user.name.as_deref(), Some("Alice"));
    assert_eq!(user.balance, Some(1234.5));
}

#[tokio::test]
async fn get_user_positions_reads_holdings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/user/alice/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"contractId": "m1", "hasShares": true, "invested": 50, "profit": 12.5},
            {"contractId": "m2", "hasShares": false, "invested": 10, "profit": -10}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let positions = client_for(&server)
        .get_user_positions("alice")
        .await
        .unwrap();

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].contract_id.as_deref(), Some("m1"));
    assert_eq!(positions[0].invested, Some(50.0));
    assert_eq!(positions[1].has_shares, Some(false));
    assert_eq!(positions[1].profit, Some(-10.0));
}

#[tokio::test]
async fn get_user_positions_reports_unknown_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/user/nobody/positions"))
        .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_user_positions("nobody")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Status { status: 404, ref endpoint, .. } if endpoint == "/user/nobody/positions"
    ));
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/market/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("market not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_market("missing").await.unwrap_err();

    match err {
        ClientError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "/market/missing");
            assert_eq!(status, 404);
            assert_eq!(body, "market not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_markets(1, None).await.unwrap_err();

    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn basic_check_passes_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/markets"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"question": "Will X happen by 2030?"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let outcome = run_basic_check(move || Ok(client), &mut out).await;
    let output = String::from_utf8(out).unwrap();

    assert_eq!(outcome.exit_status(), 0);
    assert!(output.contains("✅ Successfully fetched 1 market(s)"));
    assert!(output.contains("   Sample market: Will X happen by 2030?..."));
}

#[tokio::test]
async fn basic_check_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/markets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let outcome = run_basic_check(move || Ok(client), &mut out).await;
    let output = String::from_utf8(out).unwrap();

    assert_eq!(outcome.exit_status(), 1);
    assert!(matches!(
        outcome,
        CheckOutcome::Failed(CheckError::Fetch(ClientError::Status { status: 500, .. }))
    ));
    assert!(output.contains("❌ Test failed: failed to fetch markets: /markets returned HTTP 500"));
}

#[tokio::test]
async fn basic_check_fails_when_nothing_listens() {
    // Port 9 (discard) has no listener on a test host.
    let config = Config {
        manifold_http_timeout_ms: Some(2_000),
        ..Config::with_api_url("http://127.0.0.1:9/v0")
    };
    let client = ManifoldClient::new(&config).unwrap();

    let mut out = Vec::new();
    let outcome = run_basic_check(move || Ok(client), &mut out).await;
    let output = String::from_utf8(out).unwrap();

    assert_eq!(outcome.exit_status(), 1);
    assert!(matches!(
        outcome,
        CheckOutcome::Failed(CheckError::Fetch(ClientError::Http(_)))
    ));
    assert!(output.contains("❌ Test failed: failed to fetch markets: http request failed"));

    let CheckOutcome::Failed(err) = &outcome else {
        unreachable!();
    };
    let chain = error_chain(err);
    assert_eq!(chain[1], "http request failed");
    for pair in chain.windows(2) {
        assert!(!pair[0].contains(pair[1].as_str()), "{:?} repeats its cause", pair[0]);
    }
}
