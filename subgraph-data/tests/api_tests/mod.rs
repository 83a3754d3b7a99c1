//! Integration tests for the API endpoints

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use tracing_actix_web::TracingLogger;

use subgraph_data::{api, chains::SupportedChainId};

use helpers::{app_state, Reply, StubTransport};

const POOL: &str = "0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8";
const OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

macro_rules! init_app {
    ($transport:expr, $chain_id:expr) => {{
        let (data_api, state) = app_state($transport, $chain_id);
        test::init_service(
            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(data_api))
                .app_data(web::Data::new(state))
                .configure(api::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_ticks_on_supported_chain() {
    let transport = StubTransport::new(Reply::Data(json!({ "ticks": [] })));
    let app = init_app!(transport.clone(), Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/ticks")
        .set_json(json!({ "poolAddress": POOL }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "data": { "ticks": [] } }));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, SupportedChainId::Mainnet.default_subgraph_url());
    assert_eq!(calls[0].1.variables, json!({ "poolAddress": POOL, "skip": 0 }));
}

#[actix_web::test]
async fn test_positions_defaults_are_applied() {
    let transport = StubTransport::new(Reply::Data(json!({ "positions": [] })));
    let app = init_app!(transport.clone(), Some(42161));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/positions")
        .set_json(json!({ "owner": OWNER }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let calls = transport.calls();
    assert_eq!(calls[0].0, SupportedChainId::ArbitrumOne.default_subgraph_url());
    assert_eq!(
        calls[0].1.variables,
        json!({ "owner": OWNER, "poolAddress": "0x", "tokenId": "0", "num": 1000 })
    );
}

#[actix_web::test]
async fn test_unsupported_network_is_reported() {
    let transport = StubTransport::new(Reply::Data(json!({})));
    let app = init_app!(transport.clone(), Some(5));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/fee-tier-distribution")
        .set_json(json!({ "token0": "A", "token1": "B" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["name"], "UnsupportedNetwork");
    assert_eq!(
        body["error"]["message"],
        "Subgraph queries against ChainId 5 are not supported."
    );
    assert!(body.get("meta").is_none());
    assert!(transport.calls().is_empty());
}

#[actix_web::test]
async fn test_client_error_is_a_bad_gateway_outcome() {
    let transport = StubTransport::new(Reply::ClientError);
    let app = init_app!(transport, Some(10));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/ticks")
        .set_json(json!({ "poolAddress": POOL, "skip": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["name"], "ClientError");
    assert_eq!(body["error"]["message"], "indexing_error");
    assert_eq!(body["meta"]["request"]["variables"]["skip"], 1000);
}

#[actix_web::test]
async fn test_fault_is_a_service_error() {
    let transport = StubTransport::new(Reply::Fault);
    let app = init_app!(transport, Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/positions")
        .set_json(json!({ "owner": OWNER }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "SUBGRAPH_ERROR");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("unexpected payload shape"));
}

#[actix_web::test]
async fn test_switching_network_changes_endpoint() {
    let transport = StubTransport::new(Reply::Data(json!({ "ticks": [] })));
    let app = init_app!(transport.clone(), None);

    let req = test::TestRequest::get().uri("/api/v1/network").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "chainId": null, "supported": false, "subgraphUrl": null }));

    let req = test::TestRequest::put()
        .uri("/api/v1/network")
        .set_json(json!({ "chainId": 10 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["chainId"], 10);
    assert_eq!(body["supported"], true);
    assert_eq!(body["subgraphUrl"], SupportedChainId::Optimism.default_subgraph_url());

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/ticks")
        .set_json(json!({ "poolAddress": POOL }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(transport.calls()[0].0, SupportedChainId::Optimism.default_subgraph_url());
}

#[actix_web::test]
async fn test_reserved_chain_id_is_rejected() {
    let app = init_app!(StubTransport::new(Reply::Fault), Some(1));

    let req = test::TestRequest::put()
        .uri("/api/v1/network")
        .set_json(json!({ "chainId": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "INVALID_CHAIN");
}

#[actix_web::test]
async fn test_cache_and_invalidation() {
    let transport = StubTransport::new(Reply::Data(json!({ "ticks": [] })));
    let app = init_app!(transport.clone(), Some(1));

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/subgraph/ticks")
            .set_json(json!({ "poolAddress": POOL }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    assert_eq!(transport.calls().len(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/cache/invalidate")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/ticks")
        .set_json(json!({ "poolAddress": POOL }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(transport.calls().len(), 2);
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!(StubTransport::new(Reply::Fault), Some(4));

    let req = test::TestRequest::post().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chainId"], 4);
    assert_eq!(body["supported"], true);
    assert!(body.get("cachedEntries").is_some());
}

#[actix_web::test]
async fn test_missing_required_argument_is_rejected() {
    let transport = StubTransport::new(Reply::Data(json!({})));
    let app = init_app!(transport.clone(), Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/subgraph/fee-tier-distribution")
        .set_json(json!({ "token0": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(transport.calls().is_empty());
}
