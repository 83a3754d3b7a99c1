//! Integration tests for the HTTP transport against an in-process fake subgraph

use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use subgraph_data::{
    chains::{EndpointTable, SupportedChainId},
    dispatcher::SubgraphDispatcher,
    models::graphql::GraphQlRequest,
    queries::{AllV3TicksArgs, FeeTierDistributionArgs, ALL_V3_TICKS_QUERY},
    transport::{ClientError, GraphQlTransport, HttpTransport, CLIENT_ERROR, TRANSPORT_ERROR},
};

/// Echoes the received GraphQL body back under `data`
async fn echo(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": { "echo": body.into_inner() } }))
}

async fn graphql_errors() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "errors": [{ "message": "Failed to decode `BigInt` value: `abc`" }]
    }))
}

async fn unavailable() -> HttpResponse {
    HttpResponse::BadGateway()
        .content_type("text/plain")
        .body("upstream unavailable")
}

/// Spawns a fake subgraph on a free port and returns its base URL and handle
fn spawn_fake_subgraph() -> (String, ServerHandle) {
    let server = HttpServer::new(|| {
        App::new()
            .route("/subgraphs/name/echo", web::post().to(echo))
            .route("/subgraphs/name/errors", web::post().to(graphql_errors))
            .route("/subgraphs/name/down", web::post().to(unavailable))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Could not bind fake subgraph");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{addr}"), handle)
}

/// URL on a port nothing listens on
fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Could not bind to port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/subgraphs/name/gone")
}

fn ticks_request() -> GraphQlRequest {
    AllV3TicksArgs::new("0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8")
        .with_skip(1000)
        .into_request()
        .to_graphql()
}

#[actix_web::test]
async fn test_success_returns_data_member() {
    let (base, handle) = spawn_fake_subgraph();

    let data = HttpTransport::new()
        .request(&format!("{base}/subgraphs/name/echo"), &ticks_request())
        .await
        .unwrap();

    // The body on the wire is exactly {query, variables}
    assert_eq!(data["echo"]["query"], ALL_V3_TICKS_QUERY);
    assert_eq!(data["echo"]["variables"]["skip"], 1000);
    assert_eq!(data["echo"].as_object().unwrap().len(), 2);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_graphql_errors_become_client_error() {
    let (base, handle) = spawn_fake_subgraph();

    let report = HttpTransport::new()
        .request(&format!("{base}/subgraphs/name/errors"), &ticks_request())
        .await
        .unwrap_err();
    let error = report.downcast::<ClientError>().unwrap();

    assert_eq!(error.name, CLIENT_ERROR);
    assert!(error.message.starts_with("Failed to decode `BigInt` value: `abc`: "));
    assert_eq!(error.request, ticks_request());
    let response = error.response.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.errors.unwrap().len(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_non_json_error_status_becomes_client_error() {
    let (base, handle) = spawn_fake_subgraph();

    let report = HttpTransport::new()
        .request(&format!("{base}/subgraphs/name/down"), &ticks_request())
        .await
        .unwrap_err();
    let error = report.downcast::<ClientError>().unwrap();

    assert!(error.message.starts_with("GraphQL Error (Code: 502): "));
    let response = error.response.unwrap();
    assert_eq!(response.status, 502);
    assert_eq!(response.error.as_deref(), Some("upstream unavailable"));
    assert!(response.headers.contains_key("content-type"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_connection_refused_is_a_transport_error() {
    let report = HttpTransport::new()
        .request(&closed_port_url(), &ticks_request())
        .await
        .unwrap_err();
    let error = report.downcast::<ClientError>().unwrap();

    assert_eq!(error.name, TRANSPORT_ERROR);
    assert!(error.response.is_none());
}

#[actix_web::test]
async fn test_malformed_url_is_not_a_client_error() {
    let report = HttpTransport::new()
        .request("not a url", &ticks_request())
        .await
        .unwrap_err();

    assert!(report.downcast_ref::<ClientError>().is_none());
}

#[actix_web::test]
async fn test_dispatcher_over_http() {
    let (base, handle) = spawn_fake_subgraph();
    let endpoints = EndpointTable::from_entries([
        (SupportedChainId::Mainnet, format!("{base}/subgraphs/name/echo")),
        (SupportedChainId::Optimism, format!("{base}/subgraphs/name/errors")),
    ]);
    let dispatcher = SubgraphDispatcher::new(Arc::new(endpoints), Arc::new(HttpTransport::new()));

    let outcome = dispatcher
        .fee_tier_distribution(&1u64, FeeTierDistributionArgs::new("A", "B"))
        .await
        .unwrap();
    let data = outcome.data().unwrap();
    assert_eq!(data["echo"]["variables"], json!({ "token0": "A", "token1": "B" }));

    let outcome = dispatcher
        .fee_tier_distribution(&10u64, FeeTierDistributionArgs::new("A", "B"))
        .await
        .unwrap();
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.error.name, CLIENT_ERROR);
    let meta = failure.meta.as_ref().unwrap();
    assert_eq!(meta.request.as_ref().unwrap().variables["token1"], "B");
    assert_eq!(meta.response.as_ref().unwrap().status, 200);

    // Rinkeby is supported but missing from this table
    let outcome = dispatcher
        .all_v3_ticks(&4u64, AllV3TicksArgs::new("0x1"))
        .await
        .unwrap();
    assert!(outcome.failure().unwrap().is_unsupported_network());

    handle.stop(true).await;
}
