use crate::{
    cache::DataApi,
    chains::SupportedChainId,
    error::ServiceError,
    models::outcome::QueryOutcome,
    queries::{AllPositionsArgs, AllV3TicksArgs, FeeTierDistributionArgs},
    state::{ActiveChain, ApplicationState},
};
use actix_web::{get, post, put, web, HttpResponse};
use alloy_primitives::ChainId;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Body of `PUT /api/v1/network`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSelection {
    pub chain_id: Option<ChainId>,
}

/// Active chain as reported by `GET /api/v1/network`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub chain_id: Option<ChainId>,
    pub supported: bool,
    pub subgraph_url: Option<String>,
}

fn network_status(api: &DataApi, state: &ApplicationState) -> NetworkStatus {
    let chain_id = state.chain_id();
    let subgraph_url = chain_id
        .and_then(|id| api.dispatcher().endpoints().subgraph_url(id))
        .map(str::to_string);

    NetworkStatus {
        chain_id,
        supported: subgraph_url.is_some(),
        subgraph_url,
    }
}

/// Turn a query result into an HTTP response
///
/// Outcomes are always returned as bodies; only faults become service errors.
fn outcome_response(operation: &str, result: Result<QueryOutcome>) -> Result<HttpResponse, ServiceError> {
    match result {
        Ok(outcome @ QueryOutcome::Success { .. }) => {
            info!("{} succeeded", operation);
            Ok(HttpResponse::Ok().json(outcome))
        }
        Ok(QueryOutcome::Failure(failure)) => {
            info!("{} failed: {}", operation, failure.error.name);
            let mut response = if failure.is_unsupported_network() {
                HttpResponse::BadRequest()
            } else {
                HttpResponse::BadGateway()
            };
            Ok(response.json(QueryOutcome::Failure(failure)))
        }
        Err(e) => {
            error!("{} faulted: {:?}", operation, e);
            Err(ServiceError::Subgraph(format!("{e:#}")))
        }
    }
}

/// Ticks of a pool on the active chain
#[post("/api/v1/subgraph/ticks")]
async fn all_v3_ticks(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
    args: web::Json<AllV3TicksArgs>,
) -> Result<HttpResponse, ServiceError> {
    let result = api.all_v3_ticks(state.get_ref().as_ref(), args.into_inner()).await;
    outcome_response("allV3Ticks", result)
}

/// Positions of an owner on the active chain
#[post("/api/v1/subgraph/positions")]
async fn all_positions(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
    args: web::Json<AllPositionsArgs>,
) -> Result<HttpResponse, ServiceError> {
    let result = api.all_positions(state.get_ref().as_ref(), args.into_inner()).await;
    outcome_response("allPositions", result)
}

/// Fee tier distribution of a token pair on the active chain
#[post("/api/v1/subgraph/fee-tier-distribution")]
async fn fee_tier_distribution(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
    args: web::Json<FeeTierDistributionArgs>,
) -> Result<HttpResponse, ServiceError> {
    let result = api
        .fee_tier_distribution(state.get_ref().as_ref(), args.into_inner())
        .await;
    outcome_response("feeTierDistribution", result)
}

#[get("/api/v1/network")]
async fn get_network(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
) -> HttpResponse {
    HttpResponse::Ok().json(network_status(&api, &state))
}

/// Select the active chain; any id is accepted
#[put("/api/v1/network")]
async fn set_network(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
    selection: web::Json<NetworkSelection>,
) -> Result<HttpResponse, ServiceError> {
    if selection.chain_id == Some(0) {
        return Err(ServiceError::InvalidChain("chain id 0 is reserved".to_string()));
    }

    let previous = state.set_chain_id(selection.chain_id);
    info!(
        "Active chain changed from {:?} to {:?} (supported: {})",
        previous,
        selection.chain_id,
        selection
            .chain_id
            .and_then(SupportedChainId::from_chain_id)
            .is_some()
    );

    Ok(HttpResponse::Ok().json(network_status(&api, &state)))
}

#[post("/api/v1/cache/invalidate")]
async fn invalidate_cache(api: web::Data<Arc<DataApi>>) -> HttpResponse {
    info!("Cache invalidation requested");
    api.invalidate_all();
    HttpResponse::NoContent().finish()
}

/// Service health check reporting the active network and cache size
#[post("/api/v1/health")]
async fn health_check(
    api: web::Data<Arc<DataApi>>,
    state: web::Data<Arc<ApplicationState>>,
) -> HttpResponse {
    info!("Health check requested");

    let network = network_status(&api, &state);
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "chainId": network.chain_id,
        "supported": network.supported,
        "cachedEntries": api.entry_count(),
    }))
}

/// Configure the API routes for the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(all_v3_ticks)
        .service(all_positions)
        .service(fee_tier_distribution)
        .service(get_network)
        .service(set_network)
        .service(invalidate_cache)
        .service(health_check);
}
