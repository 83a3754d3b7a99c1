use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use subgraph_data::{
    api,
    cache::DataApi,
    config::Config,
    dispatcher::SubgraphDispatcher,
    state::ApplicationState,
    transport::HttpTransport,
};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

/// Application entry point
///
/// This is the main function that:
/// 1. Sets up logging
/// 2. Loads configuration
/// 3. Builds the subgraph endpoint table and the cached dispatcher
/// 4. Starts the HTTP server with all endpoints
#[actix_web::main]
async fn main() -> eyre::Result<()> {
    // Info level for our service, quieter dependencies
    let filter = EnvFilter::from_default_env()
        .add_directive("subgraph_data=info".parse()?)
        .add_directive("actix_web=error".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let endpoints = Arc::new(config.endpoint_table());
    info!("Serving {} subgraph endpoints", endpoints.len());

    let dispatcher = SubgraphDispatcher::new(endpoints, Arc::new(HttpTransport::new()));
    let data_api = Arc::new(DataApi::new(
        dispatcher,
        config.cache_ttl(),
        config.cache_max_capacity,
    ));
    let state = Arc::new(ApplicationState::new(config.chain_id));
    info!("Active chain at startup: {:?}", config.chain_id);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(data_api.clone()))
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
    .workers(4)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
