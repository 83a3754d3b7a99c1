use crate::{
    chains::EndpointTable,
    models::outcome::{QueryError, QueryFailure, QueryOutcome, RequestMeta},
    queries::{AllPositionsArgs, AllV3TicksArgs, FeeTierDistributionArgs, QueryRequest},
    state::ActiveChain,
    transport::{ClientError, GraphQlTransport},
};
use alloy_primitives::ChainId;
use eyre::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Routes subgraph queries to the endpoint of the active chain
///
/// Every call reads the chain once, performs at most one request and returns a
/// [`QueryOutcome`]. Unsupported chains and structured client errors become
/// failed outcomes; any other transport error is returned as `Err`.
#[derive(Clone)]
pub struct SubgraphDispatcher {
    /// Subgraph URL per chain, shared read-only
    endpoints: Arc<EndpointTable>,
    /// Network capability used for the actual request
    transport: Arc<dyn GraphQlTransport>,
}

impl SubgraphDispatcher {
    pub fn new(endpoints: Arc<EndpointTable>, transport: Arc<dyn GraphQlTransport>) -> Self {
        Self {
            endpoints,
            transport,
        }
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Up to 1000 ticks of a pool, ordered by tick index
    pub async fn all_v3_ticks(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: AllV3TicksArgs,
    ) -> Result<QueryOutcome> {
        self.execute(active.chain_id(), args.into_request()).await
    }

    /// Positions of an owner with their pool, tick and token context
    pub async fn all_positions(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: AllPositionsArgs,
    ) -> Result<QueryOutcome> {
        self.execute(active.chain_id(), args.into_request()).await
    }

    /// Pools of a token pair in both orderings, by fee tier
    pub async fn fee_tier_distribution(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: FeeTierDistributionArgs,
    ) -> Result<QueryOutcome> {
        self.execute(active.chain_id(), args.into_request()).await
    }

    /// Run a prepared query against the subgraph of `chain_id`
    #[instrument(skip(self, request), fields(operation = request.name), err)]
    pub async fn execute(
        &self,
        chain_id: Option<ChainId>,
        request: QueryRequest,
    ) -> Result<QueryOutcome> {
        let Some(url) = chain_id.and_then(|id| self.endpoints.subgraph_url(id)) else {
            debug!("No subgraph for chain {:?}", chain_id);
            return Ok(QueryOutcome::Failure(QueryFailure::unsupported_network(chain_id)));
        };

        debug!("Querying {} at {}", request.name, url);
        let graphql_request = request.to_graphql();

        match self.transport.request(url, &graphql_request).await {
            Ok(data) => Ok(QueryOutcome::Success { data }),
            Err(report) => match report.downcast::<ClientError>() {
                Ok(client_error) => {
                    debug!("{} failed: {}", request.name, client_error.name);
                    Ok(QueryOutcome::Failure(client_error.into()))
                }
                Err(report) => Err(report),
            },
        }
    }
}

impl From<ClientError> for QueryFailure {
    fn from(error: ClientError) -> Self {
        QueryFailure {
            error: QueryError {
                name: error.name,
                message: error.message,
                stack: error.stack,
            },
            meta: Some(RequestMeta {
                request: Some(error.request),
                response: error.response,
            }),
        }
    }
}
