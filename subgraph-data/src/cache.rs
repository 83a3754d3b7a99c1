use alloy_primitives::ChainId;
use eyre::Result;
use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::{
    dispatcher::SubgraphDispatcher,
    models::outcome::{QueryFailure, QueryOutcome},
    queries::{AllPositionsArgs, AllV3TicksArgs, FeeTierDistributionArgs, QueryRequest},
    state::ActiveChain,
};

/// Seconds a successful result stays cached
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Upper bound on cached results
pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 1000;

/// Identity of a cached result: operation, chain and serialized variables
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub chain_id: ChainId,
    pub variables: String,
}

/// Why a fetch produced nothing to cache
enum Miss {
    Failure(QueryFailure),
    Fault(eyre::Report),
}

/// Cached front of a [`SubgraphDispatcher`]
///
/// Successful payloads are kept per chain for a fixed time. Failures are handed
/// back without being stored, so the next call retries. Identical requests
/// that arrive while one is in flight wait for it instead of sending again.
#[derive(Clone)]
pub struct DataApi {
    dispatcher: SubgraphDispatcher,
    cache: Cache<CacheKey, Value>,
}

impl DataApi {
    pub fn new(dispatcher: SubgraphDispatcher, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { dispatcher, cache }
    }

    pub fn dispatcher(&self) -> &SubgraphDispatcher {
        &self.dispatcher
    }

    pub async fn all_v3_ticks(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: AllV3TicksArgs,
    ) -> Result<QueryOutcome> {
        self.query(active.chain_id(), args.into_request()).await
    }

    pub async fn all_positions(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: AllPositionsArgs,
    ) -> Result<QueryOutcome> {
        self.query(active.chain_id(), args.into_request()).await
    }

    pub async fn fee_tier_distribution(
        &self,
        active: &(impl ActiveChain + ?Sized),
        args: FeeTierDistributionArgs,
    ) -> Result<QueryOutcome> {
        self.query(active.chain_id(), args.into_request()).await
    }

    /// Serve `request` from the cache, fetching it on a miss
    pub async fn query(&self, chain_id: Option<ChainId>, request: QueryRequest) -> Result<QueryOutcome> {
        // Nothing to key on; the dispatcher reports the unsupported network
        let Some(id) = chain_id else {
            return self.dispatcher.execute(None, request).await;
        };

        let key = CacheKey {
            operation: request.name,
            chain_id: id,
            variables: request.variables.to_string(),
        };

        let fetch = async {
            debug!("Cache miss for {} on chain {}", request.name, id);
            match self.dispatcher.execute(chain_id, request.clone()).await {
                Ok(QueryOutcome::Success { data }) => Ok(data),
                Ok(QueryOutcome::Failure(failure)) => Err(Miss::Failure(failure)),
                Err(report) => Err(Miss::Fault(report)),
            }
        };

        match self.cache.try_get_with(key, fetch).await {
            Ok(data) => Ok(QueryOutcome::Success { data }),
            Err(miss) => match Arc::try_unwrap(miss) {
                Ok(Miss::Failure(failure)) => Ok(QueryOutcome::Failure(failure)),
                Ok(Miss::Fault(report)) => Err(report),
                // Another waiter still holds the shared error. Only the caller that
                // unwraps the Arc gets the original report; the rest get its
                // rendered message.
                Err(shared) => match shared.as_ref() {
                    Miss::Failure(failure) => Ok(QueryOutcome::Failure(failure.clone())),
                    Miss::Fault(report) => Err(eyre::eyre!("{:#}", report)),
                },
            },
        }
    }

    /// Drop every cached result
    pub fn invalidate_all(&self) {
        debug!("Invalidating {} cached subgraph results", self.cache.entry_count());
        self.cache.invalidate_all();
    }

    /// Drop the cached result of one request on one chain
    pub async fn invalidate(&self, chain_id: ChainId, request: &QueryRequest) {
        let key = CacheKey {
            operation: request.name,
            chain_id,
            variables: request.variables.to_string(),
        };
        self.cache.invalidate(&key).await;
    }

    /// Approximate number of cached results
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
