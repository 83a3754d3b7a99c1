use alloy_primitives::ChainId;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_MAX_CAPACITY, DEFAULT_CACHE_TTL_SECS};
use crate::chains::{EndpointTable, SupportedChainId};

/// Service configuration structure
///
/// This structure contains all the configuration parameters for the subgraph data service.
/// It handles loading values from environment variables with appropriate defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Host address to bind the server to (default: 127.0.0.1)
    pub host: String,

    /// Port to listen on (default: 8080)
    pub port: u16,

    /// Chain selected at startup; unset means no active chain
    pub chain_id: Option<ChainId>,

    /// Lifetime of a cached query result in seconds (default: 60)
    pub cache_ttl_secs: u64,

    /// Maximum number of cached query results (default: 1000)
    pub cache_max_capacity: u64,

    /// Per-chain replacements for the hosted subgraph URLs
    pub subgraph_urls: Vec<(SupportedChainId, String)>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first if one exists.
    ///
    /// # Environment Variables
    ///
    /// * `HOST` - Server host address (default: "127.0.0.1")
    /// * `PORT` - Server port (default: 8080)
    /// * `CHAIN_ID` - Initially active chain id (default: none)
    /// * `CACHE_TTL_SECS` - Cached result lifetime (default: 60)
    /// * `CACHE_MAX_CAPACITY` - Cached result bound (default: 1000)
    /// * `SUBGRAPH_URL_MAINNET`, `SUBGRAPH_URL_RINKEBY`, `SUBGRAPH_URL_OPTIMISM`,
    ///   `SUBGRAPH_URL_ARBITRUM_ONE` - Subgraph URL overrides
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain_id = match lookup("CHAIN_ID").filter(|value| !value.trim().is_empty()) {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<ChainId>()
                    .wrap_err_with(|| format!("Invalid CHAIN_ID '{value}'"))?,
            ),
            None => None,
        };

        let subgraph_urls = SupportedChainId::ALL
            .into_iter()
            .filter_map(|chain| {
                lookup(&format!("SUBGRAPH_URL_{}", chain.env_suffix())).map(|url| (chain, url))
            })
            .collect();

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .wrap_err("Invalid PORT")?,
            chain_id,
            cache_ttl_secs: lookup("CACHE_TTL_SECS")
                .map(|value| value.parse::<u64>())
                .transpose()
                .wrap_err("Invalid CACHE_TTL_SECS")?
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            cache_max_capacity: lookup("CACHE_MAX_CAPACITY")
                .map(|value| value.parse::<u64>())
                .transpose()
                .wrap_err("Invalid CACHE_MAX_CAPACITY")?
                .unwrap_or(DEFAULT_CACHE_MAX_CAPACITY),
            subgraph_urls,
        })
    }

    /// Hosted subgraph endpoints with the configured overrides applied
    pub fn endpoint_table(&self) -> EndpointTable {
        self.subgraph_urls
            .iter()
            .fold(EndpointTable::default(), |table, (chain, url)| {
                table.with_override(*chain, url.clone())
            })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
