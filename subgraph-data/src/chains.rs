use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Networks with a hosted Uniswap v3 subgraph
///
/// The discriminants are the EIP-155 chain ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum SupportedChainId {
    Mainnet = 1,
    Rinkeby = 4,
    Optimism = 10,
    ArbitrumOne = 42161,
}

impl SupportedChainId {
    pub const ALL: [SupportedChainId; 4] = [
        SupportedChainId::Mainnet,
        SupportedChainId::Rinkeby,
        SupportedChainId::Optimism,
        SupportedChainId::ArbitrumOne,
    ];

    pub fn chain_id(self) -> ChainId {
        self as ChainId
    }

    pub fn from_chain_id(chain_id: ChainId) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.chain_id() == chain_id)
    }

    /// Suffix of the `SUBGRAPH_URL_*` variable that overrides this chain's endpoint
    pub fn env_suffix(self) -> &'static str {
        match self {
            SupportedChainId::Mainnet => "MAINNET",
            SupportedChainId::Rinkeby => "RINKEBY",
            SupportedChainId::Optimism => "OPTIMISM",
            SupportedChainId::ArbitrumOne => "ARBITRUM_ONE",
        }
    }

    pub fn default_subgraph_url(self) -> &'static str {
        match self {
            SupportedChainId::Mainnet => {
                "https://api.thegraph.com/subgraphs/name/archmage-finance/uniswap-v3"
            }
            SupportedChainId::Rinkeby => "https://api.thegraph.com/subgraphs/name/ianlapham/uniswap-v3",
            SupportedChainId::Optimism => {
                "https://api.thegraph.com/subgraphs/name/ianlapham/uniswap-optimism-dev"
            }
            SupportedChainId::ArbitrumOne => {
                "https://api.thegraph.com/subgraphs/name/ianlapham/arbitrum-minimal"
            }
        }
    }
}

impl TryFrom<ChainId> for SupportedChainId {
    type Error = ChainId;

    fn try_from(chain_id: ChainId) -> Result<Self, Self::Error> {
        Self::from_chain_id(chain_id).ok_or(chain_id)
    }
}

/// Subgraph endpoint per chain
///
/// Built once at startup and shared read-only afterwards. Only one subgraph is
/// queried at a time: the one belonging to the active chain.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    urls: HashMap<ChainId, String>,
}

impl EndpointTable {
    /// Build a table from explicit entries, ignoring the hosted defaults
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SupportedChainId, S)>,
        S: Into<String>,
    {
        Self {
            urls: entries
                .into_iter()
                .map(|(chain, url)| (chain.chain_id(), url.into()))
                .collect(),
        }
    }

    /// Replace the endpoint of a single chain
    pub fn with_override(mut self, chain: SupportedChainId, url: impl Into<String>) -> Self {
        self.urls.insert(chain.chain_id(), url.into());
        self
    }

    /// Look up the subgraph URL for a chain; absence is a normal result
    pub fn subgraph_url(&self, chain_id: ChainId) -> Option<&str> {
        self.urls.get(&chain_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::from_entries(
            SupportedChainId::ALL
                .into_iter()
                .map(|chain| (chain, chain.default_subgraph_url())),
        )
    }
}
