use alloy_primitives::ChainId;
use std::sync::RwLock;

/// Read access to the chain the application is currently connected to
pub trait ActiveChain {
    fn chain_id(&self) -> Option<ChainId>;
}

impl ActiveChain for Option<ChainId> {
    fn chain_id(&self) -> Option<ChainId> {
        *self
    }
}

impl ActiveChain for ChainId {
    fn chain_id(&self) -> Option<ChainId> {
        Some(*self)
    }
}

/// Application-wide state shared by the HTTP handlers
///
/// Holds the active chain id. Any id can be selected, including ones without a
/// subgraph; queries against those fail with an unsupported-network outcome.
#[derive(Debug, Default)]
pub struct ApplicationState {
    chain_id: RwLock<Option<ChainId>>,
}

impl ApplicationState {
    pub fn new(chain_id: Option<ChainId>) -> Self {
        Self {
            chain_id: RwLock::new(chain_id),
        }
    }

    /// Switch the active chain, returning the previous one
    pub fn set_chain_id(&self, chain_id: Option<ChainId>) -> Option<ChainId> {
        let mut guard = self
            .chain_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, chain_id)
    }
}

impl ActiveChain for ApplicationState {
    fn chain_id(&self) -> Option<ChainId> {
        *self
            .chain_id
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
