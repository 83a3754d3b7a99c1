//! Fixed subgraph query documents and their arguments
//!
//! The document texts are part of the contract with the indexing service and
//! are sent verbatim. Arguments deserialize from camelCase JSON with the same
//! defaults a caller gets from the constructors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::graphql::GraphQlRequest;

pub const ALL_V3_TICKS: &str = "allV3Ticks";
pub const ALL_POSITIONS: &str = "allPositions";
pub const FEE_TIER_DISTRIBUTION: &str = "feeTierDistribution";

pub const ALL_V3_TICKS_QUERY: &str = r#"
  query allV3Ticks($poolAddress: String!, $skip: Int!) {
    ticks(first: 1000, skip: $skip, where: { poolAddress: $poolAddress }, orderBy: tickIdx) {
      tickIdx
      liquidityNet
      price0
      price1
    }
  }
"#;

pub const ALL_POSITIONS_QUERY: &str = r#"
  query allPositions($owner: Bytes!, $poolAddress: String!, $tokenId: ID!, $num: Int!) {
    positions(first: $num, where: { owner_contains: $owner, pool_contains: $poolAddress, id_gte: $tokenId }) {
      id
      liquidity
      amountDepositedUSD
      amountWithdrawnUSD
      amountCollectedUSD
      depositedToken0
      depositedToken1
      withdrawnToken0
      withdrawnToken1
      collectedFeesToken0
      collectedFeesToken1
      feeGrowthInside0LastX128
      feeGrowthInside1LastX128
      transaction {
        timestamp
      }
      tickLower {
        tickIdx
        feeGrowthOutside0X128
        feeGrowthOutside1X128
      }
      tickUpper {
        tickIdx
        feeGrowthOutside0X128
        feeGrowthOutside1X128
      }
      pool {
        feeGrowthGlobal0X128
        feeGrowthGlobal1X128
        tick
        liquidity
        feeTier
        poolDayData(first: 672, skip: 0, orderBy: date, orderDirection: desc) {
          volumeUSD
          date
          token0Price
          token1Price
        }
      }
      token0 {
        derivedETH
        decimals
      }
      token1 {
        derivedETH
        decimals
      }
    }
  }
"#;

pub const FEE_TIER_DISTRIBUTION_QUERY: &str = r#"
  query feeTierDistribution($token0: String!, $token1: String!) {
    _meta {
      block {
        number
      }
    }
    asToken0: pools(
      orderBy: totalValueLockedToken0
      orderDirection: desc
      where: { token0: $token0, token1: $token1 }
    ) {
      feeTier
      totalValueLockedToken0
      totalValueLockedToken1
    }
    asToken1: pools(
      orderBy: totalValueLockedToken0
      orderDirection: desc
      where: { token0: $token1, token1: $token0 }
    ) {
      feeTier
      totalValueLockedToken0
      totalValueLockedToken1
    }
  }
"#;

/// Page size of `allPositions` when the caller gives none
pub const DEFAULT_POSITIONS_NUM: i32 = 1000;

/// A named query document together with its bound variables
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Operation name, also used as the cache namespace
    pub name: &'static str,
    pub document: &'static str,
    pub variables: Value,
}

impl QueryRequest {
    pub fn to_graphql(&self) -> GraphQlRequest {
        GraphQlRequest {
            query: self.document.to_string(),
            variables: self.variables.clone(),
        }
    }
}

/// Arguments of `allV3Ticks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllV3TicksArgs {
    pub pool_address: String,
    #[serde(default)]
    pub skip: i32,
}

impl AllV3TicksArgs {
    pub fn new(pool_address: impl Into<String>) -> Self {
        Self {
            pool_address: pool_address.into(),
            skip: 0,
        }
    }

    pub fn with_skip(mut self, skip: i32) -> Self {
        self.skip = skip;
        self
    }

    pub fn into_request(self) -> QueryRequest {
        QueryRequest {
            name: ALL_V3_TICKS,
            document: ALL_V3_TICKS_QUERY,
            variables: json!({
                "poolAddress": self.pool_address,
                "skip": self.skip,
            }),
        }
    }
}

fn default_pool_address() -> String {
    "0x".to_string()
}

fn default_token_id() -> String {
    "0".to_string()
}

fn default_num() -> i32 {
    DEFAULT_POSITIONS_NUM
}

/// Arguments of `allPositions`
///
/// `owner` and `pool_address` are substring filters and `token_id` is a lower
/// bound; all three are forwarded as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllPositionsArgs {
    pub owner: String,
    #[serde(default = "default_pool_address")]
    pub pool_address: String,
    #[serde(default = "default_token_id")]
    pub token_id: String,
    #[serde(default = "default_num")]
    pub num: i32,
}

impl AllPositionsArgs {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            pool_address: default_pool_address(),
            token_id: default_token_id(),
            num: DEFAULT_POSITIONS_NUM,
        }
    }

    pub fn with_pool_address(mut self, pool_address: impl Into<String>) -> Self {
        self.pool_address = pool_address.into();
        self
    }

    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = token_id.into();
        self
    }

    pub fn with_num(mut self, num: i32) -> Self {
        self.num = num;
        self
    }

    pub fn into_request(self) -> QueryRequest {
        QueryRequest {
            name: ALL_POSITIONS,
            document: ALL_POSITIONS_QUERY,
            variables: json!({
                "owner": self.owner,
                "poolAddress": self.pool_address,
                "tokenId": self.token_id,
                "num": self.num,
            }),
        }
    }
}

/// Arguments of `feeTierDistribution`; the pair is unordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTierDistributionArgs {
    pub token0: String,
    pub token1: String,
}

impl FeeTierDistributionArgs {
    pub fn new(token0: impl Into<String>, token1: impl Into<String>) -> Self {
        Self {
            token0: token0.into(),
            token1: token1.into(),
        }
    }

    pub fn into_request(self) -> QueryRequest {
        QueryRequest {
            name: FEE_TIER_DISTRIBUTION,
            document: FEE_TIER_DISTRIBUTION_QUERY,
            variables: json!({
                "token0": self.token0,
                "token1": self.token1,
            }),
        }
    }
}
