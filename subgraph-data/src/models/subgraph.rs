//! Typed views of the Uniswap v3 subgraph payloads
//!
//! The subgraph encodes `BigInt` and `BigDecimal` scalars as JSON strings, so
//! they are kept as strings here and parsed on demand with the helpers below.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parse an unsigned `BigInt` (decimal string) such as a fee growth accumulator
pub fn parse_big_uint(value: &str) -> Result<U256, String> {
    U256::from_str_radix(value, 10).map_err(|e| format!("Invalid unsigned BigInt '{value}': {e}"))
}

/// Parse a signed `BigInt` such as `liquidityNet` or a tick index
pub fn parse_big_int(value: &str) -> Result<i128, String> {
    value
        .parse::<i128>()
        .map_err(|e| format!("Invalid BigInt '{value}': {e}"))
}

/// Parse a `BigDecimal` such as a price or a USD amount
pub fn parse_big_decimal(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|e| format!("Invalid BigDecimal '{value}': {e}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllV3TicksData {
    pub ticks: Vec<TickData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickData {
    pub tick_idx: String,
    pub liquidity_net: String,
    pub price0: String,
    pub price1: String,
}

impl TickData {
    pub fn tick_index(&self) -> Result<i32, String> {
        let tick = parse_big_int(&self.tick_idx)?;
        i32::try_from(tick).map_err(|_| format!("Tick index out of range: {tick}"))
    }

    pub fn net_liquidity(&self) -> Result<i128, String> {
        parse_big_int(&self.liquidity_net)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllPositionsData {
    pub positions: Vec<PositionData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
    pub id: String,
    pub liquidity: String,
    #[serde(rename = "amountDepositedUSD")]
    pub amount_deposited_usd: String,
    #[serde(rename = "amountWithdrawnUSD")]
    pub amount_withdrawn_usd: String,
    #[serde(rename = "amountCollectedUSD")]
    pub amount_collected_usd: String,
    pub deposited_token0: String,
    pub deposited_token1: String,
    pub withdrawn_token0: String,
    pub withdrawn_token1: String,
    pub collected_fees_token0: String,
    pub collected_fees_token1: String,
    #[serde(rename = "feeGrowthInside0LastX128")]
    pub fee_growth_inside0_last_x128: String,
    #[serde(rename = "feeGrowthInside1LastX128")]
    pub fee_growth_inside1_last_x128: String,
    pub transaction: PositionTransaction,
    pub tick_lower: PositionTick,
    pub tick_upper: PositionTick,
    pub pool: PositionPool,
    pub token0: PositionToken,
    pub token1: PositionToken,
}

impl PositionData {
    /// Position NFT token id
    pub fn token_id(&self) -> Result<U256, String> {
        parse_big_uint(&self.id)
    }

    /// Fee growth inside the range as of the last position update, token0 and token1
    pub fn fee_growth_inside_last(&self) -> Result<(U256, U256), String> {
        Ok((
            parse_big_uint(&self.fee_growth_inside0_last_x128)?,
            parse_big_uint(&self.fee_growth_inside1_last_x128)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTransaction {
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTick {
    pub tick_idx: String,
    #[serde(rename = "feeGrowthOutside0X128")]
    pub fee_growth_outside0_x128: String,
    #[serde(rename = "feeGrowthOutside1X128")]
    pub fee_growth_outside1_x128: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPool {
    #[serde(rename = "feeGrowthGlobal0X128")]
    pub fee_growth_global0_x128: String,
    #[serde(rename = "feeGrowthGlobal1X128")]
    pub fee_growth_global1_x128: String,
    /// Current tick; null until the pool is initialized
    pub tick: Option<String>,
    pub liquidity: String,
    pub fee_tier: String,
    pub pool_day_data: Vec<PoolDayData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDayData {
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
    /// Unix timestamp of the start of the day
    pub date: i64,
    pub token0_price: String,
    pub token1_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionToken {
    #[serde(rename = "derivedETH")]
    pub derived_eth: String,
    pub decimals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTierDistributionData {
    #[serde(rename = "_meta")]
    pub meta: Option<SubgraphMeta>,
    pub as_token0: Vec<FeeTierPool>,
    pub as_token1: Vec<FeeTierPool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphMeta {
    pub block: SubgraphBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphBlock {
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTierPool {
    pub fee_tier: String,
    pub total_value_locked_token0: String,
    pub total_value_locked_token1: String,
}

/// Value locked in the requested token0 and token1 for one fee tier
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeeTierTvl {
    pub token0: f64,
    pub token1: f64,
}

impl FeeTierDistributionData {
    /// Block the subgraph had indexed when it answered
    pub fn indexed_block(&self) -> Option<u64> {
        self.meta.as_ref().map(|meta| meta.block.number)
    }

    /// Sum the value locked per fee tier over both token orderings
    ///
    /// Pools in `as_token1` store the pair reversed, so their locked amounts
    /// are swapped back into the caller's token0/token1 terms.
    pub fn tvl_by_fee_tier(&self) -> Result<BTreeMap<u32, FeeTierTvl>, String> {
        let mut tiers: BTreeMap<u32, FeeTierTvl> = BTreeMap::new();

        for (pool, reversed) in self
            .as_token0
            .iter()
            .map(|pool| (pool, false))
            .chain(self.as_token1.iter().map(|pool| (pool, true)))
        {
            let fee_tier = pool
                .fee_tier
                .parse::<u32>()
                .map_err(|e| format!("Invalid fee tier '{}': {e}", pool.fee_tier))?;
            let locked0 = parse_big_decimal(&pool.total_value_locked_token0)?;
            let locked1 = parse_big_decimal(&pool.total_value_locked_token1)?;
            let (token0, token1) = if reversed { (locked1, locked0) } else { (locked0, locked1) };

            let entry = tiers.entry(fee_tier).or_default();
            entry.token0 += token0;
            entry.token1 += token1;
        }

        Ok(tiers)
    }
}
