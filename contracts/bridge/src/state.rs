//! State definitions for the token bridge contract
//!
//! This module defines all storage structures and state maps for the bridge.
//! Typed access goes through `cw-storage-plus`; the backing store is whatever
//! `Storage` the host hands in (chain state in production, `MockStorage` in
//! tests).

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Owner address, fixed at instantiation
    pub owner: Addr,
    /// CW20 token held in custody
    pub token: Addr,
    /// Cross-chain messenger contract
    pub messenger: Addr,
    /// Chain id of the chain this bridge is deployed on
    pub local_chain_id: u64,
    /// Minimum lock amount (inclusive)
    pub min_amount: Uint128,
    /// Maximum lock amount (inclusive)
    pub max_amount: Uint128,
}

/// Bridge statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    /// Number of successful locks
    pub total_locked: u64,
    /// Number of successful signature unlocks
    pub total_unlocked: u64,
    /// Number of successful relayed unlocks
    pub total_relayed: u64,
    /// Sum of locked amounts
    pub locked_amount: Uint128,
    /// Sum of amounts released by unlock and relay
    pub released_amount: Uint128,
}

/// Outbound message waiting for the messenger reply
#[cw_serde]
pub struct PendingOutbound {
    pub transfer_id: Binary,
    pub destination_chain_id: u64,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:token-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default page size for validator listing
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size for validator listing
pub const MAX_LIMIT: u32 = 50;

// ============================================================================
// Reply IDs
// ============================================================================

/// Lock debit (`TransferFrom` into custody), reply on error
pub const REPLY_LOCK_DEBIT: u64 = 1;

/// Outbound messenger send, reply on success
pub const REPLY_MESSAGE_SENT: u64 = 2;

/// Unlock/relay credit (`Transfer` out of custody), reply always
pub const REPLY_CREDIT: u64 = 3;

/// Owner withdraw, reply always
pub const REPLY_WITHDRAW: u64 = 4;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Bridge statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Settled transfer ids
/// Key: 32-byte transfer id, Value: always true once written
pub const PROCESSED_TRANSFERS: Map<&[u8], bool> = Map::new("processed_transfers");

/// Authorized validator addresses
/// Key: 20-byte EVM address, Value: whether authorized
pub const VALIDATORS: Map<&[u8], bool> = Map::new("validators");

/// Number of authorized validators
pub const VALIDATOR_COUNT: Item<u32> = Item::new("validator_count");

/// Reentrancy flag; present and true while an operation is in flight
pub const REENTRANCY_LOCK: Item<bool> = Item::new("reentrancy_lock");

/// Lock awaiting the messenger reply
pub const PENDING_OUTBOUND: Item<PendingOutbound> = Item::new("pending_outbound");
