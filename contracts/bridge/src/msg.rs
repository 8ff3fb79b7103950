//! Message types for the token bridge contract
//!
//! This module defines all messages for instantiation, execution, and queries,
//! plus the message the bridge sends to the cross-chain messenger.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Owner address for administrative operations (immutable)
    pub owner: String,
    /// CW20 token contract held in custody
    pub token: String,
    /// Cross-chain messenger contract
    pub messenger: String,
    /// Chain id of this chain, bound into every unlock signature
    pub local_chain_id: u64,
    /// Minimum lock amount (inclusive, non-zero)
    pub min_amount: Uint128,
    /// Maximum lock amount (inclusive)
    pub max_amount: Uint128,
    /// Initial validator EVM addresses (hex)
    pub validators: Vec<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Transfers
    // ========================================================================
    /// Lock tokens for bridging to another chain
    ///
    /// Authorization: Anyone (caller must have approved the bridge as spender)
    ///
    /// Pulls `amount` from the caller into custody and sends a relay payload
    /// to the messenger.
    Lock {
        amount: Uint128,
        /// Caller-chosen 32-byte transfer id, unique per transfer
        transfer_id: Binary,
        destination_chain_id: u64,
    },

    /// Release tokens authorized by validator signatures
    ///
    /// Authorization: Anyone holding a bundle over the canonical unlock
    /// message that exceeds two thirds of the validator set
    Unlock {
        recipient: String,
        amount: Uint128,
        /// 32-byte transfer id of the lock on the source chain
        transfer_id: Binary,
        source_chain_id: u64,
        /// 65-byte `r || s || v` signatures
        signatures: Vec<Binary>,
    },

    /// Release tokens for a payload delivered by the messenger
    ///
    /// Authorization: Messenger only
    ///
    /// Credits the original sender encoded in the payload.
    ReceiveRelayedMessage {
        source_chain_id: u64,
        /// Bridge address on the source chain
        sender: String,
        /// Encoded `RelayPayload`
        payload: Binary,
    },

    // ========================================================================
    // Validator Management
    // ========================================================================
    /// Authorize a validator
    ///
    /// Authorization: Owner only
    AddValidator {
        /// EVM address (hex)
        validator: String,
    },

    /// Revoke a validator
    ///
    /// Authorization: Owner only
    RemoveValidator {
        /// EVM address (hex)
        validator: String,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Replace the custody token contract
    ///
    /// Authorization: Owner only
    SetToken { token: String },

    /// Replace the messenger contract
    ///
    /// Authorization: Owner only
    SetMessenger { messenger: String },

    /// Move custody tokens to any address
    ///
    /// Authorization: Owner only (emergency escape hatch)
    Withdraw { to: String, amount: Uint128 },
}

/// Execute message understood by the cross-chain messenger
#[cw_serde]
pub enum MessengerExecuteMsg {
    SendMessage {
        destination_chain_id: u64,
        /// Receiving contract on the destination chain
        recipient: String,
        payload: Binary,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Get bridge statistics
    #[returns(StatsResponse)]
    Stats {},

    /// Check whether a transfer id has been settled
    #[returns(ProcessedResponse)]
    IsProcessed { transfer_id: Binary },

    /// Check whether an EVM address is an authorized validator
    #[returns(IsValidatorResponse)]
    IsValidator { validator: String },

    /// List authorized validators (paginated)
    #[returns(ValidatorsResponse)]
    Validators {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Compute the message hash and signed digest for an unlock
    #[returns(UnlockDigestResponse)]
    UnlockDigest {
        recipient: String,
        amount: Uint128,
        transfer_id: Binary,
        source_chain_id: u64,
    },

    /// Dry-run signature verification for an unlock
    #[returns(VerifySignaturesResponse)]
    VerifySignatures {
        recipient: String,
        amount: Uint128,
        transfer_id: Binary,
        source_chain_id: u64,
        signatures: Vec<Binary>,
    },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub token: Addr,
    pub messenger: Addr,
    pub local_chain_id: u64,
    pub min_amount: Uint128,
    pub max_amount: Uint128,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_locked: u64,
    pub total_unlocked: u64,
    pub total_relayed: u64,
    pub locked_amount: Uint128,
    pub released_amount: Uint128,
}

#[cw_serde]
pub struct ProcessedResponse {
    pub transfer_id: Binary,
    pub processed: bool,
}

#[cw_serde]
pub struct IsValidatorResponse {
    /// Normalized lowercase 0x address
    pub validator: String,
    pub authorized: bool,
}

#[cw_serde]
pub struct ValidatorsResponse {
    pub validators: Vec<String>,
    /// Total authorized validators (not just this page)
    pub count: u32,
}

#[cw_serde]
pub struct UnlockDigestResponse {
    /// keccak256 of the canonical message
    pub message_hash: Binary,
    /// EIP-191 digest validators sign
    pub digest: Binary,
}

#[cw_serde]
pub struct VerifySignaturesResponse {
    pub valid_signatures: u32,
    pub total_validators: u32,
    pub approved: bool,
}
