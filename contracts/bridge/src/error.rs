//! Error types for the token bridge contract.

use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only owner can perform this action")]
    NotOwner,

    #[error("Unauthorized caller: {caller}")]
    UnauthorizedCaller { caller: String },

    #[error("Reentrant call rejected")]
    Reentrancy,

    // ========================================================================
    // Transfer Errors
    // ========================================================================

    #[error("Invalid amount {amount}: must be between {min} and {max}")]
    InvalidAmount {
        amount: Uint128,
        min: Uint128,
        max: Uint128,
    },

    #[error("Transfer already processed: {transfer_id}")]
    AlreadyProcessed { transfer_id: String },

    #[error("Invalid transfer id: expected 32 bytes, got {got}")]
    InvalidTransferId { got: usize },

    #[error("Token transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("Invalid relay payload: {reason}")]
    InvalidPayload { reason: String },

    // ========================================================================
    // Signature Errors
    // ========================================================================

    #[error("Invalid signatures: {valid} valid of {total} validators")]
    InvalidSignatures { valid: u32, total: u32 },

    // ========================================================================
    // Validator Registry Errors
    // ========================================================================

    #[error("Validator already authorized: {validator}")]
    AlreadyAuthorized { validator: String },

    #[error("Validator not authorized: {validator}")]
    NotAuthorized { validator: String },

    #[error("Invalid validator address: {reason}")]
    InvalidValidatorAddress { reason: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}
