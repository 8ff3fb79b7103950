//! Token Bridge Contract - Lock/Unlock Bridging with Threshold Signatures
//!
//! This contract moves value between two ledgers. Tokens are locked on the
//! source chain and released on the destination chain once the transfer is
//! authorized, and every transfer id settles exactly once.
//!
//! # Outgoing Flow (Lock)
//! 1. User approves the bridge as a CW20 spender
//! 2. User calls `Lock` with a caller-chosen 32-byte transfer id
//! 3. Bridge pulls the tokens into custody and hands a payload to the messenger
//!
//! # Incoming Flow (Unlock)
//! 1. Relayer collects validator signatures over the canonical unlock message
//! 2. Relayer calls `Unlock` with the signature bundle
//! 3. Bridge releases tokens once signers exceed two thirds of the validator set
//!
//! # Incoming Flow (Relay)
//! 1. Messenger delivers an authenticated payload via `ReceiveRelayedMessage`
//! 2. Bridge releases tokens to the original sender encoded in the payload
//!
//! # Security
//! - Processed transfer ids are never cleared (sole replay defense)
//! - Signatures are bound to the local chain id
//! - Every state-mutating entry point holds a reentrancy guard across its
//!   external calls

pub mod contract;
pub mod error;
mod execute;
pub mod guard;
pub mod hash;
pub mod ledger;
pub mod msg;
pub mod payload;
mod query;
pub mod registry;
pub mod state;
pub mod verifier;

pub use crate::error::ContractError;
pub use crate::hash::{keccak256, unlock_digest};
pub use crate::ledger::TransferId;
pub use crate::verifier::SignatureTally;
