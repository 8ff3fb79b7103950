//! Transfer ledger: the set of settled transfer ids.
//!
//! This is the bridge's only replay defense. Every settlement path (lock,
//! unlock, relay) checks and marks here before any value moves, and nothing
//! ever clears an entry.

use std::fmt;

use cosmwasm_std::{Binary, StdResult, Storage};

use crate::error::ContractError;
use crate::hash::bytes32_to_hex;
use crate::state::PROCESSED_TRANSFERS;

/// Caller-supplied 32-byte transfer identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransferId([u8; 32]);

impl TransferId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_binary(&self) -> Binary {
        Binary::from(self.0.to_vec())
    }
}

impl TryFrom<&Binary> for TransferId {
    type Error = ContractError;

    fn try_from(value: &Binary) -> Result<Self, Self::Error> {
        let bytes: [u8; 32] = value
            .as_slice()
            .try_into()
            .map_err(|_| ContractError::InvalidTransferId { got: value.len() })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes32_to_hex(&self.0))
    }
}

/// Whether `id` has already been settled by any path.
pub fn is_processed(storage: &dyn Storage, id: &TransferId) -> StdResult<bool> {
    Ok(PROCESSED_TRANSFERS
        .may_load(storage, id.as_bytes())?
        .unwrap_or(false))
}

/// Fail with `AlreadyProcessed` if `id` is settled.
pub fn ensure_unprocessed(storage: &dyn Storage, id: &TransferId) -> Result<(), ContractError> {
    if is_processed(storage, id)? {
        return Err(ContractError::AlreadyProcessed {
            transfer_id: id.to_string(),
        });
    }
    Ok(())
}

/// Settle `id`. Fails with `AlreadyProcessed` if it was settled before.
pub fn mark_processed(storage: &mut dyn Storage, id: &TransferId) -> Result<(), ContractError> {
    ensure_unprocessed(storage, id)?;
    PROCESSED_TRANSFERS.save(storage, id.as_bytes(), &true)?;
    Ok(())
}
