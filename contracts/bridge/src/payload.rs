//! Relay payload carried by the messenger.
//!
//! `lock` encodes `(sender, amount, transfer_id)` and hands it to the
//! messenger; `ReceiveRelayedMessage` on the destination decodes the same
//! structure and credits `sender`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_binary, Binary, StdResult, Uint128};

use crate::error::ContractError;
use crate::ledger::TransferId;

#[cw_serde]
pub struct RelayPayload {
    /// Account that locked the tokens on the source chain
    pub sender: String,
    pub amount: Uint128,
    /// 32-byte transfer id
    pub transfer_id: Binary,
}

impl RelayPayload {
    pub fn new(sender: impl Into<String>, amount: Uint128, transfer_id: &TransferId) -> Self {
        Self {
            sender: sender.into(),
            amount,
            transfer_id: transfer_id.to_binary(),
        }
    }

    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    /// Decode and validate an inbound payload.
    pub fn decode(payload: &Binary) -> Result<(Self, TransferId), ContractError> {
        let decoded: RelayPayload =
            from_json(payload).map_err(|e| ContractError::InvalidPayload {
                reason: e.to_string(),
            })?;
        if decoded.sender.is_empty() {
            return Err(ContractError::InvalidPayload {
                reason: "empty sender".to_string(),
            });
        }
        let transfer_id = TransferId::try_from(&decoded.transfer_id)?;
        Ok((decoded, transfer_id))
    }
}
