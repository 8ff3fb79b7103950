//! Incoming transfer handler authorized by validator signatures.

use cosmwasm_std::{Binary, DepsMut, Response, SubMsg, Uint128};

use super::{credit_msg, transfer_unlocked_event};
use crate::error::ContractError;
use crate::guard::ReentrancyGuard;
use crate::ledger::{self, TransferId};
use crate::state::{CONFIG, REPLY_CREDIT, STATS};
use crate::verifier::{self, UnlockMessage};

/// Release custody tokens to `recipient` once the signature bundle clears
/// the validator threshold.
///
/// Order of checks: transfer id unprocessed, then signatures. The credit runs
/// as a sub-message; if it fails the whole call fails and the mark is
/// discarded.
pub fn execute_unlock(
    deps: DepsMut,
    recipient: String,
    amount: Uint128,
    transfer_id: Binary,
    source_chain_id: u64,
    signatures: Vec<Binary>,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let config = CONFIG.load(guard.storage())?;

    let transfer_id = TransferId::try_from(&transfer_id)?;
    ledger::ensure_unprocessed(guard.storage(), &transfer_id)?;

    let recipient = deps.api.addr_validate(&recipient)?;
    let message = UnlockMessage {
        recipient: recipient.as_str(),
        amount,
        transfer_id: &transfer_id,
        source_chain_id,
        local_chain_id: config.local_chain_id,
    };
    let tally = verifier::tally(guard.storage(), deps.api, &message, &signatures)?;
    if !tally.approved() {
        return Err(ContractError::InvalidSignatures {
            valid: tally.valid,
            total: tally.total,
        });
    }

    ledger::mark_processed(guard.storage(), &transfer_id)?;

    let mut stats = STATS.load(guard.storage())?;
    stats.total_unlocked += 1;
    stats.released_amount = stats.released_amount.checked_add(amount)?;
    STATS.save(guard.storage(), &stats)?;

    let credit = credit_msg(&config.token, &recipient, amount)?;

    // Released by the REPLY_CREDIT reply.
    guard.hold_until_reply();

    Ok(Response::new()
        .add_submessage(SubMsg::reply_always(credit, REPLY_CREDIT))
        .add_event(transfer_unlocked_event(
            &recipient,
            amount,
            &transfer_id,
            source_chain_id,
        ))
        .add_attribute("method", "unlock")
        .add_attribute("transfer_id", transfer_id.to_string())
        .add_attribute("valid_signatures", tally.valid.to_string())
        .add_attribute("total_validators", tally.total.to_string()))
}
