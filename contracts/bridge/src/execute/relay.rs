//! Incoming transfer handler for payloads delivered by the messenger.

use cosmwasm_std::{Binary, DepsMut, Event, MessageInfo, Response, SubMsg};

use super::{credit_msg, transfer_unlocked_event};
use crate::error::ContractError;
use crate::guard::ReentrancyGuard;
use crate::ledger;
use crate::payload::RelayPayload;
use crate::state::{CONFIG, REPLY_CREDIT, STATS};

/// Settle a relayed transfer.
///
/// Only the configured messenger may call this. Tokens go to the sender
/// recorded in the payload (the account that locked on the source chain);
/// there is no separate recipient on this path.
pub fn execute_receive_relayed_message(
    deps: DepsMut,
    info: MessageInfo,
    source_chain_id: u64,
    sender: String,
    payload: Binary,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let config = CONFIG.load(guard.storage())?;

    if info.sender != config.messenger {
        return Err(ContractError::UnauthorizedCaller {
            caller: info.sender.to_string(),
        });
    }

    let (decoded, transfer_id) = RelayPayload::decode(&payload)?;
    ledger::mark_processed(guard.storage(), &transfer_id)?;

    let original_sender = deps.api.addr_validate(&decoded.sender)?;

    let mut stats = STATS.load(guard.storage())?;
    stats.total_relayed += 1;
    stats.released_amount = stats.released_amount.checked_add(decoded.amount)?;
    STATS.save(guard.storage(), &stats)?;

    let credit = credit_msg(&config.token, &original_sender, decoded.amount)?;

    // Released by the REPLY_CREDIT reply.
    guard.hold_until_reply();

    let received = Event::new("message_received")
        .add_attribute("source_chain_id", source_chain_id.to_string())
        .add_attribute("transfer_id", transfer_id.to_string())
        .add_attribute("sender", sender);

    Ok(Response::new()
        .add_event(received)
        .add_submessage(SubMsg::reply_always(credit, REPLY_CREDIT))
        .add_event(transfer_unlocked_event(
            &original_sender,
            decoded.amount,
            &transfer_id,
            source_chain_id,
        ))
        .add_attribute("method", "receive_relayed_message")
        .add_attribute("transfer_id", transfer_id.to_string()))
}
