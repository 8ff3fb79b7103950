//! Outgoing transfer handler (Lock).
//!
//! Locks tokens in bridge custody and hands the relay payload to the
//! messenger. The transfer id is marked before the debit runs; a failed
//! debit fails the whole call, which discards the mark.

use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, Event, MessageInfo, Response, SubMsg, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use crate::error::ContractError;
use crate::guard::ReentrancyGuard;
use crate::ledger::{self, TransferId};
use crate::msg::MessengerExecuteMsg;
use crate::payload::RelayPayload;
use crate::state::{
    PendingOutbound, CONFIG, PENDING_OUTBOUND, REPLY_LOCK_DEBIT, REPLY_MESSAGE_SENT, STATS,
};

/// Execute handler for locking CW20 tokens
///
/// The caller must have granted the bridge an allowance of at least `amount`.
pub fn execute_lock(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    transfer_id: Binary,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let config = CONFIG.load(guard.storage())?;

    if amount < config.min_amount || amount > config.max_amount {
        return Err(ContractError::InvalidAmount {
            amount,
            min: config.min_amount,
            max: config.max_amount,
        });
    }

    let transfer_id = TransferId::try_from(&transfer_id)?;
    ledger::mark_processed(guard.storage(), &transfer_id)?;

    let mut stats = STATS.load(guard.storage())?;
    stats.total_locked += 1;
    stats.locked_amount = stats.locked_amount.checked_add(amount)?;
    STATS.save(guard.storage(), &stats)?;

    PENDING_OUTBOUND.save(
        guard.storage(),
        &PendingOutbound {
            transfer_id: transfer_id.to_binary(),
            destination_chain_id,
        },
    )?;

    let debit = WasmMsg::Execute {
        contract_addr: config.token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        })?,
        funds: vec![],
    };

    let payload = RelayPayload::new(info.sender.as_str(), amount, &transfer_id).encode()?;
    let send = WasmMsg::Execute {
        contract_addr: config.messenger.to_string(),
        msg: to_json_binary(&MessengerExecuteMsg::SendMessage {
            destination_chain_id,
            recipient: env.contract.address.to_string(),
            payload,
        })?,
        funds: vec![],
    };

    // Released by the REPLY_MESSAGE_SENT reply.
    guard.hold_until_reply();

    let locked = Event::new("transfer_locked")
        .add_attribute("initiator", info.sender.as_str())
        .add_attribute("amount", amount.to_string())
        .add_attribute("transfer_id", transfer_id.to_string())
        .add_attribute("destination_chain_id", destination_chain_id.to_string());

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_error(debit, REPLY_LOCK_DEBIT))
        .add_submessage(SubMsg::reply_on_success(send, REPLY_MESSAGE_SENT))
        .add_event(locked)
        .add_attribute("method", "lock")
        .add_attribute("sender", info.sender)
        .add_attribute("transfer_id", transfer_id.to_string()))
}
