//! Execute handlers for the token bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `lock` - Outbound lock (debit into custody, send relay payload)
//! - `unlock` - Inbound release authorized by validator signatures
//! - `relay` - Inbound release delivered by the messenger
//! - `admin` - Owner-gated validator, handle, and withdraw operations
//! - `reply` - Sub-message replies that close out guarded operations

mod admin;
mod lock;
mod relay;
mod reply;
mod unlock;

pub use admin::*;
pub use lock::*;
pub use relay::*;
pub use reply::*;
pub use unlock::*;

use cosmwasm_std::{to_json_binary, Addr, Event, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

use crate::ledger::TransferId;

/// CW20 transfer out of bridge custody.
fn credit_msg(token: &Addr, recipient: &Addr, amount: Uint128) -> StdResult<WasmMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount,
        })?,
        funds: vec![],
    })
}

fn transfer_unlocked_event(
    recipient: &Addr,
    amount: Uint128,
    transfer_id: &TransferId,
    source_chain_id: u64,
) -> Event {
    Event::new("transfer_unlocked")
        .add_attribute("recipient", recipient.as_str())
        .add_attribute("amount", amount.to_string())
        .add_attribute("transfer_id", transfer_id.to_string())
        .add_attribute("source_chain_id", source_chain_id.to_string())
}
