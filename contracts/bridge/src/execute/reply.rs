//! Sub-message replies.
//!
//! Each guarded operation that dispatches external calls leaves the
//! reentrancy guard held; the reply for its last sub-message releases it.
//! Failed token movements surface as `TransferFailed`, which fails the whole
//! transaction and discards the transfer-id mark made by the handler.

use cosmwasm_std::{DepsMut, Event, Reply, Response, SubMsgResult};

use crate::error::ContractError;
use crate::guard;
use crate::ledger::TransferId;
use crate::state::{
    PENDING_OUTBOUND, REPLY_CREDIT, REPLY_LOCK_DEBIT, REPLY_MESSAGE_SENT, REPLY_WITHDRAW,
};

pub fn handle_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REPLY_LOCK_DEBIT => match msg.result {
            SubMsgResult::Err(reason) => Err(ContractError::TransferFailed { reason }),
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        REPLY_MESSAGE_SENT => {
            let pending = PENDING_OUTBOUND.load(deps.storage)?;
            let transfer_id = TransferId::try_from(&pending.transfer_id)?;
            PENDING_OUTBOUND.remove(deps.storage);
            guard::release(deps.storage);

            Ok(Response::new().add_event(
                Event::new("message_sent")
                    .add_attribute(
                        "destination_chain_id",
                        pending.destination_chain_id.to_string(),
                    )
                    .add_attribute("transfer_id", transfer_id.to_string()),
            ))
        }
        REPLY_CREDIT | REPLY_WITHDRAW => match msg.result {
            SubMsgResult::Err(reason) => Err(ContractError::TransferFailed { reason }),
            SubMsgResult::Ok(_) => {
                guard::release(deps.storage);
                Ok(Response::new())
            }
        },
        id => Err(ContractError::UnknownReplyId { id }),
    }
}
