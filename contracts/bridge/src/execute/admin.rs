//! Admin operations handlers.
//!
//! This module handles:
//! - Validator add/remove
//! - Token and messenger handle replacement
//! - Emergency withdraw of custody tokens
//!
//! Every handler first takes the reentrancy guard, then proves the caller is
//! the owner by building an [`AdminContext`].

use cosmwasm_std::{Addr, DepsMut, Event, MessageInfo, Response, Storage, SubMsg, Uint128};

use super::credit_msg;
use crate::error::ContractError;
use crate::guard::ReentrancyGuard;
use crate::hash::{evm_address_to_hex, parse_evm_address};
use crate::registry::{self, ValidatorAddress};
use crate::state::{Config, CONFIG, REPLY_WITHDRAW};

/// Proof that the current caller is the configured owner.
///
/// Only [`AdminContext::authorize`] constructs one, so holding a value means
/// the owner check already passed.
pub struct AdminContext {
    config: Config,
}

impl AdminContext {
    pub fn authorize(storage: &dyn Storage, caller: &Addr) -> Result<Self, ContractError> {
        let config = CONFIG.load(storage)?;
        if *caller != config.owner {
            return Err(ContractError::NotOwner);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persist a modified config.
    fn save_config(
        self,
        storage: &mut dyn Storage,
        update: impl FnOnce(&mut Config),
    ) -> Result<Config, ContractError> {
        let mut config = self.config;
        update(&mut config);
        CONFIG.save(storage, &config)?;
        Ok(config)
    }
}

pub(crate) fn parse_validator(validator: &str) -> Result<ValidatorAddress, ContractError> {
    parse_evm_address(validator).map_err(|reason| ContractError::InvalidValidatorAddress { reason })
}

// ============================================================================
// Validator Management
// ============================================================================

/// Authorize a validator.
pub fn execute_add_validator(
    deps: DepsMut,
    info: MessageInfo,
    validator: String,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    AdminContext::authorize(guard.storage(), &info.sender)?;

    let address = parse_validator(&validator)?;
    registry::add(guard.storage(), &address)?;
    let normalized = evm_address_to_hex(&address);

    Ok(Response::new()
        .add_event(Event::new("validator_added").add_attribute("validator", &normalized))
        .add_attribute("method", "add_validator")
        .add_attribute("validator", normalized))
}

/// Revoke a validator.
pub fn execute_remove_validator(
    deps: DepsMut,
    info: MessageInfo,
    validator: String,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    AdminContext::authorize(guard.storage(), &info.sender)?;

    let address = parse_validator(&validator)?;
    registry::remove(guard.storage(), &address)?;
    let normalized = evm_address_to_hex(&address);

    Ok(Response::new()
        .add_event(Event::new("validator_removed").add_attribute("validator", &normalized))
        .add_attribute("method", "remove_validator")
        .add_attribute("validator", normalized))
}

// ============================================================================
// Handle Replacement
// ============================================================================

/// Replace the custody token contract.
pub fn execute_set_token(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let ctx = AdminContext::authorize(guard.storage(), &info.sender)?;

    let token = deps.api.addr_validate(&token)?;
    let previous = ctx.config().token.clone();
    let config = ctx.save_config(guard.storage(), |config| config.token = token)?;

    Ok(Response::new()
        .add_attribute("method", "set_token")
        .add_attribute("previous", previous)
        .add_attribute("token", config.token))
}

/// Replace the messenger contract.
pub fn execute_set_messenger(
    deps: DepsMut,
    info: MessageInfo,
    messenger: String,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let ctx = AdminContext::authorize(guard.storage(), &info.sender)?;

    let messenger = deps.api.addr_validate(&messenger)?;
    let previous = ctx.config().messenger.clone();
    let config = ctx.save_config(guard.storage(), |config| config.messenger = messenger)?;

    Ok(Response::new()
        .add_attribute("method", "set_messenger")
        .add_attribute("previous", previous)
        .add_attribute("messenger", config.messenger))
}

// ============================================================================
// Emergency Withdraw
// ============================================================================

/// Move custody tokens to any address.
///
/// There is no pause requirement and no accounting against locked amounts;
/// the owner can drain custody at any time.
pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    to: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let mut guard = ReentrancyGuard::acquire(deps.storage)?;
    let ctx = AdminContext::authorize(guard.storage(), &info.sender)?;

    let to = deps.api.addr_validate(&to)?;
    let transfer = credit_msg(&ctx.config().token, &to, amount)?;

    // Released by the REPLY_WITHDRAW reply.
    guard.hold_until_reply();

    Ok(Response::new()
        .add_submessage(SubMsg::reply_always(transfer, REPLY_WITHDRAW))
        .add_attribute("method", "withdraw")
        .add_attribute("to", to)
        .add_attribute("amount", amount.to_string()))
}
