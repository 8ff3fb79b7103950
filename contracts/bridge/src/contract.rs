//! Token Bridge Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers and sub-message replies
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, Event, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_add_validator, execute_lock, execute_receive_relayed_message,
    execute_remove_validator, execute_set_messenger, execute_set_token, execute_unlock,
    execute_withdraw, handle_reply, parse_validator,
};
use crate::hash::evm_address_to_hex;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_is_processed, query_is_validator, query_stats, query_unlock_digest,
    query_validators, query_verify_signatures,
};
use crate::registry;
use crate::state::{
    Config, Stats, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, STATS, VALIDATOR_COUNT,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    let token = deps.api.addr_validate(&msg.token)?;
    let messenger = deps.api.addr_validate(&msg.messenger)?;

    if msg.local_chain_id == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "local_chain_id 0 is reserved/invalid".to_string(),
        });
    }
    if msg.min_amount.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "min_amount must be non-zero".to_string(),
        });
    }
    if msg.min_amount > msg.max_amount {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "min_amount {} exceeds max_amount {}",
                msg.min_amount, msg.max_amount
            ),
        });
    }

    let config = Config {
        owner,
        token,
        messenger,
        local_chain_id: msg.local_chain_id,
        min_amount: msg.min_amount,
        max_amount: msg.max_amount,
    };
    CONFIG.save(deps.storage, &config)?;
    STATS.save(deps.storage, &Stats::default())?;
    VALIDATOR_COUNT.save(deps.storage, &0u32)?;

    let mut events = Vec::with_capacity(msg.validators.len());
    for validator in &msg.validators {
        let address = parse_validator(validator)?;
        registry::add(deps.storage, &address)?;
        events.push(
            Event::new("validator_added").add_attribute("validator", evm_address_to_hex(&address)),
        );
    }

    Ok(Response::new()
        .add_events(events)
        .add_attribute("method", "instantiate")
        .add_attribute("owner", config.owner)
        .add_attribute("token", config.token)
        .add_attribute("messenger", config.messenger)
        .add_attribute("local_chain_id", config.local_chain_id.to_string())
        .add_attribute("validator_count", msg.validators.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Transfers
        ExecuteMsg::Lock {
            amount,
            transfer_id,
            destination_chain_id,
        } => execute_lock(deps, env, info, amount, transfer_id, destination_chain_id),
        ExecuteMsg::Unlock {
            recipient,
            amount,
            transfer_id,
            source_chain_id,
            signatures,
        } => execute_unlock(
            deps,
            recipient,
            amount,
            transfer_id,
            source_chain_id,
            signatures,
        ),
        ExecuteMsg::ReceiveRelayedMessage {
            source_chain_id,
            sender,
            payload,
        } => execute_receive_relayed_message(deps, info, source_chain_id, sender, payload),

        // Validator management
        ExecuteMsg::AddValidator { validator } => execute_add_validator(deps, info, validator),
        ExecuteMsg::RemoveValidator { validator } => {
            execute_remove_validator(deps, info, validator)
        }

        // Admin operations
        ExecuteMsg::SetToken { token } => execute_set_token(deps, info, token),
        ExecuteMsg::SetMessenger { messenger } => execute_set_messenger(deps, info, messenger),
        ExecuteMsg::Withdraw { to, amount } => execute_withdraw(deps, info, to, amount),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    handle_reply(deps, msg)
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::IsProcessed { transfer_id } => {
            to_json_binary(&query_is_processed(deps, transfer_id)?)
        }
        QueryMsg::IsValidator { validator } => {
            to_json_binary(&query_is_validator(deps, validator)?)
        }
        QueryMsg::Validators { start_after, limit } => {
            to_json_binary(&query_validators(deps, start_after, limit)?)
        }
        QueryMsg::UnlockDigest {
            recipient,
            amount,
            transfer_id,
            source_chain_id,
        } => to_json_binary(&query_unlock_digest(
            deps,
            recipient,
            amount,
            transfer_id,
            source_chain_id,
        )?),
        QueryMsg::VerifySignatures {
            recipient,
            amount,
            transfer_id,
            source_chain_id,
            signatures,
        } => to_json_binary(&query_verify_signatures(
            deps,
            recipient,
            amount,
            transfer_id,
            source_chain_id,
            signatures,
        )?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
