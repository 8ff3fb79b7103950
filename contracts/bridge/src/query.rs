//! Query handlers for the token bridge contract.

use cosmwasm_std::{Binary, Deps, StdError, StdResult, Uint128};

use crate::error::ContractError;
use crate::execute::parse_validator;
use crate::hash::{compute_unlock_message_hash, evm_address_to_hex, to_eth_signed_message_hash};
use crate::ledger::{self, TransferId};
use crate::msg::{
    ConfigResponse, IsValidatorResponse, ProcessedResponse, StatsResponse, UnlockDigestResponse,
    ValidatorsResponse, VerifySignaturesResponse,
};
use crate::registry;
use crate::state::{CONFIG, STATS};
use crate::verifier::{self, UnlockMessage};

fn to_std(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        other => StdError::generic_err(other.to_string()),
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner,
        token: config.token,
        messenger: config.messenger,
        local_chain_id: config.local_chain_id,
        min_amount: config.min_amount,
        max_amount: config.max_amount,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.may_load(deps.storage)?.unwrap_or_default();
    Ok(StatsResponse {
        total_locked: stats.total_locked,
        total_unlocked: stats.total_unlocked,
        total_relayed: stats.total_relayed,
        locked_amount: stats.locked_amount,
        released_amount: stats.released_amount,
    })
}

pub fn query_is_processed(deps: Deps, transfer_id: Binary) -> StdResult<ProcessedResponse> {
    let id = TransferId::try_from(&transfer_id).map_err(to_std)?;
    Ok(ProcessedResponse {
        transfer_id,
        processed: ledger::is_processed(deps.storage, &id)?,
    })
}

pub fn query_is_validator(deps: Deps, validator: String) -> StdResult<IsValidatorResponse> {
    let address = parse_validator(&validator).map_err(to_std)?;
    Ok(IsValidatorResponse {
        validator: evm_address_to_hex(&address),
        authorized: registry::is_authorized(deps.storage, &address)?,
    })
}

pub fn query_validators(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ValidatorsResponse> {
    let start = start_after
        .as_deref()
        .map(parse_validator)
        .transpose()
        .map_err(to_std)?;
    Ok(ValidatorsResponse {
        validators: registry::list(deps.storage, start.as_ref(), limit)?,
        count: registry::count(deps.storage)?,
    })
}

/// Hash and digest for an unlock, bound to this bridge's local chain id.
pub fn query_unlock_digest(
    deps: Deps,
    recipient: String,
    amount: Uint128,
    transfer_id: Binary,
    source_chain_id: u64,
) -> StdResult<UnlockDigestResponse> {
    let config = CONFIG.load(deps.storage)?;
    let id = TransferId::try_from(&transfer_id).map_err(to_std)?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let message_hash = compute_unlock_message_hash(
        recipient.as_str(),
        amount.u128(),
        id.as_bytes(),
        source_chain_id,
        config.local_chain_id,
    );
    let digest = to_eth_signed_message_hash(&message_hash);

    Ok(UnlockDigestResponse {
        message_hash: Binary::from(message_hash.to_vec()),
        digest: Binary::from(digest.to_vec()),
    })
}

/// Count a bundle the same way `Unlock` would, without settling anything.
pub fn query_verify_signatures(
    deps: Deps,
    recipient: String,
    amount: Uint128,
    transfer_id: Binary,
    source_chain_id: u64,
    signatures: Vec<Binary>,
) -> StdResult<VerifySignaturesResponse> {
    let config = CONFIG.load(deps.storage)?;
    let id = TransferId::try_from(&transfer_id).map_err(to_std)?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let message = UnlockMessage {
        recipient: recipient.as_str(),
        amount,
        transfer_id: &id,
        source_chain_id,
        local_chain_id: config.local_chain_id,
    };
    let tally = verifier::tally(deps.storage, deps.api, &message, &signatures)?;

    Ok(VerifySignaturesResponse {
        valid_signatures: tally.valid,
        total_validators: tally.total,
        approved: tally.approved(),
    })
}
