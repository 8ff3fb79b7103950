//! Validator registry: the authorized signer set.
//!
//! Owner gating happens in the execute handlers (they require an
//! `AdminContext`); the functions here only enforce membership rules and keep
//! `VALIDATOR_COUNT` in step with `VALIDATORS`.

use cosmwasm_std::{Order, StdResult, Storage};
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::hash::evm_address_to_hex;
use crate::state::{DEFAULT_LIMIT, MAX_LIMIT, VALIDATORS, VALIDATOR_COUNT};

pub type ValidatorAddress = [u8; 20];

pub fn is_authorized(storage: &dyn Storage, validator: &ValidatorAddress) -> StdResult<bool> {
    Ok(VALIDATORS
        .may_load(storage, validator.as_slice())?
        .unwrap_or(false))
}

/// Number of currently authorized validators.
pub fn count(storage: &dyn Storage) -> StdResult<u32> {
    Ok(VALIDATOR_COUNT.may_load(storage)?.unwrap_or(0))
}

pub fn add(storage: &mut dyn Storage, validator: &ValidatorAddress) -> Result<(), ContractError> {
    if is_authorized(storage, validator)? {
        return Err(ContractError::AlreadyAuthorized {
            validator: evm_address_to_hex(validator),
        });
    }

    VALIDATORS.save(storage, validator.as_slice(), &true)?;
    let current = count(storage)?;
    VALIDATOR_COUNT.save(storage, &(current + 1))?;
    Ok(())
}

pub fn remove(
    storage: &mut dyn Storage,
    validator: &ValidatorAddress,
) -> Result<(), ContractError> {
    if !is_authorized(storage, validator)? {
        return Err(ContractError::NotAuthorized {
            validator: evm_address_to_hex(validator),
        });
    }

    VALIDATORS.remove(storage, validator.as_slice());
    let current = count(storage)?;
    VALIDATOR_COUNT.save(storage, &current.saturating_sub(1))?;
    Ok(())
}

/// List authorized validators in key order, as lowercase 0x hex.
pub fn list(
    storage: &dyn Storage,
    start_after: Option<&ValidatorAddress>,
    limit: Option<u32>,
) -> StdResult<Vec<String>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(|addr| Bound::exclusive(addr.as_slice()));

    VALIDATORS
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(key, _)| evm_address_to_hex(&key)))
        .collect()
}
