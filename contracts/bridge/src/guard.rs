//! Reentrancy guard.
//!
//! External calls (token debit/credit, messenger send) run as sub-messages
//! after the handler returns, and a hostile collaborator can call back into
//! the bridge from inside them. Every state-mutating entry point acquires the
//! guard first, so such a nested call fails with `Reentrancy`.
//!
//! Handlers that finish without external calls let the guard drop, which
//! releases the flag. Handlers that dispatch external calls call
//! [`ReentrancyGuard::hold_until_reply`]; the reply for the last sub-message
//! releases the flag with [`release`].

use cosmwasm_std::{StdResult, Storage};

use crate::error::ContractError;
use crate::state::REENTRANCY_LOCK;

pub struct ReentrancyGuard<'a> {
    storage: &'a mut dyn Storage,
    release_on_drop: bool,
}

impl<'a> ReentrancyGuard<'a> {
    /// Take the guard, failing with `Reentrancy` if it is already held.
    pub fn acquire(storage: &'a mut dyn Storage) -> Result<Self, ContractError> {
        if is_held(storage)? {
            return Err(ContractError::Reentrancy);
        }
        REENTRANCY_LOCK.save(storage, &true)?;
        Ok(Self {
            storage,
            release_on_drop: true,
        })
    }

    /// Storage behind the guard, for the guarded operation.
    pub fn storage(&mut self) -> &mut dyn Storage {
        &mut *self.storage
    }

    /// Keep the flag set after this value drops.
    pub fn hold_until_reply(mut self) {
        self.release_on_drop = false;
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        if self.release_on_drop {
            REENTRANCY_LOCK.remove(self.storage);
        }
    }
}

pub fn is_held(storage: &dyn Storage) -> StdResult<bool> {
    Ok(REENTRANCY_LOCK.may_load(storage)?.unwrap_or(false))
}

/// Clear a guard left held by [`ReentrancyGuard::hold_until_reply`].
pub fn release(storage: &mut dyn Storage) {
    REENTRANCY_LOCK.remove(storage);
}
