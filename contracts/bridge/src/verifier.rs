//! Threshold signature verification for unlocks.
//!
//! Approval requires signatures from authorized validators to exceed two
//! thirds of the current validator set: `3 * valid > 2 * total`. The set size
//! is read at verification time.
//!
//! Signatures are 65 bytes `r || s || v` with `v` in {0, 1, 27, 28}. Entries
//! that cannot be recovered are skipped and do not count. The same signer
//! appearing twice counts twice; callers must submit unique signers.

use cosmwasm_std::{Api, Binary, StdResult, Storage, Uint128};

use crate::hash::{evm_address_from_pubkey, unlock_digest};
use crate::ledger::TransferId;
use crate::registry::{self, ValidatorAddress};

/// The fields validators attest to for one unlock.
#[derive(Clone, Copy, Debug)]
pub struct UnlockMessage<'a> {
    pub recipient: &'a str,
    pub amount: Uint128,
    pub transfer_id: &'a TransferId,
    pub source_chain_id: u64,
    pub local_chain_id: u64,
}

impl UnlockMessage<'_> {
    /// EIP-191 digest the validators sign.
    pub fn digest(&self) -> [u8; 32] {
        unlock_digest(
            self.recipient,
            self.amount.u128(),
            self.transfer_id.as_bytes(),
            self.source_chain_id,
            self.local_chain_id,
        )
    }
}

/// Outcome of counting a signature bundle against the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureTally {
    /// Signatures recovered to an authorized validator
    pub valid: u32,
    /// Authorized validators at verification time
    pub total: u32,
}

impl SignatureTally {
    /// Strictly more than two thirds; exactly two thirds fails.
    pub fn approved(&self) -> bool {
        3 * u64::from(self.valid) > 2 * u64::from(self.total)
    }
}

/// Recover the EVM address that produced `signature` over `digest`.
///
/// Returns `None` for any malformed input instead of failing.
pub fn recover_signer(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &[u8],
) -> Option<ValidatorAddress> {
    if signature.len() != 65 {
        return None;
    }
    let recovery_param = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return None,
    };
    let pubkey = api
        .secp256k1_recover_pubkey(digest, &signature[..64], recovery_param)
        .ok()?;
    evm_address_from_pubkey(&pubkey)
}

/// Count signatures in the bundle that recover to authorized validators.
pub fn tally_signatures(
    storage: &dyn Storage,
    api: &dyn Api,
    digest: &[u8; 32],
    signatures: &[Binary],
) -> StdResult<SignatureTally> {
    let total = registry::count(storage)?;
    let mut valid = 0u32;

    for (index, signature) in signatures.iter().enumerate() {
        let Some(signer) = recover_signer(api, digest, signature) else {
            api.debug(&format!("skipping malformed signature at index {index}"));
            continue;
        };
        if registry::is_authorized(storage, &signer)? {
            valid = valid.saturating_add(1);
        }
    }

    Ok(SignatureTally { valid, total })
}

/// Tally the bundle for `message` against the live validator set.
pub fn tally(
    storage: &dyn Storage,
    api: &dyn Api,
    message: &UnlockMessage,
    signatures: &[Binary],
) -> StdResult<SignatureTally> {
    tally_signatures(storage, api, &message.digest(), signatures)
}

/// Whether the bundle authorizes `message`.
pub fn verify(
    storage: &dyn Storage,
    api: &dyn Api,
    message: &UnlockMessage,
    signatures: &[Binary],
) -> StdResult<bool> {
    Ok(tally(storage, api, message, signatures)?.approved())
}
