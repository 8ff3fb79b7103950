//! Hash computation for unlock authorization
//!
//! Validators sign an EIP-191 personal-message digest of a fixed ABI layout,
//! so the same bundle can be produced with any Ethereum signing tool.
//!
//! # Canonical Unlock Message (160 bytes)
//! - Bytes 0-31:    keccak256(recipient address string)
//! - Bytes 32-63:   amount (uint256, big-endian, left-padded)
//! - Bytes 64-95:   transfer id (bytes32)
//! - Bytes 96-127:  source chain id (uint256, big-endian, left-padded)
//! - Bytes 128-159: local chain id (uint256, big-endian, left-padded)
//!
//! # Signed Digest
//! ```text
//! keccak256("\x19Ethereum Signed Message:\n32" || keccak256(message))
//! ```

use tiny_keccak::{Hasher, Keccak};

/// EIP-191 prefix for a 32-byte personal message
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute the keccak256 hash of the canonical unlock message.
///
/// # Arguments
/// * `recipient` - Recipient address on the local chain (hashed to 32 bytes)
/// * `amount` - Transfer amount (u128, left-padded to 32 bytes)
/// * `transfer_id` - 32-byte transfer id
/// * `source_chain_id` - Chain the tokens were locked on
/// * `local_chain_id` - Chain this bridge runs on
pub fn compute_unlock_message_hash(
    recipient: &str,
    amount: u128,
    transfer_id: &[u8; 32],
    source_chain_id: u64,
    local_chain_id: u64,
) -> [u8; 32] {
    let mut data = [0u8; 160];

    data[0..32].copy_from_slice(&keccak256(recipient.as_bytes()));

    // u128 occupies bytes 16-31 of its word
    data[32 + 16..64].copy_from_slice(&amount.to_be_bytes());

    data[64..96].copy_from_slice(transfer_id);

    // u64 occupies bytes 24-31 of its word
    data[96 + 24..128].copy_from_slice(&source_chain_id.to_be_bytes());
    data[128 + 24..160].copy_from_slice(&local_chain_id.to_be_bytes());

    keccak256(&data)
}

/// Apply the EIP-191 personal-message prefix to a 32-byte hash.
pub fn to_eth_signed_message_hash(message_hash: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 28 + 32];
    data[..28].copy_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    data[28..].copy_from_slice(message_hash);
    keccak256(&data)
}

/// Digest validators sign to authorize an unlock.
pub fn unlock_digest(
    recipient: &str,
    amount: u128,
    transfer_id: &[u8; 32],
    source_chain_id: u64,
    local_chain_id: u64,
) -> [u8; 32] {
    to_eth_signed_message_hash(&compute_unlock_message_hash(
        recipient,
        amount,
        transfer_id,
        source_chain_id,
        local_chain_id,
    ))
}

/// Derive the 20-byte EVM address of an uncompressed secp256k1 public key.
///
/// Returns `None` unless the key is 65 bytes with the 0x04 SEC1 tag.
pub fn evm_address_from_pubkey(pubkey: &[u8]) -> Option<[u8; 20]> {
    if pubkey.len() != 65 || pubkey[0] != 0x04 {
        return None;
    }
    let hash = keccak256(&pubkey[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Some(address)
}

/// Parse an EVM address (with or without 0x prefix, any case)
pub fn parse_evm_address(input: &str) -> Result<[u8; 20], String> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.len() != 40 {
        return Err(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        ));
    }

    let mut address = [0u8; 20];
    hex::decode_to_slice(hex_part, &mut address).map_err(|e| e.to_string())?;
    Ok(address)
}

/// Format a 20-byte address as lowercase 0x-prefixed hex
pub fn evm_address_to_hex(address: &[u8]) -> String {
    format!("0x{}", hex::encode(address))
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
