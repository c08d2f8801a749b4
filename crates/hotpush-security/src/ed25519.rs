use anyhow::{anyhow, Context, Result};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Verifies an Ed25519 signature where both key and signature travel as hex.
/// Returns `Ok(false)` for a well-formed signature that does not match;
/// malformed key or signature material is an error.
pub fn verify_ed25519_signature_hex(
    payload: &[u8],
    public_key_hex: &str,
    signature_hex: &str,
) -> Result<bool> {
    let verifying_key = parse_verifying_key(public_key_hex)?;

    let signature_bytes =
        hex::decode(signature_hex).context("failed to decode Ed25519 signature hex")?;
    let signature_len = signature_bytes.len();
    let signature_array: [u8; 64] = signature_bytes.try_into().map_err(|_| {
        anyhow!("invalid Ed25519 signature length: expected 64 bytes, got {signature_len}")
    })?;
    let signature = Signature::from_bytes(&signature_array);

    Ok(verifying_key.verify(payload, &signature).is_ok())
}

fn parse_verifying_key(public_key_hex: &str) -> Result<VerifyingKey> {
    let key_bytes = hex::decode(public_key_hex).context("failed to decode Ed25519 key hex")?;
    let key_len = key_bytes.len();
    let key_array: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| anyhow!("invalid Ed25519 key length: expected 32 bytes, got {key_len}"))?;
    VerifyingKey::from_bytes(&key_array).context("invalid Ed25519 public key bytes")
}
