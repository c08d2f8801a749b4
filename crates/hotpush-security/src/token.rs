use anyhow::{anyhow, Result};

use crate::ed25519::verify_ed25519_signature_hex;

/// Decodes a signed-hash token of the form `<content-hash-hex>.<signature-hex>`
/// where the signature is Ed25519 over the hash's ASCII bytes.
///
/// Returns the embedded content hash (lowercased) when the signature checks
/// out against `public_key_hex`; any structural problem or signature mismatch
/// is an error, never a silent pass.
pub fn decode_signed_hash(token: &str, public_key_hex: &str) -> Result<String> {
    let trimmed = token.trim();
    let Some((hash_hex, signature_hex)) = trimmed.split_once('.') else {
        return Err(anyhow!(
            "malformed signed-hash token: expected '<hash>.<signature>'"
        ));
    };

    if hash_hex.len() != 64 || !hash_hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(anyhow!(
            "malformed signed-hash token: content hash must be 64 hex characters"
        ));
    }

    let verified = verify_ed25519_signature_hex(hash_hex.as_bytes(), public_key_hex, signature_hex)?;
    if !verified {
        return Err(anyhow!("signed-hash token signature does not verify"));
    }

    Ok(hash_hex.to_ascii_lowercase())
}
