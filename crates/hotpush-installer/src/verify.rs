use std::fs;
use std::io;
use std::path::Path;

use hotpush_core::UpdateError;

use crate::hooks::{ContentHasher, SignatureVerifier};

/// Name of the optional signed-hash token shipped inside signed update
/// content. Absence means code signing is not configured.
pub const SIGNING_TOKEN_FILE: &str = ".codepushrelease";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub computed_hash: String,
    pub matches_signature: bool,
}

/// Integrity check for a staged directory.
///
/// The computed-vs-expected hash comparison is unconditional and independent
/// of signing. The signed-hash token, when present and configured, must
/// decode to the same computed hash; both mismatches are the same failure:
/// the bits we have are not the bits we were promised.
pub fn verify_package(
    staged_dir: &Path,
    expected_hash: &str,
    hasher: &dyn ContentHasher,
    signatures: &dyn SignatureVerifier,
) -> Result<Verification, UpdateError> {
    let computed = hasher
        .compute_hash(staged_dir)
        .map_err(|err| UpdateError::Integrity(format!("unable to compute package hash: {err:#}")))?;

    if computed != expected_hash {
        return Err(UpdateError::Integrity(format!(
            "computed {computed} but expected {expected_hash}"
        )));
    }

    let token_path = staged_dir.join(SIGNING_TOKEN_FILE);
    let token = match fs::read_to_string(&token_path) {
        Ok(token) => token,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(Verification {
                computed_hash: computed,
                matches_signature: false,
            });
        }
        Err(err) => return Err(UpdateError::io(token_path, err)),
    };

    let decoded = signatures
        .decode_signed_hash(&token)
        .map_err(|err| UpdateError::Integrity(format!("signature verification error: {err:#}")))?;

    match decoded {
        None => Ok(Verification {
            computed_hash: computed,
            matches_signature: false,
        }),
        Some(signed_hash) if signed_hash == computed => Ok(Verification {
            computed_hash: computed,
            matches_signature: true,
        }),
        Some(_) => Err(UpdateError::Integrity(
            "signed hash does not match package contents".to_string(),
        )),
    }
}
