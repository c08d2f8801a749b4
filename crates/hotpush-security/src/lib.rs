mod checksum;
mod ed25519;
mod token;

pub use checksum::{content_hash, sha256_hex};
pub use ed25519::verify_ed25519_signature_hex;
pub use token::decode_signed_hash;
