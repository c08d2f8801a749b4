use std::path::{Path, PathBuf};

use anyhow::Result;
use hotpush_core::InstallMode;

/// Extracts a downloaded update artifact into a destination directory.
/// The archive format is the extractor's business, not the pipeline's.
pub trait ArchiveExtractor {
    fn unzip(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Computes the content hash of a staged directory tree.
pub trait ContentHasher {
    fn compute_hash(&self, dir: &Path) -> Result<String>;
}

/// Decodes the signed-hash token found inside staged content.
pub trait SignatureVerifier {
    /// `Ok(None)` means code signing is not configured for this
    /// application; `Err` means the token is present but cannot be trusted.
    fn decode_signed_hash(&self, token: &str) -> Result<Option<String>>;
}

/// The platform installer that performs the atomic content swap. Under
/// `InstallMode::Immediate` the `install` call is expected to trigger a
/// process reload.
pub trait NativeInstaller {
    fn pre_install(&self, staged_dir: &Path) -> Result<()>;
    fn install(
        &self,
        staged_dir: &Path,
        mode: InstallMode,
        minimum_background_duration: u32,
    ) -> Result<()>;
}

/// Facts about the host application and its install history.
pub trait AppFacts {
    fn application_version(&self) -> Result<String>;
    fn application_build_time(&self) -> Result<String>;
    /// Content hash of the binary's originally-bundled content, when the
    /// platform can compute one.
    fn binary_content_hash(&self) -> Result<Option<String>>;
    /// Directory holding the originally-bundled content; the merge base for
    /// a diff update when no previous deployment exists.
    fn bundled_content_dir(&self) -> Result<PathBuf>;
    /// Whether the installed package is still awaiting its health
    /// confirmation. An unconfirmed package must never become a rollback
    /// target.
    fn is_pending_update(&self, package_hash: &str) -> bool;
    fn is_first_run(&self, package_hash: &str) -> bool;
    fn is_failed_update(&self, package_hash: &str) -> bool;
}

/// Directory content hashing backed by the sha256 manifest scheme.
pub struct Sha256ContentHasher;

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, dir: &Path) -> Result<String> {
        hotpush_security::content_hash(dir)
    }
}

/// Ed25519 signed-hash verification. A verifier constructed without a
/// public key reports signing as unconfigured rather than failing.
pub struct Ed25519SignatureVerifier {
    public_key_hex: Option<String>,
}

impl Ed25519SignatureVerifier {
    pub fn new(public_key_hex: Option<String>) -> Self {
        Self { public_key_hex }
    }
}

impl SignatureVerifier for Ed25519SignatureVerifier {
    fn decode_signed_hash(&self, token: &str) -> Result<Option<String>> {
        match &self.public_key_hex {
            None => Ok(None),
            Some(key) => hotpush_security::decode_signed_hash(token, key).map(Some),
        }
    }
}
