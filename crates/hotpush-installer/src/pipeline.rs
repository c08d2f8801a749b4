use std::fs;
use std::path::{Path, PathBuf};

use hotpush_core::{InstallMode, InstallOptions, PackageRecord, UpdateError};
use tracing::{debug, info, warn};

use crate::deploy;
use crate::fs_utils;
use crate::hooks::{AppFacts, ArchiveExtractor, ContentHasher, NativeInstaller, SignatureVerifier};
use crate::layout::UpdateLayout;
use crate::store::{self, PackageSlot};
use crate::verify;

/// Stages of one install attempt, in execution order. Every failure is
/// terminal for the attempt; retrying is the caller's decision, typically on
/// the next update check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    CleaningScratch,
    Unzipping,
    Verifying,
    Deploying,
    BackingUpMetadata,
    WritingMetadata,
    PreInstalling,
    Handoff,
}

impl InstallStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CleaningScratch => "cleaning-scratch",
            Self::Unzipping => "unzipping",
            Self::Verifying => "verifying",
            Self::Deploying => "deploying",
            Self::BackingUpMetadata => "backing-up-metadata",
            Self::WritingMetadata => "writing-metadata",
            Self::PreInstalling => "pre-installing",
            Self::Handoff => "handoff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub mode: InstallMode,
    pub staged_dir: PathBuf,
    pub matches_signature: bool,
}

/// Drives one install attempt end to end. The pipeline is strictly
/// sequential and provides no mutual exclusion of its own: two attempts for
/// the same data root must not run concurrently, since the scratch cleanup
/// assumes exclusive ownership of that path.
pub struct Installer<'a> {
    layout: &'a UpdateLayout,
    extractor: &'a dyn ArchiveExtractor,
    hasher: &'a dyn ContentHasher,
    signatures: &'a dyn SignatureVerifier,
    native: &'a dyn NativeInstaller,
    facts: &'a dyn AppFacts,
}

impl<'a> Installer<'a> {
    pub fn new(
        layout: &'a UpdateLayout,
        extractor: &'a dyn ArchiveExtractor,
        hasher: &'a dyn ContentHasher,
        signatures: &'a dyn SignatureVerifier,
        native: &'a dyn NativeInstaller,
        facts: &'a dyn AppFacts,
    ) -> Self {
        Self {
            layout,
            extractor,
            hasher,
            signatures,
            native,
            facts,
        }
    }

    /// Stages `archive` and hands the staged content to the platform
    /// installer.
    ///
    /// `on_success` fires once the install is committed: before the native
    /// install call under `InstallMode::Immediate` (the caller's context may
    /// not survive the reload), after the native call otherwise.
    pub fn install(
        &self,
        package: &PackageRecord,
        archive: &Path,
        options: InstallOptions,
        on_success: impl FnOnce(InstallMode),
    ) -> Result<InstallOutcome, UpdateError> {
        let package_hash = package.package_hash.as_deref().ok_or_else(|| {
            UpdateError::Deployment("incoming package record carries no packageHash".to_string())
        })?;

        enter(InstallStage::CleaningScratch);
        let unzip_dir = self.layout.unzip_dir();
        fs_utils::remove_dir_if_exists(&unzip_dir)?;
        fs::create_dir_all(&unzip_dir).map_err(|err| UpdateError::io(&unzip_dir, err))?;

        enter(InstallStage::Unzipping);
        // Extraction errors are recorded, not short-circuited: a corrupt
        // extraction is expected to surface as a hash mismatch below, and
        // both failure modes route through one integrity check.
        let unzip_error = self.extractor.unzip(archive, &unzip_dir).err();
        if let Some(err) = &unzip_error {
            warn!("archive extraction failed, deferring to verification: {err:#}");
        }

        enter(InstallStage::Verifying);
        let verification =
            match verify::verify_package(&unzip_dir, package_hash, self.hasher, self.signatures) {
                Ok(verification) => match unzip_error {
                    None => verification,
                    Some(err) => return Err(UpdateError::Unzip(err)),
                },
                Err(verify_err) => {
                    return Err(match unzip_error {
                        Some(err) => UpdateError::Unzip(err),
                        None => verify_err,
                    });
                }
            };

        enter(InstallStage::Deploying);
        let staged_dir = deploy::resolve_deployment(self.layout, package_hash, self.facts)?;

        // The backup runs before the current slot is overwritten so the old
        // slot always holds the prior record.
        enter(InstallStage::BackingUpMetadata);
        self.backup_metadata_if_confirmed();

        enter(InstallStage::WritingMetadata);
        let record = self.new_metadata(package, package_hash);
        store::write_current_record(self.layout, &record)?;

        enter(InstallStage::PreInstalling);
        self.native
            .pre_install(&staged_dir)
            .map_err(UpdateError::Install)?;

        enter(InstallStage::Handoff);
        let mode = options.effective_mode(package.is_mandatory);
        if mode == InstallMode::Immediate {
            // The native call reloads the process; a callback issued after
            // it could never be observed.
            on_success(mode);
            if let Err(err) =
                self.native
                    .install(&staged_dir, mode, options.minimum_background_duration)
            {
                warn!("native install reported an error after immediate handoff: {err:#}");
            }
        } else {
            self.native
                .install(&staged_dir, mode, options.minimum_background_duration)
                .map_err(UpdateError::Install)?;
            on_success(mode);
        }

        info!(mode = mode.as_str(), "install succeeded");
        Ok(InstallOutcome {
            mode,
            staged_dir,
            matches_signature: verification.matches_signature,
        })
    }

    /// Demotes the current record to the old slot unless the current package
    /// is itself an unconfirmed pending update: rolling back to an
    /// unverified version would defeat the purpose of rollback. Backup
    /// failures are logged and tolerated; losing the rollback target is
    /// preferred over aborting an otherwise-valid install.
    fn backup_metadata_if_confirmed(&self) {
        let current = store::read_record_or_null(self.layout, PackageSlot::Current);
        let pending = current
            .as_ref()
            .and_then(|record| record.package_hash.as_deref())
            .map(|hash| self.facts.is_pending_update(hash))
            .unwrap_or(false);

        if pending {
            debug!("current package is an unconfirmed pending update; skipping metadata backup");
            return;
        }

        if let Err(err) = store::backup_current_record(self.layout) {
            warn!("failed to back up package metadata: {err}");
        }
    }

    fn new_metadata(&self, package: &PackageRecord, package_hash: &str) -> PackageRecord {
        let native_build_time = match self.facts.application_build_time() {
            Ok(timestamp) => Some(timestamp),
            Err(err) => {
                warn!("could not get application build time: {err:#}");
                None
            }
        };
        let app_version = match self.facts.application_version() {
            Ok(version) => version,
            Err(err) => {
                warn!("could not get application version: {err:#}");
                package.app_version.clone()
            }
        };

        let mut record = package.clone();
        record.app_version = app_version;
        record.native_build_time = native_build_time;
        record.local_path = Some(self.layout.version_rel_path(package_hash));
        record.is_first_run = false;
        record.failed_install = false;
        record
    }
}

fn enter(stage: InstallStage) {
    debug!(stage = stage.as_str(), "entering install stage");
}
