use std::fs;
use std::io;
use std::path::PathBuf;

use hotpush_core::{PackageRecord, UpdateError};
use tracing::warn;

use crate::fs_utils;
use crate::hooks::AppFacts;
use crate::layout::UpdateLayout;

/// The two package record slots. `Current` describes what is installed now;
/// `Old` is the rollback target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSlot {
    Current,
    Old,
}

impl PackageSlot {
    pub fn path(self, layout: &UpdateLayout) -> PathBuf {
        match self {
            Self::Current => layout.current_package_path(),
            Self::Old => layout.old_package_path(),
        }
    }
}

/// Serializes a record into the current-package slot, overwriting any prior
/// content. A partially-written slot must not be assumed readable.
pub fn write_current_record(
    layout: &UpdateLayout,
    record: &PackageRecord,
) -> Result<(), UpdateError> {
    let path = layout.current_package_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| UpdateError::io(parent, err))?;
    }

    let content = serde_json::to_string_pretty(record).map_err(|source| UpdateError::Parse {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, content).map_err(|err| UpdateError::io(&path, err))
}

/// Copies the current-package slot into the old-package slot, demoting the
/// current record to rollback target. An existing old slot is removed first.
/// When no current record exists yet (very first install) there is nothing
/// to preserve and this is a no-op success.
pub fn backup_current_record(layout: &UpdateLayout) -> Result<(), UpdateError> {
    let current = layout.current_package_path();
    if !current.exists() {
        return Ok(());
    }

    let old = layout.old_package_path();
    fs_utils::remove_file_if_exists(&old)?;
    fs::copy(&current, &old).map_err(|err| UpdateError::io(&old, err))?;
    Ok(())
}

/// Strict read: `NotFound` when the slot file is absent, `Parse` when it is
/// malformed.
pub fn read_record(layout: &UpdateLayout, slot: PackageSlot) -> Result<PackageRecord, UpdateError> {
    let path = slot.path(layout);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(UpdateError::NotFound(path));
        }
        Err(err) => return Err(UpdateError::io(path, err)),
    };

    serde_json::from_str(&content).map_err(|source| UpdateError::Parse { path, source })
}

/// Lenient read: when the slot is absent, synthesizes a record describing
/// the originally-shipped binary (current app version plus the binary
/// content hash when available). App-facts failures propagate; the
/// file-not-found condition does not.
pub fn read_record_or_default(
    layout: &UpdateLayout,
    slot: PackageSlot,
    facts: &dyn AppFacts,
) -> Result<PackageRecord, UpdateError> {
    match read_record(layout, slot) {
        Ok(record) => Ok(record),
        Err(UpdateError::NotFound(_)) => {
            let app_version = facts.application_version().map_err(UpdateError::AppFacts)?;
            let binary_hash = match facts.binary_content_hash() {
                Ok(hash) => hash,
                Err(err) => {
                    warn!("could not get binary content hash: {err:#}");
                    None
                }
            };
            Ok(PackageRecord::for_binary(app_version, binary_hash))
        }
        Err(other) => Err(other),
    }
}

/// Best-effort read: absent, unreadable, or malformed all come back as
/// `None`. Used for "what is installed right now, if anything" lookups that
/// must tolerate a concurrent in-progress write.
pub fn read_record_or_null(layout: &UpdateLayout, slot: PackageSlot) -> Option<PackageRecord> {
    read_record(layout, slot).ok()
}

/// Refreshes the per-run flags that are owned by the platform rather than
/// the record file.
pub fn hydrate_record_flags(record: &mut PackageRecord, facts: &dyn AppFacts) {
    if let Some(hash) = record.package_hash.clone() {
        record.failed_install = facts.is_failed_update(&hash);
        record.is_first_run = facts.is_first_run(&hash);
    }
}
