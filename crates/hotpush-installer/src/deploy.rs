use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use hotpush_core::{DiffManifest, UpdateError};

use crate::fs_utils;
use crate::hooks::AppFacts;
use crate::layout::UpdateLayout;
use crate::store::{self, PackageSlot};

/// Probes the extraction scratch for a diff manifest. `Ok(None)` means the
/// incoming update is a full package and a clean deployment applies.
pub fn read_diff_manifest(layout: &UpdateLayout) -> Result<Option<DiffManifest>, UpdateError> {
    let path = layout.diff_manifest_path();
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(UpdateError::io(path, err)),
    };

    let manifest = serde_json::from_str(&content).map_err(|err| {
        UpdateError::Deployment(format!("malformed diff manifest {}: {err}", path.display()))
    })?;
    Ok(Some(manifest))
}

/// Builds a merged deployment in `target`: base tree first, then the new
/// content overlaid on top, then the manifest's deleted paths pruned. Each
/// step must complete before the next begins; on failure the partially-built
/// target is invalid and must not be promoted.
///
/// The result is required to be file-for-file identical to a clean
/// deployment of the corresponding full package.
pub fn apply_diff(
    manifest: &DiffManifest,
    base_dir: &Path,
    new_content_dir: &Path,
    target_dir: &Path,
) -> Result<(), UpdateError> {
    fs_utils::copy_dir_contents(base_dir, target_dir).map_err(|err| {
        UpdateError::Deployment(format!("failed copying previous deployment: {err}"))
    })?;

    fs_utils::copy_dir_contents(new_content_dir, target_dir)
        .map_err(|err| UpdateError::Deployment(format!("failed overlaying new content: {err}")))?;

    delete_relative_paths(target_dir, &manifest.deleted_files)
}

fn delete_relative_paths(root: &Path, rel_paths: &[String]) -> Result<(), UpdateError> {
    for rel in rel_paths {
        let rel_path = validated_relative_path(rel)?;
        let full = root.join(rel_path);
        // A listed path that is already absent is a no-op.
        if full.is_dir() {
            fs_utils::remove_dir_if_exists(&full)
        } else {
            fs_utils::remove_file_if_exists(&full)
        }
        .map_err(|err| {
            UpdateError::Deployment(format!("failed pruning deleted path '{rel}': {err}"))
        })?;
    }
    Ok(())
}

fn validated_relative_path(path: &str) -> Result<&Path, UpdateError> {
    let rel = Path::new(path);
    if rel.as_os_str().is_empty() {
        return Err(UpdateError::Deployment(
            "deleted path must not be empty".to_string(),
        ));
    }
    if rel.is_absolute() {
        return Err(UpdateError::Deployment(format!(
            "deleted path must be relative: {path}"
        )));
    }
    if rel
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(UpdateError::Deployment(format!(
            "deleted path must not include '..': {path}"
        )));
    }
    Ok(rel)
}

/// Decides between clean and diff deployment for the extracted update and
/// drives whichever applies. Returns the staged versioned directory, ready
/// for metadata writing.
pub fn resolve_deployment(
    layout: &UpdateLayout,
    package_hash: &str,
    facts: &dyn AppFacts,
) -> Result<PathBuf, UpdateError> {
    let target = layout.version_dir(package_hash);
    fs::create_dir_all(&target).map_err(|err| {
        UpdateError::Deployment(format!(
            "failed creating versioned directory {}: {err}",
            target.display()
        ))
    })?;

    match read_diff_manifest(layout)? {
        Some(manifest) => {
            let base = previous_deployment_dir(layout).map(Ok).unwrap_or_else(|| {
                facts.bundled_content_dir().map_err(|err| {
                    UpdateError::Deployment(format!("could not locate bundled content: {err:#}"))
                })
            })?;
            apply_diff(&manifest, &base, &layout.unzip_dir(), &target)?;
            // The manifest is pipeline metadata, not content; leaving it in
            // place would make a diff deployment differ from the clean
            // deployment it must be equivalent to.
            fs_utils::remove_file_if_exists(&target.join(crate::layout::DIFF_MANIFEST_FILE))
                .map_err(|err| {
                    UpdateError::Deployment(format!("failed removing diff manifest: {err}"))
                })?;
        }
        None => {
            fs_utils::copy_dir_contents(&layout.unzip_dir(), &target).map_err(|err| {
                UpdateError::Deployment(format!("failed copying new package: {err}"))
            })?;
        }
    }

    Ok(target)
}

/// Location of the previously deployed content, when a current record exists
/// and points at one. Best-effort by design.
fn previous_deployment_dir(layout: &UpdateLayout) -> Option<PathBuf> {
    let record = store::read_record_or_null(layout, PackageSlot::Current)?;
    let rel = record.local_path?;
    let dir = layout.resolve_rel(&rel);
    dir.is_dir().then_some(dir)
}
