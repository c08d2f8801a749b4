use std::fs;
use std::path::{Path, PathBuf};

use hotpush_core::UpdateError;

const ROOT_DIR: &str = "codepush";
const DOWNLOAD_DIR: &str = "download";
const UNZIP_DIR: &str = "unzipped";
const DEPLOY_DIR: &str = "deploy";
const VERSIONS_DIR: &str = "versions";
const CURRENT_PACKAGE_FILE: &str = "currentPackage.json";
const OLD_PACKAGE_FILE: &str = "oldPackage.json";
pub(crate) const DIFF_MANIFEST_FILE: &str = "hotcodepush.json";

/// On-disk layout of everything the pipeline owns, rooted at an
/// application-private data directory:
///
/// ```text
/// codepush/download/unzipped/            extraction scratch
/// codepush/deploy/versions/<hash>/       staged deployments, keyed by content hash
/// codepush/currentPackage.json           current package record
/// codepush/oldPackage.json               rollback package record
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLayout {
    data_root: PathBuf,
}

impl UpdateLayout {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn root_dir(&self) -> PathBuf {
        self.data_root.join(ROOT_DIR)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.root_dir().join(DOWNLOAD_DIR)
    }

    /// Scratch area the downloaded artifact is extracted into. Cleaned
    /// before every install attempt.
    pub fn unzip_dir(&self) -> PathBuf {
        self.download_dir().join(UNZIP_DIR)
    }

    pub fn deploy_dir(&self) -> PathBuf {
        self.root_dir().join(DEPLOY_DIR)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.deploy_dir().join(VERSIONS_DIR)
    }

    pub fn version_dir(&self, package_hash: &str) -> PathBuf {
        self.versions_dir().join(package_hash)
    }

    /// Storage path for a deployment as recorded in a package record's
    /// `localPath` field, relative to the data root.
    pub fn version_rel_path(&self, package_hash: &str) -> String {
        format!("{ROOT_DIR}/{DEPLOY_DIR}/{VERSIONS_DIR}/{package_hash}")
    }

    pub fn resolve_rel(&self, rel: &str) -> PathBuf {
        self.data_root.join(rel)
    }

    pub fn current_package_path(&self) -> PathBuf {
        self.root_dir().join(CURRENT_PACKAGE_FILE)
    }

    pub fn old_package_path(&self) -> PathBuf {
        self.root_dir().join(OLD_PACKAGE_FILE)
    }

    /// Where a diff update's manifest lands after extraction. Its presence
    /// is what marks the incoming update as incremental.
    pub fn diff_manifest_path(&self) -> PathBuf {
        self.unzip_dir().join(DIFF_MANIFEST_FILE)
    }

    pub fn ensure_base_dirs(&self) -> Result<(), UpdateError> {
        for dir in [self.root_dir(), self.download_dir(), self.versions_dir()] {
            fs::create_dir_all(&dir).map_err(|err| UpdateError::io(&dir, err))?;
        }
        Ok(())
    }
}
