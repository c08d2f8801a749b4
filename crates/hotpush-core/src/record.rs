use serde::{Deserialize, Serialize};

/// One version of installed or installable content.
///
/// Serialized as `currentPackage.json` / `oldPackage.json` with camelCase
/// field names; the on-disk format is shared with the native side, so the
/// names must not change.
///
/// `package_hash` is the single source of truth for identity and storage
/// location (`deploy/versions/<packageHash>`): two records with the same
/// hash denote the same content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub app_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(default)]
    pub is_first_run: bool,
    #[serde(default)]
    pub failed_install: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_build_time: Option<String>,
}

impl PackageRecord {
    /// Record describing the originally-shipped binary content, used when no
    /// package record file exists yet.
    pub fn for_binary(app_version: impl Into<String>, binary_hash: Option<String>) -> Self {
        Self {
            app_version: app_version.into(),
            deployment_key: None,
            description: None,
            label: None,
            is_mandatory: false,
            package_hash: binary_hash,
            package_size: None,
            local_path: None,
            is_first_run: false,
            failed_install: false,
            native_build_time: None,
        }
    }
}

/// Contents of `hotcodepush.json`, shipped inside a diff update artifact.
/// Presence of the file marks the update as incremental; the listed paths
/// are pruned from the merged deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffManifest {
    #[serde(default)]
    pub deleted_files: Vec<String>,
}
