use crate::{DiffManifest, InstallMode, InstallOptions, InstallOverrides, PackageRecord};

#[test]
fn package_record_round_trips_camel_case() {
    let record = PackageRecord {
        app_version: "1.4.2".to_string(),
        deployment_key: Some("key-prod".to_string()),
        description: Some("bugfix rollup".to_string()),
        label: Some("v23".to_string()),
        is_mandatory: true,
        package_hash: Some("a".repeat(64)),
        package_size: Some(48_213),
        local_path: Some("codepush/deploy/versions/aaaa".to_string()),
        is_first_run: false,
        failed_install: false,
        native_build_time: Some("1692800000000".to_string()),
    };

    let json = serde_json::to_string_pretty(&record).expect("record must serialize");
    assert!(json.contains("\"appVersion\""));
    assert!(json.contains("\"deploymentKey\""));
    assert!(json.contains("\"packageHash\""));
    assert!(json.contains("\"isMandatory\""));
    assert!(json.contains("\"nativeBuildTime\""));

    let parsed: PackageRecord = serde_json::from_str(&json).expect("record must parse");
    assert_eq!(parsed, record);
}

#[test]
fn package_record_parses_sparse_legacy_file() {
    let raw = r#"{"appVersion":"2.0.0","packageHash":"deadbeef","isMandatory":false}"#;
    let parsed: PackageRecord = serde_json::from_str(raw).expect("sparse record must parse");
    assert_eq!(parsed.app_version, "2.0.0");
    assert_eq!(parsed.package_hash.as_deref(), Some("deadbeef"));
    assert!(!parsed.is_first_run);
    assert!(!parsed.failed_install);
    assert!(parsed.label.is_none());
}

#[test]
fn binary_default_record_omits_unset_fields() {
    let record = PackageRecord::for_binary("3.1.0", None);
    let json = serde_json::to_string(&record).expect("record must serialize");
    assert!(json.contains("\"appVersion\":\"3.1.0\""));
    assert!(!json.contains("packageHash"));
    assert!(!json.contains("localPath"));
}

#[test]
fn diff_manifest_parses_deleted_files_list() {
    let raw = r#"{"deletedFiles":["scripts/old.js","images/splash.png"]}"#;
    let manifest: DiffManifest = serde_json::from_str(raw).expect("manifest must parse");
    assert_eq!(
        manifest.deleted_files,
        vec!["scripts/old.js", "images/splash.png"]
    );

    let empty: DiffManifest = serde_json::from_str("{}").expect("empty manifest must parse");
    assert!(empty.deleted_files.is_empty());
}

#[test]
fn install_mode_wire_values_match_native_contract() {
    assert_eq!(InstallMode::Immediate.wire_value(), 0);
    assert_eq!(InstallMode::OnNextRestart.wire_value(), 1);
    assert_eq!(InstallMode::OnNextResume.wire_value(), 2);
}

#[test]
fn default_install_options() {
    let defaults = InstallOptions::default();
    assert_eq!(defaults.install_mode, InstallMode::OnNextRestart);
    assert_eq!(defaults.mandatory_install_mode, InstallMode::Immediate);
    assert_eq!(defaults.minimum_background_duration, 0);
}

#[test]
fn overrides_resolve_field_by_field() {
    let resolved = InstallOverrides {
        install_mode: Some(InstallMode::OnNextResume),
        mandatory_install_mode: None,
        minimum_background_duration: Some(30),
    }
    .resolve(InstallOptions::DEFAULT);

    assert_eq!(resolved.install_mode, InstallMode::OnNextResume);
    assert_eq!(resolved.mandatory_install_mode, InstallMode::Immediate);
    assert_eq!(resolved.minimum_background_duration, 30);
}

#[test]
fn effective_mode_honors_mandatory_variant() {
    let options = InstallOptions::DEFAULT;
    assert_eq!(options.effective_mode(false), InstallMode::OnNextRestart);
    assert_eq!(options.effective_mode(true), InstallMode::Immediate);
}
