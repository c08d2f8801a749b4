mod deploy;
mod fs_utils;
mod hooks;
mod layout;
mod pipeline;
mod store;
mod verify;

pub use deploy::{apply_diff, read_diff_manifest, resolve_deployment};
pub use fs_utils::{copy_dir_contents, remove_dir_if_exists, remove_file_if_exists};
pub use hooks::{
    AppFacts, ArchiveExtractor, ContentHasher, Ed25519SignatureVerifier, NativeInstaller,
    Sha256ContentHasher, SignatureVerifier,
};
pub use layout::UpdateLayout;
pub use pipeline::{InstallOutcome, InstallStage, Installer};
pub use store::{
    backup_current_record, hydrate_record_flags, read_record, read_record_or_default,
    read_record_or_null, write_current_record, PackageSlot,
};
pub use verify::{verify_package, Verification, SIGNING_TOKEN_FILE};
