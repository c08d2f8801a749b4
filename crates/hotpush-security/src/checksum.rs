use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Files that never participate in the content hash. The signing token must
/// be excluded or signing the package would change its own hash; .DS_Store
/// is Finder litter that can appear after the artifact was hashed upstream.
const IGNORED_FILES: &[&str] = &[".codepushrelease", ".DS_Store"];

pub fn sha256_hex(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Deterministic fingerprint of a directory's contents.
///
/// Every file contributes one `<relative/path>:<sha256-hex>` entry; the
/// sorted entry list is serialized as a JSON string array and that
/// serialization is hashed. Relative paths always use forward slashes so the
/// hash agrees across platforms and with the hash computed by the update's
/// origin.
pub fn content_hash(dir: &Path) -> Result<String> {
    let mut entries = Vec::new();
    collect_manifest_entries(dir, dir, &mut entries)?;
    entries.sort();

    let manifest = serde_json::to_string(&entries).context("failed serializing hash manifest")?;
    Ok(sha256_hex(manifest.as_bytes()))
}

fn collect_manifest_entries(root: &Path, current: &Path, entries: &mut Vec<String>) -> Result<()> {
    for entry in
        fs::read_dir(current).with_context(|| format!("failed to read {}", current.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name();
        if IGNORED_FILES
            .iter()
            .any(|ignored| file_name.to_string_lossy() == *ignored)
        {
            continue;
        }

        let metadata = fs::symlink_metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if metadata.is_dir() {
            collect_manifest_entries(root, &path, entries)?;
            continue;
        }

        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("failed to relativize {}", path.display()))?;
        let rel_unix = rel
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        entries.push(format!("{rel_unix}:{}", sha256_hex(&bytes)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{content_hash, sha256_hex};

    fn test_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "hotpush-checksum-{tag}-{}-{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("must create test dir");
        dir
    }

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_trees_hash_identically() {
        let a = test_dir("tree-a");
        let b = test_dir("tree-b");
        for root in [&a, &b] {
            fs::create_dir_all(root.join("scripts")).expect("must create subdir");
            fs::write(root.join("index.html"), b"<html></html>").expect("must write");
            fs::write(root.join("scripts/app.js"), b"console.log(1);").expect("must write");
        }

        let hash_a = content_hash(&a).expect("must hash");
        let hash_b = content_hash(&b).expect("must hash");
        assert_eq!(hash_a, hash_b);
        assert_eq!(hash_a.len(), 64);

        let _ = fs::remove_dir_all(a);
        let _ = fs::remove_dir_all(b);
    }

    #[test]
    fn content_change_changes_hash() {
        let dir = test_dir("content");
        fs::write(dir.join("app.js"), b"v1").expect("must write");
        let before = content_hash(&dir).expect("must hash");

        fs::write(dir.join("app.js"), b"v2").expect("must write");
        let after = content_hash(&dir).expect("must hash");
        assert_ne!(before, after);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn rename_changes_hash_even_with_same_bytes() {
        let dir = test_dir("rename");
        fs::write(dir.join("a.js"), b"same").expect("must write");
        let before = content_hash(&dir).expect("must hash");

        fs::rename(dir.join("a.js"), dir.join("b.js")).expect("must rename");
        let after = content_hash(&dir).expect("must hash");
        assert_ne!(before, after);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn signing_token_and_ds_store_do_not_affect_hash() {
        let dir = test_dir("ignored");
        fs::write(dir.join("app.js"), b"payload").expect("must write");
        let before = content_hash(&dir).expect("must hash");

        fs::write(dir.join(".codepushrelease"), b"token").expect("must write token");
        fs::write(dir.join(".DS_Store"), b"\x00\x01").expect("must write ds_store");
        let after = content_hash(&dir).expect("must hash");
        assert_eq!(before, after);

        let _ = fs::remove_dir_all(dir);
    }
}
