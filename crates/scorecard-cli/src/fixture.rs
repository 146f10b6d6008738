//! Seeds a [`MockRepoClient`] from an on-disk directory.
//!
//! The engine's only production-shaped `RepoClient` is `MockRepoClient`
//! (concrete hosting backends are out of scope); this module exists purely
//! so the demo binary can point the mock at a real local directory instead
//! of a hand-written fixture, for a more convincing smoke test.

use scorecard_client_mock::MockRepoClientBuilder;
use std::fs;
use std::path::Path;

/// Maximum file size read into a fixture entry. Larger files are recorded
/// in the file listing but with empty content, matching `MockRepoClient`'s
/// "seeded verbatim" contract without risking loading something enormous.
const MAX_FILE_BYTES: u64 = 256 * 1024;

/// Walk `root` and seed a builder with every regular file underneath it
/// (skipping `.git`), plus license detection.
pub fn seed_from_local_dir(root: &Path, mut builder: MockRepoClientBuilder) -> std::io::Result<MockRepoClientBuilder> {
    let mut files = Vec::new();
    walk(root, root, &mut files)?;

    if let Some((path, _)) = files.iter().find(|(p, _)| is_license_file(p)) {
        builder = builder.with_license(Some(scorecard_client::LicenseInfo {
            spdx_id: None,
            path: path.clone(),
        }));
    }

    builder = builder.with_files(files);
    Ok(builder)
}

fn is_license_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path).to_ascii_uppercase();
    name.starts_with("LICENSE") || name.starts_with("LICENCE") || name.starts_with("COPYING")
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if path.file_name().and_then(|n| n.to_str()) == Some(".git") {
                continue;
            }
            walk(root, &path, out)?;
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let content = if size <= MAX_FILE_BYTES {
            fs::read(&path).unwrap_or_default()
        } else {
            Vec::new()
        };
        out.push((relative, content));
    }
    Ok(())
}
