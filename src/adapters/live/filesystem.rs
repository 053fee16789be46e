//! Live filesystem adapter using `std::fs`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

/// Sibling path the new contents are staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let file_name = path.file_name().map_or_else(
        || "document".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
}

fn write_and_sync(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(fs::read_to_string(path)?)
    }

    fn write_atomic(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let staging = staging_path(path);
        tracing::debug!(
            target_path = %path.display(),
            staging = %staging.display(),
            "staging write"
        );

        let result = write_and_sync(&staging, contents).and_then(|()| fs::rename(&staging, path));
        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            return Err(format!("Failed to write {}: {e}", path.display()).into());
        }
        Ok(())
    }
}
