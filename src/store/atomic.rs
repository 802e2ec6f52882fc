//! Atomic table file writes.
//!
//! Content lands in a temp file beside the target and is renamed over it,
//! so readers see either the old table or the new one.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `content` to `path` through a temp file in the same directory.
pub(crate) async fn atomic_write(path: &Path, content: String) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    let target_path = path.to_path_buf();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        temp_file.as_file().sync_all()?;
        // persist consumes the temp file, so it is not deleted on drop
        temp_file.persist(&target_path)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_atomic_write_replaces_table_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("Survey.json");
        std::fs::write(&file_path, "{}").unwrap();

        atomic_write(&file_path, r#"{"nextKey":2,"records":[]}"#.to_string())
            .await
            .unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, r#"{"nextKey":2,"records":[]}"#);
        let count = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(count, 1, "temp file left behind");
    }

    #[tokio::test]
    async fn test_atomic_write_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("absent").join("Survey.json");
        assert!(atomic_write(&file_path, String::new()).await.is_err());
    }
}
