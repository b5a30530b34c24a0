//! Marker and snapshot files: reads, and atomic writes via temp file + rename

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use super::error::RepoError;
use super::metadata::Metadata;
use crate::snapshot::Snapshot;

pub const MARKER_FILENAME: &str = ".adrian-repo";
pub const SNAPSHOT_FILENAME: &str = "snapshot.json";

// Portal responses for a party search can be large, but not this large
const MAX_SNAPSHOT_BYTES: u64 = 64 * 1024 * 1024;

pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILENAME)
}

pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(SNAPSHOT_FILENAME)
}

pub fn marker_exists(dir: &Path) -> bool {
    marker_path(dir).is_file()
}

/// Read and decode the marker; `None` when there is no marker in `dir`
///
/// Anything at the marker path that is not a regular file does not count as a
/// marker, same as [`marker_exists`].
pub fn read_marker(dir: &Path) -> Result<Option<Metadata>, RepoError> {
    let path = marker_path(dir);
    match fs::metadata(&path) {
        Ok(meta) if !meta.is_file() => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        _ => {}
    }

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(RepoError::corrupt(&path, "marker is not valid UTF-8"));
        }
        Err(e) => return Err(RepoError::io(&path, e)),
    };

    Metadata::decode(&text, &path).map(Some)
}

pub fn write_marker(dir: &Path, metadata: &Metadata) -> Result<(), RepoError> {
    write_atomic(&marker_path(dir), metadata.encode().as_bytes())
}

/// Load the stored snapshot
///
/// Any failure here means the repository claims data it cannot produce, so every
/// error (missing file, unreadable file, bad JSON) is reported as corruption.
pub fn read_snapshot(dir: &Path) -> Result<Snapshot, RepoError> {
    let path = snapshot_path(dir);

    // Size is checked on the open handle, not on a separate stat of the path
    let mut file = File::open(&path)
        .map_err(|e| RepoError::corrupt(&path, format!("cannot open snapshot: {}", e)))?;
    let size = file
        .metadata()
        .map_err(|e| RepoError::corrupt(&path, format!("cannot stat snapshot: {}", e)))?
        .len();
    if size > MAX_SNAPSHOT_BYTES {
        return Err(RepoError::corrupt(
            &path,
            format!("snapshot too large ({} bytes, max {} bytes)", size, MAX_SNAPSHOT_BYTES),
        ));
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| RepoError::corrupt(&path, format!("cannot read snapshot: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| RepoError::corrupt(&path, format!("cannot parse snapshot: {}", e)))
}

pub fn write_snapshot(dir: &Path, snapshot: &Snapshot) -> Result<(), RepoError> {
    let path = snapshot_path(dir);
    let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| RepoError::io(&path, e.into()))?;
    write_atomic(&path, &bytes)
}

/// Replace `path` with `bytes` so readers see either the old or the new content
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RepoError> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp = path.with_file_name(format!("{}.tmp", file_name));

    let result = (|| {
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(RepoError::io(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::repository::RepoKind;

    #[test]
    fn test_read_marker_absent() {
        let dir = TempDir::new().unwrap();
        assert!(read_marker(dir.path()).unwrap().is_none());
        assert!(!marker_exists(dir.path()));
    }

    #[test]
    fn test_marker_write_then_read() {
        let dir = TempDir::new().unwrap();
        let meta = Metadata::new("1234/3/2024", RepoKind::ByFileNumber);
        write_marker(dir.path(), &meta).unwrap();

        assert!(marker_exists(dir.path()));
        assert_eq!(read_marker(dir.path()).unwrap(), Some(meta));
        // No temp file left behind
        assert!(!dir.path().join(".adrian-repo.tmp").exists());
    }

    #[test]
    fn test_marker_path_holding_a_directory_is_absent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(marker_path(dir.path())).unwrap();
        assert!(!marker_exists(dir.path()));
        assert!(read_marker(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_read_marker_rejects_non_utf8() {
        let dir = TempDir::new().unwrap();
        fs::write(marker_path(dir.path()), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_marker(dir.path()), Err(RepoError::Corrupt { .. })));
    }

    #[test]
    fn test_read_snapshot_missing_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let err = read_snapshot(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::Corrupt { .. }));
    }

    #[test]
    fn test_read_snapshot_garbage_is_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(snapshot_path(dir.path()), "{ not json").unwrap();
        let err = read_snapshot(dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot parse snapshot"));
    }

    #[test]
    fn test_snapshot_write_then_read() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::record([(
            "Dosar",
            Snapshot::Seq(vec![Snapshot::record([("numar", Snapshot::scalar("1/1/2024"))])]),
        )]);
        write_snapshot(dir.path(), &snapshot).unwrap();
        assert_eq!(read_snapshot(dir.path()).unwrap(), snapshot);
    }

    #[test]
    fn test_write_atomic_into_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = write_marker(&missing, &Metadata::new("x", RepoKind::BySearch)).unwrap_err();
        assert!(matches!(err, RepoError::Io { .. }));
    }
}
