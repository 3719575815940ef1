use std::io::{self, Write};
use std::path::Path;

use axum::body::Bytes;
use tempfile::TempPath;

/// An uploaded file on disk, removed when this value is dropped.
///
/// Every request gets its own uniquely named file, so concurrent requests
/// sharing a temp directory never collide.
#[derive(Debug)]
pub struct ScopedUpload {
    path: TempPath,
}

impl ScopedUpload {
    /// Creates `upload-*.epub` in `dir` and writes `bytes` into it on the
    /// blocking pool.
    pub async fn write(dir: &Path, bytes: Bytes) -> io::Result<Self> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || -> io::Result<Self> {
            // On failure `file` is dropped and removed before returning.
            let mut file = tempfile::Builder::new()
                .prefix("upload-")
                .suffix(".epub")
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(Self {
                path: file.into_temp_path(),
            })
        })
        .await
        .map_err(io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_is_removed_on_drop() {
        let dir = tempdir().unwrap();
        let upload = ScopedUpload::write(dir.path(), Bytes::from_static(b"PK\x03\x04"))
            .await
            .unwrap();
        let path = upload.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04");
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".epub"));

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn names_are_unique() {
        let dir = tempdir().unwrap();
        let a = ScopedUpload::write(dir.path(), Bytes::from_static(b"a")).await.unwrap();
        let b = ScopedUpload::write(dir.path(), Bytes::from_static(b"b")).await.unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn drop_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let upload = ScopedUpload::write(dir.path(), Bytes::from_static(b"x")).await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        drop(upload);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(ScopedUpload::write(&gone, Bytes::from_static(b"x")).await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn large_upload_is_written_in_full() {
        let dir = tempdir().unwrap();
        let payload = vec![0x5a_u8; 4 * 1024 * 1024];
        let upload = ScopedUpload::write(dir.path(), Bytes::from(payload.clone()))
            .await
            .unwrap();
        assert_eq!(std::fs::read(upload.path()).unwrap(), payload);
    }
}
