//! Filesystem blob store: one file per key inside a capability-scoped
//! directory.
//!
//! Writes go to a hidden temporary file in the same directory and are renamed
//! over the target, so readers never observe a partially written blob.
//! Compare-and-set is serialised within the process; separate processes
//! sharing a directory are not coordinated.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{BlobStore, BlobStoreError, validate_blob_key};

const BLOB_EXTENSION: &str = "blob";
const ROOT_LABEL: &str = "<root>";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Blob store persisting each key as `<key>.blob` under a root directory.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: Dir,
    write_lock: Mutex<()>,
}

impl FileBlobStore {
    /// Open (creating if needed) the store rooted at `root`.
    pub fn open(root: &Utf8Path) -> Result<Self, BlobStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| BlobStoreError::io(ROOT_LABEL, format!("{root}: {err}")))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| BlobStoreError::io(ROOT_LABEL, format!("{root}: {err}")))?;
        debug!(root = %root, "opened file blob store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn file_name(key: &str) -> Result<String, BlobStoreError> {
        validate_blob_key(key)?;
        Ok(format!("{key}.{BLOB_EXTENSION}"))
    }

    fn guard(&self, key: &str) -> Result<MutexGuard<'_, ()>, BlobStoreError> {
        self.write_lock
            .lock()
            .map_err(|_| BlobStoreError::io(key, "file store lock poisoned"))
    }

    fn read(&self, key: &str, file_name: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        match self.dir.read(file_name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(BlobStoreError::io(key, err.to_string())),
        }
    }

    fn write_atomic(&self, key: &str, file_name: &str, value: &[u8]) -> Result<(), BlobStoreError> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

        self.write_temp(&tmp_name, value)
            .and_then(|()| self.dir.rename(&tmp_name, &self.dir, file_name))
            .map_err(|err| {
                if let Err(cleanup) = self.dir.remove_file(&tmp_name) {
                    debug!(file = %tmp_name, error = %cleanup, "temporary blob not removed");
                }
                BlobStoreError::io(key, err.to_string())
            })?;

        if let Err(err) = self.dir.open(".").and_then(|dir| dir.sync_all()) {
            debug!(key, error = %err, "blob directory sync skipped");
        }
        Ok(())
    }

    fn write_temp(&self, tmp_name: &str, value: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = self.dir.open_with(tmp_name, &options)?;
        file.write_all(value)?;
        file.sync_all()
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let file_name = Self::file_name(key)?;
        self.read(key, &file_name)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobStoreError> {
        let file_name = Self::file_name(key)?;
        let _guard = self.guard(key)?;
        self.write_atomic(key, &file_name, value)
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        let file_name = Self::file_name(key)?;
        let _guard = self.guard(key)?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BlobStoreError::io(key, err.to_string())),
        }
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, BlobStoreError> {
        let file_name = Self::file_name(key)?;
        let _guard = self.guard(key)?;
        let current = self.read(key, &file_name)?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        self.write_atomic(key, &file_name, value)?;
        Ok(true)
    }
}
