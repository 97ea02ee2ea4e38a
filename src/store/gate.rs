//! Guard against re-submitting an upload while one is being extracted.
//!
//! [`UploadGate`] covers one process; [`LibraryLock`] covers every process
//! sharing a library directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Admits one upload at a time.
#[derive(Debug, Clone, Default)]
pub struct UploadGate {
    busy: Arc<AtomicBool>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or [`Error::UploadInProgress`] if it is held.
    pub fn try_acquire(&self) -> Result<UploadPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::UploadInProgress)?;
        Ok(UploadPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one upload; releases the gate on drop.
#[derive(Debug)]
pub struct UploadPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for UploadPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Lock file name inside a library directory.
pub const LOCK_FILE: &str = ".upload.lock";

/// Exclusive upload lock held as a file in a library directory.
///
/// The file is created with `create_new`, so a second holder gets
/// [`Error::UploadInProgress`]. It is removed on drop; a process that dies
/// while holding it leaves the file behind and it must be deleted by hand.
#[derive(Debug)]
pub struct LibraryLock {
    path: PathBuf,
}

impl LibraryLock {
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::warn!("Upload lock held: {}", path.display());
                Err(Error::UploadInProgress)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LibraryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Could not release {}: {}", self.path.display(), e);
        }
    }
}
