//! Media namespace: where resolved clips actually live.
//!
//! The resolver never consults this; only the playback surface does, and a
//! missing clip becomes a load-failure event.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::resolve::ResourceId;

/// A readable clip.
pub type MediaStream = Box<dyn Read + Send>;

/// Resolves clip identifiers to byte streams.
pub trait MediaNamespace {
    /// Open the clip, or [`Error::ClipNotFound`] if it does not exist.
    fn open(&self, resource: &ResourceId) -> Result<MediaStream>;
}

/// Clips stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirMedia {
    root: PathBuf,
}

impl DirMedia {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a resource maps to.
    pub fn path_of(&self, resource: &ResourceId) -> PathBuf {
        self.root.join(resource.path().trim_start_matches('/'))
    }
}

impl MediaNamespace for DirMedia {
    fn open(&self, resource: &ResourceId) -> Result<MediaStream> {
        match File::open(self.path_of(resource)) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::ClipNotFound(resource.path().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Clips held in memory, keyed by resource path.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedia {
    clips: HashMap<String, Vec<u8>>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.clips.insert(path.into(), data);
    }

    pub fn with_clip(mut self, path: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(path, data);
        self
    }
}

impl MediaNamespace for MemoryMedia {
    fn open(&self, resource: &ResourceId) -> Result<MediaStream> {
        self.clips
            .get(resource.path())
            .map(|data| Box::new(Cursor::new(data.clone())) as MediaStream)
            .ok_or_else(|| Error::ClipNotFound(resource.path().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{ClipResolver, ResourceResolver};
    use crate::tokenize::tokenize;

    fn resource(word: &str) -> ResourceId {
        ClipResolver::new().resolve(&tokenize(word)[0])
    }

    #[test]
    fn test_dir_media_open_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("words")).unwrap();
        std::fs::write(dir.path().join("words/CAT_1.mp4"), b"clip").unwrap();

        let media = DirMedia::new(dir.path());
        let mut data = Vec::new();
        media.open(&resource("cat")).unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, b"clip");

        let missing = media.open(&resource("dog"));
        assert!(matches!(missing, Err(Error::ClipNotFound(p)) if p == "words/DOG_1.mp4"));
    }

    #[test]
    fn test_memory_media() {
        let media = MemoryMedia::new().with_clip("words/HI_1.mp4", vec![1]);
        assert!(media.open(&resource("hi")).is_ok());
        assert!(media.open(&resource("bye")).is_err());
    }
}
