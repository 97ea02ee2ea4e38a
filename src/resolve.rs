//! Token → media clip resolution.
//!
//! Resolution is a naming convention only: the clip for `cat` is
//! `<namespace>/CAT_1.<ext>`. Nothing here checks that the clip exists;
//! a missing clip shows up later as a load failure on the playback surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenize::Token;

/// Identifier of one media clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    name: String,
    path: String,
}

impl ResourceId {
    /// Clip name without namespace or extension, e.g. `CAT_1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the clip inside the media namespace, e.g. `words/CAT_1.mp4`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Maps a token to the clip that signs it.
pub trait ResourceResolver {
    /// Derive the clip identifier for `token`. Total and side-effect free.
    fn resolve(&self, token: &Token) -> ResourceId;
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for &R {
    fn resolve(&self, token: &Token) -> ResourceId {
        (**self).resolve(token)
    }
}

/// Default resolver: `<namespace>/<UPPERCASE>_<variant>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipResolver {
    namespace: String,
    variant: u32,
    extension: String,
}

impl ClipResolver {
    /// Namespace used when none is configured.
    pub const DEFAULT_NAMESPACE: &'static str = "words";

    /// Create the default resolver (`words/<WORD>_1.mp4`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the media namespace (directory prefix).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the clip variant number.
    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }

    /// Set the clip file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for ClipResolver {
    fn default() -> Self {
        Self {
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            variant: 1,
            extension: "mp4".to_string(),
        }
    }
}

impl ResourceResolver for ClipResolver {
    fn resolve(&self, token: &Token) -> ResourceId {
        let name = format!("{}_{}", token.key(), self.variant);
        let file = if self.extension.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", name, self.extension)
        };
        let path = if self.namespace.is_empty() {
            file
        } else {
            format!("{}/{}", self.namespace, file)
        };
        ResourceId { name, path }
    }
}
