//! Lookup Options
//!
//! One lookup entry point parameterized by what to copy out, whether to
//! validate freshness, and an optional identity token.

use serde::Serialize;

use crate::cache::Freshness;
use crate::metadata::{FileAttributes, Headers};

// == Retrieve ==
/// Which parts of a hit are copied back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retrieve {
    #[default]
    Attributes,
    Metadata,
    Both,
    /// Existence check only, nothing is copied
    Nothing,
}

impl Retrieve {
    pub fn attributes(self) -> bool {
        matches!(self, Retrieve::Attributes | Retrieve::Both)
    }

    pub fn metadata(self) -> bool {
        matches!(self, Retrieve::Metadata | Retrieve::Both)
    }
}

// == Lookup Options ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub retrieve: Retrieve,
    pub freshness: Freshness,
    /// Stored etag must equal this token, otherwise the entry is purged
    pub expected_etag: Option<String>,
    /// Consult `path/` before `path`, the directory form of an object key
    pub directory_fallback: bool,
}

impl LookupOptions {
    pub fn new(retrieve: Retrieve) -> Self {
        Self {
            retrieve,
            ..Self::default()
        }
    }

    pub fn attributes() -> Self {
        Self::new(Retrieve::Attributes)
    }

    pub fn metadata() -> Self {
        Self::new(Retrieve::Metadata)
    }

    pub fn both() -> Self {
        Self::new(Retrieve::Both)
    }

    pub fn existence() -> Self {
        Self::new(Retrieve::Nothing)
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.expected_etag = Some(etag.into());
        self
    }

    pub fn skip_freshness(mut self) -> Self {
        self.freshness = Freshness::Skip;
        self
    }

    pub fn with_directory_fallback(mut self) -> Self {
        self.directory_fallback = true;
        self
    }

    /// Identity token to enforce. An empty token means no check.
    pub fn etag(&self) -> Option<&str> {
        self.expected_etag.as_deref().filter(|etag| !etag.is_empty())
    }
}

// == Lookup Result ==
/// Copies handed back on a hit; nothing here aliases the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    /// Key that actually matched, which differs from the requested path
    /// when the directory form was found
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<FileAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Headers>,
    pub is_forced: bool,
}
