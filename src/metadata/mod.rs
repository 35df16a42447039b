//! Metadata Module
//!
//! Converts raw object-store headers into normalized file attributes.

mod attributes;
mod headers;
mod normalizer;

pub use attributes::{FileAttributes, FileType, BLOCK_SIZE, S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};
pub use headers::{header_value, Headers, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
pub use normalizer::{
    convert_header_to_stat, MetadataError, MetadataNormalizer, DEFAULT_DIR_MODE,
    DEFAULT_FILE_MODE, DEFAULT_META_PREFIX, DIRECTORY_CONTENT_TYPE,
};
