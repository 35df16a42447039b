//! Metadata Normalizer
//!
//! Pure conversion from backend headers to [`FileAttributes`]. Missing or
//! unknown headers fall back to defaults; a recognized header with an
//! unparsable value is an error.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::attributes::{blocks_for, FileAttributes, FileType, BLOCK_SIZE};
use super::headers::{header_value, Headers, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};

// == Defaults ==
pub const DEFAULT_META_PREFIX: &str = "x-cos-meta-";
pub const DEFAULT_FILE_MODE: u32 = 0o644;
pub const DEFAULT_DIR_MODE: u32 = 0o755;
pub const DIRECTORY_CONTENT_TYPE: &str = "application/x-directory";

const OCTET_STREAM_TYPES: [&str; 2] = ["application/octet-stream", "binary/octet-stream"];
const PERMISSION_MASK: u32 = 0o7777;

// == Metadata Error ==
/// Raised when a recognized header carries a value that cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("invalid value {value:?} for header '{key}'")]
    InvalidValue { key: String, value: String },
}

impl MetadataError {
    fn invalid(key: &str, value: &str) -> Self {
        MetadataError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

// == Normalizer ==
/// Header vocabulary and defaults used to derive attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataNormalizer {
    meta_prefix: String,
    default_file_mode: u32,
    default_dir_mode: u32,
    default_uid: u32,
    default_gid: u32,
}

impl Default for MetadataNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_META_PREFIX)
    }
}

impl MetadataNormalizer {
    /// Creates a normalizer reading user metadata under `meta_prefix`.
    pub fn new(meta_prefix: impl Into<String>) -> Self {
        Self {
            meta_prefix: meta_prefix.into().to_ascii_lowercase(),
            default_file_mode: DEFAULT_FILE_MODE,
            default_dir_mode: DEFAULT_DIR_MODE,
            default_uid: 0,
            default_gid: 0,
        }
    }

    pub fn with_default_modes(mut self, file_mode: u32, dir_mode: u32) -> Self {
        self.default_file_mode = file_mode & PERMISSION_MASK;
        self.default_dir_mode = dir_mode & PERMISSION_MASK;
        self
    }

    pub fn with_default_owner(mut self, uid: u32, gid: u32) -> Self {
        self.default_uid = uid;
        self.default_gid = gid;
        self
    }

    pub fn meta_prefix(&self) -> &str {
        &self.meta_prefix
    }

    // == Convert ==
    /// Derives attributes for `path` from its raw metadata.
    ///
    /// `fallback_mtime` is used when neither the user mtime header nor
    /// `last-modified` is present, which keeps the conversion deterministic.
    pub fn convert(
        &self,
        path: &str,
        meta: &Headers,
        force_dir: bool,
        fallback_mtime: DateTime<Utc>,
    ) -> Result<FileAttributes, MetadataError> {
        let mode = self.user_u32(meta, "mode")?;

        let file_type = if force_dir {
            FileType::Directory
        } else {
            mode.and_then(FileType::from_mode)
                .unwrap_or_else(|| detect_type(path, meta))
        };

        let permissions = match mode {
            Some(mode) => mode & PERMISSION_MASK,
            None if file_type == FileType::Directory => self.default_dir_mode,
            None => self.default_file_mode,
        };

        let size = match file_type {
            FileType::Directory => 0,
            _ => parse_header::<u64>(meta, CONTENT_LENGTH)?.unwrap_or(0),
        };

        Ok(FileAttributes {
            file_type,
            permissions,
            size,
            blocks: blocks_for(file_type, size),
            block_size: BLOCK_SIZE,
            nlink: 1,
            uid: self.user_u32(meta, "uid")?.unwrap_or(self.default_uid),
            gid: self.user_u32(meta, "gid")?.unwrap_or(self.default_gid),
            mtime: self.mtime(meta)?.unwrap_or(fallback_mtime),
        })
    }

    fn user_key(&self, name: &str) -> String {
        format!("{}{}", self.meta_prefix, name)
    }

    fn user_u32(&self, meta: &Headers, name: &str) -> Result<Option<u32>, MetadataError> {
        parse_header::<u32>(meta, &self.user_key(name))
    }

    /// User mtime (unix seconds) takes precedence over `last-modified`.
    fn mtime(&self, meta: &Headers) -> Result<Option<DateTime<Utc>>, MetadataError> {
        let key = self.user_key("mtime");
        if let Some(raw) = header_value(meta, &key) {
            let raw = raw.trim();
            let seconds = raw.split('.').next().unwrap_or(raw);
            return seconds
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(Some)
                .ok_or_else(|| MetadataError::invalid(&key, raw));
        }

        match header_value(meta, LAST_MODIFIED) {
            Some(raw) => DateTime::parse_from_rfc2822(raw.trim())
                .map(|time| Some(time.with_timezone(&Utc)))
                .map_err(|_| MetadataError::invalid(LAST_MODIFIED, raw)),
            None => Ok(None),
        }
    }
}

/// Type detection when the metadata carries no mode type bits.
fn detect_type(path: &str, meta: &Headers) -> FileType {
    let content_type = header_value(meta, CONTENT_TYPE).map(|value| {
        value
            .split(';')
            .next()
            .unwrap_or(value)
            .trim()
            .to_ascii_lowercase()
    });

    match content_type.as_deref() {
        Some(DIRECTORY_CONTENT_TYPE) => FileType::Directory,
        Some(kind) if path.ends_with('/') && OCTET_STREAM_TYPES.contains(&kind) => {
            FileType::Directory
        }
        None if path.ends_with('/') => FileType::Directory,
        _ => FileType::Regular,
    }
}

fn parse_header<T: std::str::FromStr>(
    meta: &Headers,
    key: &str,
) -> Result<Option<T>, MetadataError> {
    match header_value(meta, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| MetadataError::invalid(key, raw)),
        None => Ok(None),
    }
}

// == Convenience ==
/// Converts headers with default settings, using the current time as the
/// mtime fallback.
pub fn convert_header_to_stat(
    path: &str,
    meta: &Headers,
    force_dir: bool,
) -> Result<FileAttributes, MetadataError> {
    MetadataNormalizer::default().convert(path, meta, force_dir, Utc::now())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ETAG;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    #[test]
    fn test_regular_file_from_content_length() {
        let meta = headers(&[("Content-Length", "1000"), ("Content-Type", "text/plain")]);
        let attrs = MetadataNormalizer::default()
            .convert("/a.txt", &meta, false, epoch())
            .unwrap();

        assert_eq!(attrs.file_type, FileType::Regular);
        assert_eq!(attrs.size, 1000);
        assert_eq!(attrs.blocks, 2);
        assert_eq!(attrs.permissions, DEFAULT_FILE_MODE);
        assert_eq!(attrs.nlink, 1);
        assert_eq!(attrs.block_size, BLOCK_SIZE);
    }

    #[test]
    fn test_directory_content_type() {
        let meta = headers(&[("Content-Type", "application/x-directory"), ("Content-Length", "0")]);
        let attrs = MetadataNormalizer::default()
            .convert("/dir", &meta, false, epoch())
            .unwrap();

        assert!(attrs.is_dir());
        assert_eq!(attrs.permissions, DEFAULT_DIR_MODE);
        assert_eq!(attrs.blocks, 0);
    }

    #[test]
    fn test_trailing_slash_octet_stream_is_directory() {
        let meta = headers(&[("Content-Type", "application/octet-stream")]);
        let normalizer = MetadataNormalizer::default();

        assert!(normalizer.convert("/dir/", &meta, false, epoch()).unwrap().is_dir());
        assert!(!normalizer.convert("/file", &meta, false, epoch()).unwrap().is_dir());
    }

    #[test]
    fn test_force_dir_overrides_metadata() {
        let meta = headers(&[("x-cos-meta-mode", "33188"), ("Content-Length", "77")]);
        let attrs = MetadataNormalizer::default()
            .convert("/forced", &meta, true, epoch())
            .unwrap();

        assert!(attrs.is_dir());
        assert_eq!(attrs.size, 0);
        // 33188 == 0o100644, the permission part survives
        assert_eq!(attrs.permissions, 0o644);
    }

    #[test]
    fn test_mode_header_sets_type_and_permissions() {
        // 16877 == 0o040755
        let meta = headers(&[("X-Cos-Meta-Mode", "16877")]);
        let attrs = MetadataNormalizer::default()
            .convert("/d", &meta, false, epoch())
            .unwrap();

        assert_eq!(attrs.file_type, FileType::Directory);
        assert_eq!(attrs.mode(), 0o040755);
    }

    #[test]
    fn test_owner_headers_and_defaults() {
        let normalizer = MetadataNormalizer::default().with_default_owner(1000, 100);

        let meta = headers(&[("x-cos-meta-uid", "501"), ("x-cos-meta-gid", "20")]);
        let attrs = normalizer.convert("/f", &meta, false, epoch()).unwrap();
        assert_eq!((attrs.uid, attrs.gid), (501, 20));

        let attrs = normalizer.convert("/f", &Headers::new(), false, epoch()).unwrap();
        assert_eq!((attrs.uid, attrs.gid), (1000, 100));
    }

    #[test]
    fn test_custom_prefix() {
        let normalizer = MetadataNormalizer::new("X-Amz-Meta-");
        assert_eq!(normalizer.meta_prefix(), "x-amz-meta-");

        let meta = headers(&[("x-amz-meta-uid", "7")]);
        let attrs = normalizer.convert("/f", &meta, false, epoch()).unwrap();
        assert_eq!(attrs.uid, 7);
    }

    #[test]
    fn test_mtime_prefers_user_header() {
        let meta = headers(&[
            ("x-cos-meta-mtime", "1700000000.123"),
            ("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
        ]);
        let attrs = MetadataNormalizer::default()
            .convert("/f", &meta, false, epoch())
            .unwrap();
        assert_eq!(attrs.mtime.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_mtime_from_last_modified() {
        let meta = headers(&[("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT")]);
        let attrs = MetadataNormalizer::default()
            .convert("/f", &meta, false, epoch())
            .unwrap();
        assert_eq!(attrs.mtime.timestamp(), 1_445_412_480);
    }

    #[test]
    fn test_mtime_fallback() {
        let fallback = DateTime::from_timestamp(1_234_567, 0).unwrap();
        let attrs = MetadataNormalizer::default()
            .convert("/f", &Headers::new(), false, fallback)
            .unwrap();
        assert_eq!(attrs.mtime, fallback);
        assert_eq!(attrs.size, 0);
    }

    #[test]
    fn test_malformed_content_length() {
        let meta = headers(&[("Content-Length", "ten")]);
        let result = MetadataNormalizer::default().convert("/f", &meta, false, epoch());
        assert_eq!(
            result,
            Err(MetadataError::InvalidValue {
                key: CONTENT_LENGTH.to_string(),
                value: "ten".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_last_modified() {
        let meta = headers(&[("Last-Modified", "yesterday")]);
        let result = MetadataNormalizer::default().convert("/f", &meta, false, epoch());
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let meta = headers(&[("x-something-else", "???"), (ETAG, "\"e1\"")]);
        assert!(MetadataNormalizer::default()
            .convert("/f", &meta, false, epoch())
            .is_ok());
    }

    #[test]
    fn test_conversion_is_deterministic_and_pure() {
        let meta = headers(&[("Content-Length", "5"), ("x-cos-meta-mode", "33261")]);
        let before = meta.clone();
        let normalizer = MetadataNormalizer::default();

        let first = normalizer.convert("/f", &meta, false, epoch()).unwrap();
        let second = normalizer.convert("/f", &meta, false, epoch()).unwrap();

        assert_eq!(first, second);
        assert_eq!(meta, before);
    }

    #[test]
    fn test_convert_header_to_stat_defaults() {
        let meta = headers(&[("Content-Length", "3")]);
        let attrs = convert_header_to_stat("/f", &meta, false).unwrap();
        assert_eq!(attrs.size, 3);
        assert_eq!(attrs.file_type, FileType::Regular);
    }
}
