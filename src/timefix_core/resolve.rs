use crate::timefix_core::error::{Result, TimefixError};
use crate::timefix_core::exif::{ExifExtractor, get_local_offset};
use filetime::FileTime;
use std::path::Path;
use time::OffsetDateTime;

/// File extensions (lowercase) that can plausibly carry EXIF data.
/// The gate only saves metadata probes on files that cannot hold a
/// capture timestamp; it is not a correctness requirement.
const EXIF_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "tiff", "tif", "png", "heic", "heif", "cr2", "nef", "arw",
];

/// Where a resolved timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Capture time embedded in the file's metadata.
    Exif,
    /// OS-reported creation time, or the inode metadata-change time on
    /// filesystems without birth-time tracking.
    Creation,
}

impl TimestampSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampSource::Exif => "exif",
            TimestampSource::Creation => "creation",
        }
    }
}

impl std::fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A best-guess timestamp for a file, tagged with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    pub timestamp: OffsetDateTime,
    pub source: TimestampSource,
}

/// Resolves the "true" timestamp of a file: EXIF capture time when one of
/// the extraction strategies finds one, OS creation time otherwise.
///
/// Resolution is a strict precedence chain with no cross-file state, so
/// resolving an unchanged file twice yields the same result.
pub struct TimestampResolver {
    extractors: Vec<Box<dyn ExifExtractor>>,
}

impl TimestampResolver {
    /// Extractors are tried in order; pass the list from
    /// [`detect_extractors`](crate::timefix_core::exif::detect_extractors).
    /// An empty list means no extraction capability exists at all, which
    /// is a configuration error rather than something to discover per file.
    pub fn new(extractors: Vec<Box<dyn ExifExtractor>>) -> Result<Self> {
        if extractors.is_empty() {
            return Err(TimefixError::NoExtractor);
        }
        Ok(Self { extractors })
    }

    /// Resolve the timestamp for a single existing regular file.
    pub fn resolve(&mut self, path: &Path) -> Result<ResolvedTimestamp> {
        if !path.exists() {
            return Err(TimefixError::PathNotFound(path.to_path_buf()));
        }

        if has_exif_extension(path) {
            for extractor in &mut self.extractors {
                if let Some(timestamp) = extractor.extract(path) {
                    log::debug!(
                        "{}: {} via {}",
                        path.display(),
                        timestamp,
                        extractor.name()
                    );
                    return Ok(ResolvedTimestamp {
                        timestamp: truncate_to_seconds(timestamp),
                        source: TimestampSource::Exif,
                    });
                }
            }
        }

        Ok(ResolvedTimestamp {
            timestamp: truncate_to_seconds(creation_time(path)?),
            source: TimestampSource::Creation,
        })
    }
}

/// Whether the extension is in the image/video allow-list for EXIF probing.
pub fn has_exif_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXIF_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Set both the modification and access time of a file to the given
/// timestamp, at whole-second granularity.
pub fn set_file_timestamp(path: &Path, timestamp: OffsetDateTime) -> Result<()> {
    let ft = FileTime::from_unix_time(timestamp.unix_timestamp(), 0);
    filetime::set_file_times(path, ft, ft).map_err(|source| TimefixError::CommitFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the file's creation time from the OS. Filesystems without
/// birth-time tracking fall back to the inode metadata-change time,
/// which approximates creation only for files whose metadata has not
/// changed since.
fn creation_time(path: &Path) -> Result<OffsetDateTime> {
    let metadata = std::fs::metadata(path)?;

    if let Ok(created) = metadata.created() {
        return Ok(OffsetDateTime::from(created).to_offset(get_local_offset()));
    }

    metadata_change_time(&metadata)
}

#[cfg(unix)]
fn metadata_change_time(metadata: &std::fs::Metadata) -> Result<OffsetDateTime> {
    use std::os::unix::fs::MetadataExt;

    OffsetDateTime::from_unix_timestamp(metadata.ctime())
        .map(|dt| dt.to_offset(get_local_offset()))
        .map_err(|e| TimefixError::InvalidDateFormat(e.to_string()))
}

#[cfg(not(unix))]
fn metadata_change_time(metadata: &std::fs::Metadata) -> Result<OffsetDateTime> {
    Ok(OffsetDateTime::from(metadata.modified()?).to_offset(get_local_offset()))
}

fn truncate_to_seconds(dt: OffsetDateTime) -> OffsetDateTime {
    dt.replace_nanosecond(0).unwrap_or(dt)
}
