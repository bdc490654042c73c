use crate::timefix_core::error::{Result, TimefixError};
use exiftool::ExifTool;
use serde::Deserialize;
use std::io::BufReader;
use std::path::Path;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Date format used in EXIF data.
pub const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// A capability provider that can pull a capture timestamp out of a media file.
///
/// Implementations swallow their own failures: a corrupt file, an unsupported
/// container, or a tag value that does not parse all mean "no timestamp
/// found", never an error.
pub trait ExifExtractor {
    fn name(&self) -> &'static str;

    fn extract(&mut self, path: &Path) -> Option<OffsetDateTime>;
}

/// Datetime fields reported by exiftool, probed in priority order:
/// ModifyDate (EXIF DateTime), DateTimeOriginal, CreateDate
/// (EXIF DateTimeDigitized).
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct ExifDates {
    #[serde(default)]
    modify_date: String,
    #[serde(default)]
    date_time_original: String,
    #[serde(default)]
    create_date: String,
}

impl ExifDates {
    /// First field in priority order whose value parses as an EXIF date.
    /// Unparsable values are skipped, not reported.
    fn first_parseable(&self) -> Option<OffsetDateTime> {
        [&self.modify_date, &self.date_time_original, &self.create_date]
            .into_iter()
            .find_map(|raw| parse_exif_date(raw).ok())
    }
}

/// Extracts timestamps by asking the external exiftool process for the
/// file's metadata dictionary.
pub struct ExiftoolExtractor {
    exiftool: ExifTool,
}

impl ExiftoolExtractor {
    /// Returns `None` when the exiftool binary is not on the system.
    pub fn new() -> Option<Self> {
        if !exiftool_available() {
            return None;
        }
        ExifTool::new().ok().map(|exiftool| Self { exiftool })
    }
}

impl ExifExtractor for ExiftoolExtractor {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    fn extract(&mut self, path: &Path) -> Option<OffsetDateTime> {
        let dates: ExifDates = match self.exiftool.read_metadata(path, &[]) {
            Ok(dates) => dates,
            Err(e) => {
                log::debug!("exiftool failed on {}: {}", path.display(), e);
                return None;
            }
        };

        dates.first_parseable()
    }
}

/// Tags probed by the in-process parser, in priority order.
const RAW_EXIF_TAGS: [exif::Tag; 3] = [
    exif::Tag::DateTimeOriginal,
    exif::Tag::DateTimeDigitized,
    exif::Tag::DateTime,
];

/// Extracts timestamps by parsing the raw EXIF stream in process.
pub struct RawExifExtractor;

impl ExifExtractor for RawExifExtractor {
    fn name(&self) -> &'static str {
        "raw-exif"
    }

    fn extract(&mut self, path: &Path) -> Option<OffsetDateTime> {
        let file = std::fs::File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let data = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("EXIF parse failed on {}: {}", path.display(), e);
                return None;
            }
        };

        RAW_EXIF_TAGS
            .into_iter()
            .filter_map(|tag| data.get_field(tag, exif::In::PRIMARY))
            .find_map(|field| {
                let exif::Value::Ascii(ref values) = field.value else {
                    return None;
                };
                let raw = std::str::from_utf8(values.first()?).ok()?;
                parse_exif_date(raw).ok()
            })
    }
}

/// Build the ordered extractor list. Capability detection happens here,
/// once at startup: the exiftool strategy is registered only when the
/// external binary is present; the in-process parser always works.
pub fn detect_extractors() -> Vec<Box<dyn ExifExtractor>> {
    let mut extractors: Vec<Box<dyn ExifExtractor>> = Vec::new();

    match ExiftoolExtractor::new() {
        Some(extractor) => extractors.push(Box::new(extractor)),
        None => log::warn!("exiftool not found, using only the built-in EXIF parser"),
    }

    extractors.push(Box::new(RawExifExtractor));
    extractors
}

/// Parse an EXIF date string ("YYYY:MM:DD HH:MM:SS"), interpreted in
/// local time. No timezone normalization is performed.
pub fn parse_exif_date(date_str: &str) -> Result<OffsetDateTime> {
    if date_str.is_empty() {
        return Err(TimefixError::InvalidDateFormat("empty date".to_string()));
    }

    let date_time = PrimitiveDateTime::parse(date_str, EXIF_DATE_FORMAT)
        .map_err(|e| TimefixError::InvalidDateFormat(e.to_string()))?;

    Ok(date_time.assume_offset(get_local_offset()))
}

/// Get the local timezone offset, falling back to UTC if unavailable.
pub fn get_local_offset() -> UtcOffset {
    OffsetDateTime::now_local()
        .map(|dt| dt.offset())
        .unwrap_or(UtcOffset::UTC)
}

/// Check if exiftool is available on the system.
pub fn exiftool_available() -> bool {
    std::process::Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
