use crate::error::MalformedName;
use chrono::{Duration, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref SCREENSHOT_NAME: Regex = Regex::new(
        r"^Screenshot_(\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2})-(\d{3})_(.*)\.jpg$"
    )
    .expect("screenshot filename pattern is valid");
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
const PACKAGE_SEPARATOR: char = '-';

/// Timestamp and application identifier encoded in a screenshot filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub timestamp: NaiveDateTime,
    pub package_name: String,
}

/// Parse `Screenshot_<YYYY-MM-DD-HH-MM-SS-mmm>_<package>.jpg`.
///
/// Anything after the first `-` of the package segment is an editor/variant suffix and is
/// dropped, so `com.app-edit` and `com.app` collapse to the same package. The package may
/// be empty.
pub fn parse_file_name(file_name: &str) -> Result<ParsedName, MalformedName> {
    let captures = SCREENSHOT_NAME
        .captures(file_name)
        .ok_or_else(|| MalformedName::PatternMismatch(file_name.to_string()))?;

    let invalid = |reason: String| MalformedName::InvalidTimestamp {
        file_name: file_name.to_string(),
        reason,
    };

    let seconds = NaiveDateTime::parse_from_str(&captures[1], TIMESTAMP_FORMAT)
        .map_err(|e| invalid(e.to_string()))?;
    let millis: i64 = captures[2].parse().map_err(|e| invalid(format!("{e}")))?;
    let timestamp = seconds + Duration::milliseconds(millis);

    let package_name = captures[3]
        .split(PACKAGE_SEPARATOR)
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(ParsedName {
        timestamp,
        package_name,
    })
}

/// One screenshot found in the source folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotRecord {
    pub file_name: String,
    pub timestamp: NaiveDateTime,
    pub package_name: String,
    pub source_path: PathBuf,
}

impl ScreenshotRecord {
    /// Names that are not valid UTF-8 can never match and are rejected as is, so the
    /// destination name always equals the source name.
    pub fn from_path(path: &Path) -> Result<Self, MalformedName> {
        let file_name = match path.file_name() {
            Some(name) => name.to_str().ok_or_else(|| {
                MalformedName::PatternMismatch(name.to_string_lossy().into_owned())
            })?,
            None => return Err(MalformedName::PatternMismatch(String::new())),
        }
        .to_string();
        let parsed = parse_file_name(&file_name)?;
        Ok(Self {
            file_name,
            timestamp: parsed.timestamp,
            package_name: parsed.package_name,
            source_path: path.to_path_buf(),
        })
    }

    pub fn time_text(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn date_text(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }

    /// Month bucket name, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.timestamp.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_well_formed_name() {
        let parsed =
            parse_file_name("Screenshot_2023-05-14-09-30-15-123_com.example.app.jpg").unwrap();
        assert_eq!(parsed.package_name, "com.example.app");
        assert_eq!(parsed.timestamp.year(), 2023);
        assert_eq!(parsed.timestamp.month(), 5);
        assert_eq!(parsed.timestamp.day(), 14);
        assert_eq!(parsed.timestamp.hour(), 9);
        assert_eq!(parsed.timestamp.minute(), 30);
        assert_eq!(parsed.timestamp.second(), 15);
        assert_eq!(parsed.timestamp.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_package_suffix_is_dropped() {
        let parsed =
            parse_file_name("Screenshot_2023-05-14-09-31-00-456_com.example.app-edit.jpg")
                .unwrap();
        assert_eq!(parsed.package_name, "com.example.app");

        let parsed =
            parse_file_name("Screenshot_2023-05-14-09-31-00-456_org.foo-a-b-c.jpg").unwrap();
        assert_eq!(parsed.package_name, "org.foo");
    }

    #[test]
    fn test_pattern_mismatch() {
        for name in [
            "random.jpg",
            "Screen_2023-05-14-09-30-15-123_com.example.app.jpg",
            "Screenshot_2023-05-14-09-30-15-123_com.example.app.png",
            "Screenshot_2023-05-14-09-30-15_com.example.app.jpg",
            "Screenshot_2023-05-xx-09-30-15-123_com.example.app.jpg",
            "xScreenshot_2023-05-14-09-30-15-123_com.example.app.jpg",
            "Screenshot_2023-05-14-09-30-15-123_com.example.app.jpg.bak",
        ] {
            assert!(
                matches!(parse_file_name(name), Err(MalformedName::PatternMismatch(_))),
                "{name} should not match"
            );
        }
    }

    #[test]
    fn test_invalid_calendar_date() {
        for name in [
            "Screenshot_2023-13-40-09-30-15-123_com.example.app.jpg",
            "Screenshot_2023-02-30-09-30-15-123_com.example.app.jpg",
            "Screenshot_2023-05-14-25-30-15-123_com.example.app.jpg",
        ] {
            assert!(
                matches!(
                    parse_file_name(name),
                    Err(MalformedName::InvalidTimestamp { .. })
                ),
                "{name} should have an invalid timestamp"
            );
        }
    }

    #[test]
    fn test_empty_package_segment_is_accepted() {
        let parsed = parse_file_name("Screenshot_2023-05-14-09-30-15-123_.jpg").unwrap();
        assert_eq!(parsed.package_name, "");

        let parsed = parse_file_name("Screenshot_2023-05-14-09-30-15-123_-edit.jpg").unwrap();
        assert_eq!(parsed.package_name, "");
        assert_eq!(parsed.timestamp.minute(), 30);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"Screenshot_2023-05-14-09-30-15-123_com.\xff.jpg");
        let path = Path::new("screenshots").join(name);
        assert!(matches!(
            ScreenshotRecord::from_path(&path),
            Err(MalformedName::PatternMismatch(_))
        ));
    }

    #[test]
    fn test_record_text_fields() {
        let record = ScreenshotRecord::from_path(Path::new(
            "screenshots/Screenshot_2024-01-02-23-59-59-999_com.example.app.jpg",
        ))
        .unwrap();
        assert_eq!(record.time_text(), "23:59");
        assert_eq!(record.date_text(), "2024-01-02");
        assert_eq!(record.month_key(), "2024-01");
        assert_eq!(
            record.file_name,
            "Screenshot_2024-01-02-23-59-59-999_com.example.app.jpg"
        );
    }
}
