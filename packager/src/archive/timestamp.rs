//! Reproducible-build timestamps for archive entries.
//!
//! Accepts either an ISO 8601 date-time with offset
//! (`yyyy-MM-dd'T'HH:mm:ssXXX`) or an integer count of seconds since the
//! epoch, in the style of `SOURCE_DATE_EPOCH`.

use super::error::{ArchiveError, Result};
use std::time::SystemTime;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Earliest instant a zip entry can record: 1980-01-01T00:00:02Z.
const MIN_EPOCH_SECONDS: i64 = 315_532_802;

/// Latest instant accepted: 2099-12-31T23:59:59Z.
const MAX_EPOCH_SECONDS: i64 = 4_102_444_799;

/// A validated timestamp applied to every entry of a reproducible archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTimestamp(OffsetDateTime);

impl OutputTimestamp {
    /// Parse a configured `output_timestamp` value.
    ///
    /// Returns `Ok(None)` when the value is absent or shorter than two
    /// characters, which leaves reproducible mode disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidTimestamp`] when the value is neither
    /// epoch seconds nor an offset date-time, and
    /// [`ArchiveError::TimestampOutOfRange`] when the instant cannot be
    /// stored in a zip entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rar_packager::archive::timestamp::OutputTimestamp;
    ///
    /// let iso = OutputTimestamp::parse(Some("2024-01-01T00:00:00Z")).unwrap();
    /// let epoch = OutputTimestamp::parse(Some("1704067200")).unwrap();
    /// assert_eq!(iso, epoch);
    /// assert!(OutputTimestamp::parse(Some("1")).unwrap().is_none());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>> {
        let Some(value) = raw.filter(|v| v.chars().count() >= 2) else {
            return Ok(None);
        };

        let instant = if value.chars().all(|c| c.is_ascii_digit()) {
            value
                .parse::<i64>()
                .ok()
                .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        } else {
            OffsetDateTime::parse(value, &Rfc3339).ok()
        }
        .ok_or_else(|| ArchiveError::InvalidTimestamp {
            value: value.to_owned(),
        })?;

        let seconds = instant.unix_timestamp();
        if !(MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds) {
            return Err(ArchiveError::TimestampOutOfRange {
                value: value.to_owned(),
            });
        }

        let utc = instant
            .to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)
            .unwrap_or(instant);
        Ok(Some(Self(utc)))
    }

    /// Return seconds since the epoch.
    #[must_use]
    pub const fn unix_seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Return the zip entry date-time for this instant.
    #[must_use]
    pub fn zip_date_time(&self) -> zip::DateTime {
        zip_date_time(self.0).unwrap_or_default()
    }
}

/// Convert an instant to a zip date-time using its UTC calendar fields.
///
/// Returns `None` for instants the zip format cannot represent.
pub(crate) fn zip_date_time(instant: OffsetDateTime) -> Option<zip::DateTime> {
    let utc = instant.to_offset(UtcOffset::UTC);
    let year = u16::try_from(utc.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
    )
    .ok()
}

/// Convert a file modification time to a zip date-time.
///
/// Times before 1980 fall back to the zip epoch.
pub(crate) fn zip_date_time_for(modified: SystemTime) -> zip::DateTime {
    zip_date_time(OffsetDateTime::from(modified)).unwrap_or_default()
}
