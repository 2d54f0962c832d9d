use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// `strftime` pattern used by `log` and `global-log`.
pub const LOG_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Wall-clock instant recorded on a commit.
///
/// Stored as whole milliseconds since the UNIX epoch so that commit hashing
/// and serialization stay independent of the host timezone. Rendering into a
/// human-readable date happens only at the presentation edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    millis: i64,
}

impl Timestamp {
    /// Create a timestamp from milliseconds since the UNIX epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self {
            millis: Utc::now().timestamp_millis(),
        }
    }

    /// The UNIX epoch. Every repository's initial commit carries this value.
    pub const fn epoch() -> Self {
        Self { millis: 0 }
    }

    /// Milliseconds since the UNIX epoch.
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Convert to a chrono UTC datetime.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, TypeError> {
        Utc.timestamp_millis_opt(self.millis)
            .single()
            .ok_or_else(|| TypeError::InvalidTimestamp(self.millis.to_string()))
    }

    /// Render for commit logs, e.g. `Thu Jan 1 00:00:00 1970 +0000`.
    ///
    /// With `utc` set the offset is always `+0000`; otherwise the host's
    /// local timezone is used.
    pub fn format_log(&self, utc: bool) -> Result<String, TypeError> {
        let dt = self.to_utc()?;
        if utc {
            Ok(dt.format(LOG_DATE_FORMAT).to_string())
        } else {
            Ok(dt.with_timezone(&Local).format(LOG_DATE_FORMAT).to_string())
        }
    }

    /// RFC 3339 rendering in UTC.
    pub fn to_rfc3339(&self) -> Result<String, TypeError> {
        Ok(self.to_utc()?.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            millis: dt.timestamp_millis(),
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}ms", self.millis),
        }
    }
}
