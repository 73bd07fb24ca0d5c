//! Timestamps for change events.

use chrono::{DateTime, Utc};

/// UTC timestamp stamped on change events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
