//! Timestamp formatting

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2011, 3, 12, 9, 4, 7).unwrap();
        assert_eq!(format_timestamp(&timestamp), "2011-03-12 09:04:07");
    }
}
