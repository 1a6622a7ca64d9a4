use chrono::{DateTime, Duration, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// `"42s"`, `"3m 07s"` or `"1h 02m 07s"`.
#[must_use]
pub fn format_duration(value: Duration) -> String {
    let total = value.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_compact() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(187)), "3m 07s");
        assert_eq!(format_duration(Duration::seconds(3727)), "1h 02m 07s");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }
}
