//! Small shared helpers

use std::time::Duration;

/// Render an uptime duration as a compact human-readable string
///
/// Buckets coarsen as the duration grows: `3d 4h 12m`, `4h 12m 9s`,
/// `12m 9s`, `9s`.
#[must_use]
pub fn format_uptime(uptime: Duration) -> String {
    let seconds = uptime.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        return format!("{days}d {}h {}m", hours % 24, minutes % 60);
    }
    if hours > 0 {
        return format!("{hours}h {}m {}s", minutes % 60, seconds % 60);
    }
    if minutes > 0 {
        return format!("{minutes}m {}s", seconds % 60);
    }
    format!("{seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_uptime() {
        assert_eq!(format_uptime(Duration::ZERO), "0s");
    }

    #[test]
    fn seconds_only() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn hours_drop_into_minutes() {
        assert_eq!(format_uptime(Duration::from_secs(3_661)), "1h 1m 1s");
    }

    #[test]
    fn days_drop_seconds() {
        let d = Duration::from_secs(3 * 86_400 + 4 * 3_600 + 12 * 60 + 59);
        assert_eq!(format_uptime(d), "3d 4h 12m");
    }
}
