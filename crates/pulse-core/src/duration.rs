use std::time::Duration;

use crate::error::ConfigError;

/// Parse a duration string like "5s", "500ms", "2m", or a bare number of seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.trim().parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.trim().parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// Parse an interval-control value: a positive whole number of seconds.
///
/// Zero, negative numbers, and anything non-numeric are rejected.
pub fn parse_interval_secs(raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs as u64)),
        _ => Err(ConfigError::InvalidInterval(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration(" 10 "), Some(Duration::from_secs(10)));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration("-5s"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn interval_accepts_positive_seconds() {
        assert_eq!(parse_interval_secs("10"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_interval_secs(" 1\n"), Ok(Duration::from_secs(1)));
    }

    #[test]
    fn interval_rejects_zero_negative_and_text() {
        for raw in ["0", "-3", "abc", "", "2.5"] {
            assert!(
                matches!(parse_interval_secs(raw), Err(ConfigError::InvalidInterval(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
