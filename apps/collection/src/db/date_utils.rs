//! Conversions between `DateTime<Utc>` and stored integer timestamps.

use chrono::{DateTime, Utc};

/// Seconds since the epoch; times before the epoch are stored as 0.
pub fn to_secs(time: DateTime<Utc>) -> i64 {
    time.timestamp().max(0)
}

pub fn from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Current time truncated to whole seconds, matching what is stored.
pub fn now_secs() -> DateTime<Utc> {
    from_secs(Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_round_trip_whole_seconds() {
        let time = from_secs(1_700_000_000);
        assert_eq!(to_secs(time), 1_700_000_000);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        let before_epoch = DateTime::<Utc>::UNIX_EPOCH - Duration::seconds(1000);
        assert_eq!(to_secs(before_epoch), 0);
    }

    #[test]
    fn test_now_has_no_subsecond_part() {
        assert_eq!(now_secs().timestamp_subsec_nanos(), 0);
    }
}
