//! Clock-style time formatting.

/// Formats seconds as `mm:ss.ss`.
///
/// Minutes are zero-padded to two digits and grow wider past 99; seconds are
/// fixed two-decimal, zero-padded to width 5. There is no hour field, so an
/// hour renders as `60:00.00`.
#[allow(clippy::cast_possible_truncation)]
pub fn format_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as i64;
    let secs = seconds % 60.0;
    format!("{minutes:02}:{secs:05.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_time(187.4), "03:07.40");
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(5.5), "00:05.50");
    }

    #[test]
    fn renders_fractional_seconds_to_two_places() {
        assert_eq!(format_time(45.678), "00:45.68");
        assert_eq!(format_time(125.5), "02:05.50");
    }

    #[test]
    fn minutes_grow_past_two_digits() {
        assert_eq!(format_time(3600.0), "60:00.00");
        assert_eq!(format_time(6000.25), "100:00.25");
    }
}
