//! Human duration strings: "30s", "5m", "1h", "2d".

use std::time::Duration;

use crate::error::DurationParseError;

/// Parse a duration string like "30s", "5m", "1h" or "2d".
///
/// A bare integer is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let (digits, unit_secs) = match s.as_bytes()[s.len() - 1] {
        b's' => (&s[..s.len() - 1], 1),
        b'm' => (&s[..s.len() - 1], 60),
        b'h' => (&s[..s.len() - 1], 3_600),
        b'd' => (&s[..s.len() - 1], 86_400),
        b'0'..=b'9' => (s, 1),
        _ => return Err(DurationParseError::Invalid(s.to_string())),
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| DurationParseError::Invalid(s.to_string()))?;

    value
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| DurationParseError::OutOfRange(s.to_string()))
}
