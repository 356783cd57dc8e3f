use super::fields::Truthy;
use crate::{Loose, PollSubmission, ValidationError};

/// Upper bound for `end_date`: 2000-01-01T00:00:00Z expressed in milliseconds.
///
/// Any value above it is rejected as "not in seconds". Existing clients are
/// checked against this exact constant.
pub const SECONDS_CEILING: u64 = 946_684_800_000;

/// Polls must stay open for at least a day.
pub const MIN_LEAD_TIME_SECS: i64 = 24 * 60 * 60;

/// Check the poll end date against `now` (seconds since the Unix epoch).
///
/// A missing or zero end date means the poll never ends and is accepted.
/// Any JSON number is range-checked, including negative and fractional ones.
pub fn validate_end_date(poll: &PollSubmission, now: i64) -> Result<(), ValidationError> {
    let secs = match &poll.end_date {
        Some(date) if date.is_truthy() => match date {
            Loose::Typed(number) => number.as_f64().ok_or(ValidationError::MalformedDate)?,
            Loose::Malformed(_) => return Err(ValidationError::MalformedDate),
        },
        _ => return Ok(()),
    };

    if secs > SECONDS_CEILING as f64 {
        return Err(ValidationError::MalformedDate);
    }

    if secs < now.saturating_add(MIN_LEAD_TIME_SECS) as f64 {
        return Err(ValidationError::DateTooSoon);
    }

    Ok(())
}
