//! Common validation helpers.

use thiserror::Error;

/// Error type for time-of-day parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeOfDayError {
    #[error("Invalid time format, expected HH:MM")]
    InvalidFormat,
    #[error("Hour out of range (0-23)")]
    HourOutOfRange,
    #[error("Minute out of range (0-59)")]
    MinuteOutOfRange,
}

/// Parses an "HH:MM" string into an integer HHMM encoding.
///
/// "09:00" becomes 900 and "18:30" becomes 1830. This encoding preserves
/// ordering within a single day, which is all the off-hours comparison needs.
pub fn parse_hhmm(value: &str) -> Result<u16, TimeOfDayError> {
    let (hours, minutes) = value
        .split_once(':')
        .ok_or(TimeOfDayError::InvalidFormat)?;

    let hours: u16 = hours
        .trim()
        .parse()
        .map_err(|_| TimeOfDayError::InvalidFormat)?;
    let minutes: u16 = minutes
        .trim()
        .parse()
        .map_err(|_| TimeOfDayError::InvalidFormat)?;

    if hours > 23 {
        return Err(TimeOfDayError::HourOutOfRange);
    }
    if minutes > 59 {
        return Err(TimeOfDayError::MinuteOutOfRange);
    }

    Ok(hours * 100 + minutes)
}

/// Normalizes a WhatsApp phone number to digits only.
///
/// The Graph API addresses recipients by international number without a
/// leading plus sign (e.g. "905551234567").
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns true if the value looks like a usable international phone number.
pub fn is_valid_phone(value: &str) -> bool {
    let digits = normalize_phone(value);
    (7..=15).contains(&digits.len())
}

/// Returns true if the value is acceptable as an intent name.
///
/// Intent names key flow lookups, so they must be non-empty and free of
/// leading/trailing whitespace ambiguity.
pub fn is_valid_intent_name(value: &str) -> bool {
    !value.is_empty() && value.trim() == value && value.len() <= 100
}
