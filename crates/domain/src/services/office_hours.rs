//! Off-hours gate.
//!
//! Decides whether a tenant is currently outside its configured working
//! hours. Defaults are asymmetric on purpose, preserved from the product's
//! behavior: a weekend with no configured weekend hours is closed, while a
//! weekday with no configured weekday hours is open.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use tracing::warn;

use crate::models::BotConfig;
use shared::validation::parse_hhmm;

/// Returns true if `now` falls outside the tenant's working hours.
///
/// Boundary comparison is strict on both ends of the encoded HHMM values:
/// 08:59 before a 09:00 start is off-hours, 18:01 past an 18:00 end is
/// off-hours, and both boundaries themselves count as within hours.
/// Unparseable boundary strings fail open (within hours).
pub fn is_off_hours(config: &BotConfig, now: DateTime<Utc>) -> bool {
    let is_weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);

    let (start_str, end_str) = if is_weekend {
        match (
            &config.work_hours_weekend_start,
            &config.work_hours_weekend_end,
        ) {
            (Some(start), Some(end)) => (start, end),
            // No weekend hours configured means closed on weekends.
            _ => return true,
        }
    } else {
        match (
            &config.work_hours_weekday_start,
            &config.work_hours_weekday_end,
        ) {
            (Some(start), Some(end)) => (start, end),
            // No weekday hours configured means always open on weekdays.
            _ => return false,
        }
    };

    let (start, end) = match (parse_hhmm(start_str), parse_hhmm(end_str)) {
        (Ok(start), Ok(end)) => (start, end),
        (start, end) => {
            warn!(
                ?start,
                ?end,
                "Unparseable work-hour boundary, treating as within hours"
            );
            return false;
        }
    };

    let current = (now.hour() * 100 + now.minute()) as u16;
    current < start || current > end
}
