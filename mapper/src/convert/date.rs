//! Date value parsing
//!
//! Accepted forms:
//! - RFC 3339: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00.250+05:00`
//! - Naive date-time, read as UTC: `2024-01-15T10:30:00`
//! - Date only, midnight UTC: `2024-01-15`
//! - Epoch milliseconds: `1705314600000`
//! - Relative: `now()`, `second()`, `minute()`, `hour()`, `day()`, `week()`
//!   truncated to the unit (weeks start on Monday), followed by optional
//!   offsets such as `-1d` or `+2h30m` (units `s`, `m`, `h`, `d`, `w`)

use chrono::{DateTime, Datelike, DurationRound, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use super::Converter;

/// Largest magnitude accepted for one offset component
const MAX_OFFSET_AMOUNT: i64 = 1_000_000_000;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Converts date strings and relative date expressions to timestamps
///
/// The reference instant for relative expressions is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct DateConverter {
    now: DateTime<Utc>,
}

impl Default for DateConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DateConverter {
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Converter with an explicit reference instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Converter<DateTime<Utc>> for DateConverter {
    fn convert(&self, value: &str) -> Option<DateTime<Utc>> {
        parse_date_expression(value, self.now)
    }
}

/// Parse an absolute or relative date expression
pub fn parse_date_expression(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    parse_timestamp(value).or_else(|| parse_relative(value, now))
}

/// Parse an absolute timestamp (no relative expressions)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = value.parse().ok()?;
        return DateTime::from_timestamp_millis(millis);
    }

    None
}

fn parse_relative(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.to_ascii_lowercase();

    let open = compact.find("()")?;
    let (function, rest) = (&compact[..open], &compact[open + 2..]);

    let base = match function {
        "now" => now,
        "second" => now.duration_trunc(TimeDelta::seconds(1)).ok()?,
        "minute" => now.duration_trunc(TimeDelta::minutes(1)).ok()?,
        "hour" => now.duration_trunc(TimeDelta::hours(1)).ok()?,
        "day" => now.duration_trunc(TimeDelta::days(1)).ok()?,
        "week" => {
            let day = now.duration_trunc(TimeDelta::days(1)).ok()?;
            let since_monday = day.weekday().num_days_from_monday() as i64;
            day.checked_sub_signed(TimeDelta::days(since_monday))?
        }
        _ => return None,
    };

    let offset = parse_offsets(rest)?;
    base.checked_add_signed(offset)
}

/// Parse `+1d-2h30m` style offsets; a sign carries over to following
/// components until the next sign
fn parse_offsets(input: &str) -> Option<TimeDelta> {
    let mut total = TimeDelta::zero();
    let mut sign: Option<i64> = None;
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '+' => {
                sign = Some(1);
                chars.next();
            }
            '-' => {
                sign = Some(-1);
                chars.next();
            }
            _ => {}
        }
        // Offsets must start with an explicit sign
        let sign = sign?;

        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(d);
                chars.next();
            } else {
                break;
            }
        }
        let amount: i64 = digits.parse().ok()?;
        if amount > MAX_OFFSET_AMOUNT {
            return None;
        }

        let unit = match chars.next()? {
            's' => TimeDelta::try_seconds(amount)?,
            'm' => TimeDelta::try_minutes(amount)?,
            'h' => TimeDelta::try_hours(amount)?,
            'd' => TimeDelta::try_days(amount)?,
            'w' => TimeDelta::try_weeks(amount)?,
            _ => return None,
        };

        let delta = if sign < 0 { -unit } else { unit };
        total = total.checked_add(&delta)?;
    }

    Some(total)
}
