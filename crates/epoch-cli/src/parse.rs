//! Parsing of free-form clock times typed by the user.
//!
//! Accepted forms:
//! - empty: the current time
//! - `+N` / `-N`: N minutes after or before now
//! - `H:MM`, `H.MM`, `H;MM`: a 24-hour time, where small hours are read as
//!   afternoon (see [`Config::afternoon_cutoff`](crate::Config))
//! - `H:MMAM`, `H:MM pm`, `H:MMa`, ...: a 12-hour time

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::Timelike;
use epoch_core::{Duration, Time};
use regex::Regex;

/// Pre-compiled regex for times relative to now.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])\s*(\d+)$").unwrap());

/// Separators between hour and minute, in order of preference.
const SEPARATORS: [char; 3] = ['.', ';', ':'];

/// Half of a 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// The reference point for resolving user time input.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub now: Time,
    pub afternoon_cutoff: u8,
}

impl Clock {
    pub const fn new(now: Time, afternoon_cutoff: u8) -> Self {
        Self {
            now,
            afternoon_cutoff,
        }
    }

    /// Reads the local clock.
    pub fn local(afternoon_cutoff: u8) -> Result<Self> {
        Ok(Self::new(now()?, afternoon_cutoff))
    }

    /// Parses user time input against this clock.
    pub fn parse(&self, input: &str) -> Result<Time> {
        parse_user_time(input, self.now, self.afternoon_cutoff)
    }
}

/// Returns the current local time of day.
pub fn now() -> Result<Time> {
    let local = chrono::Local::now();
    Time::new(i64::from(local.hour()), i64::from(local.minute()))
        .context("local clock returned an invalid time")
}

/// Parses user time input relative to `now`.
pub fn parse_user_time(input: &str, now: Time, afternoon_cutoff: u8) -> Result<Time> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(now);
    }
    if let Some(caps) = RELATIVE_TIME_RE.captures(input) {
        let minutes: i64 = caps[2]
            .parse()
            .with_context(|| format!("invalid minute offset in {input:?}"))?;
        let offset = Duration::from_minutes(minutes);
        let moved = if &caps[1] == "+" {
            now.checked_add(offset)
        } else {
            now.checked_sub(offset)
        };
        return moved.with_context(|| format!("{input:?} from {now} leaves the current day"));
    }
    parse_clock_time(input, afternoon_cutoff)
}

fn parse_clock_time(input: &str, afternoon_cutoff: u8) -> Result<Time> {
    let Some(separator) = SEPARATORS.into_iter().find(|&sep| input.contains(sep)) else {
        bail!("Invalid time {input:?}: separate hour and minute with '.', ';' or ':' (e.g. 9:30)");
    };
    let Some((hour, rest)) = input.split_once(separator) else {
        bail!("Invalid time {input:?}: missing separator");
    };

    let hour = hour.trim();
    let hour: i64 = hour
        .parse()
        .with_context(|| format!("Invalid hour {hour:?} in {input:?}"))?;

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (minute, indicator) = rest.split_at(digits_end);
    if minute.is_empty() || minute.len() > 2 {
        bail!("Invalid minute {minute:?} in {input:?}: use one or two digits");
    }
    let minute: i64 = minute
        .parse()
        .with_context(|| format!("Invalid minute {minute:?} in {input:?}"))?;
    let minute = verify_minute(minute)?;

    let indicator = indicator.trim();
    let hour = if indicator.is_empty() {
        twenty_four_hour(hour, afternoon_cutoff)?
    } else {
        twelve_hour(hour, standardize_meridiem(indicator)?)?
    };

    Time::new(hour, minute).with_context(|| format!("Invalid time {input:?}"))
}

/// Reads an AM/PM indicator: `a`, `am`, `p` or `pm` in any case.
pub fn standardize_meridiem(indicator: &str) -> Result<Meridiem> {
    let upper = indicator.to_ascii_uppercase();
    let mut chars = upper.chars();
    let meridiem = match chars.next() {
        Some('A') => Meridiem::Am,
        Some('P') => Meridiem::Pm,
        _ => bail!("{indicator:?} is an invalid AM/PM indicator: it must start with A or P"),
    };
    match (chars.next(), chars.next()) {
        (None | Some('M'), None) => Ok(meridiem),
        (Some(_), None) => {
            bail!("{indicator:?} is an invalid AM/PM indicator: the second letter must be M")
        }
        _ => bail!("{indicator:?} is an invalid AM/PM indicator: use at most two letters"),
    }
}

fn twelve_hour(hour: i64, meridiem: Meridiem) -> Result<i64> {
    if !(1..=12).contains(&hour) {
        bail!("Invalid hour {hour}: must be between 1 and 12 with AM/PM");
    }
    Ok(match meridiem {
        Meridiem::Am => hour % 12,
        Meridiem::Pm => hour % 12 + 12,
    })
}

fn twenty_four_hour(hour: i64, afternoon_cutoff: u8) -> Result<i64> {
    if (0..12).contains(&hour) && hour < i64::from(afternoon_cutoff) {
        return Ok(hour + 12);
    }
    if !(0..24).contains(&hour) {
        bail!("Invalid hour {hour}: must be between 0 and 23");
    }
    Ok(hour)
}

fn verify_minute(minute: i64) -> Result<i64> {
    if !(0..60).contains(&minute) {
        bail!("Invalid minute {minute}: must be between 0 and 59");
    }
    Ok(minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFF: u8 = 7;

    fn at(hour: i64, minute: i64) -> Time {
        Time::new(hour, minute).unwrap()
    }

    fn parse(input: &str) -> Result<Time> {
        parse_user_time(input, at(10, 0), CUTOFF)
    }

    #[test]
    fn test_empty_input_is_now() {
        assert_eq!(parse("").unwrap(), at(10, 0));
        assert_eq!(parse("   ").unwrap(), at(10, 0));
    }

    #[test]
    fn test_relative_minutes() {
        assert_eq!(parse("+15").unwrap(), at(10, 15));
        assert_eq!(parse("-5").unwrap(), at(9, 55));
        assert_eq!(parse("+ 90").unwrap(), at(11, 30));
    }

    #[test]
    fn test_relative_past_midnight_fails() {
        let late = at(23, 50);
        assert!(parse_user_time("+15", late, CUTOFF).is_err());
        let early = at(0, 5);
        assert!(parse_user_time("-10", early, CUTOFF).is_err());
    }

    #[test]
    fn test_huge_relative_offsets_fail() {
        assert!(parse("+9223372036854775807").is_err());
        assert!(parse("-9223372036854775807").is_err());
        assert!(parse("+99999999999999999999").is_err());
    }

    #[test]
    fn test_twenty_four_hour_times() {
        assert_eq!(parse("14:34").unwrap(), at(14, 34));
        assert_eq!(parse("7:15").unwrap(), at(7, 15));
        assert_eq!(parse("12.10").unwrap(), at(12, 10));
    }

    #[test]
    fn test_small_hours_are_afternoon() {
        assert_eq!(parse("6:59").unwrap(), at(18, 59));
        assert_eq!(parse("4;15").unwrap(), at(16, 15));
        assert_eq!(parse_user_time("4:15", at(10, 0), 0).unwrap(), at(4, 15));
    }

    #[test]
    fn test_out_of_range_twenty_four_hour_times() {
        assert!(parse("24:10").is_err());
        assert!(parse("12:62").is_err());
        assert!(parse("-3:62").is_err());
    }

    #[test]
    fn test_twelve_hour_times() {
        assert_eq!(parse("9:30AM").unwrap(), at(9, 30));
        assert_eq!(parse("4:15 pm").unwrap(), at(16, 15));
        assert_eq!(parse("4:15p").unwrap(), at(16, 15));
        assert_eq!(parse("11:05a").unwrap(), at(11, 5));
        assert_eq!(parse("12:00AM").unwrap(), at(0, 0));
        assert_eq!(parse("12:30PM").unwrap(), at(12, 30));
    }

    #[test]
    fn test_out_of_range_twelve_hour_times() {
        assert!(parse("13:30AM").is_err());
        assert!(parse("0:30PM").is_err());
        assert!(parse("12:70AM").is_err());
    }

    #[test]
    fn test_meridiem_tokens() {
        assert_eq!(standardize_meridiem("a").unwrap(), Meridiem::Am);
        assert_eq!(standardize_meridiem("Am").unwrap(), Meridiem::Am);
        assert_eq!(standardize_meridiem("P").unwrap(), Meridiem::Pm);
        assert_eq!(standardize_meridiem("pM").unwrap(), Meridiem::Pm);
        assert!(standardize_meridiem("amp").is_err());
        assert!(standardize_meridiem("xm").is_err());
        assert!(standardize_meridiem("ap").is_err());
        assert!(standardize_meridiem("m").is_err());
    }

    #[test]
    fn test_errors_name_the_offending_token() {
        let err = parse("9:30xm").unwrap_err();
        assert!(err.to_string().contains("\"xm\""), "{err}");

        let err = parse("nine:30").unwrap_err();
        assert!(err.to_string().contains("\"nine\""), "{err}");

        let err = parse("930").unwrap_err();
        assert!(err.to_string().contains("\"930\""), "{err}");

        let err = parse("9:").unwrap_err();
        assert!(err.to_string().contains("\"9:\""), "{err}");
    }

    #[test]
    fn test_first_preferred_separator_wins() {
        // '.' is preferred, so the rest "30:00" is not a valid minute
        assert!(parse("9.30:00").is_err());
    }
}
