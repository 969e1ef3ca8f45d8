use std::convert::TryFrom;
use std::time::Duration;

use nom::{branch::alt, bytes::complete::tag, character::complete::digit1};

use super::result::{IResult, ParseError, Span};
use crate::error::{Error, Result};

pub fn parse_duration(s: &str) -> Result<Duration> {
    let (rest, d) = duration(Span::new(s)).map_err(Error::from)?;
    if !rest.fragment().is_empty() {
        return Err(Error::from(format!(
            "invalid duration literal \"{}\"",
            s
        )));
    }
    Ok(d)
}

/// Parse Go-like duration string: `2s`, `1h30m`, `500ms`.
/// - Only positive durations.
/// - No fractional units.
/// - Units are always ordered from longest to shortest.
pub(super) fn duration(input: Span) -> IResult<Duration> {
    let (rest, duration) = duration_inner(input, Unit::Hour)?;

    if duration.eq(&Duration::from_millis(0)) {
        return Err(nom::Err::Failure(ParseError::new(
            "duration must be greater than 0".to_owned(),
            input,
        )));
    }

    Ok((rest, duration))
}

enum Unit {
    Millisecond,
    Second, // 1000 milliseconds
    Minute, // 60 seconds
    Hour,   // 60 minutes
}

impl Unit {
    fn milliseconds(&self) -> u64 {
        use Unit::*;
        match self {
            Millisecond => 1,
            Second => 1000,
            Minute => 60 * 1000,
            Hour => 60 * 60 * 1000,
        }
    }

    fn descendant(&self) -> Option<Self> {
        use Unit::*;
        match self {
            Millisecond => None,
            Second => Some(Millisecond),
            Minute => Some(Second),
            Hour => Some(Minute),
        }
    }
}

impl TryFrom<&str> for Unit {
    type Error = Error;

    fn try_from(u: &str) -> Result<Self> {
        use Unit::*;

        match u {
            "h" => Ok(Hour),
            "m" => Ok(Minute),
            "s" => Ok(Second),
            "ms" => Ok(Millisecond),
            _ => Err(Error::new("Unknown duration unit")),
        }
    }
}

fn duration_inner(input: Span, max_allowed_unit: Unit) -> IResult<Duration> {
    let (rest, multiplier) = digit1(input)?;

    let (rest, unit) = alt((tag("ms"), tag("s"), tag("m"), tag("h")))(rest)?;

    let invalid = || nom::Err::Failure(ParseError::new("invalid duration literal".to_owned(), input));

    let unit = Unit::try_from(*unit.fragment()).map_err(|_| invalid())?;
    if unit.milliseconds() > max_allowed_unit.milliseconds() {
        return Err(invalid());
    }

    let duration = multiplier
        .fragment()
        .parse::<u32>()
        .ok()
        .and_then(|m| Duration::from_millis(unit.milliseconds()).checked_mul(m))
        .ok_or_else(|| {
            nom::Err::Failure(ParseError::new("duration overflow".to_owned(), input))
        })?;

    let next_unit = match unit.descendant() {
        Some(next_unit) => next_unit,
        None => return Ok((rest, duration)),
    };

    let (rest, more_duration) = match duration_inner(rest, next_unit) {
        Ok((rest, more_duration)) => (rest, more_duration),
        Err(nom::Err::Error(_)) => (rest, Duration::from_millis(0)),
        Err(e) => return Err(e),
    };

    duration
        .checked_add(more_duration)
        .map(|d| (rest, d))
        .ok_or_else(|| nom::Err::Failure(ParseError::new("duration overflow".to_owned(), input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: u64 = 1000;
    const MINUTE: u64 = 60 * 1000;
    const HOUR: u64 = 60 * 60 * 1000;

    #[test]
    fn test_valid_duration() -> Result<()> {
        #[rustfmt::skip]
        let tests = [
            ("1ms", Duration::from_millis(1)),
            ("10s", Duration::from_millis(10000)),
            ("0s500ms", Duration::from_millis(500)),
            ("5s999ms", Duration::from_millis(5999)),
            ("1m30s", Duration::from_millis(MINUTE + 30 * SECOND)),
            ("2h4m6s8ms", Duration::from_millis(2 * HOUR + 4 * MINUTE + 6 * SECOND + 8)),
        ];

        for (input, expected_duration) in &tests {
            let actual_duration = parse_duration(input)?;
            assert_eq!(
                expected_duration, &actual_duration,
                "while parsing {}",
                input
            );
        }
        Ok(())
    }

    #[test]
    fn test_invalid_duration() {
        #[rustfmt::skip]
        let tests = [
            "",
            "foo",
            "0",
            "0ms",
            "1ns",
            "1d",
            "0s0ms",
            "10m2h",
            "10s ",
            "10sfoo",
        ];

        for input in &tests {
            let ret = parse_duration(input);
            assert!(
                ret.is_err(),
                "Expected error, got {:?} while parsing {}",
                ret,
                input
            );
        }
    }
}
