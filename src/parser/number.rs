use nom::bytes::complete::take_till1;

use super::result::{IResult, ParseError, Span};
use crate::model::{SampleValue, Timestamp};

pub fn sample_value(input: Span) -> IResult<SampleValue> {
    let (rest, token) = take_till1(is_blank)(input)?;
    match parse_sample_value(token.fragment()) {
        Some(value) => Ok((rest, value)),
        None => Err(nom::Err::Failure(ParseError::new(
            format!("invalid sample value \"{}\"", token.fragment()),
            token,
        ))),
    }
}

pub fn timestamp(input: Span) -> IResult<Timestamp> {
    let (rest, token) = take_till1(is_blank)(input)?;
    match token.fragment().parse::<Timestamp>() {
        Ok(ts) => Ok((rest, ts)),
        Err(_) => Err(nom::Err::Failure(ParseError::new(
            format!("invalid timestamp \"{}\"", token.fragment()),
            token,
        ))),
    }
}

fn parse_sample_value(s: &str) -> Option<SampleValue> {
    match s {
        "NaN" => Some(f64::NAN),
        "+Inf" | "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => s.parse::<SampleValue>().ok(),
    }
}

#[inline]
fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}
