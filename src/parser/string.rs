use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not},
    character::complete::char as nom_char,
    combinator::value,
};

use super::result::{IResult, ParseError, Span};

/// Double-quoted label value. `\\`, `\"` and `\n` are the only escapes.
pub fn label_value(input: Span) -> IResult<String> {
    let (rest, _) = nom_char('"')(input)?;

    let unterminated = || {
        nom::Err::Failure(ParseError::new(
            String::from("unterminated label value"),
            input,
        ))
    };

    let (rest, value) = match escaped_transform(is_not("\\\""), '\\', escape)(rest) {
        Ok(res) => res,
        // Empty value.
        Err(nom::Err::Error(_)) if rest.fragment().starts_with('"') => (rest, String::new()),
        // A backslash right before the end of input.
        Err(nom::Err::Error(_)) => return Err(unterminated()),
        Err(e) => return Err(e),
    };

    match nom_char::<_, ParseError>('"')(rest) {
        Ok((rest, _)) => Ok((rest, value)),
        Err(_) => Err(unterminated()),
    }
}

fn escape(input: Span) -> IResult<char> {
    alt((
        value('\\', nom_char::<_, ParseError>('\\')),
        value('"', nom_char('"')),
        value('\n', nom_char('n')),
    ))(input)
    .map_err(|_| {
        nom::Err::Failure(ParseError::new(
            String::from("invalid escape sequence in label value"),
            input,
        ))
    })
}
