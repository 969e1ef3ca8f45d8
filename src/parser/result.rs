use nom_locate::LocatedSpan;

use crate::error::Error;

pub type Span<'a> = LocatedSpan<&'a str>;

pub type IResult<'a, O> = nom::IResult<Span<'a>, O, ParseError<'a>>;

#[derive(Debug, PartialEq)]
pub struct ParseError<'a> {
    message: String,
    wherein: Span<'a>,
}

impl<'a> ParseError<'a> {
    pub fn new(message: String, wherein: Span<'a>) -> Self {
        Self { message, wherein }
    }

    pub fn partial(wherein: &'static str, expected: &'static str, found: Span<'a>) -> Self {
        Self::new(
            format!(
                "unexpected {} in {}, expected {}",
                unexpected(found),
                wherein,
                expected
            ),
            found,
        )
    }

    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn line(&self) -> u32 {
        self.wherein.location_line()
    }

    pub fn column(&self) -> usize {
        self.wherein.get_column()
    }
}

const UNEXPECTED_MAX_CHARS: usize = 16;

fn unexpected(found: Span) -> String {
    let mut chars = found.fragment().chars();
    let head: String = chars.by_ref().take(UNEXPECTED_MAX_CHARS).collect();
    match (head.is_empty(), chars.next().is_some()) {
        (true, _) => String::from("end of line"),
        (false, true) => format!("\"{}...\"", head),
        (false, false) => format!("\"{}\"", head),
    }
}

impl<'a> nom::error::ParseError<Span<'a>> for ParseError<'a> {
    fn from_error_kind(input: Span<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("parse error {:?}", kind), input)
    }

    fn append(_input: Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::new(format!("expected character '{}'", c), input)
    }
}

impl<'a> From<ParseError<'a>> for Error {
    fn from(err: ParseError) -> Self {
        Error::parse(format!("{}:{}: {}", err.line(), err.column(), err.message()))
    }
}

impl<'a> From<nom::Err<ParseError<'a>>> for Error {
    fn from(err: nom::Err<ParseError<'a>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.into(),
            // Only complete parsers are used, so this is not expected to show up.
            nom::Err::Incomplete(_) => Error::parse("unexpected end of input"),
        }
    }
}
