use std::convert::TryFrom;
use std::iter::FusedIterator;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char as nom_char, space0, space1},
    sequence::preceded,
    Slice,
};

use super::common::{
    end_of_line, expected, label_identifier, maybe_padded, metric_identifier, rest_of_line,
    separated_list,
};
use super::number::{sample_value, timestamp};
use super::result::{IResult, ParseError, Span};
use super::string::label_value;
use crate::error::{Error, Result};
use crate::model::{Entry, Label, LabelSet, Metadata, MetricType, Sample, METRIC_NAME_LABEL};

/// Starts parsing an exposition payload.
///
/// Only the UTF-8 check happens up front. Lines are parsed one at a time as
/// the returned [`Parser`] is iterated, and the iteration stops at the first
/// malformed line.
pub fn parse(body: &[u8]) -> Result<Parser<'_>> {
    let text = std::str::from_utf8(body).map_err(|e| {
        let valid = std::str::from_utf8(&body[..e.valid_up_to()]).unwrap_or_default();
        let line = valid.matches('\n').count() + 1;
        let column = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        Error::parse(format!("{}:{}: invalid UTF-8 sequence", line, column))
    })?;
    Ok(Parser::new(text))
}

/// Lazy sequence of [`Entry`] values drawn from exposition text.
pub struct Parser<'a> {
    rest: Span<'a>,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: Span::new(text),
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<Span<'a>> {
        let len = self.rest.fragment().len();
        if len == 0 {
            return None;
        }

        let line = match self.rest.fragment().find('\n') {
            Some(pos) => {
                let line = self.rest.slice(..pos);
                self.rest = self.rest.slice(pos + 1..);
                line
            }
            None => {
                let line = self.rest;
                self.rest = self.rest.slice(len..);
                line
            }
        };
        Some(line)
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(line) = self.next_line() {
            match entry(line) {
                Ok((_, Some(entry))) => return Some(Ok(entry)),
                Ok((_, None)) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

impl<'a> FusedIterator for Parser<'a> {}

fn entry(line: Span) -> IResult<Option<Entry>> {
    let line = match line.fragment().strip_suffix('\r') {
        Some(stripped) => line.slice(..stripped.len()),
        None => line,
    };

    let (rest, _) = space0(line)?;
    if rest.fragment().is_empty() {
        return Ok((rest, None));
    }

    if rest.fragment().starts_with('#') {
        return comment(rest);
    }

    let (rest, sample) = sample(rest)?;
    Ok((rest, Some(Entry::Sample(sample))))
}

#[derive(Clone, Copy)]
enum Keyword {
    Help,
    Type,
}

fn comment(input: Span) -> IResult<Option<Entry>> {
    let (rest, _) = nom_char('#')(input)?;

    // Metadata needs whitespace after the hash: `#TYPE up gauge` is a comment.
    let (rest, keyword) = match preceded(space1, metadata_keyword)(rest) {
        Ok(res) => res,
        // Any other comment is dropped.
        Err(nom::Err::Error(_)) => {
            let (rest, _) = rest_of_line(rest)?;
            return Ok((rest, None));
        }
        Err(e) => return Err(e),
    };

    let (rest, metadata) = match keyword {
        Keyword::Help => help(rest)?,
        Keyword::Type => metric_type(rest)?,
    };
    Ok((rest, Some(Entry::Metadata(metadata))))
}

fn metadata_keyword(input: Span) -> IResult<Keyword> {
    let (rest, keyword) = match tag::<_, _, ParseError>("HELP")(input) {
        Ok((rest, _)) => (rest, Keyword::Help),
        Err(_) => {
            let (rest, _) = tag("TYPE")(input)?;
            (rest, Keyword::Type)
        }
    };

    // `# HELPFUL hint` is an ordinary comment, `# HELP` alone is not.
    if rest.fragment().is_empty() {
        return Ok((rest, keyword));
    }
    let (rest, _) = space1(rest)?;
    Ok((rest, keyword))
}

fn help(input: Span) -> IResult<Metadata> {
    // HELP metric_identifier [whitespace text]
    let (rest, metric) = expected(metric_identifier, "HELP line", "metric name")(input)?;

    let (rest, text) = if rest.fragment().is_empty() {
        (rest, String::new())
    } else {
        let (rest, text) = preceded(
            expected(space1, "HELP line", "whitespace"),
            rest_of_line,
        )(rest)?;
        (rest, String::from(*text.fragment()))
    };

    Ok((rest, Metadata::Help { metric, text }))
}

fn metric_type(input: Span) -> IResult<Metadata> {
    // TYPE metric_identifier whitespace type_name
    let (rest, metric) = expected(metric_identifier, "TYPE line", "metric name")(input)?;
    let (rest, _) = expected(space1, "TYPE line", "whitespace")(rest)?;

    let (rest, name) = expected(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        "TYPE line",
        "metric type",
    )(rest)?;
    let kind = MetricType::try_from(*name.fragment()).map_err(|e| {
        nom::Err::Failure(ParseError::new(String::from(e.message()), name))
    })?;

    let (rest, _) = space0(rest)?;
    let (rest, _) = expected(end_of_line, "TYPE line", "end of line")(rest)?;

    Ok((rest, Metadata::Type { metric, kind }))
}

fn sample(input: Span) -> IResult<Sample> {
    // metric_identifier [label_set] value [timestamp]
    let (rest, name) = expected(metric_identifier, "sample", "metric name")(input)?;
    let (rest, _) = space0(rest)?;

    let (rest, labels) = if rest.fragment().starts_with('{') {
        let (rest, labels) =
            separated_list('{', '}', ',', located_label, "label set", "',' or '}'")(rest)?;
        (rest, unique_labels(labels)?)
    } else {
        (rest, LabelSet::default())
    };

    let (rest, _) = space0(rest)?;
    let (rest, value) = expected(sample_value, "sample", "value")(rest)?;

    let (rest, timestamp) = match preceded(space1, timestamp)(rest) {
        Ok((rest, ts)) => (rest, Some(ts)),
        Err(nom::Err::Error(_)) => (rest, None),
        Err(e) => return Err(e),
    };

    let (rest, _) = space0(rest)?;
    let (rest, _) = expected(end_of_line, "sample", "end of line")(rest)?;

    Ok((rest, Sample::new(name, labels, value, timestamp)))
}

fn located_label(input: Span) -> IResult<(Span, Label)> {
    let (rest, label) = label(input)?;
    Ok((rest, (input, label)))
}

fn unique_labels(
    labels: Vec<(Span, Label)>,
) -> std::result::Result<LabelSet, nom::Err<ParseError>> {
    let mut unique: Vec<Label> = Vec::with_capacity(labels.len());
    for (span, label) in labels {
        if unique.iter().any(|l| l.name() == label.name()) {
            return Err(nom::Err::Failure(ParseError::new(
                format!("duplicate label \"{}\"", label.name()),
                span,
            )));
        }
        unique.push(label);
    }
    Ok(LabelSet::from(unique))
}

fn label(input: Span) -> IResult<Label> {
    // label_identifier '=' label_value
    let (rest, name) = label_identifier(input)?;
    if name == METRIC_NAME_LABEL {
        return Err(nom::Err::Failure(ParseError::new(
            format!("label {} is reserved for the metric name", METRIC_NAME_LABEL),
            input,
        )));
    }

    let (rest, _) = expected(maybe_padded(nom_char('=')), "label", "'='")(rest)?;
    let (rest, value) = expected(label_value, "label", "quoted label value")(rest)?;
    Ok((rest, Label::new(name, value)))
}
