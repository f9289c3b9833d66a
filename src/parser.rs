//! Path expression parser.

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::{delimited, pair},
    Finish, IResult, Offset,
};

use crate::ast::*;

/// The segment that stands for the document root when it leads a path.
const ROOT: &str = "x";

impl JsonPath {
    /// Parse a path from string.
    ///
    /// An empty string parses to a path without steps.
    pub fn new(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Ok(JsonPath::default());
        }
        // only the first segment can fail outright, later ones end the list
        let (rest, segments) = path(s).finish().map_err(|_| Error::unexpected(s, s))?;
        if !rest.is_empty() {
            return Err(Error::unexpected(s, rest));
        }

        let mut steps = Vec::with_capacity(segments.len());
        for (i, segment) in segments.into_iter().enumerate() {
            match segment.name {
                // the root marker is only recognized in front
                Some(ROOT) if i == 0 => {}
                Some(name) => steps.push(Step::Field(name.to_owned())),
                None => {}
            }
            if let Some(token) = segment.index {
                let index = token.parse::<usize>().map_err(|_| Error {
                    position: s.offset(token),
                    message: format!("invalid index \"{token}\"").into(),
                })?;
                steps.push(Step::Index(index));
            }
        }
        Ok(JsonPath { steps })
    }
}

impl FromStr for JsonPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::new(s)
    }
}

/// The error type returned when parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at position {position}, {message}")]
pub struct Error {
    position: usize,
    message: Box<str>,
}

impl Error {
    /// Returns the byte offset in the input where parsing failed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the error message without position.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn unexpected(input: &str, rest: &str) -> Self {
        let message = match rest.chars().next() {
            Some('.') => "empty path segment",
            Some('[') => "malformed index accessor",
            Some(']') => "unmatched ']'",
            _ => "unexpected trailing characters",
        };
        Self {
            position: input.offset(rest),
            message: message.into(),
        }
    }
}

/// A segment between two dots, before its index token is validated.
struct Segment<'a> {
    name: Option<&'a str>,
    index: Option<&'a str>,
}

fn path(input: &str) -> IResult<&str, Vec<Segment<'_>>> {
    separated_list1(char('.'), segment)(input)
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(pair(name, opt(index)), |(name, index)| Segment {
            name: Some(name),
            index,
        }),
        map(index, |index| Segment {
            name: None,
            index: Some(index),
        }),
    ))(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, '.' | '[' | ']'))(input)
}

/// `[<token>]`, the token is checked to be an integer afterwards so that
/// the error can name it.
fn index(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_while(|c: char| c != ']'), char(']'))(input)
}
