//! Record line codec: `id,"name",age,"branch",cgpa`.
//!
//! # Invariants
//! - Field order is fixed: id, name, age, branch, cgpa.
//! - Text fields are wrapped in `"`; commas inside quotes are literal.
//! - Quote characters are stripped on decode, never escaped. A name that
//!   itself contains `"` does not survive a round trip.
//! - Fields beyond the fifth are ignored.

use crate::model::student::{Student, StudentId, MAX_STUDENT_ID};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FIELD_DELIMITER: char = ',';
const QUOTE: char = '"';
const FIELD_COUNT: usize = 5;

pub type CodecResult<T> = Result<T, CodecError>;

/// Reason a line could not be decoded into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    MissingFields { found: usize },
    InvalidNumber { field: &'static str, value: String },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { found } => {
                write!(f, "expected {FIELD_COUNT} fields, found {found}")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "field `{field}` is not a number: `{value}`")
            }
        }
    }
}

impl Error for CodecError {}

/// Encodes one record as a line without the trailing newline.
pub fn encode_line(student: &Student) -> String {
    format!(
        "{id}{d}{q}{name}{q}{d}{age}{d}{q}{branch}{q}{d}{cgpa}",
        id = student.id,
        name = student.name,
        age = student.age,
        branch = student.branch,
        cgpa = student.cgpa,
        d = FIELD_DELIMITER,
        q = QUOTE,
    )
}

/// Decodes one line, reporting why it failed.
///
/// A non-positive id, or one above [`MAX_STUDENT_ID`], is not a failure: it decodes to id `0`
/// with the remaining fields intact, which loaders treat as "skip".
pub fn try_decode_line(line: &str) -> CodecResult<Student> {
    let fields = split_fields(line);
    if fields.len() < FIELD_COUNT {
        return Err(CodecError::MissingFields {
            found: fields.len(),
        });
    }

    let raw_id: i64 = parse_number("id", &fields[0])?;
    let id = StudentId::try_from(raw_id)
        .ok()
        .filter(|id| *id <= MAX_STUDENT_ID)
        .unwrap_or(0);
    let age = parse_number("age", &fields[2])?;
    let cgpa = parse_number("cgpa", &fields[4])?;

    Ok(Student {
        id,
        name: fields[1].clone(),
        age,
        branch: fields[3].clone(),
        cgpa,
    })
}

/// Decodes one line, returning [`Student::invalid`] on failure.
///
/// Callers must treat `!is_valid()` as "skip this line".
pub fn decode_line(line: &str) -> Student {
    try_decode_line(line).unwrap_or_else(|_| Student::invalid())
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            FIELD_DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> CodecResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| CodecError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
