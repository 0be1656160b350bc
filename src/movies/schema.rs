//! Shape validation for movie payloads.
//!
//! # Responsibilities
//! - Check a JSON payload against the movie shape (full or partial)
//! - Report every offending field, not just the first
//! - Produce typed `MovieDraft` / `MoviePatch` values on success
//!
//! # Design Decisions
//! - Constraints live in one table (`FIELDS`); a single generic evaluator walks it
//! - Unknown fields are ignored and never reach the stored record
//! - The year ceiling is captured when the schema is built, so a given
//!   `MovieSchema` always returns the same result for the same input

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::movies::model::{Genre, MovieDraft, MoviePatch};

/// Key used for problems that are not tied to a single field.
pub const BODY_PATH: &str = "body";

/// Earliest accepted release year.
pub const MIN_YEAR: i64 = 1900;

/// Per-field validation failures, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("invalid movie payload: {} field(s) rejected", .fields.len())]
pub struct ShapeError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ShapeError {
    /// Error with a single message at `path`.
    pub fn single(path: &str, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(path, message.into());
        error
    }

    fn push(&mut self, path: &str, message: String) {
        self.fields.entry(path.to_string()).or_default().push(message);
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Messages recorded for `path`, if any.
    pub fn messages(&self, path: &str) -> Option<&[String]> {
        self.fields.get(path).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Partial,
}

type Check = fn(&Value, &MovieSchema) -> Vec<String>;

struct FieldRule {
    name: &'static str,
    required: bool,
    check: Check,
}

const FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "title",
        required: true,
        check: non_empty_text,
    },
    FieldRule {
        name: "year",
        required: true,
        check: release_year,
    },
    FieldRule {
        name: "director",
        required: true,
        check: non_empty_text,
    },
    FieldRule {
        name: "duration",
        required: true,
        check: positive_minutes,
    },
    FieldRule {
        name: "poster",
        required: true,
        check: poster_url,
    },
    FieldRule {
        name: "genre",
        required: true,
        check: genre_list,
    },
    FieldRule {
        name: "rate",
        required: false,
        check: rating,
    },
];

/// Fields stored as integers. Whole floats such as `2020.0` are accepted
/// and rewritten as integers before deserializing.
const INTEGER_FIELDS: [&str; 2] = ["year", "duration"];

/// The movie shape, parameterised by the latest accepted release year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieSchema {
    max_year: i64,
}

impl MovieSchema {
    /// Schema accepting releases up to next calendar year.
    pub fn current() -> Self {
        Self::with_max_year(i64::from(chrono::Utc::now().year()) + 1)
    }

    pub fn with_max_year(max_year: i64) -> Self {
        Self { max_year }
    }

    pub fn max_year(&self) -> i64 {
        self.max_year
    }

    /// Validate a complete movie. `rate` defaults to 0 when absent.
    pub fn validate_full(&self, candidate: &Value) -> Result<MovieDraft, ShapeError> {
        self.evaluate(candidate, Mode::Full)?;
        MovieDraft::deserialize(&normalize_integers(candidate))
            .map_err(|e| ShapeError::single(BODY_PATH, e.to_string()))
    }

    /// Validate only the fields that are present. An empty object is a no-op patch.
    pub fn validate_partial(&self, candidate: &Value) -> Result<MoviePatch, ShapeError> {
        self.evaluate(candidate, Mode::Partial)?;
        MoviePatch::deserialize(&normalize_integers(candidate))
            .map_err(|e| ShapeError::single(BODY_PATH, e.to_string()))
    }

    fn evaluate(&self, candidate: &Value, mode: Mode) -> Result<(), ShapeError> {
        let Some(object) = candidate.as_object() else {
            return Err(ShapeError::single(
                BODY_PATH,
                format!("Expected object, received {}", kind(candidate)),
            ));
        };

        let mut error = ShapeError::default();
        for rule in FIELDS {
            match object.get(rule.name) {
                Some(value) => {
                    for message in (rule.check)(value, self) {
                        error.push(rule.name, message);
                    }
                }
                None if rule.required && mode == Mode::Full => {
                    error.push(rule.name, "Required".to_string());
                }
                None => {}
            }
        }

        if error.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }
}

impl Default for MovieSchema {
    fn default() -> Self {
        Self::current()
    }
}

fn non_empty_text(value: &Value, _: &MovieSchema) -> Vec<String> {
    match value {
        Value::String(text) if text.trim().is_empty() => {
            vec!["Must not be empty, received \"\"".to_string()]
        }
        Value::String(_) => Vec::new(),
        other => vec![expected("string", other)],
    }
}

fn release_year(value: &Value, schema: &MovieSchema) -> Vec<String> {
    match integer(value) {
        Ok(year) if (MIN_YEAR..=schema.max_year).contains(&year) => Vec::new(),
        Ok(year) => vec![format!(
            "Must be between {} and {}, received {}",
            MIN_YEAR, schema.max_year, year
        )],
        Err(message) => vec![message],
    }
}

fn positive_minutes(value: &Value, _: &MovieSchema) -> Vec<String> {
    match integer(value) {
        Ok(minutes) if minutes > 0 && minutes <= i64::from(u32::MAX) => Vec::new(),
        Ok(minutes) => vec![format!("Must be a positive number of minutes, received {}", minutes)],
        Err(message) => vec![message],
    }
}

fn poster_url(value: &Value, _: &MovieSchema) -> Vec<String> {
    match value {
        Value::String(text) => match Url::parse(text) {
            Ok(_) => Vec::new(),
            Err(e) => vec![format!("Expected a valid URL ({}), received {}", e, value)],
        },
        other => vec![expected("string", other)],
    }
}

fn genre_list(value: &Value, _: &MovieSchema) -> Vec<String> {
    let Value::Array(items) = value else {
        return vec![expected("array", value)];
    };
    if items.is_empty() {
        return vec!["Must contain at least one genre, received []".to_string()];
    }

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.as_str().and_then(Genre::from_name).is_none())
        .map(|(index, item)| {
            format!(
                "Item {} must be one of {}, received {}",
                index,
                genre_names(),
                item
            )
        })
        .collect()
}

fn rating(value: &Value, _: &MovieSchema) -> Vec<String> {
    match value.as_f64() {
        Some(rate) if (0.0..=10.0).contains(&rate) => Vec::new(),
        Some(rate) => vec![format!("Must be between 0 and 10, received {}", rate)],
        None => vec![expected("number", value)],
    }
}

fn integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(n), _) => Ok(n),
            (None, _) if number.is_u64() => {
                Err(format!("Integer out of range, received {}", number))
            }
            (None, Some(f)) if is_whole(f) => Ok(f as i64),
            (None, _) => Err(format!("Expected integer, received float {}", number)),
        },
        other => Err(expected("integer", other)),
    }
}

fn is_whole(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Copy of `candidate` with whole-float integer fields rewritten as integers.
/// Only called after `evaluate` accepted the payload.
fn normalize_integers(candidate: &Value) -> Value {
    let mut normalized = candidate.clone();
    if let Some(object) = normalized.as_object_mut() {
        for field in INTEGER_FIELDS {
            if let Some(slot) = object.get_mut(field) {
                if let Ok(n) = integer(slot) {
                    *slot = Value::from(n);
                }
            }
        }
    }
    normalized
}

fn expected(what: &str, value: &Value) -> String {
    format!("Expected {}, received {}", what, kind(value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn genre_names() -> String {
    Genre::ALL.map(|genre| genre.as_str()).join(", ")
}
