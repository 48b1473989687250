//! Filter evaluation for in-memory documents.
//!
//! The mapper only ever filters on field equality, written either as `{ field: value }` or
//! `{ field: { "$eq": value } }`. An empty filter matches every document.

use bson::{Bson, Document, datetime::DateTime};

/// Comparable representation of BSON values.
///
/// Integers of either width compare exactly with each other. A double equals an integer only when
/// it holds that integer's exact value, the way the server compares them.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    /// Any other value, compared as-is
    Raw(&'a Bson),
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(i), Comparable::Double(d))
            | (Comparable::Double(d), Comparable::Int(i)) => int_equals_double(*i, *d),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Raw(a), Comparable::Raw(b)) => a == b,
            _ => false,
        }
    }
}

fn int_equals_double(int: i64, double: f64) -> bool {
    // 2^63 is the first double above i64::MAX
    double.fract() == 0.0
        && double >= i64::MIN as f64
        && double < 9_223_372_036_854_775_808.0
        && double as i64 == int
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            other => Comparable::Raw(other),
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Returns `true` if every condition of `filter` holds for the document.
    pub fn matches(&self, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(field, condition)| self.matches_field(field, condition))
    }

    fn matches_field(&self, field: &str, condition: &Bson) -> bool {
        let expected = match condition {
            Bson::Document(op) if op.len() == 1 => op.get("$eq").unwrap_or(condition),
            other => other,
        };

        match self.document.get(field) {
            Some(value) => Comparable::from(value) == Comparable::from(expected),
            None => matches!(expected, Bson::Null),
        }
    }
}
