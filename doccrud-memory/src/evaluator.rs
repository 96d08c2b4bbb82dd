//! Query expression evaluation for in-memory document filtering.
//!
//! Evaluation follows document database semantics closely enough for the CRUD layer:
//! fields are addressed by dotted paths, a comparison against an array field matches when
//! any element matches, and `Eq` against `null` also matches a missing field.

use bson::{Bson, Document, datetime::DateTime};
use regex::{Regex, RegexBuilder};
use std::{
    cmp::Ordering,
    collections::HashMap,
    iter::once,
};

use doccrud_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, FieldOp, QueryVisitor},
    search::fold_diacritics,
};

use crate::path::lookup;

/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to `f64`.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Values with no natural order (binary, object ids and the like).
    Other(&'a Bson),
}

impl<'a> Comparable<'a> {
    /// Position of the value's type in the cross-type sort order.
    fn rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Number(_) => 1,
            Comparable::String(_) => 2,
            Comparable::Map(_) => 3,
            Comparable::Array(_) => 4,
            Comparable::Other(_) => 5,
            Comparable::Bool(_) => 6,
            Comparable::DateTime(_) => 7,
        }
    }
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null | Bson::Undefined => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Total order used for sorting: missing and null first, then by type, then by value.
///
/// Strings compare without regard to case or accents.
pub(crate) fn compare_for_sort(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    let left = left.map(Comparable::from).unwrap_or(Comparable::Null);
    let right = right.map(Comparable::from).unwrap_or(Comparable::Null);

    match (&left, &right) {
        (Comparable::String(a), Comparable::String(b)) => {
            fold_diacritics(a).cmp(&fold_diacritics(b))
        }
        _ => left
            .rank()
            .cmp(&right.rank())
            .then_with(|| left.partial_cmp(&right).unwrap_or(Ordering::Equal)),
    }
}

/// Case-insensitive regular expressions of one expression, compiled once per query.
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    patterns: HashMap<String, Regex>,
}

impl PatternCache {
    pub fn compile(expr: &Expr) -> DocumentStoreResult<Self> {
        let mut cache = Self::default();
        cache.collect(expr)?;
        Ok(cache)
    }

    fn collect(&mut self, expr: &Expr) -> DocumentStoreResult<()> {
        match expr {
            Expr::And(exprs) | Expr::Or(exprs) => {
                for expr in exprs {
                    self.collect(expr)?;
                }
            }
            Expr::Not(expr) => self.collect(expr)?,
            Expr::Field { field, op: FieldOp::Matches, value } => {
                let pattern = value.as_str().ok_or_else(|| {
                    DocumentStoreError::InvalidFilter(format!(
                        "pattern for '{field}' must be a string"
                    ))
                })?;

                if !self.patterns.contains_key(pattern) {
                    let regex = RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| DocumentStoreError::InvalidFilter(e.to_string()))?;
                    self.patterns.insert(pattern.to_string(), regex);
                }
            }
            Expr::Field { .. } | Expr::Exists(..) => {}
        }

        Ok(())
    }

    fn get(&self, pattern: &str) -> Option<&Regex> {
        self.patterns.get(pattern)
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
    patterns: &'a PatternCache,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document, patterns: &'a PatternCache) -> Self {
        Self { document, patterns }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the documents matching `expr`, preserving their order.
    pub fn filter_documents<I>(documents: I, expr: &Expr) -> DocumentStoreResult<Vec<&'a Document>>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let patterns = PatternCache::compile(expr)?;
        let mut matched = Vec::new();

        for document in documents {
            if DocumentEvaluator::new(document, &patterns).evaluate(expr)? {
                matched.push(document);
            }
        }

        Ok(matched)
    }
}

/// The value itself, followed by its elements when it is an array.
fn candidates(value: &Bson) -> impl Iterator<Item = &Bson> {
    let elements: &[Bson] = match value {
        Bson::Array(items) => items,
        _ => &[],
    };

    once(value).chain(elements.iter())
}

fn operand_values(value: &Bson) -> Vec<Comparable<'_>> {
    match value {
        Bson::Array(items) => items.iter().map(Comparable::from).collect(),
        single => vec![Comparable::from(single)],
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(lookup(self.document, field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = lookup(self.document, field) else {
            let null = Comparable::Null;

            return Ok(match op {
                FieldOp::Eq => Comparable::from(value) == null,
                FieldOp::Ne => Comparable::from(value) != null,
                FieldOp::AnyOf => operand_values(value).contains(&null),
                FieldOp::NoneOf => !operand_values(value).contains(&null),
                _ => false,
            });
        };

        let target = Comparable::from(value);

        Ok(match op {
            FieldOp::Eq => candidates(field_value).any(|item| Comparable::from(item) == target),
            FieldOp::Ne => !candidates(field_value).any(|item| Comparable::from(item) == target),
            FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                candidates(field_value).any(|item| {
                    match Comparable::from(item).partial_cmp(&target) {
                        Some(ordering) => match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => ordering != Ordering::Less,
                            FieldOp::Lt => ordering == Ordering::Less,
                            _ => ordering != Ordering::Greater,
                        },
                        None => false,
                    }
                })
            }
            FieldOp::AnyOf | FieldOp::NoneOf => {
                let values = operand_values(value);
                let found = candidates(field_value)
                    .any(|item| values.contains(&Comparable::from(item)));

                if matches!(op, FieldOp::AnyOf) { found } else { !found }
            }
            FieldOp::Matches => {
                let pattern = value.as_str().unwrap_or_default();
                let regex = self.patterns.get(pattern).ok_or_else(|| {
                    DocumentStoreError::InvalidFilter(format!(
                        "pattern for '{field}' was not compiled"
                    ))
                })?;

                candidates(field_value)
                    .any(|item| matches!(item, Bson::String(text) if regex.is_match(text)))
            }
        })
    }
}
