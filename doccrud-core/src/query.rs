//! Filter translation and query construction.
//!
//! Callers describe what they want with a [`FindRequest`]: a generic filter object, an
//! optional projection, a sort field and direction, a search value with the fields to search
//! in, and an optional page. [`translate_filter`] turns the filter object plus the search
//! clause into a backend-neutral predicate ([`Expr`]), which backends translate or evaluate
//! through [`QueryVisitor`].
//!
//! # Filter objects
//!
//! ```ignore
//! use bson::doc;
//! use doccrud::query::FindRequest;
//!
//! let request = FindRequest::builder()
//!     .filter(doc! { "id": "3f1c…", "status": "active", "age": { "$gte": 18 } })
//!     .search("joão")
//!     .search_fields(["name", "details.nickname"])
//!     .order_by("createdAt")
//!     .direction(SortDirection::Desc)
//!     .offset(0, 20)
//!     .build();
//! ```
//!
//! - `id` is an alias for the stored primary key `_id`.
//! - Plain values are equality predicates.
//! - Operator documents (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$nin`,
//!   `$exists`, `$regex`, `$not`) become the matching comparisons.
//! - Top-level `$and`, `$or` and `$nor` take arrays of filter objects.
//! - A search value with at least one search field adds an OR of fuzzy regex matches,
//!   one per field, ANDed with the rest of the filter.

use bson::{Bson, Document};
use std::str::FromStr;

use crate::{
    document::{ID_ALIAS, PRIMARY_KEY},
    error::{DocumentStoreError, DocumentStoreResult},
    search::SearchPattern,
};

/// Number of records returned by a paginated find when no page is given.
pub const DEFAULT_LIMIT: usize = 20;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    #[default]
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

impl FromStr for SortDirection {
    type Err = DocumentStoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Asc),
            "desc" | "descending" | "-1" => Ok(SortDirection::Desc),
            other => Err(DocumentStoreError::InvalidFilter(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

/// Sort specification for query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Field equals any of the values of an array.
    AnyOf,
    /// Field equals none of the values of an array.
    NoneOf,
    /// String field matches a case-insensitive regular expression.
    Matches,
}

/// A filter expression for querying documents.
///
/// Field names may be dotted paths (`details.name`) addressing nested documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression (inverts the result).
    Not(Box<Expr>),
    /// Checks if a field exists or doesn't exist.
    Exists(String, bool),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression (logical NOT).
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches documents where the field does not equal the specified value.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Matches documents where the field equals any of the given values.
    pub fn any_of(field: impl Into<String>, values: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::AnyOf, values.into())
    }

    /// Matches documents where the field equals none of the given values.
    pub fn none_of(field: impl Into<String>, values: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::NoneOf, values.into())
    }

    /// Matches documents where the string field matches `pattern`, ignoring case.
    pub fn matches(field: impl Into<String>, pattern: &SearchPattern) -> Expr {
        Expr::field(field.into(), FieldOp::Matches, Bson::String(pattern.pattern().to_string()))
    }

    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    /// Combines multiple expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Combines multiple expressions such that any can match.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

/// A backend-level query: predicate, projection, sort and page window.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Optional projection applied to every returned document.
    pub projection: Option<Document>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip (for pagination).
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    pub fn filter(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    pub fn projection(mut self, projection: Option<Document>) -> Self {
        self.query.projection = projection;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: Option<Sort>) -> Self {
        self.query.sort = sort;
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// A page window: how many records to skip and how many to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub skip: usize,
    pub limit: usize,
}

impl Offset {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

/// Everything a caller can ask of `find` and `find_all`.
#[derive(Debug, Clone, Default)]
pub struct FindRequest {
    /// Generic filter object; `id` aliases the primary key.
    pub filter: Option<Document>,
    /// Projection of the returned records.
    pub select: Option<Document>,
    pub order_by: Option<String>,
    pub direction: SortDirection,
    pub search: Option<SearchPattern>,
    pub search_fields: Vec<String>,
    /// Page window; `find` falls back to [`Offset::default`], `find_all` ignores it.
    pub offset: Option<Offset>,
}

impl FindRequest {
    pub fn new() -> Self {
        FindRequest::default()
    }

    pub fn builder() -> FindRequestBuilder {
        FindRequestBuilder::default()
    }

    /// Translates the filter object and search clause into a predicate.
    pub fn predicate(&self) -> DocumentStoreResult<Option<Expr>> {
        translate_filter(self.filter.as_ref(), self.search.as_ref(), &self.search_fields)
    }

    /// The sort specification, with the primary key alias applied.
    pub fn sort(&self) -> Option<Sort> {
        self.order_by.as_ref().map(|field| Sort {
            field: primary_key_field(field).to_string(),
            direction: self.direction,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindRequestBuilder {
    request: FindRequest,
}

impl FindRequestBuilder {
    pub fn filter(mut self, filter: Document) -> Self {
        self.request.filter = Some(filter);
        self
    }

    pub fn select(mut self, projection: Document) -> Self {
        self.request.select = Some(projection);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.request.order_by = Some(field.into());
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.request.direction = direction;
        self
    }

    /// Searches for `search` in the search fields, fuzzily unless a raw
    /// [`SearchPattern`] is given.
    pub fn search(mut self, search: impl Into<SearchPattern>) -> Self {
        self.request.search = Some(search.into());
        self
    }

    pub fn search_field(mut self, field: impl Into<String>) -> Self {
        self.request.search_fields.push(field.into());
        self
    }

    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request
            .search_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn offset(mut self, skip: usize, limit: usize) -> Self {
        self.request.offset = Some(Offset::new(skip, limit));
        self
    }

    pub fn build(self) -> FindRequest {
        self.request
    }
}

/// Maps the public `id` alias to the stored primary key; other names pass through.
pub fn primary_key_field(field: &str) -> &str {
    if field == ID_ALIAS { PRIMARY_KEY } else { field }
}

/// Translates a generic filter object plus an optional search clause into a predicate.
///
/// Returns `None` when nothing constrains the result (every document matches).
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidFilter`] for unknown or malformed operators.
pub fn translate_filter(
    filter: Option<&Document>,
    search: Option<&SearchPattern>,
    search_fields: &[String],
) -> DocumentStoreResult<Option<Expr>> {
    let mut clauses = match filter {
        Some(filter) => document_predicates(filter)?,
        None => Vec::new(),
    };

    if let Some(search) = search {
        if !search_fields.is_empty() {
            clauses.push(Filter::or(
                search_fields
                    .iter()
                    .map(|field| Filter::matches(primary_key_field(field), search)),
            ));
        }
    }

    Ok(match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(Expr::And(clauses)),
    })
}

fn document_predicates(filter: &Document) -> DocumentStoreResult<Vec<Expr>> {
    let mut clauses = Vec::with_capacity(filter.len());

    for (key, value) in filter {
        match key.as_str() {
            "$and" => clauses.extend(logical_branches(key, value)?),
            "$or" => clauses.push(Expr::Or(logical_branches(key, value)?)),
            "$nor" => clauses.push(Expr::Or(logical_branches(key, value)?).not()),
            other if other.starts_with('$') => {
                return Err(DocumentStoreError::InvalidFilter(format!(
                    "unsupported top-level operator '{other}'"
                )));
            }
            field => clauses.extend(field_predicates(primary_key_field(field), value)?),
        }
    }

    Ok(clauses)
}

/// Each branch of `$and`/`$or`/`$nor` is a filter object of its own.
fn logical_branches(op: &str, value: &Bson) -> DocumentStoreResult<Vec<Expr>> {
    let branches = match value {
        Bson::Array(branches) if !branches.is_empty() => branches,
        _ => {
            return Err(DocumentStoreError::InvalidFilter(format!(
                "{op} expects a non-empty array"
            )));
        }
    };

    branches
        .iter()
        .map(|branch| match branch {
            Bson::Document(branch) => {
                let mut clauses = document_predicates(branch)?;
                Ok(match clauses.len() {
                    1 => clauses.remove(0),
                    _ => Expr::And(clauses),
                })
            }
            _ => Err(DocumentStoreError::InvalidFilter(format!(
                "{op} expects an array of filter objects"
            ))),
        })
        .collect()
}

fn is_operator_document(value: &Bson) -> Option<&Document> {
    match value {
        Bson::Document(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
            Some(ops)
        }
        _ => None,
    }
}

fn field_predicates(field: &str, value: &Bson) -> DocumentStoreResult<Vec<Expr>> {
    let Some(ops) = is_operator_document(value) else {
        return Ok(vec![Filter::eq(field, value.clone())]);
    };

    let mut predicates = Vec::with_capacity(ops.len());

    for (op, operand) in ops {
        let predicate = match op.as_str() {
            "$eq" => Filter::eq(field, operand.clone()),
            "$ne" => Filter::ne(field, operand.clone()),
            "$gt" => Filter::gt(field, operand.clone()),
            "$gte" => Filter::gte(field, operand.clone()),
            "$lt" => Filter::lt(field, operand.clone()),
            "$lte" => Filter::lte(field, operand.clone()),
            "$in" => Filter::any_of(field, expect_array(op, operand)?),
            "$nin" => Filter::none_of(field, expect_array(op, operand)?),
            "$exists" => Expr::Exists(field.to_string(), is_truthy(operand)),
            "$regex" => Filter::matches(field, &SearchPattern::raw(regex_source(operand)?)),
            // Regex options are always case-insensitive.
            "$options" => continue,
            "$not" => match is_operator_document(operand) {
                Some(_) => {
                    let mut inner = field_predicates(field, operand)?;
                    match inner.len() {
                        1 => inner.remove(0).not(),
                        _ => Expr::And(inner).not(),
                    }
                }
                None => {
                    return Err(DocumentStoreError::InvalidFilter(format!(
                        "$not on '{field}' expects an operator document"
                    )));
                }
            },
            other => {
                return Err(DocumentStoreError::InvalidFilter(format!(
                    "unsupported operator '{other}' on '{field}'"
                )));
            }
        };
        predicates.push(predicate);
    }

    Ok(predicates)
}

fn expect_array(op: &str, operand: &Bson) -> DocumentStoreResult<Bson> {
    match operand {
        Bson::Array(_) => Ok(operand.clone()),
        _ => Err(DocumentStoreError::InvalidFilter(format!("{op} expects an array"))),
    }
}

fn regex_source(operand: &Bson) -> DocumentStoreResult<String> {
    match operand {
        Bson::String(pattern) => Ok(pattern.clone()),
        Bson::RegularExpression(regex) => Ok(regex.pattern.as_str().to_string()),
        _ => Err(DocumentStoreError::InvalidFilter(
            "$regex expects a string or regular expression".to_string(),
        )),
    }
}

fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(flag) => *flag,
        Bson::Null => false,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0,
        _ => true,
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn id_alias_becomes_primary_key() {
        let filter = doc! { "id": "abc", "name": "Ana" };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::and([Filter::eq("_id", "abc"), Filter::eq("name", "Ana")])),
        );
    }

    #[test]
    fn single_clause_is_not_wrapped() {
        let filter = doc! { "name": "Ana" };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::eq("name", "Ana")),
        );
    }

    #[test]
    fn top_level_logical_operators() {
        let filter = doc! {
            "$or": [{ "name": "Ana" }, { "id": "b", "age": { "$gt": 3 } }],
            "$nor": [{ "status": "archived" }],
        };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::and([
                Filter::or([
                    Filter::eq("name", "Ana"),
                    Filter::and([Filter::eq("_id", "b"), Filter::gt("age", 3)]),
                ]),
                Filter::or([Filter::eq("status", "archived")]).not(),
            ])),
        );
    }

    #[test]
    fn filter_or_is_combined_with_search_or() {
        let filter = doc! { "$or": [{ "age": 1 }, { "age": 2 }] };
        let search = SearchPattern::raw("x");

        assert_eq!(
            translate_filter(Some(&filter), Some(&search), &fields(&["name", "nick"])).unwrap(),
            Some(Filter::and([
                Filter::or([Filter::eq("age", 1), Filter::eq("age", 2)]),
                Filter::or([Filter::matches("name", &search), Filter::matches("nick", &search)]),
            ])),
        );
    }

    #[test]
    fn top_level_and_is_flattened() {
        let filter = doc! { "$and": [{ "age": 1 }, { "name": "Ana" }] };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::and([Filter::eq("age", 1), Filter::eq("name", "Ana")])),
        );
    }

    #[test]
    fn malformed_logical_operators_are_rejected() {
        for filter in [
            doc! { "$or": [] },
            doc! { "$and": { "age": 1 } },
            doc! { "$nor": [1, 2] },
            doc! { "$where": "this.age > 1" },
        ] {
            assert!(matches!(
                translate_filter(Some(&filter), None, &[]),
                Err(DocumentStoreError::InvalidFilter(_))
            ));
        }
    }

    #[test]
    fn empty_request_matches_everything() {
        assert_eq!(translate_filter(None, None, &[]).unwrap(), None);
        assert_eq!(translate_filter(Some(&doc! {}), None, &[]).unwrap(), None);
    }

    #[test]
    fn search_adds_or_of_matches_next_to_equality() {
        let filter = doc! { "status": "active" };
        let search = SearchPattern::fuzzy("jose");
        let expr = translate_filter(
            Some(&filter),
            Some(&search),
            &fields(&["name", "details.name"]),
        )
        .unwrap();

        assert_eq!(
            expr,
            Some(Filter::and([
                Filter::eq("status", "active"),
                Filter::or([
                    Filter::matches("name", &search),
                    Filter::matches("details.name", &search),
                ]),
            ])),
        );
    }

    #[test]
    fn search_applies_without_filter() {
        let search = SearchPattern::fuzzy("change");
        let expr = translate_filter(None, Some(&search), &fields(&["details.name"])).unwrap();

        assert_eq!(expr, Some(Filter::or([Filter::matches("details.name", &search)])));
    }

    #[test]
    fn search_without_fields_is_ignored() {
        let search = SearchPattern::fuzzy("change");

        assert_eq!(translate_filter(None, Some(&search), &[]).unwrap(), None);
    }

    #[test]
    fn operator_documents_become_comparisons() {
        let filter = doc! {
            "age": { "$gte": 18, "$lt": 65 },
            "tags": { "$in": ["a", "b"] },
            "deletedAt": { "$exists": false },
            "name": { "$regex": "^an", "$options": "i" },
        };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::and([
                Filter::gte("age", 18),
                Filter::lt("age", 65),
                Filter::any_of("tags", vec![Bson::from("a"), Bson::from("b")]),
                Filter::not_exists("deletedAt"),
                Filter::matches("name", &SearchPattern::raw("^an")),
            ])),
        );
    }

    #[test]
    fn not_wraps_inner_operators() {
        let filter = doc! { "age": { "$not": { "$gt": 30 } } };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::gt("age", 30).not()),
        );
    }

    #[test]
    fn nested_documents_without_operators_are_equality() {
        let filter = doc! { "details": { "age": 18 } };

        assert_eq!(
            translate_filter(Some(&filter), None, &[]).unwrap(),
            Some(Filter::eq("details", doc! { "age": 18 })),
        );
    }

    #[test]
    fn unknown_operators_are_rejected() {
        let filter = doc! { "age": { "$near": 1 } };

        assert!(matches!(
            translate_filter(Some(&filter), None, &[]),
            Err(DocumentStoreError::InvalidFilter(_))
        ));

        let filter = doc! { "tags": { "$in": "a" } };

        assert!(matches!(
            translate_filter(Some(&filter), None, &[]),
            Err(DocumentStoreError::InvalidFilter(_))
        ));
    }

    #[test]
    fn sort_directions_parse() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("-1".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn request_sort_uses_primary_key_alias() {
        let request = FindRequest::builder()
            .order_by("id")
            .direction(SortDirection::Desc)
            .build();

        assert_eq!(
            request.sort(),
            Some(Sort { field: "_id".to_string(), direction: SortDirection::Desc }),
        );
        assert_eq!(FindRequest::new().sort(), None);
    }
}
