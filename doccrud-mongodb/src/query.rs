//! Query translation from doccrud predicates to MongoDB query syntax.

use bson::{Bson, Document, doc};

use doccrud_core::{
    error::DocumentStoreError,
    query::{Expr, FieldOp, QueryVisitor},
    search::SEARCH_OPTIONS,
};

/// Translates predicates into MongoDB filter documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// The filter for an optional predicate; `None` matches every document.
    pub fn filter(expr: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match expr {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // An empty `$and` is rejected by the server; an empty filter object matches all.
        if exprs.is_empty() {
            return Ok(Document::new());
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    // `$not` is only valid on a field; `$nor` negates a whole clause.
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$nor": [self.visit_expr(expr)?],
        })
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$exists": should_exist },
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
                FieldOp::AnyOf => doc! { "$in": value },
                FieldOp::NoneOf => doc! { "$nin": value },
                FieldOp::Matches => match value {
                    Bson::String(pattern) => doc! { "$regex": pattern.as_str(), "$options": SEARCH_OPTIONS },
                    _ => return Err(DocumentStoreError::InvalidFilter(format!(
                        "pattern for '{field}' must be a string"
                    ))),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccrud_core::{query::{Filter, translate_filter}, search::SearchPattern};

    #[test]
    fn translates_comparisons() {
        let expr = Filter::and([Filter::gte("age", 18), Filter::any_of("tags", vec!["a", "b"])]);

        assert_eq!(
            MongoQueryTranslator::filter(Some(&expr)).unwrap(),
            doc! {
                "$and": [
                    { "age": { "$gte": 18 } },
                    { "tags": { "$in": ["a", "b"] } },
                ]
            }
        );
    }

    #[test]
    fn top_level_or_and_nor_reach_the_server_shape() {
        let filter = doc! { "$or": [{ "name": "Ana" }, {}], "$nor": [{ "age": 3 }] };
        let expr = translate_filter(Some(&filter), None, &[]).unwrap();

        assert_eq!(
            MongoQueryTranslator::filter(expr.as_ref()).unwrap(),
            doc! {
                "$and": [
                    { "$or": [{ "name": { "$eq": "Ana" } }, {}] },
                    { "$nor": [{ "$or": [{ "age": { "$eq": 3 } }] }] },
                ]
            }
        );
    }

    #[test]
    fn search_becomes_case_insensitive_regex() {
        let expr = Filter::matches("name", &SearchPattern::raw("^ana"));

        assert_eq!(
            MongoQueryTranslator::filter(Some(&expr)).unwrap(),
            doc! { "name": { "$regex": "^ana", "$options": "i" } }
        );
    }

    #[test]
    fn negation_uses_nor() {
        let expr = Filter::eq("name", "Ana").not();

        assert_eq!(
            MongoQueryTranslator::filter(Some(&expr)).unwrap(),
            doc! { "$nor": [{ "name": { "$eq": "Ana" } }] }
        );
    }

    #[test]
    fn generic_filter_maps_id_and_search() {
        let predicate = translate_filter(
            Some(&doc! { "id": "a1" }),
            Some(&SearchPattern::raw("x")),
            &["details.name".to_string()],
        )
        .unwrap();

        assert_eq!(
            MongoQueryTranslator::filter(predicate.as_ref()).unwrap(),
            doc! {
                "$and": [
                    { "_id": { "$eq": "a1" } },
                    { "$or": [{ "details.name": { "$regex": "x", "$options": "i" } }] },
                ]
            }
        );
    }

    #[test]
    fn no_predicate_matches_everything() {
        assert_eq!(MongoQueryTranslator::filter(None).unwrap(), doc! {});
    }
}
