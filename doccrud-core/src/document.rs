//! Record shapes and conversions shared by every layer.
//!
//! Records travel through the crate as plain [`bson::Document`]s. Stored records carry the
//! native primary key under [`PRIMARY_KEY`]; records handed back to callers carry it under
//! [`ID_ALIAS`] instead (see [`format_document`]).

use bson::{
    Bson, DateTime, Document,
    de::deserialize_from_document,
    ser::serialize_to_document,
};
use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Native primary key field of a stored record.
pub const PRIMARY_KEY: &str = "_id";

/// Public name of the primary key, accepted in filters, sort fields and records.
pub const ID_ALIAS: &str = "id";

/// Field holding the creation time of a record.
pub const CREATED_AT: &str = "createdAt";

/// Field holding the last modification time of a record.
pub const UPDATED_AT: &str = "updatedAt";

/// The current time as a BSON date.
pub fn timestamp() -> Bson {
    Bson::DateTime(DateTime::from_chrono(Utc::now()))
}

/// The identifier of a written record, returned by every write operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentWithId {
    pub id: String,
}

impl DocumentWithId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Result of a delete. Deleting a missing record still succeeds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub success: bool,
}

/// Extension trait providing record conversions for any serde type.
///
/// This trait is automatically implemented for every `Serialize + DeserializeOwned` type,
/// including [`bson::Document`] itself.
pub trait DocumentExt: Sized {
    /// Converts this value into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not serialize to a BSON document
    /// (for instance a bare string or number).
    fn to_record(&self) -> DocumentStoreResult<Document>;

    /// Creates a value from a record.
    fn from_record(record: Document) -> DocumentStoreResult<Self>;

    /// Converts this value to a JSON value.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a value from a JSON value.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<T: Serialize + DeserializeOwned> DocumentExt for T {
    fn to_record(&self) -> DocumentStoreResult<Document> {
        serialize_to_document(self)
            .map_err(|e| DocumentStoreError::InvalidDocument(e.to_string()))
    }

    fn from_record(record: Document) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_document(record)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Renames the stored primary key to its public alias.
pub fn format_document(mut document: Document) -> Document {
    if let Some(id) = document.remove(PRIMARY_KEY) {
        document.insert(ID_ALIAS, id);
    }
    document
}

/// Reads the public id of a record, if it is a non-empty string.
pub fn record_id(record: &Document) -> Option<&str> {
    match record.get(ID_ALIAS) {
        Some(Bson::String(id)) if !id.is_empty() => Some(id.as_str()),
        _ => None,
    }
}

/// Flattens nested sub-documents into dotted paths so that a `$set` only touches the
/// leaves that are present.
///
/// Arrays and scalars are leaves. An empty sub-document contributes nothing.
pub fn flatten_update(document: Document) -> Document {
    let mut flattened = Document::new();
    flatten_into(&mut flattened, None, document);
    flattened
}

fn flatten_into(out: &mut Document, parent: Option<&str>, document: Document) {
    for (key, value) in document {
        let path = match parent {
            Some(parent) => format!("{parent}.{key}"),
            None => key,
        };

        match value {
            Bson::Document(nested) => flatten_into(out, Some(path.as_str()), nested),
            leaf => {
                out.insert(path, leaf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn format_document_renames_primary_key() {
        let formatted = format_document(doc! { "_id": "abc", "name": "Ana" });

        assert_eq!(formatted.get_str("id").unwrap(), "abc");
        assert!(!formatted.contains_key("_id"));
        assert_eq!(formatted.get_str("name").unwrap(), "Ana");
    }

    #[test]
    fn record_id_ignores_empty_and_non_string_ids() {
        assert_eq!(record_id(&doc! { "id": "x1" }), Some("x1"));
        assert_eq!(record_id(&doc! { "id": "" }), None);
        assert_eq!(record_id(&doc! { "id": 7 }), None);
        assert_eq!(record_id(&doc! { "name": "no id" }), None);
    }

    #[test]
    fn flatten_update_produces_dotted_leaves() {
        let flattened = flatten_update(doc! {
            "details": { "age": 19, "address": { "city": "Recife" } },
            "tags": ["a", "b"],
            "empty": {},
            "name": "Ana",
        });

        assert_eq!(
            flattened,
            doc! {
                "details.age": 19,
                "details.address.city": "Recife",
                "tags": ["a", "b"],
                "name": "Ana",
            }
        );
    }

    #[test]
    fn serde_types_convert_to_records() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Person {
            name: String,
            age: i32,
        }

        let person = Person { name: "Ana".into(), age: 30 };
        let record = person.to_record().unwrap();

        assert_eq!(record, doc! { "name": "Ana", "age": 30 });
        assert_eq!(Person::from_record(record).unwrap(), person);
    }
}
