//! Dotted field paths (`details.address.city`) over BSON documents.

use bson::{Bson, Document};

use doccrud_core::error::{DocumentStoreError, DocumentStoreResult};

/// Resolves `path` inside `document`, stepping through sub-documents and array indexes.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            Bson::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Sets the value at `path`, creating missing (or null) intermediate documents.
pub(crate) fn set_path(document: &mut Document, path: &str, value: Bson) -> DocumentStoreResult<()> {
    let Some((head, rest)) = path.split_once('.') else {
        document.insert(path, value);
        return Ok(());
    };

    match document.get(head) {
        Some(Bson::Document(_)) => {}
        None | Some(Bson::Null) => {
            document.insert(head, Document::new());
        }
        Some(_) => {
            return Err(DocumentStoreError::InvalidDocument(format!(
                "cannot set '{path}': '{head}' is not a document"
            )));
        }
    }

    match document.get_mut(head) {
        Some(Bson::Document(child)) => set_path(child, rest, value),
        _ => Err(DocumentStoreError::InvalidDocument(format!(
            "cannot set '{path}'"
        ))),
    }
}

/// Removes the value at `path`, if present.
pub(crate) fn remove_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(child)) = document.get_mut(head) {
                remove_path(child, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn lookup_walks_documents_and_arrays() {
        let document = doc! {
            "details": { "address": { "city": "Recife" } },
            "tags": ["a", "b"],
        };

        assert_eq!(
            lookup(&document, "details.address.city"),
            Some(&Bson::String("Recife".into()))
        );
        assert_eq!(lookup(&document, "tags.1"), Some(&Bson::String("b".into())));
        assert_eq!(lookup(&document, "details.missing"), None);
        assert_eq!(lookup(&document, "tags.x"), None);
    }

    #[test]
    fn set_path_creates_intermediate_documents() {
        let mut document = doc! { "details": { "age": 19 }, "nothing": null };

        set_path(&mut document, "details.name", "Ana".into()).unwrap();
        set_path(&mut document, "nothing.inner", 1.into()).unwrap();
        set_path(&mut document, "fresh.deep.value", true.into()).unwrap();

        assert_eq!(
            document,
            doc! {
                "details": { "age": 19, "name": "Ana" },
                "nothing": { "inner": 1 },
                "fresh": { "deep": { "value": true } },
            }
        );
    }

    #[test]
    fn set_path_refuses_to_descend_into_scalars() {
        let mut document = doc! { "name": "Ana" };

        assert!(matches!(
            set_path(&mut document, "name.first", "A".into()),
            Err(DocumentStoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn remove_path_drops_nested_fields() {
        let mut document = doc! { "details": { "age": 19, "name": "Ana" } };

        remove_path(&mut document, "details.age");
        remove_path(&mut document, "missing.field");

        assert_eq!(document, doc! { "details": { "name": "Ana" } });
    }
}
