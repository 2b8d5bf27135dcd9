//! The remote document store and identity service.
//!
//! Everything stampcal persists lives behind [`RemoteStore`]. The store
//! knows nothing about calendars or stamps: it deals in raw [`Document`]s
//! grouped into three [`Collection`]s, filtered by simple equality.
//! Decoding into typed rows happens in [`Document::decode`].

#[cfg(test)]
pub(crate) mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StampcalError, StampcalResult, StoreError};

/// Field names shared by every collection.
pub mod fields {
    pub const OWNER: &str = "user_id";
    pub const CALENDAR: &str = "cal_id";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Calendars,
    Events,
    Stamps,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Calendars => "calendars",
            Collection::Events => "events",
            Collection::Stamps => "stamps",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality predicate on a single document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub attribute: String,
    pub value: String,
}

impl Filter {
    pub fn equal(attribute: &str, value: &str) -> Self {
        Filter {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document
            .fields
            .get(&self.attribute)
            .and_then(|v| v.as_str())
            .is_some_and(|v| v == self.value)
    }
}

/// A raw record as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn new(id: &str, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Document {
            id: id.to_string(),
            fields,
        }
    }

    /// Decode into a typed row of `collection`.
    pub fn decode<T: DeserializeOwned>(self, collection: Collection) -> StampcalResult<T> {
        let value = serde_json::to_value(self).map_err(|e| decode_error(collection, e))?;
        serde_json::from_value(value).map_err(|e| decode_error(collection, e))
    }
}

fn decode_error(collection: Collection, e: serde_json::Error) -> StampcalError {
    StampcalError::Decode {
        collection: collection.name(),
        message: e.to_string(),
    }
}

/// Turn a serializable struct into the field map of a new document.
pub(crate) fn to_fields<T: Serialize>(
    collection: Collection,
    value: &T,
) -> StampcalResult<serde_json::Map<String, serde_json::Value>> {
    match serde_json::to_value(value).map_err(|e| decode_error(collection, e))? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(StampcalError::Decode {
            collection: collection.name(),
            message: format!("expected an object, got {other}"),
        }),
    }
}

/// Identifier for a document about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId(String);

impl DocumentId {
    /// A fresh client-generated id (32 hex characters).
    pub fn unique() -> Self {
        DocumentId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Operations stampcal needs from the remote store.
///
/// Implementations own the database id and the mapping from [`Collection`]
/// to the store's collection ids.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All documents of `collection` matching every filter, in store order.
    async fn list_documents(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` does not exist.
    async fn get_document(&self, collection: Collection, id: &str)
    -> Result<Document, StoreError>;

    async fn create_document(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Document, StoreError>;

    /// Fails with [`StoreError::Unauthenticated`] when there is no session.
    async fn current_identity(&self) -> Result<Identity, StoreError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError>;

    /// Start an email/password session.
    async fn create_session(&self, email: &str, password: &str) -> Result<(), StoreError>;

    /// End the current session.
    async fn delete_session(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::EventStamp;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn document_keeps_id_out_of_fields() {
        let doc = document(json!({"$id": "s1", "name": "Run"}));
        assert_eq!(doc.id, "s1");
        assert!(!doc.fields.contains_key("$id"));
    }

    #[test]
    fn decode_stamp() {
        let doc = document(json!({
            "$id": "s1",
            "name": "Run",
            "event_emoji": "🏃",
            "user_id": "u1",
        }));

        let stamp: EventStamp = doc.decode(Collection::Stamps).unwrap();
        assert_eq!(stamp.emoji, "🏃");
    }

    #[test]
    fn decode_failure_names_collection() {
        let doc = document(json!({"$id": "s1"}));

        let err = doc.decode::<EventStamp>(Collection::Stamps).unwrap_err();
        assert!(matches!(err, StampcalError::Decode { collection: "stamps", .. }));
    }

    #[test]
    fn filter_matches_string_fields_only() {
        let doc = document(json!({"$id": "e1", "cal_id": "c1", "count": 1}));

        assert!(Filter::equal("cal_id", "c1").matches(&doc));
        assert!(!Filter::equal("cal_id", "c2").matches(&doc));
        assert!(!Filter::equal("count", "1").matches(&doc));
        assert!(!Filter::equal("missing", "").matches(&doc));
    }

    #[test]
    fn unique_ids_differ() {
        let a = DocumentId::unique();
        let b = DocumentId::unique();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
