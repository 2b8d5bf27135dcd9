//! In-process [`RemoteStore`] used by tests, with call counters and
//! failure injection.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Collection, Document, DocumentId, Filter, Identity, RemoteStore};
use crate::error::StoreError;

/// Number of calls made per operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub list: usize,
    pub get: usize,
    pub create: usize,
    pub identity: usize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.list + self.get + self.create + self.identity
    }
}

#[derive(Default)]
struct Inner {
    documents: HashMap<Collection, Vec<Document>>,
    accounts: Vec<(String, String, Identity)>,
    signed_in: Option<Identity>,
    failure: Option<StoreError>,
    next_id: Option<String>,
    calls: Calls,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// A store with `identity` already signed in.
    pub fn signed_in_as(identity: &str) -> Self {
        let store = MemoryStore::default();
        store.lock().signed_in = Some(Identity {
            id: identity.to_string(),
            email: format!("{identity}@example.com"),
            name: String::new(),
        });
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, collection: Collection, value: Value) {
        let document: Document = serde_json::from_value(value).unwrap();
        self.lock()
            .documents
            .entry(collection)
            .or_default()
            .push(document);
    }

    /// Make every document and identity call fail with `error` until
    /// [`MemoryStore::recover`].
    pub fn fail_with(&self, error: StoreError) {
        self.lock().failure = Some(error);
    }

    /// Give the next created document `id` instead of the id it was sent.
    pub fn assign_next_id(&self, id: &str) {
        self.lock().next_id = Some(id.to_string());
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    pub fn calls(&self) -> Calls {
        self.lock().calls
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.lock().documents.get(&collection).map_or(0, Vec::len)
    }

    fn check(inner: &Inner) -> Result<(), StoreError> {
        match &inner.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let mut inner = self.lock();
        inner.calls.list += 1;
        Self::check(&inner)?;

        Ok(inner
            .documents
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filters.iter().all(|f| f.matches(doc)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Document, StoreError> {
        let mut inner = self.lock();
        inner.calls.get += 1;
        Self::check(&inner)?;

        inner
            .documents
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_document(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let mut inner = self.lock();
        inner.calls.create += 1;
        Self::check(&inner)?;

        let id = inner.next_id.take().unwrap_or_else(|| id.as_str().to_string());
        let document = Document::new(&id, fields);
        inner
            .documents
            .entry(collection)
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn current_identity(&self) -> Result<Identity, StoreError> {
        let mut inner = self.lock();
        inner.calls.identity += 1;
        Self::check(&inner)?;

        inner.signed_in.clone().ok_or(StoreError::Unauthenticated)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let mut inner = self.lock();
        if inner.accounts.iter().any(|(e, _, _)| e == email) {
            return Err(StoreError::Rejected {
                status: 409,
                message: "A user with the same email already exists".to_string(),
            });
        }

        let identity = Identity {
            id: format!("user-{}", inner.accounts.len() + 1),
            email: email.to_string(),
            name: String::new(),
        };
        inner
            .accounts
            .push((email.to_string(), password.to_string(), identity.clone()));
        Ok(identity)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let identity = inner
            .accounts
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, identity)| identity.clone())
            .ok_or(StoreError::Unauthenticated)?;
        inner.signed_in = Some(identity);
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .signed_in
            .take()
            .map(|_| ())
            .ok_or(StoreError::Unauthenticated)
    }
}
