//! stampcal-appwrite - [`RemoteStore`] backed by the Appwrite REST API.
//!
//! Documents live in one database, one collection per row kind (ids come
//! from [`StoreConfig`]). Sessions are carried the way non-browser clients
//! do it: the `X-Fallback-Cookies` header returned when a session is
//! created is sent back on every request. Callers that want the session to
//! outlive the process persist it with [`StoredSession`].

pub mod query;
pub mod session;

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use stampcal_core::config::StoreConfig;
use stampcal_core::error::{StampcalError, StampcalResult, StoreError};
use stampcal_core::remote::{Collection, Document, DocumentId, Filter, Identity, RemoteStore};
use tracing::{debug, warn};
use url::Url;

pub use session::StoredSession;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const FALLBACK_COOKIES_HEADER: &str = "X-Fallback-Cookies";
/// Error type Appwrite reports for requests made without a session.
const MISSING_SCOPE_ERROR: &str = "general_unauthorized_scope";

#[derive(Deserialize)]
struct DocumentList {
    documents: Vec<Document>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

pub struct AppwriteStore {
    http: reqwest::Client,
    endpoint: Url,
    config: StoreConfig,
    cookie: RwLock<Option<String>>,
}

impl AppwriteStore {
    pub fn new(config: StoreConfig) -> StampcalResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            StampcalError::Config(format!("Invalid endpoint '{}': {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(StampcalError::Config(format!(
                "Invalid endpoint '{}'",
                config.endpoint
            )));
        }

        Ok(AppwriteStore {
            http: reqwest::Client::new(),
            endpoint,
            config,
            cookie: RwLock::new(None),
        })
    }

    /// The session cookie currently in use, if signed in.
    pub fn session_cookie(&self) -> Option<String> {
        self.cookie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reuse a cookie from an earlier [`AppwriteStore::session_cookie`].
    pub fn restore_session(&self, cookie: Option<String>) {
        *self.cookie.write().unwrap_or_else(PoisonError::into_inner) = cookie;
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn documents_url(&self, collection: Collection, id: Option<&str>) -> Url {
        let mut segments = vec![
            "databases",
            self.config.database_id.as_str(),
            "collections",
            self.config.collections.id_for(collection),
            "documents",
        ];
        segments.extend(id);
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "store request");
        let request = self
            .http
            .request(method, url)
            .header(PROJECT_HEADER, &self.config.project_id);

        match self.session_cookie() {
            Some(cookie) => request.header(FALLBACK_COOKIES_HEADER, cookie),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
            message: status.canonical_reason().unwrap_or("unknown error").to_string(),
            ..ErrorBody::default()
        });
        Err(status_error(status, body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

/// Only a missing session maps to [`StoreError::Unauthenticated`]. Other
/// 401s (bad credentials, a session that is already active) keep the
/// server's message.
fn status_error(status: StatusCode, body: ErrorBody) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED if body.kind.is_empty() || body.kind == MISSING_SCOPE_ERROR => {
            StoreError::Unauthenticated
        }
        StatusCode::NOT_FOUND => StoreError::NotFound,
        _ => StoreError::Rejected {
            status: status.as_u16(),
            message: body.message,
        },
    }
}

#[async_trait]
impl RemoteStore for AppwriteStore {
    async fn list_documents(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let request = self
            .request(Method::GET, self.documents_url(collection, None))
            .query(&query::list_params(filters));

        let list: DocumentList = self.send_json(request).await?;
        Ok(list.documents)
    }

    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Document, StoreError> {
        self.send_json(self.request(Method::GET, self.documents_url(collection, Some(id))))
            .await
    }

    async fn create_document(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Document, StoreError> {
        let request = self
            .request(Method::POST, self.documents_url(collection, None))
            .json(&json!({
                "documentId": id.as_str(),
                "data": fields,
            }));

        self.send_json(request).await
    }

    async fn current_identity(&self) -> Result<Identity, StoreError> {
        self.send_json(self.request(Method::GET, self.url(&["account"])))
            .await
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let request = self
            .request(Method::POST, self.url(&["account"]))
            .json(&json!({
                "userId": DocumentId::unique().as_str(),
                "email": email,
                "password": password,
            }));

        self.send_json(request).await
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let request = self
            .request(Method::POST, self.url(&["account", "sessions", "email"]))
            .json(&json!({
                "email": email,
                "password": password,
            }));

        let response = self.send(request).await?;
        let cookie = response
            .headers()
            .get(FALLBACK_COOKIES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if cookie.is_none() {
            warn!("session created but no fallback cookie was returned");
        }
        self.restore_session(cookie);
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StoreError> {
        let result = self
            .send(self.request(
                Method::DELETE,
                self.url(&["account", "sessions", "current"]),
            ))
            .await;

        match result {
            Ok(_) | Err(StoreError::Unauthenticated) => self.restore_session(None),
            Err(_) => {}
        }
        result.map(|_| ())
    }
}
