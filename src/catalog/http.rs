//! HTTP client for the Sonarr/Radarr v3 API.

use super::{Catalog, CatalogKind};
use crate::models::{Episode, MediaFile, MediaItem, Tag};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Header carrying the catalog API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Catalog reached over HTTP.
pub struct HttpCatalog {
    /// Which API dialect to speak.
    kind: CatalogKind,
    /// API base, e.g. `http://nas:8989/api/v3`, without a trailing slash.
    base_url: String,
    /// API key.
    api_key: SecretString,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl fmt::Debug for HttpCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCatalog")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCatalog {
    /// Creates a client for the catalog at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is not an absolute
    /// `http`/`https` URL.
    pub fn new(kind: CatalogKind, base_url: &str, api_key: SecretString) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            kind,
            base_url,
            api_key,
            client: reqwest::blocking::Client::new(),
        })
    }

    /// Applies a request timeout to every call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::OperationFailed {
                operation: "build_http_client".to_string(),
                cause: e.to_string(),
            })?;
        Ok(self)
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport(&self, operation: &str, cause: impl ToString) -> Error {
        Error::Transport {
            catalog: self.kind.as_str().to_string(),
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    fn decode(&self, operation: &str, cause: impl ToString) -> Error {
        Error::Decode {
            catalog: self.kind.as_str().to_string(),
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Sends a request and returns the body of a successful response.
    fn send(&self, operation: &str, request: reqwest::blocking::RequestBuilder) -> Result<String> {
        let response = request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .map_err(|e| self.transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(self.transport(operation, format!("API returned status: {status} - {body}")));
        }

        response.text().map_err(|e| self.transport(operation, e))
    }

    fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, i64)],
    ) -> Result<T> {
        debug!(catalog = self.kind.as_str(), operation, path, "Catalog request");
        let body = self.send(operation, self.client.get(self.url(path)).query(query))?;
        serde_json::from_str(&body).map_err(|e| self.decode(operation, e))
    }

    fn write<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        request: reqwest::blocking::RequestBuilder,
        body: &B,
    ) -> Result<()> {
        debug!(catalog = self.kind.as_str(), operation, "Catalog write");
        self.send(operation, request.json(body)).map(|_| ())
    }
}

impl Catalog for HttpCatalog {
    fn kind(&self) -> CatalogKind {
        self.kind
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.get("list_tags", "tag", &[])
    }

    fn list_items(&self) -> Result<Vec<MediaItem>> {
        self.get("list_items", self.kind.items_resource(), &[])
    }

    fn list_files(&self, item_id: i64) -> Result<Vec<MediaFile>> {
        self.get(
            "list_files",
            self.kind.files_resource(),
            &[(self.kind.item_key(), item_id)],
        )
    }

    fn list_episodes(&self, item_id: i64) -> Result<Vec<Episode>> {
        if !self.kind.has_episodes() {
            return Ok(Vec::new());
        }
        self.get("list_episodes", "episode", &[(self.kind.item_key(), item_id)])
    }

    fn update_item(&self, item: &MediaItem) -> Result<()> {
        let path = format!("{}/{}", self.kind.items_resource(), item.id);
        self.write("update_item", self.client.put(self.url(&path)), item)
    }

    fn send_command(&self, name: &str, item_id: i64) -> Result<()> {
        let body = self.kind.command_body(name, item_id);
        self.write("send_command", self.client.post(self.url("command")), &body)
    }
}

/// Validates a base URL and strips trailing slashes.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| Error::InvalidInput(format!("catalog URL '{trimmed}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidInput(format!(
            "catalog URL '{trimmed}' must use http or https"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key() -> SecretString {
        SecretString::from("secret-key".to_string())
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let catalog = HttpCatalog::new(CatalogKind::Sonarr, "http://nas:8989/api/v3/", key())
            .expect("valid url");
        assert_eq!(catalog.base_url(), "http://nas:8989/api/v3");
        assert_eq!(catalog.url("tag"), "http://nas:8989/api/v3/tag");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = HttpCatalog::new(CatalogKind::Radarr, "not a url", key())
            .expect_err("should reject");
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = HttpCatalog::new(CatalogKind::Radarr, "ftp://nas/api/v3", key())
            .expect_err("should reject scheme");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let catalog =
            HttpCatalog::new(CatalogKind::Radarr, "http://nas:7878/api/v3", key()).expect("url");
        let debug = format!("{catalog:?}");
        assert!(debug.contains("nas:7878"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_unreachable_catalog_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let catalog = HttpCatalog::new(CatalogKind::Sonarr, "http://127.0.0.1:9/api/v3", key())
            .and_then(|c| c.with_timeout(Duration::from_secs(2)))
            .expect("valid url");
        let err = catalog.list_tags().expect_err("should fail");
        assert!(matches!(err, Error::Transport { ref operation, .. } if operation == "list_tags"));
    }

    /// Runs `call` on a blocking thread against a client for `server`.
    async fn against<T, F>(server: &MockServer, kind: CatalogKind, call: F) -> Result<T>
    where
        F: FnOnce(&HttpCatalog) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let base = format!("{}/api/v3", server.uri());
        tokio::task::spawn_blocking(move || {
            let catalog = HttpCatalog::new(kind, &base, key())?;
            call(&catalog)
        })
        .await
        .expect("blocking task completes")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/tag"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
            .mount(&server)
            .await;

        let err = against(&server, CatalogKind::Sonarr, HttpCatalog::list_tags)
            .await
            .expect_err("should fail");

        assert!(
            matches!(
                &err,
                Error::Transport { operation, cause, .. }
                    if operation == "list_tags"
                        && cause.contains("500")
                        && cause.contains("database is locked")
            ),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/tag"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = against(&server, CatalogKind::Radarr, HttpCatalog::list_tags)
            .await
            .expect_err("should fail");

        assert!(matches!(
            err,
            Error::Decode { ref catalog, ref operation, .. }
                if catalog == "radarr" && operation == "list_tags"
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_listing_is_valid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let items = against(&server, CatalogKind::Sonarr, HttpCatalog::list_items)
            .await
            .expect("empty list");
        assert!(items.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_file_listing_sends_key_and_item_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/episodefile"))
            .and(header(API_KEY_HEADER, "secret-key"))
            .and(query_param("seriesId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 70, "path": "/tv/show/s01e01.mkv", "dateAdded": "2024-01-01T00:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let files = against(&server, CatalogKind::Sonarr, |c| c.list_files(7))
            .await
            .expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/tv/show/s01e01.mkv");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_refresh_command_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/command"))
            .and(body_json(json!({"name": "RefreshMovie", "movieIds": [9]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        against(&server, CatalogKind::Radarr, |c| c.send_command("RefreshMovie", 9))
            .await
            .expect("command accepted");
    }

    #[test]
    fn test_radarr_has_no_episodes() {
        let catalog = HttpCatalog::new(CatalogKind::Radarr, "http://127.0.0.1:9/api/v3", key())
            .expect("valid url");
        assert!(catalog.list_episodes(1).expect("no request made").is_empty());
    }
}
