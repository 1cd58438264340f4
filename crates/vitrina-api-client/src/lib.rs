//! HTTP client for the Vitrina CMS backend.
//!
//! Provides a small client that attaches a bearer token (when one is stored),
//! generic JSON helpers that turn non-2xx responses into
//! [`AppError::Http`](vitrina_core::AppError::Http), and the domain operations
//! for the multimedia library and the blog. The orchestration layer talks to
//! it through the [`MultimediaApi`] and [`BlogApi`] traits.

pub mod blog;
pub mod multimedia;
pub mod progress;
pub mod token;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use vitrina_core::{AppError, AppResult, ClientConfig};

pub use progress::{noop_progress, FileProgressFn, ProgressFn};
pub use token::{FileTokenStore, StaticToken, TokenProvider};
pub use traits::{BlogApi, MultimediaApi};

/// HTTP client for the CMS API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

/// Map a reqwest failure onto the transport/decode split of [`AppError`].
pub(crate) fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        AppError::Decode(err.to_string())
    } else {
        AppError::Transport(err.to_string())
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Explicit `VITRINA_TOKEN` wins; otherwise the token file is consulted on
    /// every request.
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        let tokens: Arc<dyn TokenProvider> = match &config.token {
            Some(token) => Arc::new(StaticToken(Some(token.clone()))),
            None => Arc::new(FileTokenStore::new(config.token_file.clone())),
        };
        Self::new(
            config.api_url.clone(),
            tokens,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send with auth and turn any non-2xx status into `AppError::Http`.
    pub(crate) async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %message, "API request failed");
            return Err(AppError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET with optional query parameters, deserializing the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(path)).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let request = self.client.put(self.build_url(path)).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// POST a multipart form and deserialize the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// DELETE, optionally with a JSON body. The response body is ignored.
    pub async fn delete<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> AppResult<()> {
        let mut request = self.client.delete(self.build_url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await?;
        Ok(())
    }
}

/// `/prefix/<id>` with the id percent-encoded.
pub(crate) fn item_path(prefix: &str, id: &str) -> String {
    format!("{}/{}", prefix, urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> ApiClient {
        ApiClient::new(
            server.url(),
            Arc::new(StaticToken(token.map(str::to_string))),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached_when_present() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body("true")
            .create_async()
            .await;

        let ok: bool = client_for(&server, Some("tok-123"))
            .get("/ping", &[])
            .await
            .unwrap();
        assert!(ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("1")
            .create_async()
            .await;

        let value: u32 = client_for(&server, None).get("/ping", &[]).await.unwrap();
        assert_eq!(value, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_embeds_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let err = client_for(&server, None)
            .get::<serde_json::Value>("/missing", &[])
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_bad_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let err = client_for(&server, None)
            .get::<serde_json::Value>("/garbage", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = ApiClient::new(
            "http://127.0.0.1:1",
            Arc::new(StaticToken::default()),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client
            .get::<serde_json::Value>("/x", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn test_file_token_is_read_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        let client = ApiClient::new(
            "http://localhost",
            Arc::new(store.clone()),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.tokens.token(), None);
        store.save("later").unwrap();
        assert_eq!(client.tokens.token().as_deref(), Some("later"));
    }

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(item_path("/multimedia", "a b/c"), "/multimedia/a%20b%2Fc");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(
            "https://cms.example.com/api/",
            Arc::new(StaticToken::default()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.build_url("/noticias"),
            "https://cms.example.com/api/noticias"
        );
    }
}
