//! HTTP implementation of [`SearchApi`] on top of `reqwest`.

use crate::api::payload::SuggestPayload;
use crate::api::SearchApi;
use crate::domain::error::{Result, ShellError};
use crate::domain::search::{ImageResult, NewsResult, VideoResult, WebResult};
use crate::domain::{ResultItem, SearchQuery, SearchResponse, Shortcut, Vertical};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Backend client speaking the JSON API under `/api`.
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpSearchApi {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Config`] for an unparsable base URL and
    /// [`ShellError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Creates a client reusing a preconfigured `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Config`] for an unparsable base URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ShellError::Config(format!("invalid api base url {base_url:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        tracing::debug!(base = %base, "search api client created");
        Ok(Self { client, base })
    }

    /// Absolute URL for `path` with `pairs` appended as query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Config`] if `path` cannot be joined onto the base.
    pub fn endpoint(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ShellError::Config(format!("invalid endpoint {path:?}: {e}")))?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// `GET` returning JSON.
    ///
    /// # Errors
    ///
    /// Non-2xx statuses become [`ShellError::Http`]; transport and decoding
    /// failures map to `Network`/`Decode`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, pairs: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path, pairs)?;
        send_json(self.client.get(url)).await
    }

    /// `POST` with a JSON body, returning JSON.
    ///
    /// # Errors
    ///
    /// See [`HttpSearchApi::get`].
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint(path, &[])?;
        send_json(self.client.post(url).json(body)).await
    }

    /// `PUT` with a JSON body, returning JSON.
    ///
    /// # Errors
    ///
    /// See [`HttpSearchApi::get`].
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint(path, &[])?;
        send_json(self.client.put(url).json(body)).await
    }

    /// `DELETE`, returning JSON (an empty body decodes as `null`).
    ///
    /// # Errors
    ///
    /// See [`HttpSearchApi::get`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path, &[])?;
        send_json(self.client.delete(url)).await
    }

    async fn fetch_results(self, vertical: Vertical, query: SearchQuery) -> Result<SearchResponse<ResultItem>> {
        let pairs = query.api_pairs();
        let path = vertical.api_path();

        let response = match vertical {
            Vertical::Web => self
                .get::<SearchResponse<WebResult>>(path, &pairs)
                .await?
                .map_results(ResultItem::Web),
            Vertical::Images => self
                .get::<SearchResponse<ImageResult>>(path, &pairs)
                .await?
                .map_results(ResultItem::Image),
            Vertical::Videos => self
                .get::<SearchResponse<VideoResult>>(path, &pairs)
                .await?
                .map_results(ResultItem::Video),
            Vertical::News => self
                .get::<SearchResponse<NewsResult>>(path, &pairs)
                .await?
                .map_results(ResultItem::News),
        };
        tracing::debug!(
            count = response.results.len(),
            total = response.total_results,
            "search results received"
        );
        Ok(response)
    }
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "backend returned error status");
        return Err(ShellError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&body)?)
}

impl SearchApi for HttpSearchApi {
    fn search(&self, vertical: Vertical, query: &SearchQuery) -> BoxFuture<'static, Result<SearchResponse<ResultItem>>> {
        let span = tracing::debug_span!("search", ?vertical, q = %query.q, page = query.page);
        self.clone()
            .fetch_results(vertical, query.clone())
            .instrument(span)
            .boxed()
    }

    fn suggest(&self, query: &str) -> BoxFuture<'static, Result<Vec<String>>> {
        let api = self.clone();
        let pairs = vec![("q", query.to_string())];
        async move {
            let payload: SuggestPayload = api.get("/api/suggest", &pairs).await?;
            Ok(payload.into_texts())
        }
        .instrument(tracing::debug_span!("suggest_fetch", q = %query))
        .boxed()
    }

    fn trending(&self) -> BoxFuture<'static, Result<Vec<String>>> {
        let api = self.clone();
        async move {
            let payload: SuggestPayload = api.get("/api/suggest/trending", &[]).await?;
            Ok(payload.into_texts())
        }
        .boxed()
    }

    fn shortcuts(&self) -> BoxFuture<'static, Result<Vec<Shortcut>>> {
        let api = self.clone();
        async move { api.get::<Vec<Shortcut>>("/api/bangs", &[]).await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned response and returns the raw request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn api(base: &str) -> HttpSearchApi {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSearchApi::with_client(client, base).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_pairs() {
        let api = api("http://localhost:8080/app");
        let url = api
            .endpoint("/api/suggest", &[("q", "weather Lon".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/api/suggest?q=weather+Lon");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpSearchApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
    }

    #[tokio::test]
    async fn suggest_decodes_plain_array() {
        let (base, server) = serve_once("200 OK", r#"["weather London","weather Long Beach"]"#).await;
        let texts = api(&base).suggest("weather Lon").await.unwrap();
        assert_eq!(texts, vec!["weather London", "weather Long Beach"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/suggest?q=weather+Lon "), "{request}");
    }

    #[tokio::test]
    async fn search_tags_results_by_vertical() {
        let body = r#"{"query":"cats","results":[{"url":"https://i/1.jpg","title":"cat"}],
            "total_results":40,"page":2,"per_page":20,"has_more":true}"#;
        let (base, server) = serve_once("200 OK", body).await;
        let query = SearchQuery::new("cats").with_page(2);
        let resp = api(&base).search(Vertical::Images, &query).await.unwrap();
        assert_eq!(resp.page, 2);
        assert!(matches!(resp.results[0], ResultItem::Image(_)));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/search/images?q=cats&page=2 "), "{request}");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_http_error() {
        let (base, _server) = serve_once("503 Service Unavailable", r#"{"error":"ignored"}"#).await;
        let err = api(&base).shortcuts().await.unwrap_err();
        match err {
            ShellError::Http { status, status_text } => {
                assert_eq!(status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_delete_body_decodes_as_unit() {
        let (base, server) = serve_once("200 OK", "").await;
        let () = api(&base).delete("/api/history/1").await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/history/1 "), "{request}");
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let (base, _server) = serve_once("200 OK", "{oops").await;
        let err = api(&base).trending().await.unwrap_err();
        assert!(matches!(err, ShellError::Decode(_)));
    }
}
