//! HTTP connection to a single backend node.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::schema::{EndpointConfig, HttpConfig};
use crate::connection::{Connection, ConnectionError, PoolError, PoolResult};

/// One backend node reachable over HTTP.
///
/// Thin client around a base URL: builds request URLs, enforces the request
/// timeout, and translates transport failures into [`ConnectionError`] so the
/// dispatcher can tell "node unreachable" from "node answered with an error".
#[derive(Clone, Debug)]
pub struct HttpConnection {
    /// Endpoint identifier for logging.
    name: String,
    /// Base URL all relative paths resolve against.
    base_url: Url,
    client: Client<HttpConnector, Full<Bytes>>,
    request_timeout: Duration,
    post_content_type: String,
}

impl HttpConnection {
    /// Create a connection for one base URL.
    pub fn new(name: impl Into<String>, base_url: Url, http: &HttpConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            name: name.into(),
            base_url,
            client,
            request_timeout: Duration::from_millis(http.request_timeout_ms),
            post_content_type: http.post_content_type.clone(),
        }
    }

    /// Create a connection from a configured endpoint.
    pub fn from_endpoint(endpoint: &EndpointConfig, http: &HttpConfig) -> PoolResult<Self> {
        let base_url = Url::parse(&endpoint.url).map_err(|e| {
            PoolError::InvalidRequest(format!("endpoint '{}': {}", endpoint.name, e))
        })?;
        Ok(Self::new(endpoint.name.clone(), base_url, http))
    }

    /// Endpoint identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a relative path and ordered query parameters against the base URL.
    fn build_uri(&self, path: &str, query_params: &[(String, String)]) -> PoolResult<Uri> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)
            .map_err(|e| PoolError::InvalidRequest(format!("bad path '{}': {}", path, e)))?;

        if !query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query_params {
                pairs.append_pair(key, value);
            }
        }

        url.as_str()
            .parse::<Uri>()
            .map_err(|e| PoolError::InvalidRequest(format!("bad uri '{}': {}", url, e)))
    }

    /// Issue a request and collect the response body.
    async fn execute(&self, request: Request<Full<Bytes>>) -> PoolResult<String> {
        let timeout_ms = self.request_timeout.as_millis() as u64;
        let response_future = self.client.request(request);

        let response = match tokio::time::timeout(self.request_timeout, response_future).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(node = %self.name, error = %e, "transport failure");
                return Err(ConnectionError::Transport(e.to_string()).into());
            }
            Err(_) => {
                tracing::debug!(node = %self.name, timeout_ms, "request timed out");
                return Err(ConnectionError::Timeout(timeout_ms).into());
            }
        };

        let status = response.status();
        let collected = match tokio::time::timeout(self.request_timeout, response.into_body().collect()).await {
            Ok(Ok(collected)) => collected,
            // A body cut off mid-transfer is a transport failure, not a node response.
            Ok(Err(e)) => return Err(ConnectionError::Transport(e.to_string()).into()),
            Err(_) => return Err(ConnectionError::Timeout(timeout_ms).into()),
        };
        let body = String::from_utf8_lossy(&collected.to_bytes()).into_owned();

        if status.is_success() {
            Ok(body)
        } else {
            Err(PoolError::NodeResponse {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn request(
        &self,
        method: Method,
        uri: Uri,
        content_type: Option<&str>,
        body: Bytes,
    ) -> PoolResult<Request<Full<Bytes>>> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder
            .body(Full::new(body))
            .map_err(|e| PoolError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn post(&self, path: &str, body: &str) -> PoolResult<String> {
        let uri = self.build_uri(path, &[])?;
        let request = self.request(
            Method::POST,
            uri,
            Some(&self.post_content_type),
            Bytes::from(body.to_owned()),
        )?;
        self.execute(request).await
    }

    async fn post_stream(
        &self,
        path: &str,
        content_type: &str,
        content: Bytes,
        query_params: &[(String, String)],
    ) -> PoolResult<String> {
        let uri = self.build_uri(path, query_params)?;
        let request = self.request(Method::POST, uri, Some(content_type), content)?;
        self.execute(request).await
    }

    async fn get(&self, path: &str, query_params: &[(String, String)]) -> PoolResult<String> {
        let uri = self.build_uri(path, query_params)?;
        let request = self.request(Method::GET, uri, None, Bytes::new())?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(base: &str) -> HttpConnection {
        HttpConnection::new("test", Url::parse(base).unwrap(), &HttpConfig::default())
    }

    #[test]
    fn joins_paths_against_base() {
        let conn = connection("http://127.0.0.1:8983/search/");
        let uri = conn.build_uri("/select", &[]).unwrap();
        assert_eq!(uri.to_string(), "http://127.0.0.1:8983/search/select");
    }

    #[test]
    fn preserves_query_parameter_order() {
        let conn = connection("http://127.0.0.1:8983/search");
        let params = vec![
            ("q".to_string(), "title:rust".to_string()),
            ("rows".to_string(), "10".to_string()),
            ("wt".to_string(), "json".to_string()),
        ];
        let uri = conn.build_uri("select", &params).unwrap();
        assert_eq!(
            uri.query().unwrap(),
            "q=title%3Arust&rows=10&wt=json"
        );
    }

    #[test]
    fn rejects_unparsable_endpoint() {
        let endpoint = EndpointConfig {
            name: "bad".to_string(),
            url: "not a url".to_string(),
        };
        let err = HttpConnection::from_endpoint(&endpoint, &HttpConfig::default()).unwrap_err();
        assert!(matches!(err, PoolError::InvalidRequest(_)));
    }
}
