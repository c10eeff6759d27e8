//! HTTP feed: GET and POST the dataset held by a chartboard data server.

use std::time::Duration;

use chartboard_core::ingest;
use chartboard_core::{CanonicalRecord, RawRecord};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::{Feed, FeedError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads and writes the dataset at one `http://` endpoint.
#[derive(Clone)]
pub struct HttpFeed {
    endpoint: Uri,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl std::fmt::Debug for HttpFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFeed")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpFeed {
    /// Build a feed for `endpoint`. Only plain `http://` URLs are accepted.
    pub fn new(endpoint: &str) -> Result<Self, FeedError> {
        let invalid = |reason: String| FeedError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let uri = endpoint.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(invalid(format!("unsupported scheme {other}"))),
            None => return Err(invalid("missing scheme (expected http://)".to_string())),
        }
        if uri.host().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { endpoint: uri, client })
    }

    pub fn endpoint(&self) -> String {
        self.endpoint.to_string()
    }

    /// POST `records` to the endpoint as a JSON array, replacing the stored
    /// dataset.
    pub async fn publish(&self, records: &[CanonicalRecord]) -> Result<(), FeedError> {
        let body = serde_json::to_vec(records)?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        self.send(req).await?;
        tracing::info!(endpoint = %self.endpoint, count = records.len(), "dataset published");
        Ok(())
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Bytes, FeedError> {
        let endpoint = self.endpoint();
        let method = req.method().clone();
        tracing::debug!(%method, %endpoint, "http feed request");

        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.client.request(req))
            .await
            .map_err(|_| FeedError::Timeout { endpoint: endpoint.clone() })?
            .map_err(|source| FeedError::Transport { endpoint: endpoint.clone(), source })?;

        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            tracing::warn!(%method, %endpoint, status = status.as_u16(), "http feed rejected");
            return Err(FeedError::Status {
                endpoint,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body)
    }
}

impl Feed for HttpFeed {
    fn describe(&self) -> String {
        self.endpoint()
    }

    async fn load(&self) -> Result<Vec<RawRecord>, FeedError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))?;

        let body = self.send(req).await?;
        let text = std::str::from_utf8(&body).map_err(ingest::IngestError::from)?;
        let records = ingest::parse_json(text)?;
        tracing::debug!(endpoint = %self.endpoint, count = records.len(), "dataset fetched");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_endpoint() {
        let feed = HttpFeed::new("http://127.0.0.1:3000/data").unwrap();
        assert_eq!(feed.endpoint(), "http://127.0.0.1:3000/data");
        assert_eq!(feed.describe(), "http://127.0.0.1:3000/data");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            HttpFeed::new("https://example.com/data"),
            Err(FeedError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            HttpFeed::new("/data"),
            Err(FeedError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            HttpFeed::new("not a url"),
            Err(FeedError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let feed = HttpFeed::new("http://127.0.0.1:9/data").unwrap();
        assert!(matches!(
            feed.load().await,
            Err(FeedError::Transport { .. })
        ));
    }
}
