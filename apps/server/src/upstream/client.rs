//! Sierra REST API client

use jmrl_marc::{BibRecord, SearchPage};
use jmrl_query::TranslatedQuery;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::metrics;
use crate::upstream::token::TokenCache;

/// Results requested per upstream page.
pub const PAGE_SIZE: usize = 20;

/// Bib fields requested for both search hits and single records.
pub const BIB_FIELDS: &str = "default,varFields,locations,available";

/// Health of the upstream API as reported by `/healthcheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamHealth {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct SierraClient {
    http: reqwest::Client,
    api_url: String,
    tokens: Arc<TokenCache>,
}

impl SierraClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .tcp_keepalive(Duration::from_secs(config.keepalive_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {e}")))?;

        let api_url = config.api_url.trim_end_matches('/').to_string();
        let tokens = Arc::new(TokenCache::new(
            http.clone(),
            format!("{api_url}/token"),
            &config.api_key,
            &config.api_secret,
        ));

        Ok(Self {
            http,
            api_url,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn search_url(&self, query: &TranslatedQuery, offset: usize) -> String {
        format!(
            "{}/bibs/search?text={}&offset={offset}&limit={PAGE_SIZE}&fields={BIB_FIELDS}",
            self.api_url,
            query.encoded()
        )
    }

    pub fn bib_url(&self, id: &str) -> String {
        format!(
            "{}/bibs/{}?fields={BIB_FIELDS}",
            self.api_url,
            urlencoding::encode(id)
        )
    }

    /// `{api}/about`, taken one path segment above the versioned API root.
    pub fn about_url(&self) -> String {
        let base = match self.api_url.rfind('/') {
            Some(idx) => &self.api_url[..idx],
            None => self.api_url.as_str(),
        };
        format!("{base}/about")
    }

    pub async fn search(&self, query: &TranslatedQuery, offset: usize) -> Result<SearchPage> {
        let body = self.get("search", &self.search_url(query, offset)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn bib(&self, id: &str) -> Result<BibRecord> {
        let body = self.get("bib", &self.bib_url(id)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Authenticated GET. Non-200 responses become errors carrying the
    /// upstream status and body. A 401 from Sierra discards the cached
    /// token, so the following call fetches a fresh one.
    pub async fn get(&self, endpoint: &'static str, url: &str) -> Result<Vec<u8>> {
        let token = self.tokens.bearer().await?;

        tracing::info!(url = %url, "Sierra API GET request");
        let start = Instant::now();
        let result = self
            .http
            .get(url)
            .header("deleted", "false")
            .header("suppressed", "false")
            .bearer_auth(token)
            .send()
            .await;
        let result = read_response(url, result).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(body) => {
                metrics::record_upstream(endpoint, 200, elapsed.as_secs_f64());
                tracing::info!(
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    bytes = body.len(),
                    "Successful response from Sierra API"
                );
            }
            Err(err) => {
                let status = err.status().as_u16();
                metrics::record_upstream(endpoint, status, elapsed.as_secs_f64());
                if status == 401 {
                    self.tokens.invalidate().await;
                }
                tracing::error!(
                    url = %url,
                    status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "Failed response from Sierra API"
                );
            }
        }
        result
    }

    /// Unauthenticated check of the API's about endpoint.
    pub async fn ping(&self) -> UpstreamHealth {
        let url = self.about_url();
        let start = Instant::now();
        let result = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await;
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                metrics::record_upstream("about", 200, elapsed);
                UpstreamHealth {
                    healthy: true,
                    message: None,
                }
            }
            Ok(resp) => {
                metrics::record_upstream("about", resp.status().as_u16(), elapsed);
                UpstreamHealth {
                    healthy: false,
                    message: Some(resp.status().to_string()),
                }
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "Sierra health check failed");
                UpstreamHealth {
                    healthy: false,
                    message: Some(err.to_string()),
                }
            }
        }
    }
}

/// Turn a send result into the body bytes or a classified error.
pub(crate) async fn read_response(
    url: &str,
    result: reqwest::Result<reqwest::Response>,
) -> Result<Vec<u8>> {
    let resp = result.map_err(|err| classify_transport_error(url, &err))?;
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        let message = resp.text().await.unwrap_or_default();
        return Err(Error::upstream(status.as_u16(), message));
    }
    resp.bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|err| classify_transport_error(url, &err))
}

pub(crate) fn classify_transport_error(url: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::upstream(408, format!("{url} timed out"))
    } else if is_connection_refused(err) {
        Error::upstream(503, format!("{url} refused connection"))
    } else {
        Error::upstream(400, err.to_string())
    }
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        if current.to_string().contains("refused") {
            return true;
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmrl_query::Translation;

    fn client(api_url: &str) -> SierraClient {
        SierraClient::new(&UpstreamConfig {
            api_url: api_url.to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn search_url_carries_paging_and_fields() {
        let Translation::Upstream(query) = jmrl_query::translate("title: {Moby Dick}").unwrap()
        else {
            panic!("expected upstream query");
        };
        let url = client("https://sierra.example.org/iii/sierra-api/v5/").search_url(&query, 40);
        assert_eq!(
            url,
            "https://sierra.example.org/iii/sierra-api/v5/bibs/search?text=t%3A%28Moby%20Dick%29\
             &offset=40&limit=20&fields=default,varFields,locations,available"
        );
    }

    #[test]
    fn bib_and_about_urls() {
        let client = client("https://sierra.example.org/iii/sierra-api/v5");
        assert_eq!(
            client.bib_url("1234567"),
            "https://sierra.example.org/iii/sierra-api/v5/bibs/1234567?fields=default,varFields,locations,available"
        );
        assert_eq!(
            client.about_url(),
            "https://sierra.example.org/iii/sierra-api/about"
        );
    }

    #[tokio::test]
    async fn refused_connections_map_to_503() {
        // Bind then drop a listener so the port is closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/v5/bibs/1");
        let result = reqwest::Client::new().get(&url).send().await;
        let err = read_response(&url, result).await.unwrap_err();
        assert_eq!(err.status().as_u16(), 503);
        assert_eq!(err.to_string(), format!("{url} refused connection"));
    }
}
