use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware.
    ///
    /// Transient failures (connect errors, 5xx, 429) are retried up to 3 times
    /// with exponential backoff; everything else surfaces immediately.
    pub fn create_client() -> ClientWithMiddleware {
        Self::create_client_with_timeout(Duration::from_secs(30))
    }

    pub fn create_client_with_timeout(timeout: Duration) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        let client = Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Builds `base_url?k=v&...` with proper percent-encoding.
///
/// reqwest-middleware's builder has no `.query()`, so the URL is assembled
/// up front.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> anyhow::Result<Url>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let pairs = params.iter().map(|(k, v)| (k.as_ref(), v.as_ref()));
    Ok(Url::parse_with_params(base_url, pairs)?)
}

/// URL with the `api_key` parameter masked, safe to log.
pub fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "api_key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_query() {
        let url = build_url_with_query(
            "https://serpapi.com/search",
            &[("q", "gold chain for men"), ("gl", "in")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://serpapi.com/search?q=gold+chain+for+men&gl=in"
        );
    }

    #[test]
    fn test_build_url_keeps_existing_query() {
        let url = build_url_with_query("https://prices.example/h?v=2", &[("days", "7")]).unwrap();
        assert_eq!(url.as_str(), "https://prices.example/h?v=2&days=7");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        assert!(build_url_with_query("not a url", &[("a", "b")]).is_err());
    }

    #[test]
    fn test_redact_api_key() {
        let url = build_url_with_query(
            "https://serpapi.com/search",
            &[("q", "chain"), ("api_key", "s3cr3t")],
        )
        .unwrap();
        let shown = redact_api_key(&url);
        assert!(!shown.contains("s3cr3t"));
        assert!(shown.contains("api_key=***") || shown.contains("api_key=%2A%2A%2A"));
    }
}
