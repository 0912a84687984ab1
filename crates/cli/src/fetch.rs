// ABOUTME: Blocking page fetcher used by the CLI to feed HTML into the preview core.
// ABOUTME: Optionally routes requests through a CORS proxy prefix; non-2xx statuses are failures.

use std::time::Duration;

use thiserror::Error;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Fetches page HTML over HTTP.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::blocking::Client,
    proxy: Option<String>,
}

impl PageFetcher {
    pub fn new(proxy: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkcard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, proxy })
    }

    /// URL actually requested for `url`: `{proxy}/{url}` when a proxy is set.
    pub fn request_url(&self, url: &str) -> String {
        match self.proxy.as_deref() {
            Some(proxy) => {
                let proxy = proxy.strip_suffix('/').unwrap_or(proxy);
                format!("{}/{}", proxy, url)
            }
            None => url.to_string(),
        }
    }

    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = self.request_url(url);
        let request_err = |source: reqwest::Error| FetchError::Request {
            url: target.clone(),
            source,
        };

        let response = self.client.get(&target).send().map_err(request_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: target,
                status: status.as_u16(),
            });
        }
        response.text().map_err(request_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(proxy: Option<&str>) -> PageFetcher {
        PageFetcher::new(proxy.map(str::to_string), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn direct_request_url() {
        assert_eq!(
            fetcher(None).request_url("https://example.com/a"),
            "https://example.com/a"
        );
    }

    #[test]
    fn proxy_prefix_drops_one_trailing_slash() {
        assert_eq!(
            fetcher(Some("https://proxy.test/")).request_url("https://example.com"),
            "https://proxy.test/https://example.com"
        );
        assert_eq!(
            fetcher(Some("https://proxy.test")).request_url("https://example.com"),
            "https://proxy.test/https://example.com"
        );
    }
}
