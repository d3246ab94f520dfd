use std::time::Duration;

use acdb_core::AreaCode;
use async_trait::async_trait;
use reqwest::Client;

use crate::body::extract_body;
use crate::error::FetchError;
use crate::fetcher::PageFetcher;
use crate::rate_limit::retry_with_backoff;

const CODE_PLACEHOLDER: &str = "{code}";

/// HTTP client for the numbering-plan lookup tool.
///
/// Each area code is resolved by substituting it into a URL template and
/// issuing a `GET`. The page is narrowed to its `<body>` element before it is
/// returned.
///
/// Transient errors (429, 5xx, network failures) are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct NanpaClient {
    client: Client,
    url_template: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl NanpaClient {
    /// Creates a `NanpaClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `url_template` must contain a `{code}` placeholder and produce an absolute
    /// `http(s)` URL once substituted.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the template is unusable, or
    /// [`FetchError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        url_template: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FetchError> {
        if !url_template.contains(CODE_PLACEHOLDER) {
            return Err(FetchError::InvalidUrl {
                url: url_template.to_owned(),
                reason: format!("missing {CODE_PLACEHOLDER} placeholder"),
            });
        }
        // Validate the shape once with a sample code so per-request failures
        // can only come from the network.
        Self::render_url(url_template, "200")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`NanpaClient::new`].
    pub fn from_config(config: &acdb_core::AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.lookup_url_template,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// The lookup URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the rendered URL does not parse.
    pub fn lookup_url(&self, code: AreaCode) -> Result<String, FetchError> {
        Self::render_url(&self.url_template, &code.to_string())
    }

    pub(crate) fn render_url(template: &str, code: &str) -> Result<String, FetchError> {
        let rendered = template.replace(CODE_PLACEHOLDER, code);
        let parsed = reqwest::Url::parse(&rendered).map_err(|e| FetchError::InvalidUrl {
            url: rendered.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: rendered,
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(rendered)
    }

    /// Fetches the raw lookup page for `code` with retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`FetchError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`FetchError::NotFound`]: HTTP 404 (not retried).
    /// - [`FetchError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`FetchError::Http`]: network or TLS failure after all retries exhausted.
    pub async fn fetch_page(&self, code: AreaCode) -> Result<String, FetchError> {
        let url = self.lookup_url(code)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(FetchError::RateLimited {
                        code: code.to_string(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(FetchError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(FetchError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

#[async_trait]
impl PageFetcher for NanpaClient {
    async fn fetch(&self, code: AreaCode) -> Result<String, FetchError> {
        let page = self.fetch_page(code).await?;
        let body = extract_body(&page);
        if body.is_empty() {
            return Err(FetchError::EmptyPage {
                code: code.to_string(),
            });
        }
        tracing::debug!(code = %code, bytes = body.len(), "fetched lookup page");
        Ok(body.to_owned())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
