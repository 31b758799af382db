use crate::approved_urls::{is_approved_url, is_brand_domain};
use crate::error::{AnalyzeError, ValidationFailure};
use crate::http_client::build_http_client;
use crate::models::{UrlStatus, UrlValidationResult};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::LOCATION;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Configuration for the URL validator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub timeout: Duration,
    pub concurrent_requests: usize,
    pub requests_per_second: Option<f64>,
    pub show_progress: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrent_requests: DEFAULT_CONCURRENCY,
            requests_per_second: None,
            show_progress: false,
        }
    }
}

pub struct UrlValidator {
    client: reqwest::Client,
    timeout: Duration,
    concurrent_requests: usize,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    show_progress: bool,
}

impl UrlValidator {
    pub fn new() -> Result<Self> {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Result<Self> {
        let rate_limiter = config
            .requests_per_second
            .and_then(|rps| NonZeroU32::new(rps.ceil() as u32))
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            // The deadline below is authoritative; the client timeout only backs it up
            client: build_http_client(config.timeout + Duration::from_secs(1))?,
            timeout: config.timeout,
            concurrent_requests: config.concurrent_requests.max(1),
            rate_limiter,
            show_progress: config.show_progress,
        })
    }

    /// Parses `url` before validating it, rejecting malformed input.
    pub async fn check(&self, url: &str) -> Result<UrlValidationResult, AnalyzeError> {
        Url::parse(url).map_err(|e| AnalyzeError::InvalidUrl(format!("{} ({})", url, e)))?;
        Ok(self.validate_url(url).await)
    }

    pub async fn validate_url(&self, url: &str) -> UrlValidationResult {
        self.validate_url_with_cancel(url, CancellationToken::new())
            .await
    }

    /// Sends a HEAD request and classifies the answer. Never fails: network
    /// errors, the deadline, and `cancel` all resolve to an `invalid` result.
    pub async fn validate_url_with_cancel(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> UrlValidationResult {
        let mut result = UrlValidationResult {
            url: url.to_string(),
            status: UrlStatus::Checking,
            status_code: None,
            redirect_to: None,
            response_time: None,
            error: None,
            is_approved_defang_url: is_approved_url(url),
            is_external: !is_brand_domain(url),
        };

        let start = Instant::now();
        let outcome = self.send_head(url, &cancel).await;
        result.response_time = Some(start.elapsed().as_millis() as u64);

        match outcome {
            Ok(response) => {
                let status = response.status();
                result.status_code = Some(status.as_u16());

                if status.is_success() {
                    result.status = UrlStatus::Valid;
                } else if status.is_redirection() {
                    result.status = UrlStatus::Redirect;
                    result.redirect_to = response
                        .headers()
                        .get(LOCATION)
                        .and_then(|location| location.to_str().ok())
                        .map(str::to_string);
                } else {
                    result.status = UrlStatus::Invalid;
                    result.error = Some(format!("HTTP {}", status.as_u16()));
                }

                tracing::debug!(
                    url = %url,
                    status = status.as_u16(),
                    elapsed_ms = result.response_time,
                    "Validated URL"
                );
            }
            Err(failure) => {
                let message = failure.to_string();
                tracing::warn!(url = %url, error = %message, "URL validation failed");
                result.status = UrlStatus::Invalid;
                result.error = Some(if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message
                });
            }
        }

        result
    }

    async fn send_head(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ValidationFailure> {
        let request_token = cancel.child_token();

        // Dropping the pending send future aborts the underlying connection
        tokio::select! {
            biased;
            _ = request_token.cancelled() => Err(ValidationFailure::Cancelled),
            _ = tokio::time::sleep(self.timeout) => {
                request_token.cancel();
                Err(ValidationFailure::TimedOut(self.timeout))
            }
            response = self.client.head(url).send() => response.map_err(ValidationFailure::from),
        }
    }

    /// Validates a batch of URLs with bounded concurrency, returning results in
    /// input order. Each distinct URL is requested once.
    pub async fn validate_all(&self, urls: &[String]) -> Vec<UrlValidationResult> {
        let mut unique: Vec<&str> = Vec::new();
        for url in urls {
            if !unique.contains(&url.as_str()) {
                unique.push(url);
            }
        }

        let progress_bar = self.show_progress.then(|| {
            let pb = ProgressBar::new(unique.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} Checking links")
                    .expect("Progress bar template should be valid"),
            );
            pb
        });

        let checked: Vec<UrlValidationResult> = stream::iter(&unique)
            .map(|url| {
                let progress_bar = progress_bar.as_ref();
                async move {
                    if let Some(limiter) = &self.rate_limiter {
                        limiter.until_ready().await;
                    }
                    let result = self.validate_url(url).await;
                    if let Some(pb) = progress_bar {
                        pb.inc(1);
                    }
                    result
                }
            })
            .buffered(self.concurrent_requests)
            .collect()
            .await;

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        let by_url: HashMap<String, UrlValidationResult> = checked
            .into_iter()
            .map(|result| (result.url.clone(), result))
            .collect();

        urls.iter()
            .filter_map(|url| by_url.get(url).cloned())
            .collect()
    }
}
