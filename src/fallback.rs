//! Ordered fallback over interchangeable data providers
//!
//! A [`FallbackChain`] tries each [`Provider`] in order, bounding every
//! attempt with a timeout. The first success wins and the remaining providers
//! are never touched. If every provider fails, the chain fails with one error
//! whose message lists each failure as `"<provider>: <reason>"`, where the
//! reason includes every context layer of the provider's error.
//!
//! There is no retry or backoff: each provider gets exactly one attempt.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::time::Duration;

/// One candidate source of a `T`
#[async_trait]
pub trait Provider<T: Send + 'static>: Send + Sync {
    /// Name used in logs and failure messages
    fn name(&self) -> &str;

    /// Timeout for this provider, overriding the chain default
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn attempt(&self) -> Result<T>;
}

/// Value produced by a chain, tagged with the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: String,
}

pub struct FallbackChain<T: Send + 'static> {
    providers: Vec<Box<dyn Provider<T>>>,
    timeout: Duration,
    separator: String,
}

impl<T: Send + 'static> FallbackChain<T> {
    /// Create an empty chain
    ///
    /// # Arguments
    /// * `timeout` - Default per-attempt timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
            separator: "\n".to_string(),
        }
    }

    /// Separator placed between failure messages (default: newline)
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Provider<T> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn Provider<T>>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Attempt providers in order until one succeeds
    ///
    /// # Returns
    /// The first successful value and its provider name, or an error
    /// combining every provider's failure
    pub async fn resolve(&self) -> Result<Resolved<T>> {
        if self.providers.is_empty() {
            bail!("No providers configured");
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let limit = provider.timeout().unwrap_or(self.timeout);
            match tokio::time::timeout(limit, provider.attempt()).await {
                Ok(Ok(value)) => {
                    tracing::debug!(provider = provider.name(), "provider succeeded");
                    return Ok(Resolved {
                        value,
                        source: provider.name().to_string(),
                    });
                }
                Ok(Err(e)) => {
                    let reason = format!("{:#}", e);
                    tracing::warn!(provider = provider.name(), error = %reason, "provider failed");
                    failures.push(format!("{}: {}", provider.name(), reason));
                }
                Err(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        timeout_ms = limit.as_millis() as u64,
                        "provider timed out"
                    );
                    failures.push(format!(
                        "{}: timed out after {} ms",
                        provider.name(),
                        limit.as_millis()
                    ));
                }
            }
        }

        Err(anyhow!(failures.join(&self.separator)))
    }
}
