use std::fmt;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use colored::Colorize;
use futures::{stream, StreamExt};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::ResolveError,
    system_conf::read_system_conf,
    TokioAsyncResolver,
};

use crate::modules::provider_fingerprints::match_fingerprint;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Error building resolver: {0}")]
    ResolverSetup(#[source] ResolveError),
    #[error("Error building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Error resolving subdomain: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Error resolving subdomain: lookup timed out after {0:?}")]
    ResolveTimeout(Duration),
    #[error("Error resolving subdomain: no addresses found for {0}")]
    NoAddress(String),
    #[error("Error sending request: {0}")]
    Request(#[from] reqwest::Error),
}

impl ScanError {
    pub fn is_resolve(&self) -> bool {
        matches!(
            self,
            ScanError::Resolve(_) | ScanError::ResolveTimeout(_) | ScanError::NoAddress(_)
        )
    }
}

/// Outcome of a completed scan. `provider` is set when the body matched a fingerprint.
#[derive(Debug)]
pub struct TakeoverReport {
    pub subdomain: String,
    pub address: IpAddr,
    pub provider: Option<&'static str>,
}

impl TakeoverReport {
    pub fn is_takeover(&self) -> bool {
        self.provider.is_some()
    }
}

impl fmt::Display for TakeoverReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider {
            Some(provider) => write!(
                f,
                "{} {} by {} at IP {}",
                "Subdomain takeover detected:".red(),
                self.subdomain,
                provider,
                self.address
            ),
            None => write!(
                f,
                "{} {} at IP {}",
                "No takeover detected:".green(),
                self.subdomain,
                self.address
            ),
        }
    }
}

/// The stdout line for one scan: the colored verdict, or the uncolored error.
pub fn report_line(outcome: &Result<TakeoverReport, ScanError>) -> String {
    match outcome {
        Ok(report) => report.to_string(),
        Err(err) => err.to_string(),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub takeovers: usize,
    pub failures: usize,
}

pub struct ScanSubdomainTakeover {
    resolver: TokioAsyncResolver,
    web_requester: Client,
    dns_timeout: Duration,
    http_port: u16,
    scan_concurrency: Option<usize>,
}

impl ScanSubdomainTakeover {
    pub fn build(
        dns_timeout: Duration,
        http_timeout: Duration,
        scan_concurrency: Option<usize>) -> Result<Self, ScanError>
    {
        // Fall back to the default upstream servers when there is no resolv.conf.
        let (resolver_config, mut resolver_opts) = read_system_conf()
            .unwrap_or_else(|_| (ResolverConfig::default(), ResolverOpts::default()));
        resolver_opts.timeout = dns_timeout;
        let resolver = TokioAsyncResolver::tokio(resolver_config, resolver_opts)
            .map_err(ScanError::ResolverSetup)?;

        let web_requester = Client::builder()
            .timeout(http_timeout)
            .no_proxy()
            .build()
            .map_err(ScanError::Client)?;

        Ok(Self {
            resolver,
            web_requester,
            dns_timeout,
            http_port: 80,
            scan_concurrency,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_http_port(mut self, http_port: u16) -> Self {
        self.http_port = http_port;
        self
    }

    pub async fn resolve_subdomain(&self, subdomain: &str) -> Result<IpAddr, ScanError> {
        let lookup = tokio::time::timeout(self.dns_timeout, self.resolver.lookup_ip(subdomain))
            .await
            .map_err(|_| ScanError::ResolveTimeout(self.dns_timeout))??;

        lookup
            .iter()
            .next()
            .ok_or_else(|| ScanError::NoAddress(subdomain.to_string()))
    }

    /// Fetches `http://<subdomain>/` and returns the raw body. Error statuses are not failures.
    pub async fn send_request(&self, subdomain: &str) -> Result<Vec<u8>, ScanError> {
        let url = if self.http_port == 80 {
            format!("http://{}/", subdomain)
        } else {
            format!("http://{}:{}/", subdomain, self.http_port)
        };

        let mut response = self.web_requester.get(&url).send().await?;
        let status = response.status();

        // A body cut short (timeout, dropped connection) is still matched as far as it got.
        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(err) => {
                    debug!(%url, error = %err, body_len = body.len(), "body read cut short");
                    break;
                }
            }
        }
        debug!(%url, %status, body_len = body.len(), "fetched");

        Ok(body)
    }

    pub async fn scan_subdomain(&self, subdomain: &str) -> Result<TakeoverReport, ScanError> {
        let address = self.resolve_subdomain(subdomain).await?;
        debug!(subdomain, %address, "resolved");

        let body = self.send_request(subdomain).await?;

        Ok(TakeoverReport {
            subdomain: subdomain.to_string(),
            address,
            provider: match_fingerprint(&body),
        })
    }

    /// Scans every subdomain, printing one line per result, and returns once all scans finished.
    pub async fn scan_subdomains(&self, subdomains: Vec<String>) -> ScanSummary {
        let scanned = AtomicUsize::new(0);
        let takeovers = AtomicUsize::new(0);
        let failures = AtomicUsize::new(0);

        stream::iter(subdomains)
            .for_each_concurrent(self.scan_concurrency, |subdomain| {
                let scanned = &scanned;
                let takeovers = &takeovers;
                let failures = &failures;
                async move {
                    let outcome = self.scan_subdomain(&subdomain).await;
                    match &outcome {
                        Ok(report) if report.is_takeover() => {
                            takeovers.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(_) => {}
                        Err(err) => {
                            let stage = if err.is_resolve() { "resolve" } else { "fetch" };
                            warn!(%subdomain, stage, error = %err, "scan abandoned");
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    println!("{}", report_line(&outcome));
                    scanned.fetch_add(1, Ordering::Relaxed);
                }
            }).await;

        ScanSummary {
            scanned: scanned.into_inner(),
            takeovers: takeovers.into_inner(),
            failures: failures.into_inner(),
        }
    }
}
