//! Periodic ping service.
//!
//! This module provides the keep-alive primitive: a [`Pinger`] probes its
//! registered HTTP(S) endpoints on a fixed interval, classifies outcomes,
//! retries transport-level failures a bounded number of times, and
//! best-effort forwards successful results to a remote metrics sink.

mod config;
mod error;
mod result;
mod stats;


pub use config::*;
pub use error::*;
pub use result::*;
pub use stats::*;

use crate::reporter::Reporter;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Callback invoked with `(endpoint, response_time_ms)` when a probe
/// classifies as up.
pub type SuccessCallback = Box<dyn Fn(&str, u64) + Send + Sync>;

/// Callback invoked with `(error, endpoint)` when a probe fails or
/// classifies as down.
pub type ErrorCallback = Box<dyn Fn(&PingError, &str) + Send + Sync>;

/// Handle for the running interval task.
struct Runner {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Background service that keeps registered endpoints awake.
///
/// `Pinger` is a cheaply cloneable handle; clones share one service. Create
/// it with a [`PingerConfig`], register endpoints, then `start()`:
///
/// ```no_run
/// use pingkeeper::pinger::{Pinger, PingerConfig};
///
/// # async fn example() {
/// let pinger = Pinger::new(PingerConfig::default());
/// pinger.register("https://my-api.example.com/health");
/// pinger.start();
/// # }
/// ```
#[derive(Clone)]
pub struct Pinger {
    inner: Arc<PingerInner>,
}

struct PingerInner {
    /// HTTP client with connection pooling
    client: reqwest::Client,
    /// Probe configuration captured at construction
    config: PingerConfig,
    /// Current interval; mutable via `set_interval`
    interval_ms: AtomicU64,
    /// Registered endpoint URLs (set semantics)
    endpoints: RwLock<BTreeSet<String>>,
    /// Most recent result per endpoint
    last_results: RwLock<BTreeMap<String, PingResult>>,
    /// Start time of the most recent ping cycle
    last_cycle_at: RwLock<Option<DateTime<Utc>>>,
    /// Rolling per-endpoint counters
    stats: DashMap<String, EndpointStats>,
    /// Optional sink for successful probe results
    reporter: Option<Reporter>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    /// Interval task handle while active
    runner: Mutex<Option<Runner>>,
}

impl Pinger {
    /// Create a new pinger with a default HTTP client.
    pub fn new(config: PingerConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pingkeeper/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(config, client)
    }

    /// Create a pinger with a custom HTTP client (for testing).
    pub fn with_client(config: PingerConfig, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(PingerInner {
                client,
                interval_ms: AtomicU64::new(config.interval_ms),
                config,
                endpoints: RwLock::new(BTreeSet::new()),
                last_results: RwLock::new(BTreeMap::new()),
                last_cycle_at: RwLock::new(None),
                stats: DashMap::new(),
                reporter: None,
                on_success: None,
                on_error: None,
                runner: Mutex::new(None),
            }),
        }
    }

    /// Attach a reporter; successful probes are forwarded to it.
    ///
    /// Must be called before the handle is cloned or started.
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.inner_mut().reporter = Some(reporter);
        self
    }

    /// Set the callback invoked when a probe classifies as up.
    ///
    /// Must be called before the handle is cloned or started.
    pub fn with_on_success(mut self, f: impl Fn(&str, u64) + Send + Sync + 'static) -> Self {
        self.inner_mut().on_success = Some(Box::new(f));
        self
    }

    /// Set the callback invoked when a probe fails or classifies as down.
    ///
    /// Must be called before the handle is cloned or started.
    pub fn with_on_error(mut self, f: impl Fn(&PingError, &str) + Send + Sync + 'static) -> Self {
        self.inner_mut().on_error = Some(Box::new(f));
        self
    }

    fn inner_mut(&mut self) -> &mut PingerInner {
        Arc::get_mut(&mut self.inner).expect("builder methods require an unshared pinger")
    }

    /// Register one endpoint. Registering the same URL twice has no
    /// additional effect.
    pub fn register(&self, endpoint: impl Into<String>) {
        let mut endpoints = self
            .inner
            .endpoints
            .write()
            .expect("endpoints lock poisoned");
        endpoints.insert(endpoint.into());

        metrics::gauge!("pingkeeper_endpoints_registered").set(endpoints.len() as f64);
        tracing::debug!(endpoints = ?endpoints, "registered endpoints");
    }

    /// Register several endpoints at once.
    pub fn register_many<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut endpoints = self
            .inner
            .endpoints
            .write()
            .expect("endpoints lock poisoned");
        for url in urls {
            endpoints.insert(url.into());
        }

        metrics::gauge!("pingkeeper_endpoints_registered").set(endpoints.len() as f64);
        tracing::debug!(endpoints = ?endpoints, "registered endpoints");
    }

    /// Remove an endpoint from the active set. No-op if not present.
    pub fn unregister(&self, endpoint: &str) {
        let mut endpoints = self
            .inner
            .endpoints
            .write()
            .expect("endpoints lock poisoned");
        endpoints.remove(endpoint);

        metrics::gauge!("pingkeeper_endpoints_registered").set(endpoints.len() as f64);
        tracing::debug!(endpoints = ?endpoints, "remaining endpoints");
    }

    /// Remove several endpoints at once.
    pub fn unregister_many<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut endpoints = self
            .inner
            .endpoints
            .write()
            .expect("endpoints lock poisoned");
        for url in urls {
            endpoints.remove(url.as_ref());
        }

        metrics::gauge!("pingkeeper_endpoints_registered").set(endpoints.len() as f64);
        tracing::debug!(endpoints = ?endpoints, "remaining endpoints");
    }

    /// Register endpoints from `PINGKEEPER_ENDPOINT_*` environment
    /// variables. Returns how many were found.
    pub fn register_from_env(&self) -> usize {
        self.register_from_env_prefix("PINGKEEPER_ENDPOINT_")
    }

    /// Register endpoints from environment variables with a custom prefix.
    pub fn register_from_env_prefix(&self, prefix: &str) -> usize {
        let urls: Vec<String> = std::env::vars()
            .filter(|(key, value)| key.starts_with(prefix) && !value.is_empty())
            .map(|(_, value)| value)
            .collect();

        let count = urls.len();
        if count > 0 {
            self.register_many(urls);
            tracing::info!(count, "registered endpoints from environment");
        } else {
            tracing::debug!(prefix, "no endpoints found in environment");
        }

        count
    }

    /// Number of registered endpoints.
    pub fn endpoint_count(&self) -> usize {
        self.inner
            .endpoints
            .read()
            .expect("endpoints lock poisoned")
            .len()
    }

    /// Current interval between ping cycles.
    pub fn interval_ms(&self) -> u64 {
        self.inner.interval_ms.load(Ordering::SeqCst)
    }

    /// Whether the interval task is currently scheduled.
    pub fn is_active(&self) -> bool {
        self.inner
            .runner
            .lock()
            .expect("runner lock poisoned")
            .is_some()
    }

    /// Start the ping service.
    ///
    /// Probes all registered endpoints immediately, then repeats every
    /// interval. Calling `start` while already active is a no-op, as is
    /// starting with no registered endpoints.
    pub fn start(&self) {
        let mut runner = self.inner.runner.lock().expect("runner lock poisoned");
        if runner.is_some() {
            tracing::debug!("ping service is already running");
            return;
        }
        if self.endpoint_count() == 0 {
            tracing::warn!("no endpoints registered, not starting ping service");
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let pinger = self.clone();
        let interval_ms = self.interval_ms();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(interval_ms, "ping service started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("ping service shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        pinger.run_cycle().await;
                    }
                }
            }
        });

        *runner = Some(Runner { cancel, handle });
    }

    /// Stop the ping service. Idempotent.
    ///
    /// No further cycle is scheduled; probes already in flight complete and
    /// still record their results. Returns the interval task handle so a
    /// shutdown path can await the drain.
    pub fn stop(&self) -> Option<JoinHandle<()>> {
        let mut runner = self.inner.runner.lock().expect("runner lock poisoned");
        runner.take().map(|r| {
            r.cancel.cancel();
            tracing::info!("stopped ping service");
            r.handle
        })
    }

    /// Change the interval between ping cycles.
    ///
    /// If the service is active it is stopped and restarted so the new
    /// interval takes effect at once; the restart fires a fresh immediate
    /// cycle.
    pub fn set_interval(&self, interval_ms: u64) {
        self.inner.interval_ms.store(interval_ms, Ordering::SeqCst);
        if self.is_active() {
            self.stop();
            self.start();
        }
        tracing::debug!(interval_ms, "updated ping interval");
    }

    /// One tick's work, isolated in its own task so a panic inside a cycle
    /// cannot kill the interval loop.
    async fn run_cycle(&self) {
        let pinger = self.clone();
        let cycle = tokio::spawn(async move {
            let results = pinger.probe_all().await;
            tracing::debug!(endpoints_checked = results.len(), "ping cycle completed");
        });

        match self.inner.config.overlap {
            OverlapPolicy::Skip => {
                // Awaiting keeps at most one cycle in flight; a slow cycle
                // makes the interval skip its missed ticks.
                if let Err(e) = cycle.await {
                    if e.is_panic() {
                        tracing::error!(error = %e, "ping cycle panicked");
                    }
                }
            }
            OverlapPolicy::Overlap => {
                // Detached: cycles may overlap, last write wins.
            }
        }
    }

    /// Probe all registered endpoints concurrently.
    ///
    /// Waits for every probe to complete, then replaces the whole
    /// `last_results` map in a single write; readers never observe a
    /// half-updated cycle.
    pub async fn probe_all(&self) -> BTreeMap<String, PingResult> {
        let endpoints: Vec<String> = self
            .inner
            .endpoints
            .read()
            .expect("endpoints lock poisoned")
            .iter()
            .cloned()
            .collect();

        *self
            .inner
            .last_cycle_at
            .write()
            .expect("last_cycle_at lock poisoned") = Some(Utc::now());

        let probes = endpoints.into_iter().map(|url| async move {
            let result = self.probe_endpoint(&url).await;
            (url, result)
        });

        let results: BTreeMap<String, PingResult> = futures::future::join_all(probes)
            .await
            .into_iter()
            .collect();

        *self
            .inner
            .last_results
            .write()
            .expect("last_results lock poisoned") = results.clone();

        results
    }

    /// Probe a single endpoint once, independent of the timer.
    pub async fn probe_once(&self, endpoint: &str) -> PingResult {
        let result = self.probe_endpoint(endpoint).await;
        self.inner
            .last_results
            .write()
            .expect("last_results lock poisoned")
            .insert(endpoint.to_string(), result.clone());
        result
    }

    /// One logical probe: bounded retry on transport failures; callbacks and
    /// reporting fire exactly once, on the final outcome.
    async fn probe_endpoint(&self, url: &str) -> PingResult {
        let mut attempt: u32 = 0;

        loop {
            let start = Instant::now();
            let outcome = self.send_probe(url).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(status) => {
                    let latency_seconds = elapsed_ms as f64 / 1000.0;
                    metrics::histogram!("pingkeeper_probe_duration_seconds",
                        "endpoint" => url.to_string()
                    )
                    .record(latency_seconds);

                    let result = PingResult::responded(status, elapsed_ms);
                    self.record_outcome(url, &result);

                    if result.is_up() {
                        tracing::debug!(%url, status, elapsed_ms, "ping succeeded");
                        if let Some(reporter) = &self.inner.reporter {
                            reporter.report(url, &result);
                        }
                        if let Some(on_success) = &self.inner.on_success {
                            on_success(url, elapsed_ms);
                        }
                    } else {
                        tracing::warn!(%url, status, "ping returned error status");
                        if let Some(on_error) = &self.inner.on_error {
                            on_error(&PingError::HttpStatus(status), url);
                        }
                    }

                    return result;
                }
                Err(err) => {
                    if err.is_retryable() && attempt < self.inner.config.retry_count {
                        attempt += 1;
                        tracing::debug!(%url, attempt, error = %err, "retrying after transient failure");
                        tokio::time::sleep(Duration::from_millis(self.inner.config.retry_delay_ms))
                            .await;
                        continue;
                    }

                    metrics::counter!("pingkeeper_probe_errors_total",
                        "endpoint" => url.to_string()
                    )
                    .increment(1);

                    let result = PingResult::failed(err.to_string(), elapsed_ms);
                    self.record_outcome(url, &result);

                    tracing::warn!(%url, error = %err, "ping failed");
                    if let Some(on_error) = &self.inner.on_error {
                        on_error(&err, url);
                    }

                    return result;
                }
            }
        }
    }

    /// Issue one probe request and map the outcome.
    async fn send_probe(&self, url: &str) -> Result<u16, PingError> {
        let request = match self.inner.config.method {
            ProbeMethod::Get => self.inner.client.get(url),
            ProbeMethod::Head => self.inner.client.head(url),
        };

        match request
            .timeout(Duration::from_millis(self.inner.config.timeout_ms))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(self.classify_error(e)),
        }
    }

    /// Classify a reqwest error into the probe error taxonomy.
    fn classify_error(&self, e: reqwest::Error) -> PingError {
        if e.is_timeout() {
            PingError::Timeout(self.inner.config.timeout_ms)
        } else if e.is_builder() {
            PingError::InvalidRequest(e.to_string())
        } else {
            // Everything else at the transport level: refused, reset, DNS.
            PingError::ConnectionFailed(e.to_string())
        }
    }

    fn record_outcome(&self, url: &str, result: &PingResult) {
        self.inner
            .stats
            .entry(url.to_string())
            .or_default()
            .record(result);
    }

    /// Snapshot of the service state.
    pub fn status(&self) -> PingerStatus {
        PingerStatus {
            is_active: self.is_active(),
            endpoints: self
                .inner
                .endpoints
                .read()
                .expect("endpoints lock poisoned")
                .iter()
                .cloned()
                .collect(),
            interval_ms: self.interval_ms(),
            last_cycle_at: *self
                .inner
                .last_cycle_at
                .read()
                .expect("last_cycle_at lock poisoned"),
            last_results: self
                .inner
                .last_results
                .read()
                .expect("last_results lock poisoned")
                .clone(),
        }
    }

    /// Rolling per-endpoint statistics.
    pub fn stats(&self) -> BTreeMap<String, EndpointStatsView> {
        self.inner
            .stats
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().snapshot()))
            .collect()
    }

    /// Most recent result for one endpoint, if it has been probed.
    pub fn last_result(&self, endpoint: &str) -> Option<PingResult> {
        self.inner
            .last_results
            .read()
            .expect("last_results lock poisoned")
            .get(endpoint)
            .cloned()
    }
}

/// Point-in-time view of the ping service.
#[derive(Debug, Clone, Serialize)]
pub struct PingerStatus {
    /// Whether the interval task is scheduled
    pub is_active: bool,
    /// Registered endpoint URLs
    pub endpoints: Vec<String>,
    /// Current interval between cycles
    pub interval_ms: u64,
    /// Start time of the most recent cycle
    pub last_cycle_at: Option<DateTime<Utc>>,
    /// Most recent result per endpoint
    pub last_results: BTreeMap<String, PingResult>,
}
