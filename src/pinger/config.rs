//! Configuration for the ping service.

use serde::{Deserialize, Serialize};

/// HTTP method used for probe requests.
///
/// GET is the default: some servers reject HEAD outright, and a keep-alive
/// probe should look like ordinary traffic to the idle timers it is meant
/// to reset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Get,
    Head,
}

/// What to do when a ping cycle is still running as the next tick fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Skip the tick; the next cycle starts at the following interval.
    #[default]
    Skip,
    /// Let cycles overlap; `last_results` reflects whichever cycle's write
    /// lands last.
    Overlap,
}

/// Configuration for the periodic ping service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingerConfig {
    /// Milliseconds between ping cycles
    pub interval_ms: u64,
    /// HTTP method for probe requests
    pub method: ProbeMethod,
    /// Timeout for each probe request
    pub timeout_ms: u64,
    /// Extra attempts after a transport-level failure
    pub retry_count: u32,
    /// Delay between retry attempts
    pub retry_delay_ms: u64,
    /// Behavior when a cycle outlives the interval
    pub overlap: OverlapPolicy,
}

impl Default for PingerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 300_000,
            method: ProbeMethod::Get,
            timeout_ms: 10_000,
            retry_count: 0,
            retry_delay_ms: 1_000,
            overlap: OverlapPolicy::Skip,
        }
    }
}
