//! Static endpoint configuration

use serde::{Deserialize, Serialize};

/// One endpoint to keep awake, as declared in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
}
