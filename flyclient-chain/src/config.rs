//! Chain configuration.

use flyclient_core::{Error, Result, Weight};
use flyclient_light::FlyClientConfig;
use serde::{Deserialize, Serialize};

/// Default weight assumed for the unproven head block.
pub const DEFAULT_TAIL_DIFFICULTY: u64 = 100_000;

/// Chain configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Weight of the head block, which is excluded from its own proof.
    pub tail_difficulty: u64,
    /// Security parameters shared with light clients.
    pub flyclient: FlyClientConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            tail_difficulty: DEFAULT_TAIL_DIFFICULTY,
            flyclient: FlyClientConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ChainConfigBuilder {
        ChainConfigBuilder::default()
    }

    /// The tail difficulty as a weight.
    pub fn tail_weight(&self) -> Weight {
        Weight::from(self.tail_difficulty)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tail_difficulty == 0 {
            return Err(Error::invalid_parameter("tail difficulty must be positive"));
        }
        self.flyclient.validate()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for [`ChainConfig`].
#[derive(Debug, Default)]
pub struct ChainConfigBuilder {
    config: ChainConfig,
}

impl ChainConfigBuilder {
    /// Set the tail difficulty.
    pub fn tail_difficulty(mut self, difficulty: u64) -> Self {
        self.config.tail_difficulty = difficulty;
        self
    }

    /// Set the FlyClient parameters.
    pub fn flyclient(mut self, config: FlyClientConfig) -> Self {
        self.config.flyclient = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ChainConfig {
        self.config
    }
}
