//! Security configuration for sampling and verification.

use flyclient_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default security parameter in bits.
pub const DEFAULT_LAMBDA: u32 = 50;

/// Default minimum honest fraction of total weight.
pub const DEFAULT_HONEST_FRACTION: f64 = 0.5;

/// Default distance between checkpoint leaves.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 30_000;

/// Default cap on checkpoint leaves per proof.
pub const DEFAULT_MAX_CHECKPOINTS: usize = 10;

/// Default cap on the number of weighted samples.
pub const DEFAULT_MAX_QUERIES: u64 = 1_000_000;

/// Parameters shared by prover and verifier.
///
/// Both sides must use identical values; they determine the number of
/// samples, the sampling distribution and the checkpoint leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyClientConfig {
    /// Security parameter: forgery succeeds with probability below `2^-lambda`.
    pub lambda: u32,
    /// Fraction `c` of the total weight an adversary is assumed not to reach.
    pub honest_fraction: f64,
    /// Leaves at multiples of this interval are always disclosed.
    pub checkpoint_interval: u64,
    /// At most this many checkpoint leaves are disclosed.
    pub max_checkpoints: usize,
    /// Sample counts above this are rejected as parameter errors.
    pub max_queries: u64,
}

impl Default for FlyClientConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            honest_fraction: DEFAULT_HONEST_FRACTION,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
            max_queries: DEFAULT_MAX_QUERIES,
        }
    }
}

impl FlyClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FlyClientConfigBuilder {
        FlyClientConfigBuilder::default()
    }

    /// Reject parameters the sampling math is undefined for.
    pub fn validate(&self) -> Result<()> {
        if self.lambda == 0 {
            return Err(Error::invalid_parameter("lambda must be positive"));
        }
        if !(self.honest_fraction > 0.0 && self.honest_fraction < 1.0) {
            return Err(Error::invalid_parameter(format!(
                "honest fraction {} outside (0, 1)",
                self.honest_fraction
            )));
        }
        if self.checkpoint_interval == 0 {
            return Err(Error::invalid_parameter("checkpoint interval must be positive"));
        }
        if self.max_queries == 0 {
            return Err(Error::invalid_parameter("max_queries must be positive"));
        }
        Ok(())
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

/// Builder for [`FlyClientConfig`].
#[derive(Debug, Default)]
pub struct FlyClientConfigBuilder {
    config: FlyClientConfig,
}

impl FlyClientConfigBuilder {
    /// Set the security parameter.
    pub fn lambda(mut self, lambda: u32) -> Self {
        self.config.lambda = lambda;
        self
    }

    /// Set the honest weight fraction.
    pub fn honest_fraction(mut self, c: f64) -> Self {
        self.config.honest_fraction = c;
        self
    }

    /// Set the checkpoint interval.
    pub fn checkpoint_interval(mut self, interval: u64) -> Self {
        self.config.checkpoint_interval = interval;
        self
    }

    /// Set the maximum number of checkpoints.
    pub fn max_checkpoints(mut self, max: usize) -> Self {
        self.config.max_checkpoints = max;
        self
    }

    /// Set the sample count guard.
    pub fn max_queries(mut self, max: u64) -> Self {
        self.config.max_queries = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FlyClientConfig {
        self.config
    }
}
