//! Weighted sampling.
//!
//! Every floating-point computation of the protocol lives here. The
//! prover and the verifier derive the same sample count and the same
//! sorted weight targets from public inputs; targets are then turned
//! into integer thresholds by [`target_threshold`] so that acceptance
//! never depends on float comparisons.

use flyclient_core::{seed_hash, seed_to_unit_float, weight_to_f64, Error, Hash, Result, Weight};
use flyclient_mmr::{Accumulator, NodeStore};
use num_traits::{One, Zero};
use tracing::debug;

use crate::config::FlyClientConfig;

/// `log_base(v)`.
fn log_base(base: f64, v: f64) -> f64 {
    v.log2() / base.log2()
}

/// Number of weighted samples needed for `2^-lambda` soundness.
///
/// `m = ceil((-lambda - log2(c * n)) / log2(x))` with
/// `x = max(0, 1 - 1 / log_c(tail / (root + tail)))`. When the tail
/// outweighs the committed work `x` is zero and no samples are needed.
pub fn required_queries(
    config: &FlyClientConfig,
    tail: &Weight,
    root_weight: &Weight,
    leaf_count: u64,
) -> Result<u64> {
    if tail.is_zero() {
        return Err(Error::invalid_parameter("tail weight must be positive"));
    }
    if root_weight.is_zero() {
        return Err(Error::invalid_parameter("total weight must be positive"));
    }
    if leaf_count == 0 {
        return Err(Error::invalid_parameter("leaf count must be positive"));
    }

    let c = config.honest_fraction;
    let tail_f = weight_to_f64(tail);
    let total_f = weight_to_f64(&(root_weight + tail));

    let numerator = -f64::from(config.lambda) - (c * leaf_count as f64).log2();
    let x = (1.0 - 1.0 / log_base(c, tail_f / total_f)).max(0.0);
    let m = (numerator / x.log2()).ceil();

    if !m.is_finite() {
        return Err(Error::invalid_parameter(format!(
            "sample count is not finite (tail {}, root weight {}, {} leaves)",
            tail, root_weight, leaf_count
        )));
    }
    let m = m.max(0.0);
    if m > config.max_queries as f64 {
        return Err(Error::invalid_parameter(format!(
            "{} samples exceed the limit of {}",
            m, config.max_queries
        )));
    }
    Ok(m as u64)
}

/// Sorted positions in `[0, 1)` along the cumulative weight axis.
///
/// Target `i` is `1 - delta^y` where `y` is drawn from `seed_hash(root, i)`
/// and `delta = tail / root_weight`, which biases samples toward the most
/// recent work.
pub fn weight_targets(root: &Hash, tail: &Weight, root_weight: &Weight, m: u64) -> Vec<f64> {
    let delta = weight_to_f64(tail) / weight_to_f64(root_weight);
    let ln_delta = delta.ln();
    let mut targets: Vec<f64> = (0..m)
        .map(|i| {
            let y = seed_to_unit_float(&seed_hash(root, i));
            1.0 - (y * ln_delta).exp()
        })
        .collect();
    targets.sort_by(f64::total_cmp);
    targets
}

/// Integer threshold `floor(t * total)`, clamped to `[0, total - 1]`.
///
/// The product is exact: `t` is split into its 53-bit mantissa and binary
/// exponent and multiplied as big integers.
pub fn target_threshold(t: f64, total: &Weight) -> Weight {
    if total.is_zero() || t.is_nan() || t <= 0.0 {
        return Weight::zero();
    }
    let max = total - Weight::one();
    if t >= 1.0 {
        return max;
    }

    let bits = t.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exponent == 0 {
        (fraction, -1074i64)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };

    // t < 1 so the exponent is negative
    let shift = exp.unsigned_abs();
    let threshold = (total * Weight::from(mantissa)) >> shift;
    threshold.min(max)
}

/// Leaves that are always disclosed: multiples of the checkpoint
/// interval strictly above one interval, newest first, at most
/// `max_checkpoints` of them. Returned in ascending order.
pub fn checkpoint_indices(config: &FlyClientConfig, leaf_count: u64) -> Vec<u64> {
    let interval = config.checkpoint_interval;
    if leaf_count == 0 || interval == 0 {
        return Vec::new();
    }

    let mut checkpoints = Vec::new();
    let mut current = ((leaf_count - 1) / interval) * interval;
    while current > interval && checkpoints.len() < config.max_checkpoints {
        checkpoints.push(current);
        current -= interval;
    }
    checkpoints.reverse();
    checkpoints
}

/// Sorted, de-duplicated union of the queried and checkpoint leaves.
pub fn target_set(queried: &[u64], checkpoints: &[u64]) -> Vec<u64> {
    let mut set: Vec<u64> = queried.iter().chain(checkpoints).copied().collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Result of sampling one accumulator snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// One selected leaf per weight target, ascending, duplicates kept.
    pub queried: Vec<u64>,
    /// Checkpoint leaves, ascending.
    pub checkpoints: Vec<u64>,
    /// Sorted weight targets.
    pub targets: Vec<f64>,
}

impl Sample {
    /// Leaves the proof must disclose.
    pub fn disclosed(&self) -> Vec<u64> {
        target_set(&self.queried, &self.checkpoints)
    }
}

/// Derives weighted samples from an accumulator.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: FlyClientConfig,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            config: FlyClientConfig::default(),
        }
    }
}

impl Sampler {
    /// Create a sampler with validated parameters.
    pub fn new(config: FlyClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The parameters in use.
    pub fn config(&self) -> &FlyClientConfig {
        &self.config
    }

    /// Sample leaves of `acc` for a proof against the given tail weight.
    pub fn sample<S: NodeStore>(&self, acc: &Accumulator<S>, tail: &Weight) -> Result<Sample> {
        let root = acc
            .root()?
            .ok_or_else(|| Error::invalid_parameter("cannot sample an empty accumulator"))?;
        let n = acc.leaf_count();

        let m = required_queries(&self.config, tail, &root.weight, n)?;
        let targets = weight_targets(&root.hash, tail, &root.weight, m);
        let queried = targets
            .iter()
            .map(|t| acc.select_leaf_by_weight(&target_threshold(*t, &root.weight)))
            .collect::<Result<Vec<_>>>()?;
        let checkpoints = checkpoint_indices(&self.config, n);

        debug!(
            leaf_count = n,
            queries = m,
            checkpoints = checkpoints.len(),
            "sampled accumulator"
        );
        Ok(Sample {
            queried,
            checkpoints,
            targets,
        })
    }
}
