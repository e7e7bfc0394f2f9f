//! Continuous-to-discrete state mapping.
//!
//! An [`Observation`] is reduced to four scalar features (horizontal
//! distance, vertical offset from the gap center, velocity, gap size) and
//! each feature is bucketed against an ascending boundary sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::Observation,
};

/// Bucketed 4-tuple key into the Q-table: `(x, y, v, gap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscreteState(pub usize, pub usize, pub usize, pub usize);

impl DiscreteState {
    pub fn new(x: usize, y: usize, v: usize, gap: usize) -> Self {
        Self(x, y, v, gap)
    }

    /// Components in `(x, y, v, gap)` order.
    pub fn to_array(self) -> [usize; 4] {
        [self.0, self.1, self.2, self.3]
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.0, self.1, self.2, self.3)
    }
}

/// Strictly increasing, finite boundary sequence for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Create boundaries from an explicit sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless the sequence is
    /// non-empty, finite and strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.is_empty() {
            return Err(Error::invalid_config("bin edges must not be empty"));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(Error::invalid_config(format!(
                "bin edge {bad} is not finite"
            )));
        }
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::invalid_config(
                "bin edges must be strictly increasing",
            ));
        }
        Ok(Self(edges))
    }

    /// `count` evenly spaced boundaries over `[start, stop]`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for `count == 0` or a
    /// non-increasing range. A single edge is `start`.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Result<Self> {
        match count {
            0 => Err(Error::invalid_config("linspace needs at least one edge")),
            1 => Self::new(vec![start]),
            _ => Self::new(evenly_spaced(start, stop, count)),
        }
    }

    /// Number of boundaries less than or equal to `value`.
    ///
    /// Values below the first boundary map to 0; values at or above the
    /// last map to `len()`. NaN maps to `len()`.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn bucket(&self, value: f64) -> usize {
        self.0.partition_point(|&edge| !(edge > value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed sequence.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct bucket indices (`len() + 1`).
    pub fn bucket_count(&self) -> usize {
        self.0.len() + 1
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn evenly_spaced(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = (stop - start) / (count - 1) as f64;
    let mut edges: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    // Pin the endpoint so it is exact regardless of accumulated rounding.
    edges[count - 1] = stop;
    edges
}

impl TryFrom<Vec<f64>> for BinEdges {
    type Error = Error;

    fn try_from(edges: Vec<f64>) -> Result<Self> {
        Self::new(edges)
    }
}

impl From<BinEdges> for Vec<f64> {
    fn from(edges: BinEdges) -> Self {
        edges.0
    }
}

/// Maps observations to [`DiscreteState`] keys.
///
/// The same discretizer must be used for training and inference; it is
/// persisted alongside every Q-table and network so a mismatch is caught at
/// load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discretizer {
    /// Horizontal distance to the next obstacle
    pub x_bins: BinEdges,
    /// Vertical offset from the gap center
    pub y_bins: BinEdges,
    /// Vertical velocity
    pub v_bins: BinEdges,
    /// Gap size
    pub gap_bins: BinEdges,
}

impl Discretizer {
    pub fn new(x_bins: BinEdges, y_bins: BinEdges, v_bins: BinEdges, gap_bins: BinEdges) -> Self {
        Self {
            x_bins,
            y_bins,
            v_bins,
            gap_bins,
        }
    }

    /// Discretize an observation into `(x, y, v, gap)`.
    pub fn discretize(&self, obs: &Observation) -> DiscreteState {
        DiscreteState(
            self.x_bins.bucket(obs.next_pipe_dist_to_player),
            self.y_bins.bucket(obs.vertical_offset()),
            self.v_bins.bucket(obs.player_vel),
            self.gap_bins.bucket(obs.gap_size()),
        )
    }

    /// Upper bound on the number of distinct keys this discretizer can emit.
    pub fn state_space_size(&self) -> usize {
        self.x_bins.bucket_count()
            * self.y_bins.bucket_count()
            * self.v_bins.bucket_count()
            * self.gap_bins.bucket_count()
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        let bins = |start, stop, count| BinEdges(evenly_spaced(start, stop, count));
        Self {
            x_bins: bins(-150.0, 150.0, 25),
            y_bins: bins(-300.0, 300.0, 70),
            v_bins: bins(-20.0, 20.0, 35),
            gap_bins: bins(-200.0, 200.0, 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_and_spacing() {
        let edges = BinEdges::linspace(-150.0, 150.0, 25).unwrap();
        assert_eq!(edges.len(), 25);
        assert_eq!(edges.as_slice()[0], -150.0);
        assert_eq!(edges.as_slice()[24], 150.0);
        assert!((edges.as_slice()[1] - -137.5).abs() < 1e-12);
    }

    #[test]
    fn test_default_matches_linspace() {
        let d = Discretizer::default();
        assert_eq!(d.x_bins, BinEdges::linspace(-150.0, 150.0, 25).unwrap());
        assert_eq!(d.y_bins, BinEdges::linspace(-300.0, 300.0, 70).unwrap());
        assert_eq!(d.v_bins, BinEdges::linspace(-20.0, 20.0, 35).unwrap());
        assert_eq!(d.gap_bins, BinEdges::linspace(-200.0, 200.0, 20).unwrap());
    }

    #[test]
    fn test_bucket_counts_edges_less_or_equal() {
        let edges = BinEdges::new(vec![0.0, 10.0, 20.0]).unwrap();
        assert_eq!(edges.bucket(-0.5), 0);
        assert_eq!(edges.bucket(0.0), 1);
        assert_eq!(edges.bucket(5.0), 1);
        assert_eq!(edges.bucket(10.0), 2);
        assert_eq!(edges.bucket(19.999), 2);
        assert_eq!(edges.bucket(20.0), 3);
        assert_eq!(edges.bucket(1e9), 3);
    }

    #[test]
    fn test_bucket_just_below_lowest_edge() {
        let d = Discretizer::default();
        // One ulp further from zero than -150.0
        let below = f64::from_bits((-150.0f64).to_bits() + 1);
        assert!(below < -150.0);
        assert_eq!(d.x_bins.bucket(below), 0);
        assert_eq!(d.x_bins.bucket(-150.0), 1);
    }

    #[test]
    fn test_nan_maps_to_last_bucket() {
        let edges = BinEdges::new(vec![0.0, 10.0]).unwrap();
        assert_eq!(edges.bucket(f64::NAN), 2);
    }

    #[test]
    fn test_invalid_edges_rejected() {
        assert!(BinEdges::new(vec![]).is_err());
        assert!(BinEdges::new(vec![1.0, 1.0]).is_err());
        assert!(BinEdges::new(vec![2.0, 1.0]).is_err());
        assert!(BinEdges::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(BinEdges::linspace(0.0, 1.0, 0).is_err());
        assert!(BinEdges::linspace(1.0, 0.0, 3).is_err());
    }

    #[test]
    fn test_far_distance_maps_to_last_bucket() {
        let d = Discretizer::default();
        let obs = Observation::new(0.0, 0.0, 1000.0, -50.0, 50.0);
        assert_eq!(d.discretize(&obs).0, 25);
    }

    #[test]
    fn test_discretize_uses_derived_features() {
        let d = Discretizer::default();
        let obs = Observation::new(-290.0, -17.0, -150.0, 60.0, -60.0);
        assert_eq!(d.discretize(&obs), DiscreteState::new(1, 2, 3, 4));
    }

    #[test]
    fn test_state_space_size() {
        let d = Discretizer::default();
        assert_eq!(d.state_space_size(), 26 * 71 * 36 * 21);
    }
}
