//! Parameters for fast marching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which local model of the distance field a face builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolationKind {
    /// Barycentric interpolation of the three corner values.
    Linear,
    /// Full quadratic through the corners and the three opposite apexes.
    #[default]
    Quadratic,
    /// Least-squares cubic adding per-vertex gradient constraints.
    Cubic,
}

/// Shared flag used to stop a running march from another thread.
///
/// Checked once per narrow-band extraction.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parameters for a fast-marching run.
#[derive(Debug, Clone, Default)]
pub struct FastMarchingParams {
    /// Interpolation model used by value/gradient queries after marching.
    /// Default: quadratic
    pub interpolation: InterpolationKind,

    /// Stop once the smallest tentative distance exceeds this radius.
    /// Vertices beyond it stay Alive or Far. Default: None
    pub stop_radius: Option<f64>,

    /// Stop as soon as a vertex on an open boundary is finalized.
    /// Default: false
    pub stop_at_boundary: bool,

    /// Per-vertex travel cost (the right-hand side of the eikonal
    /// equation). Must have one strictly positive entry per vertex.
    /// Default: None (uniform cost 1)
    pub weights: Option<Vec<f64>>,

    /// Vertices that may never enter the narrow band.
    pub excluded: Vec<u32>,

    /// Cancellation flag checked at every extraction.
    pub cancel: Option<CancelToken>,
}

impl FastMarchingParams {
    /// Params that stop at a geodesic radius.
    #[must_use]
    pub fn with_radius(radius: f64) -> Self {
        Self {
            stop_radius: Some(radius),
            ..Default::default()
        }
    }

    /// Set the interpolation model.
    #[must_use]
    pub const fn with_interpolation(mut self, kind: InterpolationKind) -> Self {
        self.interpolation = kind;
        self
    }

    /// Set the stop-at-boundary option.
    #[must_use]
    pub const fn with_stop_at_boundary(mut self, stop: bool) -> Self {
        self.stop_at_boundary = stop;
        self
    }

    /// Set per-vertex weights.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Exclude vertices from the narrow band.
    #[must_use]
    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = u32>) -> Self {
        self.excluded = excluded.into_iter().collect();
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = FastMarchingParams::default();
        assert_eq!(params.interpolation, InterpolationKind::Quadratic);
        assert!(params.stop_radius.is_none());
        assert!(!params.stop_at_boundary);
        assert!(params.weights.is_none());
        assert!(!params.is_cancelled());
    }

    #[test]
    fn builder() {
        let params = FastMarchingParams::with_radius(2.5)
            .with_interpolation(InterpolationKind::Cubic)
            .with_stop_at_boundary(true)
            .with_excluded([3, 4]);

        assert_eq!(params.stop_radius, Some(2.5));
        assert_eq!(params.interpolation, InterpolationKind::Cubic);
        assert!(params.stop_at_boundary);
        assert_eq!(params.excluded, vec![3, 4]);
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let params = FastMarchingParams::default().with_cancel(token.clone());
        assert!(!params.is_cancelled());
        token.cancel();
        assert!(params.is_cancelled());
    }
}
