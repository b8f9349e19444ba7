//! Configuration for geometry atlas sampling.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{VoronoiError, VoronoiResult};

/// Parameters for [`GeometryAtlas`](crate::GeometryAtlas) sampling and
/// smoothing.
///
/// # Example
///
/// ```
/// use mesh_voronoi::AtlasParams;
///
/// let params = AtlasParams::fine().with_smoothing_iterations(5);
/// assert_eq!(params.samples_per_edge, 17);
/// assert_eq!(params.smoothing_iterations, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtlasParams {
    /// Grid samples along each cell edge (`n` in an `n×n` cell). At least 3.
    /// Default: 9
    pub samples_per_edge: usize,

    /// Gauss–Seidel passes run by
    /// [`smooth_sampling`](crate::GeometryAtlas::smooth_sampling).
    /// Default: 20
    pub smoothing_iterations: usize,
}

impl Default for AtlasParams {
    fn default() -> Self {
        Self {
            samples_per_edge: 9,
            smoothing_iterations: 20,
        }
    }
}

impl AtlasParams {
    /// Coarse sampling for previews.
    #[must_use]
    pub const fn coarse() -> Self {
        Self {
            samples_per_edge: 5,
            smoothing_iterations: 10,
        }
    }

    /// Dense sampling for export.
    #[must_use]
    pub const fn fine() -> Self {
        Self {
            samples_per_edge: 17,
            smoothing_iterations: 40,
        }
    }

    /// Set the samples per cell edge.
    #[must_use]
    pub const fn with_samples_per_edge(mut self, samples: usize) -> Self {
        self.samples_per_edge = samples;
        self
    }

    /// Set the number of smoothing passes.
    #[must_use]
    pub const fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Check that the grid is large enough to have an interior.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidSampleCount`] if `samples_per_edge < 3`.
    pub fn validate(&self) -> VoronoiResult<()> {
        if self.samples_per_edge < 3 {
            return Err(VoronoiError::InvalidSampleCount {
                samples: self.samples_per_edge,
            });
        }
        Ok(())
    }
}
