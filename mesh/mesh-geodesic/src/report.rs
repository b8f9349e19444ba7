//! Outcome of a fast-marching run.

// Vertex counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a march stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The narrow band is empty.
    Exhausted,
    /// The smallest tentative distance exceeded the stopping radius.
    RadiusReached,
    /// A stopping vertex was finalized.
    StoppingVertex(u32),
    /// A boundary vertex was finalized while `stop_at_boundary` was set.
    BoundaryReached(u32),
    /// Cancellation was requested.
    Cancelled,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "narrow band exhausted"),
            Self::RadiusReached => write!(f, "stopping radius reached"),
            Self::StoppingVertex(v) => write!(f, "stopping vertex {v} reached"),
            Self::BoundaryReached(v) => write!(f, "boundary vertex {v} reached"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Summary of a fast-marching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarchReport {
    /// Vertices with a final distance.
    pub dead_count: usize,
    /// Vertices left in the narrow band.
    pub alive_count: usize,
    /// Vertices never reached.
    pub far_count: usize,
    /// Number of vertices extracted from the narrow band.
    pub iterations: usize,
    /// Why the march stopped.
    pub termination: Termination,
}

impl MarchReport {
    /// Fraction of vertices with a final distance.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        let total = self.dead_count + self.alive_count + self.far_count;
        if total == 0 {
            0.0
        } else {
            self.dead_count as f64 / total as f64
        }
    }

    /// Whether the whole reachable surface was processed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Exhausted)
    }
}

impl std::fmt::Display for MarchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fast marching: {} dead, {} alive, {} far after {} iterations ({})",
            self.dead_count, self.alive_count, self.far_count, self.iterations, self.termination
        )
    }
}
