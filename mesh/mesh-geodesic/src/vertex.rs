//! Per-vertex fast-marching state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fast-marching state of a vertex.
///
/// Transitions are monotone: `Far → Alive → Dead`. Only a full reset
/// returns a vertex to `Far`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexState {
    /// Not reached yet.
    #[default]
    Far,
    /// In the narrow band with a tentative distance.
    Alive,
    /// Finalized; the distance no longer changes.
    Dead,
}

/// The (at most two) fronts that reached a vertex, with their smallest
/// observed arrival distances.
///
/// When a third distinct front arrives, only the two smallest-distance
/// fronts are kept. Slot 0 always holds the smaller distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrontOverlap {
    fronts: [Option<(u32, f64)>; 2],
}

impl FrontOverlap {
    /// Record that `front` reached the vertex at `distance`.
    pub fn record(&mut self, front: u32, distance: f64) {
        let entry = (front, distance);
        match self.fronts {
            [Some(a), _] if a.0 == front => self.fronts[0] = Some((front, a.1.min(distance))),
            [Some(a), Some(b)] if b.0 == front => {
                let b = (front, b.1.min(distance));
                self.fronts = if closer(b, a) {
                    [Some(b), Some(a)]
                } else {
                    [Some(a), Some(b)]
                };
            }
            [None, _] => self.fronts[0] = Some(entry),
            [Some(a), b] => {
                if closer(entry, a) {
                    self.fronts = [Some(entry), Some(a)];
                } else if b.is_none_or(|b| closer(entry, b)) {
                    self.fronts[1] = Some(entry);
                }
            }
        }
    }

    /// The closest front, if any.
    #[must_use]
    pub const fn first(&self) -> Option<(u32, f64)> {
        self.fronts[0]
    }

    /// The second closest front, if any.
    #[must_use]
    pub const fn second(&self) -> Option<(u32, f64)> {
        self.fronts[1]
    }

    /// Whether two distinct fronts met at this vertex.
    #[must_use]
    pub const fn is_overlap(&self) -> bool {
        self.fronts[1].is_some()
    }

    /// Recorded `(front, distance)` pairs, closest first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.fronts.iter().flatten().copied()
    }

    /// Forget all recorded fronts.
    pub fn clear(&mut self) {
        self.fronts = [None, None];
    }
}

/// Smaller distance first, then smaller front index.
fn closer(a: (u32, f64), b: (u32, f64)) -> bool {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)).is_lt()
}

/// One Voronoi parameter slot: a Voronoi vertex and its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoronoiSlot {
    /// Index of the Voronoi vertex (in the Voronoi mesh arena).
    pub voronoi_vertex: usize,
    /// Parameter (weight) of this vertex with respect to that cell.
    pub parameter: f64,
}

/// Fast-marching data attached to one mesh vertex.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodesicVertex {
    pub(crate) distance: f64,
    pub(crate) state: VertexState,
    pub(crate) front: Option<u32>,
    pub(crate) boundary_reached: bool,
    pub(crate) stopping_vertex: bool,
    pub(crate) overlap: FrontOverlap,
    pub(crate) parameters: [Option<VoronoiSlot>; 3],
}

impl Default for GeodesicVertex {
    fn default() -> Self {
        Self {
            distance: f64::INFINITY,
            state: VertexState::Far,
            front: None,
            boundary_reached: false,
            stopping_vertex: false,
            overlap: FrontOverlap::default(),
            parameters: [None; 3],
        }
    }
}

impl GeodesicVertex {
    /// Current (tentative or final) distance; `INFINITY` when unreached.
    #[inline]
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Marching state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> VertexState {
        self.state
    }

    /// Source vertex whose front reached this vertex first.
    #[inline]
    #[must_use]
    pub const fn front(&self) -> Option<u32> {
        self.front
    }

    /// Whether this vertex lies on an open boundary and was finalized.
    #[inline]
    #[must_use]
    pub const fn boundary_reached(&self) -> bool {
        self.boundary_reached
    }

    /// Whether finalizing this vertex stops the march.
    #[inline]
    #[must_use]
    pub const fn is_stopping_vertex(&self) -> bool {
        self.stopping_vertex
    }

    /// Fronts that reached this vertex.
    #[inline]
    #[must_use]
    pub const fn front_overlap(&self) -> &FrontOverlap {
        &self.overlap
    }

    /// Voronoi parameter slots that are filled.
    pub fn voronoi_parameters(&self) -> impl Iterator<Item = &VoronoiSlot> {
        self.parameters.iter().flatten()
    }

    /// Whether any front reached this vertex.
    #[inline]
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.front.is_some() && self.distance.is_finite()
    }

    /// Return to the initial Far state. The stopping flag is kept.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            stopping_vertex: self.stopping_vertex,
            ..Self::default()
        };
    }
}
