//! Narrow-band fast marching over a triangle mesh.
//!
//! Vertices move `Far → Alive → Dead`. The Alive vertex with the smallest
//! tentative distance is finalized at each step (ties go to the smaller
//! vertex index), then every non-Dead vertex of its incident faces is
//! updated: a two-point (planar wavefront) update when the third vertex of
//! the face is Dead and the solution is causal, and one-point (edge)
//! updates otherwise. The priority queue is a `BinaryHeap` with lazy
//! deletion of stale entries.

// Mesh indices are u32; meshes with more than 4B elements are unsupported
#![allow(clippy::cast_possible_truncation)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mesh_types::{IndexedMesh, Vector3};
use tracing::{debug, info, warn};

use crate::connectivity::{rotate, MeshConnectivity};
use crate::distance::DistanceField;
use crate::error::{GeodesicError, GeodesicResult};
use crate::gradient::vertex_gradient;
use crate::interpolation::{FaceStencil, TriangularInterpolation};
use crate::params::{FastMarchingParams, InterpolationKind};
use crate::report::{MarchReport, Termination};
use crate::update::{one_point, two_point};
use crate::vertex::{GeodesicVertex, VertexState, VoronoiSlot};

/// Narrow-band entry. Ordered so that `BinaryHeap` pops the smallest
/// distance first, then the smallest vertex index.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    vertex: u32,
    distance: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Cached interpolation of one face, valid for one distance generation.
#[derive(Debug, Clone)]
struct CachedModel {
    generation: u64,
    model: TriangularInterpolation,
}

/// A triangle mesh carrying fast-marching state.
///
/// # Example
///
/// ```
/// use mesh_geodesic::{FastMarchingParams, GeodesicMesh, Termination};
/// use mesh_types::planar_grid;
///
/// let mut geo = GeodesicMesh::new(&planar_grid(4, 4, 1.0)).unwrap();
/// let report = geo.march(&[0], &FastMarchingParams::default()).unwrap();
///
/// assert_eq!(report.termination, Termination::Exhausted);
/// assert!((geo.distance(4) - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct GeodesicMesh {
    connectivity: MeshConnectivity,
    vertices: Vec<GeodesicVertex>,
    cache: Vec<Option<CachedModel>>,
    generation: u64,
    interpolation: InterpolationKind,
}

impl GeodesicMesh {
    /// Wrap a mesh, validating its structure.
    ///
    /// # Errors
    ///
    /// Any structural error from [`MeshConnectivity::from_mesh`].
    pub fn new(mesh: &IndexedMesh) -> GeodesicResult<Self> {
        Ok(Self::from_connectivity(MeshConnectivity::from_mesh(mesh)?))
    }

    /// Wrap prebuilt connectivity.
    #[must_use]
    pub fn from_connectivity(connectivity: MeshConnectivity) -> Self {
        let vertex_count = connectivity.vertex_count();
        let face_count = connectivity.face_count();
        Self {
            connectivity,
            vertices: vec![GeodesicVertex::default(); vertex_count],
            cache: vec![None; face_count],
            generation: 0,
            interpolation: InterpolationKind::default(),
        }
    }

    /// Mesh connectivity.
    #[inline]
    #[must_use]
    pub const fn connectivity(&self) -> &MeshConnectivity {
        &self.connectivity
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.connectivity.face_count()
    }

    /// Marching state of every vertex.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[GeodesicVertex] {
        &self.vertices
    }

    /// Marching state of one vertex.
    ///
    /// # Errors
    ///
    /// [`GeodesicError::InvalidVertex`] for an out-of-range index.
    pub fn vertex(&self, vertex: u32) -> GeodesicResult<&GeodesicVertex> {
        self.check_vertex(vertex)?;
        Ok(&self.vertices[vertex as usize])
    }

    /// Distance at a vertex; `INFINITY` if unreached or out of range.
    #[inline]
    #[must_use]
    pub fn distance(&self, vertex: u32) -> f64 {
        self.vertices
            .get(vertex as usize)
            .map_or(f64::INFINITY, GeodesicVertex::distance)
    }

    /// Source whose front reached a vertex.
    #[inline]
    #[must_use]
    pub fn front(&self, vertex: u32) -> Option<u32> {
        self.vertices.get(vertex as usize).and_then(GeodesicVertex::front)
    }

    /// Distance generation; bumped on every march and reset.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Interpolation kind used by [`value_at`](Self::value_at) and
    /// [`gradient_at`](Self::gradient_at).
    #[inline]
    #[must_use]
    pub const fn interpolation_kind(&self) -> InterpolationKind {
        self.interpolation
    }

    /// Change the interpolation kind used by value and gradient queries.
    pub fn set_interpolation_kind(&mut self, kind: InterpolationKind) {
        self.interpolation = kind;
    }

    /// Mark or unmark a vertex whose finalization stops the march.
    ///
    /// Stopping flags survive [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// [`GeodesicError::InvalidVertex`] for an out-of-range index.
    pub fn set_stopping_vertex(&mut self, vertex: u32, stopping: bool) -> GeodesicResult<()> {
        self.check_vertex(vertex)?;
        self.vertices[vertex as usize].stopping_vertex = stopping;
        Ok(())
    }

    /// Clear every stopping flag.
    pub fn clear_stopping_vertices(&mut self) {
        for vertex in &mut self.vertices {
            vertex.stopping_vertex = false;
        }
    }

    /// Return every vertex to Far with infinite distance, no front, no
    /// overlap and no Voronoi parameters.
    pub fn reset(&mut self) {
        for vertex in &mut self.vertices {
            vertex.reset();
        }
        self.generation += 1;
        debug!(generation = self.generation, "geodesic state reset");
    }

    /// Clear the Voronoi parameter slots of every vertex.
    pub fn reset_parameters(&mut self) {
        for vertex in &mut self.vertices {
            vertex.parameters = [None; 3];
        }
    }

    /// Run fast marching from `sources`.
    ///
    /// All previous state except stopping flags is reset first. Excluded
    /// sources are dropped.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::NoSources`] if no usable source remains
    /// - [`GeodesicError::InvalidVertex`] for an out-of-range source or
    ///   excluded vertex
    /// - [`GeodesicError::WeightCountMismatch`] / [`GeodesicError::InvalidWeight`]
    ///   for bad per-vertex weights
    pub fn march(
        &mut self,
        sources: &[u32],
        params: &FastMarchingParams,
    ) -> GeodesicResult<MarchReport> {
        let vertex_count = self.vertex_count();
        for &source in sources {
            self.check_vertex(source)?;
        }
        let weights = self.validate_weights(params)?;

        let mut excluded = vec![false; vertex_count];
        for &vertex in &params.excluded {
            self.check_vertex(vertex)?;
            excluded[vertex as usize] = true;
        }

        let usable: Vec<u32> = sources
            .iter()
            .copied()
            .filter(|&s| {
                let keep = !excluded[s as usize];
                if !keep {
                    warn!(source = s, "source vertex is excluded, dropping it");
                }
                keep
            })
            .collect();
        if usable.is_empty() {
            return Err(GeodesicError::NoSources);
        }

        self.reset();
        self.interpolation = params.interpolation;

        info!(
            vertices = vertex_count,
            sources = usable.len(),
            radius = ?params.stop_radius,
            "Starting fast marching"
        );

        let mut marcher = Marcher {
            conn: &self.connectivity,
            vertices: &mut self.vertices,
            weights,
            excluded: &excluded,
            band: BinaryHeap::with_capacity(vertex_count),
        };
        marcher.seed(&usable);
        let (termination, iterations) = marcher.run(params);

        let report = self.report(iterations, termination);
        info!(
            dead = report.dead_count,
            alive = report.alive_count,
            far = report.far_count,
            iterations = report.iterations,
            termination = %report.termination,
            "Fast marching complete"
        );
        Ok(report)
    }

    /// Snapshot of the per-vertex distances and fronts.
    #[must_use]
    pub fn distance_field(&self) -> DistanceField {
        DistanceField::from_parts(
            self.vertices.iter().map(GeodesicVertex::distance).collect(),
            self.fronts(),
        )
    }

    /// Front (source) of every vertex.
    #[must_use]
    pub fn fronts(&self) -> Vec<Option<u32>> {
        self.vertices.iter().map(GeodesicVertex::front).collect()
    }

    /// Build an interpolation model for `face` without touching the cache.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidFace`] for an out-of-range face
    /// - [`GeodesicError::UnreachedVertex`] if a corner has no distance
    pub fn build_interpolation(
        &self,
        face: u32,
        kind: InterpolationKind,
    ) -> GeodesicResult<TriangularInterpolation> {
        let stencil = self.stencil(face, kind)?;
        Ok(TriangularInterpolation::build(kind, &stencil))
    }

    /// Cached interpolation model of `face`, rebuilt when the kind differs
    /// or the distances changed since it was built.
    ///
    /// # Errors
    ///
    /// Same as [`build_interpolation`](Self::build_interpolation).
    pub fn interpolation(
        &mut self,
        face: u32,
        kind: InterpolationKind,
    ) -> GeodesicResult<&TriangularInterpolation> {
        self.check_face(face)?;
        let index = face as usize;
        let generation = self.generation;

        let stale = self.cache[index]
            .as_ref()
            .map_or(true, |c| c.generation != generation || c.model.kind() != kind);
        if stale {
            let model = self.build_interpolation(face, kind)?;
            self.cache[index] = Some(CachedModel { generation, model });
        }

        self.cache[index]
            .as_ref()
            .map(|c| &c.model)
            .ok_or(GeodesicError::InvalidFace {
                index: face,
                face_count: self.face_count(),
            })
    }

    /// Interpolated distance inside `face` at parameter `(x, y)`.
    ///
    /// # Errors
    ///
    /// Same as [`interpolation`](Self::interpolation).
    pub fn value_at(&mut self, face: u32, x: f64, y: f64) -> GeodesicResult<f64> {
        let kind = self.interpolation;
        Ok(self.interpolation(face, kind)?.value(x, y))
    }

    /// Surface gradient of the distance inside `face` at parameter `(x, y)`.
    ///
    /// # Errors
    ///
    /// Same as [`interpolation`](Self::interpolation), plus
    /// [`GeodesicError::DegenerateGeometry`] from the linear model.
    pub fn gradient_at(&mut self, face: u32, x: f64, y: f64) -> GeodesicResult<Vector3<f64>> {
        let kind = self.interpolation;
        self.interpolation(face, kind)?.gradient(x, y)
    }

    /// Least-squares gradient estimate at a vertex from its 1-ring.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidVertex`] for an out-of-range index
    /// - [`GeodesicError::UnreachedVertex`] if the vertex has no distance
    pub fn vertex_gradient(&self, vertex: u32) -> GeodesicResult<Vector3<f64>> {
        self.check_reached(vertex)?;
        Ok(vertex_gradient(
            &self.connectivity,
            |v| self.distance(v),
            vertex,
        ))
    }

    /// Store the Voronoi parameter slots of a vertex (at most three).
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidVertex`] for an out-of-range index
    /// - [`GeodesicError::TooManyParameters`] for more than three slots
    pub fn set_voronoi_parameters(
        &mut self,
        vertex: u32,
        slots: &[VoronoiSlot],
    ) -> GeodesicResult<()> {
        self.check_vertex(vertex)?;
        if slots.len() > 3 {
            return Err(GeodesicError::TooManyParameters {
                vertex,
                count: slots.len(),
            });
        }

        let mut parameters = [None; 3];
        for (slot, &value) in parameters.iter_mut().zip(slots) {
            *slot = Some(value);
        }
        self.vertices[vertex as usize].parameters = parameters;
        Ok(())
    }

    /// Voronoi parameter slots of a reached vertex.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidVertex`] for an out-of-range index
    /// - [`GeodesicError::UnreachedVertex`] if no front reached the vertex
    pub fn voronoi_parameters(&self, vertex: u32) -> GeodesicResult<Vec<VoronoiSlot>> {
        self.check_reached(vertex)?;
        Ok(self.vertices[vertex as usize]
            .voronoi_parameters()
            .copied()
            .collect())
    }

    fn report(&self, iterations: usize, termination: Termination) -> MarchReport {
        let count = |state| self.vertices.iter().filter(|v| v.state == state).count();
        MarchReport {
            dead_count: count(VertexState::Dead),
            alive_count: count(VertexState::Alive),
            far_count: count(VertexState::Far),
            iterations,
            termination,
        }
    }

    fn stencil(&self, face: u32, kind: InterpolationKind) -> GeodesicResult<FaceStencil> {
        self.check_face(face)?;
        let vertices = self.connectivity.face(face);
        for &v in &vertices {
            if !self.distance(v).is_finite() {
                return Err(GeodesicError::UnreachedVertex { vertex: v });
            }
        }

        let corners = vertices.map(|v| self.connectivity.position(v));
        let values = vertices.map(|v| self.distance(v));
        let apexes = [0, 1, 2].map(|corner| {
            self.connectivity
                .opposite_apex(face, corner)
                .map(|apex| (self.connectivity.position(apex), self.distance(apex)))
                .filter(|(_, d)| d.is_finite())
        });
        let vertex_gradients = if kind == InterpolationKind::Cubic {
            vertices.map(|v| vertex_gradient(&self.connectivity, |n| self.distance(n), v))
        } else {
            [Vector3::zeros(); 3]
        };

        Ok(FaceStencil {
            face: Some(face),
            corners,
            values,
            apexes,
            vertex_gradients,
        })
    }

    fn validate_weights<'p>(
        &self,
        params: &'p FastMarchingParams,
    ) -> GeodesicResult<Option<&'p [f64]>> {
        let Some(weights) = params.weights.as_deref() else {
            return Ok(None);
        };
        if weights.len() != self.vertex_count() {
            return Err(GeodesicError::WeightCountMismatch {
                expected: self.vertex_count(),
                actual: weights.len(),
            });
        }
        if let Some((vertex, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(GeodesicError::InvalidWeight {
                vertex: vertex as u32,
                weight,
            });
        }
        Ok(Some(weights))
    }

    fn check_vertex(&self, vertex: u32) -> GeodesicResult<()> {
        if (vertex as usize) < self.vertices.len() {
            Ok(())
        } else {
            Err(GeodesicError::InvalidVertex {
                index: vertex,
                vertex_count: self.vertices.len(),
            })
        }
    }

    fn check_reached(&self, vertex: u32) -> GeodesicResult<()> {
        self.check_vertex(vertex)?;
        if self.vertices[vertex as usize].is_reached() {
            Ok(())
        } else {
            Err(GeodesicError::UnreachedVertex { vertex })
        }
    }

    fn check_face(&self, face: u32) -> GeodesicResult<()> {
        if (face as usize) < self.face_count() {
            Ok(())
        } else {
            Err(GeodesicError::InvalidFace {
                index: face,
                face_count: self.face_count(),
            })
        }
    }
}

/// Borrowed state of one march.
struct Marcher<'a> {
    conn: &'a MeshConnectivity,
    vertices: &'a mut [GeodesicVertex],
    weights: Option<&'a [f64]>,
    excluded: &'a [bool],
    band: BinaryHeap<Candidate>,
}

impl Marcher<'_> {
    fn seed(&mut self, sources: &[u32]) {
        for &source in sources {
            let vertex = &mut self.vertices[source as usize];
            vertex.distance = 0.0;
            vertex.state = VertexState::Alive;
            vertex.front = Some(source);
            vertex.overlap.record(source, 0.0);
            self.band.push(Candidate {
                vertex: source,
                distance: 0.0,
            });
        }
    }

    fn run(&mut self, params: &FastMarchingParams) -> (Termination, usize) {
        let mut iterations = 0;
        let termination = loop {
            if params.is_cancelled() {
                break Termination::Cancelled;
            }
            let Some(Candidate { vertex, distance }) = self.band.pop() else {
                break Termination::Exhausted;
            };

            let current = &mut self.vertices[vertex as usize];
            if current.state == VertexState::Dead || distance > current.distance {
                continue;
            }
            if params.stop_radius.is_some_and(|r| distance > r) {
                break Termination::RadiusReached;
            }

            current.state = VertexState::Dead;
            iterations += 1;

            if self.conn.is_boundary(vertex) {
                current.boundary_reached = true;
                if params.stop_at_boundary {
                    break Termination::BoundaryReached(vertex);
                }
            }
            if current.stopping_vertex {
                break Termination::StoppingVertex(vertex);
            }

            self.update_neighbors(vertex);
        };
        (termination, iterations)
    }

    fn update_neighbors(&mut self, vertex: u32) {
        for &face in self.conn.vertex_faces(vertex) {
            let face = self.conn.face(face);
            let Some(corner) = face.iter().position(|&v| v == vertex) else {
                continue;
            };
            let [_, a, b] = rotate(face, corner);
            self.update(a, vertex, b);
            self.update(b, vertex, a);
        }
    }

    /// Update `target` from the newly finalized `from`, using `other` (the
    /// third vertex of the face) when it is Dead as well.
    fn update(&mut self, target: u32, from: u32, other: u32) {
        let t = target as usize;
        if self.vertices[t].state == VertexState::Dead || self.excluded[t] {
            return;
        }

        let weight = self.weights.map_or(1.0, |w| w[t]);
        let p = self.conn.position(target);
        let from_state = &self.vertices[from as usize];
        let (d_from, front_from) = (from_state.distance, from_state.front);
        let p_from = self.conn.position(from);

        let mut candidates: [Option<(f64, Option<u32>)>; 3] = [None; 3];
        candidates[0] = Some((one_point(&p, &p_from, d_from, weight), front_from));

        let other_state = &self.vertices[other as usize];
        if other_state.state == VertexState::Dead {
            let (d_other, front_other) = (other_state.distance, other_state.front);
            let p_other = self.conn.position(other);
            candidates[1] = Some((one_point(&p, &p_other, d_other, weight), front_other));

            let closer = if d_from < d_other || (d_from == d_other && from < other) {
                front_from
            } else {
                front_other
            };
            candidates[2] = two_point(&p, &p_from, d_from, &p_other, d_other, weight)
                .map(|d| (d, closer));
        }

        let vertex = &mut self.vertices[t];
        let mut improved = false;
        for (distance, front) in candidates.into_iter().flatten() {
            if let Some(front) = front {
                vertex.overlap.record(front, distance);
            }
            if distance < vertex.distance {
                vertex.distance = distance;
                vertex.front = front;
                improved = true;
            }
        }

        if improved {
            vertex.state = VertexState::Alive;
            self.band.push(Candidate {
                vertex: target,
                distance: vertex.distance,
            });
        }
    }
}
