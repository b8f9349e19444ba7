//! Geometry atlas: per-source groups of sampled cells covering each
//! Voronoi region.
//!
//! Around a source with trissectors `T_0 .. T_{k-1}` (counter-clockwise),
//! cell `i` is the quadrilateral
//!
//! ```text
//! c00 = T_i   c10 = mid(T_i, T_i+1)   c11 = source   c01 = mid(T_i-1, T_i)
//! ```
//!
//! so consecutive cells share the edge from a midpoint to the source:
//! grid point `(n-1, t)` of cell `i` is grid point `(t, n-1)` of cell
//! `i+1`, and `(n-1, n-1)` is the source in every cell.

// Grid and group sizes fit comfortably in f64 and u32
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use mesh_types::{IndexedMesh, Point2, Point3, Vector3, Vertex};
use nalgebra::center;
use polygon_clip::{polygon_area, PolygonIntersector};
use tracing::{debug, info, warn};

use crate::cell::GeometryCell;
use crate::diagram::VoronoiMesh;
use crate::error::{VoronoiError, VoronoiResult};
use crate::params::AtlasParams;

/// The cells sampled around one source, in counter-clockwise order.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGroup {
    voronoi_vertex: usize,
    source: u32,
    cells: Vec<GeometryCell>,
}

impl CellGroup {
    /// Build a group from a source point and the ring of junctions around
    /// it (position and normal each), ordered counter-clockwise.
    ///
    /// Returns `None` for fewer than three junctions.
    #[must_use]
    pub fn from_ring(
        voronoi_vertex: usize,
        source: u32,
        center_point: (Point3<f64>, Vector3<f64>),
        ring: &[(Point3<f64>, Vector3<f64>)],
        samples: usize,
    ) -> Option<Self> {
        let k = ring.len();
        if k < 3 {
            return None;
        }
        let (c, c_normal) = center_point;
        let midpoint = |a: usize, b: usize| {
            let (pa, na) = ring[a];
            let (pb, nb) = ring[b];
            let n = (na + nb).try_normalize(f64::EPSILON).unwrap_or(na);
            (center(&pa, &pb), n)
        };

        let cells = (0..k)
            .map(|i| {
                let (t, t_normal) = ring[i];
                let (next, next_normal) = midpoint(i, (i + 1) % k);
                let (prev, prev_normal) = midpoint((i + k - 1) % k, i);
                GeometryCell::from_corners(
                    [t, next, c, prev],
                    [t_normal, next_normal, c_normal, prev_normal],
                    samples,
                )
            })
            .collect();

        Some(Self {
            voronoi_vertex,
            source,
            cells,
        })
    }

    /// Index of the Voronoi cell this group covers.
    #[must_use]
    pub const fn voronoi_vertex(&self) -> usize {
        self.voronoi_vertex
    }

    /// The source vertex of the Voronoi cell.
    #[must_use]
    pub const fn source(&self) -> u32 {
        self.source
    }

    /// The sampled cells.
    #[must_use]
    pub fn cells(&self) -> &[GeometryCell] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the group has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The corner shared by all cells.
    #[must_use]
    pub fn center(&self) -> Option<Point3<f64>> {
        self.cells.first().map(|cell| {
            let last = cell.samples() - 1;
            cell.position(last, last)
        })
    }

    /// Grid point `(i, j)` of cell `c`, following the shared edges into the
    /// neighboring cells for `i == n`.
    fn lookup(&self, c: usize, i: usize, j: usize) -> Point3<f64> {
        let n = self.cells[c].samples();
        if i == n {
            self.cells[(c + 1) % self.cells.len()].position(j, n - 2)
        } else {
            self.cells[c].position(i, j)
        }
    }

    /// One Gauss–Seidel pass over the group, in place.
    fn smooth_once(&mut self) {
        let k = self.cells.len();
        let Some(n) = self.cells.first().map(GeometryCell::samples) else {
            return;
        };

        for c in 0..k {
            for i in 1..n {
                for j in 1..n - 1 {
                    let mut sum = Vector3::zeros();
                    for (di, dj) in NEIGHBORS {
                        let ni = i.wrapping_add_signed(di);
                        let nj = j.wrapping_add_signed(dj);
                        sum += self.lookup(c, ni, nj).coords;
                    }
                    let p = Point3::from(sum / 8.0);
                    self.cells[c].set_position(i, j, p);
                    if i == n - 1 {
                        // Shared edge with the next cell
                        self.cells[(c + 1) % k].set_position(j, n - 1, p);
                    }
                }
            }
        }

        let mut sum = Vector3::zeros();
        for cell in &self.cells {
            sum += cell.position(n - 2, n - 2).coords + cell.position(n - 2, n - 1).coords;
        }
        let center = Point3::from(sum / (2 * k) as f64);
        for cell in &mut self.cells {
            cell.set_position(n - 1, n - 1, center);
        }
    }
}

/// The 8-neighborhood; the center has weight zero.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Sampled cells over the Voronoi regions of a marched mesh.
///
/// # Example
///
/// ```
/// use mesh_geodesic::{FastMarchingParams, GeodesicMesh};
/// use mesh_types::icosphere;
/// use mesh_voronoi::{AtlasParams, GeometryAtlas, VoronoiMesh};
///
/// let mut geo = GeodesicMesh::new(&icosphere(3)).unwrap();
/// let params = FastMarchingParams::default();
/// geo.farthest_point_seeds(0, 12, &params).unwrap();
///
/// let diagram = VoronoiMesh::from_geodesic(&geo).unwrap();
/// let mut atlas = GeometryAtlas::init_sampling(&diagram, &AtlasParams::coarse()).unwrap();
/// atlas.smooth_sampling();
/// atlas.recompute_normals();
///
/// let (position, normal) = atlas.positionate_vertex(0, 0, 0.5, 0.5).unwrap();
/// assert!((normal.norm() - 1.0).abs() < 1e-9);
/// assert!(position.coords.norm() < 1.0 + 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAtlas {
    params: AtlasParams,
    groups: Vec<CellGroup>,
}

impl GeometryAtlas {
    /// Sample one cell group per Voronoi cell with at least three
    /// trissectors. Cells with fewer are skipped.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidSampleCount`] for fewer than 3 samples per
    /// edge.
    pub fn init_sampling(diagram: &VoronoiMesh, params: &AtlasParams) -> VoronoiResult<Self> {
        params.validate()?;

        let mut groups = Vec::new();
        for (index, vertex) in diagram.vertices().iter().enumerate() {
            let ring: Vec<(Point3<f64>, Vector3<f64>)> = diagram
                .cell_trissectors(index)
                .into_iter()
                .map(|t| {
                    let junction = &diagram.trissectors()[t];
                    (junction.position, junction.normal)
                })
                .collect();

            match CellGroup::from_ring(
                index,
                vertex.base_vertex,
                (vertex.position, vertex.normal),
                &ring,
                params.samples_per_edge,
            ) {
                Some(group) => groups.push(group),
                None => debug!(
                    cell = index,
                    source = vertex.base_vertex,
                    trissectors = ring.len(),
                    "skipping cell with fewer than three trissectors"
                ),
            }
        }

        if groups.is_empty() {
            warn!(
                cells = diagram.vertex_count(),
                "no Voronoi cell has three trissectors; atlas is empty"
            );
        }
        let atlas = Self::from_groups(groups, *params)?;
        info!(
            groups = atlas.group_count(),
            cells = atlas.cell_count(),
            samples = params.samples_per_edge,
            "Geometry atlas sampled"
        );
        Ok(atlas)
    }

    /// Assemble an atlas from prebuilt groups.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidSampleCount`] if the parameters are invalid or
    /// a cell's grid size differs from `params.samples_per_edge`.
    pub fn from_groups(groups: Vec<CellGroup>, params: AtlasParams) -> VoronoiResult<Self> {
        params.validate()?;
        if let Some(cell) = groups
            .iter()
            .flat_map(|g| g.cells.iter())
            .find(|cell| cell.samples() != params.samples_per_edge)
        {
            return Err(VoronoiError::InvalidSampleCount {
                samples: cell.samples(),
            });
        }
        Ok(Self { params, groups })
    }

    /// The sampling parameters.
    #[must_use]
    pub const fn params(&self) -> &AtlasParams {
        &self.params
    }

    /// All cell groups.
    #[must_use]
    pub fn groups(&self) -> &[CellGroup] {
        &self.groups
    }

    /// A cell group by index.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidGroup`] for an out-of-range index.
    pub fn group(&self, index: usize) -> VoronoiResult<&CellGroup> {
        self.groups.get(index).ok_or(VoronoiError::InvalidGroup {
            index,
            group_count: self.groups.len(),
        })
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of cells over all groups.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.groups.iter().map(CellGroup::len).sum()
    }

    /// Whether the atlas has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// A cell by group and index.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidGroup`] or [`VoronoiError::InvalidCell`].
    pub fn cell(&self, group: usize, cell: usize) -> VoronoiResult<&GeometryCell> {
        let g = self.group(group)?;
        g.cells.get(cell).ok_or(VoronoiError::InvalidCell {
            group,
            index: cell,
            cell_count: g.cells.len(),
        })
    }

    /// Map the parameter-space vertex `(group, cell, u, v)` to a surface
    /// position and unit normal by bilinear lookup in the cell grid.
    ///
    /// # Errors
    ///
    /// - [`VoronoiError::InvalidGroup`] / [`VoronoiError::InvalidCell`]
    /// - [`VoronoiError::InvalidCoordinates`] unless `0 ≤ u, v ≤ 1`
    pub fn positionate_vertex(
        &self,
        group: usize,
        cell: usize,
        u: f64,
        v: f64,
    ) -> VoronoiResult<(Point3<f64>, Vector3<f64>)> {
        let cell = self.cell(group, cell)?;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return Err(VoronoiError::InvalidCoordinates { u, v });
        }
        Ok(cell.sample(u, v))
    }

    /// Laplacian-smooth every group for the configured number of
    /// iterations.
    pub fn smooth_sampling(&mut self) {
        self.smooth_sampling_with(self.params.smoothing_iterations);
    }

    /// Laplacian-smooth every group for `iterations` Gauss–Seidel passes.
    ///
    /// Each interior grid point moves to the mean of its 8 neighbors.
    /// Points on a shared edge are owned by the cell before it and mirrored
    /// into the cell after it; the shared center moves to the mean of its
    /// neighbors across all cells. Outer cell borders stay fixed.
    pub fn smooth_sampling_with(&mut self, iterations: usize) {
        for _ in 0..iterations {
            for group in &mut self.groups {
                group.smooth_once();
            }
        }
        debug!(iterations, groups = self.groups.len(), "atlas smoothed");
    }

    /// Re-derive all normals from the current positions.
    pub fn recompute_normals(&mut self) {
        for cell in self.groups.iter_mut().flat_map(|g| g.cells.iter_mut()) {
            cell.recompute_normals();
        }
    }

    /// Triangulate every cell grid into one mesh. Cells do not share
    /// vertices.
    #[must_use]
    pub fn to_mesh(&self) -> IndexedMesh {
        let n = self.params.samples_per_edge;
        let cells = self.cell_count();
        let mut mesh = IndexedMesh::with_capacity(cells * n * n, cells * 2 * (n - 1) * (n - 1));

        for cell in self.groups.iter().flat_map(|g| g.cells.iter()) {
            let base = mesh.vertices.len() as u32;
            for (p, normal) in cell.positions().iter().zip(cell.normals()) {
                mesh.vertices.push(Vertex::with_normal(*p, *normal));
            }
            let at = |i: usize, j: usize| base + (i * n + j) as u32;
            for i in 0..n - 1 {
                for j in 0..n - 1 {
                    mesh.faces.push([at(i, j), at(i + 1, j), at(i + 1, j + 1)]);
                    mesh.faces.push([at(i, j), at(i + 1, j + 1), at(i, j + 1)]);
                }
            }
        }
        mesh
    }

    /// Area of overlap between two cells' corner quads, both projected onto
    /// the tangent plane at the center of the first cell's group.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidGroup`] / [`VoronoiError::InvalidCell`].
    pub fn cell_overlap(&self, a: (usize, usize), b: (usize, usize)) -> VoronoiResult<f64> {
        let (pa, pb) = self.projected_quads(a, b)?;
        let mut clip = PolygonIntersector::new();
        clip.perform_intersection(&pa, &pb);
        Ok(clip.area())
    }

    /// [`cell_overlap`](Self::cell_overlap) as a fraction of the first
    /// cell's projected area; zero for a degenerate first cell.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::InvalidGroup`] / [`VoronoiError::InvalidCell`].
    pub fn overlap_weight(&self, a: (usize, usize), b: (usize, usize)) -> VoronoiResult<f64> {
        let (pa, _) = self.projected_quads(a, b)?;
        let area = polygon_area(&pa);
        if area <= f64::EPSILON {
            return Ok(0.0);
        }
        Ok(self.cell_overlap(a, b)? / area)
    }

    fn projected_quads(
        &self,
        a: (usize, usize),
        b: (usize, usize),
    ) -> VoronoiResult<(Vec<Point2<f64>>, Vec<Point2<f64>>)> {
        let cell_a = self.cell(a.0, a.1)?;
        let cell_b = self.cell(b.0, b.1)?;

        let last = cell_a.samples() - 1;
        let origin = cell_a.position(last, last);
        let normal = cell_a.normal(last, last);
        let x_axis = any_orthogonal(&normal);
        let y_axis = normal.cross(&x_axis);

        let project = |cell: &GeometryCell| -> Vec<Point2<f64>> {
            cell.corners()
                .iter()
                .map(|p| {
                    let d = p - origin;
                    Point2::new(d.dot(&x_axis), d.dot(&y_axis))
                })
                .collect()
        };
        Ok((project(cell_a), project(cell_b)))
    }
}

/// A unit vector orthogonal to `n`.
fn any_orthogonal(n: &Vector3<f64>) -> Vector3<f64> {
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    n.cross(&helper).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x)
}
