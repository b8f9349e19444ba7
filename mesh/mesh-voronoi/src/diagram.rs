//! Geodesic Voronoi diagram extracted from a marched mesh.
//!
//! Every source of the march owns one cell: the set of vertices its front
//! reached first. Mesh edges joining two cells are boundary edges, and faces
//! whose three corners belong to three different cells are trissectors, the
//! junctions where three cells meet. Trissectors become the triangles of the
//! dual [`VoronoiMesh`].

// Cell and vertex counts fit comfortably in f64 and u32
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use hashbrown::{HashMap, HashSet};
use mesh_geodesic::{GeodesicError, GeodesicMesh, MeshConnectivity, VoronoiSlot};
use mesh_types::{IndexedMesh, Point3, Triangle, Vector3, Vertex};
use tracing::{debug, info};

use crate::error::{VoronoiError, VoronoiResult};

/// Distances at or below this count as "on the source".
const ZERO_DISTANCE: f64 = 1e-12;

/// One Voronoi cell, anchored at the source vertex that seeded it.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiVertex {
    /// Index of the source vertex in the marched mesh.
    pub base_vertex: u32,
    /// Position of the source vertex.
    pub position: Point3<f64>,
    /// Unit normal at the source vertex.
    pub normal: Vector3<f64>,
    neighbors: Vec<usize>,
}

impl VoronoiVertex {
    /// Indices of the cells sharing at least one boundary edge with this
    /// one, ascending.
    #[must_use]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }
}

/// A junction of three cells.
///
/// Edge-connected faces with the same three cells are merged into one
/// junction. The same three cells may meet at several separate junctions,
/// as at the two poles of a sphere with three equatorial sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Trissector {
    /// The three cells, in the winding order of the first face found.
    pub cells: [usize; 3],
    /// Mesh faces whose corners belong to exactly these three cells.
    pub faces: Vec<u32>,
    /// Mean of the face centroids.
    pub position: Point3<f64>,
    /// Mean face normal.
    pub normal: Vector3<f64>,
}

impl Trissector {
    /// Whether `cell` is one of the three cells meeting here.
    #[must_use]
    pub fn touches(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }
}

/// Voronoi diagram of a marched [`GeodesicMesh`] and its dual mesh.
///
/// # Example
///
/// ```
/// use mesh_geodesic::{FastMarchingParams, GeodesicMesh};
/// use mesh_types::planar_grid;
/// use mesh_voronoi::VoronoiMesh;
///
/// let mut geo = GeodesicMesh::new(&planar_grid(16, 16, 1.0)).unwrap();
/// // Sources at grid points (4, 4), (12, 4) and (8, 12)
/// geo.march(&[72, 80, 212], &FastMarchingParams::default()).unwrap();
///
/// let diagram = VoronoiMesh::from_geodesic(&geo).unwrap();
/// assert_eq!(diagram.vertex_count(), 3);
/// assert_eq!(diagram.trissectors().len(), 1);
/// assert_eq!(diagram.to_mesh().faces.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiMesh {
    vertices: Vec<VoronoiVertex>,
    trissectors: Vec<Trissector>,
    boundary_edges: Vec<[u32; 2]>,
    cell_of_source: HashMap<u32, usize>,
}

impl VoronoiMesh {
    /// Extract the diagram from the fronts of a completed march.
    ///
    /// Vertices not reached by any front belong to no cell; faces touching
    /// them are neither boundaries nor trissectors.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::NotMarched`] if no vertex has a front.
    pub fn from_geodesic(geo: &GeodesicMesh) -> VoronoiResult<Self> {
        let conn = geo.connectivity();

        let mut sources: Vec<u32> = geo.vertices().iter().filter_map(|v| v.front()).collect();
        sources.sort_unstable();
        sources.dedup();
        if sources.is_empty() {
            return Err(VoronoiError::NotMarched);
        }

        let cell_of_source: HashMap<u32, usize> = sources
            .iter()
            .enumerate()
            .map(|(cell, &source)| (source, cell))
            .collect();
        let cell_of = |vertex: u32| geo.front(vertex).and_then(|f| cell_of_source.get(&f).copied());

        let mut vertices: Vec<VoronoiVertex> = sources
            .iter()
            .map(|&source| VoronoiVertex {
                base_vertex: source,
                position: conn.position(source),
                normal: conn.normal(source),
                neighbors: Vec::new(),
            })
            .collect();

        let mut seen_edges: HashSet<(u32, u32)> = HashSet::new();
        let mut adjacent: HashSet<(usize, usize)> = HashSet::new();
        let mut boundary_edges = Vec::new();
        let mut junction_faces: Vec<JunctionFace> = Vec::new();
        let mut slot_of_face: HashMap<u32, usize> = HashMap::new();

        for (face_index, &face) in conn.faces().iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (face[k], face[(k + 1) % 3]);
                let key = (a.min(b), a.max(b));
                if !seen_edges.insert(key) {
                    continue;
                }
                if let (Some(ca), Some(cb)) = (cell_of(a), cell_of(b)) {
                    if ca != cb {
                        boundary_edges.push([key.0, key.1]);
                        adjacent.insert((ca.min(cb), ca.max(cb)));
                    }
                }
            }

            let (Some(c0), Some(c1), Some(c2)) = (cell_of(face[0]), cell_of(face[1]), cell_of(face[2]))
            else {
                continue;
            };
            if c0 == c1 || c1 == c2 || c0 == c2 {
                continue;
            }

            let triangle = Triangle::new(
                conn.position(face[0]),
                conn.position(face[1]),
                conn.position(face[2]),
            );
            let normal = triangle.normal().unwrap_or_else(|| {
                let sum = conn.normal(face[0]) + conn.normal(face[1]) + conn.normal(face[2]);
                sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z)
            });

            let mut key = [c0, c1, c2];
            key.sort_unstable();
            slot_of_face.insert(face_index as u32, junction_faces.len());
            junction_faces.push(JunctionFace {
                face: face_index as u32,
                cells: [c0, c1, c2],
                key,
                centroid: triangle.centroid(),
                normal,
            });
        }

        let mut trissectors = cluster_junctions(conn, &junction_faces, &slot_of_face);
        for junction in &mut trissectors {
            let count = junction.faces.len() as f64;
            junction.position = Point3::from(junction.position.coords / count);
            junction.normal = junction.normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        }

        for &(a, b) in &adjacent {
            vertices[a].neighbors.push(b);
            vertices[b].neighbors.push(a);
        }
        for vertex in &mut vertices {
            vertex.neighbors.sort_unstable();
        }

        info!(
            cells = vertices.len(),
            trissectors = trissectors.len(),
            boundary_edges = boundary_edges.len(),
            "Voronoi diagram extracted"
        );

        Ok(Self {
            vertices,
            trissectors,
            boundary_edges,
            cell_of_source,
        })
    }

    /// The cells, ordered by source vertex index.
    #[must_use]
    pub fn vertices(&self) -> &[VoronoiVertex] {
        &self.vertices
    }

    /// Number of cells.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// A cell by index.
    #[must_use]
    pub fn vertex(&self, cell: usize) -> Option<&VoronoiVertex> {
        self.vertices.get(cell)
    }

    /// The cell seeded by `source`, if it is one of the march sources.
    #[must_use]
    pub fn cell_of(&self, source: u32) -> Option<usize> {
        self.cell_of_source.get(&source).copied()
    }

    /// All junctions of three cells.
    #[must_use]
    pub fn trissectors(&self) -> &[Trissector] {
        &self.trissectors
    }

    /// Mesh edges `[a, b]` (with `a < b`) whose endpoints lie in different
    /// cells.
    #[must_use]
    pub fn boundary_edges(&self) -> &[[u32; 2]] {
        &self.boundary_edges
    }

    /// Trissectors around `cell`, ordered counter-clockwise about the
    /// cell's normal.
    ///
    /// Angles are measured in the tangent plane at the source vertex;
    /// equal angles keep the order in which the junctions were found.
    #[must_use]
    pub fn cell_trissectors(&self, cell: usize) -> Vec<usize> {
        let Some(vertex) = self.vertices.get(cell) else {
            return Vec::new();
        };
        let mut around: Vec<usize> = (0..self.trissectors.len())
            .filter(|&t| self.trissectors[t].touches(cell))
            .collect();
        if around.len() < 2 {
            return around;
        }

        let normal = if vertex.normal.norm_squared() > 0.0 {
            vertex.normal
        } else {
            around
                .iter()
                .map(|&t| self.trissectors[t].normal)
                .sum::<Vector3<f64>>()
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::z)
        };
        let tangent = |t: usize| {
            let d = self.trissectors[t].position - vertex.position;
            d - normal * d.dot(&normal)
        };

        let Some(x_axis) = around
            .iter()
            .find_map(|&t| tangent(t).try_normalize(f64::EPSILON))
        else {
            debug!(cell, "all junctions project onto the source");
            return around;
        };
        let y_axis = normal.cross(&x_axis);

        let angle = |t: usize| {
            let d = tangent(t);
            d.dot(&y_axis).atan2(d.dot(&x_axis)).rem_euclid(std::f64::consts::TAU)
        };
        around.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
        around
    }

    /// Dual triangles, one per trissector, as cell index triples.
    #[must_use]
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.trissectors.iter().map(|t| t.cells).collect()
    }

    /// The dual mesh: one vertex per cell (at its source) and one triangle
    /// per trissector.
    #[must_use]
    pub fn to_mesh(&self) -> IndexedMesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::with_normal(v.position, v.normal))
            .collect();
        let faces = self
            .trissectors
            .iter()
            .map(|t| t.cells.map(|c| c as u32))
            .collect();
        IndexedMesh::from_parts(vertices, faces)
    }

    /// Voronoi parameters of one mesh vertex: a slot for its own front and
    /// each distinct overlapping front, weighted by normalized inverse
    /// distance.
    ///
    /// A front reaching the vertex at zero distance takes the full weight.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidVertex`] / [`GeodesicError::UnreachedVertex`]
    ///   (wrapped) for bad or unreached vertices
    /// - [`VoronoiError::UnknownFront`] if a front has no cell in this
    ///   diagram
    pub fn vertex_parameters(&self, geo: &GeodesicMesh, vertex: u32) -> VoronoiResult<Vec<VoronoiSlot>> {
        let state = geo.vertex(vertex)?;
        let Some(front) = state.front() else {
            return Err(GeodesicError::UnreachedVertex { vertex }.into());
        };

        let mut fronts: Vec<(u32, f64)> = vec![(front, state.distance())];
        for (other, distance) in state.front_overlap().iter() {
            match fronts.iter_mut().find(|(f, _)| *f == other) {
                Some(entry) => entry.1 = entry.1.min(distance),
                None => fronts.push((other, distance)),
            }
        }

        let on_source = fronts.iter().position(|&(_, d)| d <= ZERO_DISTANCE);
        let inverse_sum: f64 = fronts.iter().map(|&(_, d)| 1.0 / d).sum();

        fronts
            .iter()
            .enumerate()
            .map(|(i, &(f, d))| {
                let cell = self
                    .cell_of(f)
                    .ok_or(VoronoiError::UnknownFront { front: f })?;
                let parameter = match on_source {
                    Some(j) if i == j => 1.0,
                    Some(_) => 0.0,
                    None => (1.0 / d) / inverse_sum,
                };
                Ok(VoronoiSlot {
                    voronoi_vertex: cell,
                    parameter,
                })
            })
            .collect()
    }

    /// Compute and store the Voronoi parameters of every reached vertex.
    ///
    /// Unreached vertices are skipped. Returns the number of vertices that
    /// received parameters.
    ///
    /// # Errors
    ///
    /// [`VoronoiError::UnknownFront`] if the mesh was re-marched with other
    /// sources since this diagram was built.
    pub fn assign_parameters(&self, geo: &mut GeodesicMesh) -> VoronoiResult<usize> {
        let mut assigned = 0;
        for vertex in 0..geo.vertex_count() as u32 {
            match self.vertex_parameters(geo, vertex) {
                Ok(slots) => {
                    geo.set_voronoi_parameters(vertex, &slots)?;
                    assigned += 1;
                }
                Err(VoronoiError::Geodesic(GeodesicError::UnreachedVertex { .. })) => {}
                Err(err) => return Err(err),
            }
        }

        debug!(
            assigned,
            skipped = geo.vertex_count() - assigned,
            "Voronoi parameters assigned"
        );
        Ok(assigned)
    }
}

/// A mesh face whose corners lie in three different cells.
struct JunctionFace {
    face: u32,
    cells: [usize; 3],
    key: [usize; 3],
    centroid: Point3<f64>,
    normal: Vector3<f64>,
}

/// Merge edge-connected junction faces sharing the same cells into
/// trissectors (union-find over face neighbours). Positions and normals
/// are left as running sums.
fn cluster_junctions(
    conn: &MeshConnectivity,
    junction_faces: &[JunctionFace],
    slot_of_face: &HashMap<u32, usize>,
) -> Vec<Trissector> {
    let mut parent: Vec<usize> = (0..junction_faces.len()).collect();
    for (slot, junction) in junction_faces.iter().enumerate() {
        for corner in 0..3 {
            let Some(&other) = conn
                .face_neighbor(junction.face, corner)
                .and_then(|f| slot_of_face.get(&f))
            else {
                continue;
            };
            if junction_faces[other].key == junction.key {
                let (a, b) = (find_root(&mut parent, slot), find_root(&mut parent, other));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }
    }

    let mut trissector_of_root: HashMap<usize, usize> = HashMap::new();
    let mut trissectors: Vec<Trissector> = Vec::new();
    for (slot, junction) in junction_faces.iter().enumerate() {
        let root = find_root(&mut parent, slot);
        if let Some(&existing) = trissector_of_root.get(&root) {
            let trissector = &mut trissectors[existing];
            trissector.faces.push(junction.face);
            trissector.position += junction.centroid.coords;
            trissector.normal += junction.normal;
        } else {
            trissector_of_root.insert(root, trissectors.len());
            trissectors.push(Trissector {
                cells: junction.cells,
                faces: vec![junction.face],
                position: junction.centroid,
                normal: junction.normal,
            });
        }
    }
    trissectors
}

fn find_root(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
