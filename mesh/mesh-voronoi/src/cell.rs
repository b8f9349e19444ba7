//! Sampled quadrilateral surface patches.

// Grid sizes fit comfortably in f64 and u32
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use mesh_types::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `n×n` grid of positions and normals sampling one quadrilateral patch.
///
/// Grid point `(i, j)` sits at cell coordinates
/// `(u, v) = (i / (n-1), j / (n-1))`. The four corners are
/// `c00 = (0, 0)`, `c10 = (1, 0)`, `c11 = (1, 1)` and `c01 = (0, 1)`.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Vector3};
/// use mesh_voronoi::GeometryCell;
///
/// let cell = GeometryCell::from_corners(
///     [
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(2.0, 0.0, 0.0),
///         Point3::new(2.0, 2.0, 0.0),
///         Point3::new(0.0, 2.0, 0.0),
///     ],
///     [Vector3::z(); 4],
///     5,
/// );
/// assert_eq!(cell.position(2, 2), Point3::new(1.0, 1.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryCell {
    samples: usize,
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl GeometryCell {
    /// Bilinearly sample the patch spanned by `corners` (`c00, c10, c11,
    /// c01`) and their normals. `samples` must be at least 2.
    #[must_use]
    pub fn from_corners(corners: [Point3<f64>; 4], normals: [Vector3<f64>; 4], samples: usize) -> Self {
        let samples = samples.max(2);
        let step = 1.0 / (samples - 1) as f64;
        let fallback = plane_normal(&corners);

        let mut cell = Self {
            samples,
            positions: Vec::with_capacity(samples * samples),
            normals: Vec::with_capacity(samples * samples),
        };
        for i in 0..samples {
            for j in 0..samples {
                let w = bilinear_weights(i as f64 * step, j as f64 * step);
                let p = corners
                    .iter()
                    .zip(w)
                    .fold(Vector3::zeros(), |acc, (c, w)| acc + c.coords * w);
                let n = normals.iter().zip(w).fold(Vector3::zeros(), |acc, (n, w)| acc + n * w);
                cell.positions.push(Point3::from(p));
                cell.normals.push(n.try_normalize(f64::EPSILON).unwrap_or(fallback));
            }
        }
        cell
    }

    /// Samples along each edge.
    #[inline]
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    #[inline]
    const fn index(&self, i: usize, j: usize) -> usize {
        i * self.samples + j
    }

    /// Position of grid point `(i, j)`. Both indices must be below
    /// [`samples`](Self::samples).
    #[inline]
    #[must_use]
    pub fn position(&self, i: usize, j: usize) -> Point3<f64> {
        self.positions[self.index(i, j)]
    }

    /// Unit normal of grid point `(i, j)`. Both indices must be below
    /// [`samples`](Self::samples).
    #[inline]
    #[must_use]
    pub fn normal(&self, i: usize, j: usize) -> Vector3<f64> {
        self.normals[self.index(i, j)]
    }

    /// Move grid point `(i, j)`.
    #[inline]
    pub fn set_position(&mut self, i: usize, j: usize, position: Point3<f64>) {
        let k = self.index(i, j);
        self.positions[k] = position;
    }

    /// All positions, row `i` major.
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All normals, row `i` major.
    #[must_use]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Current corner positions `c00, c10, c11, c01`.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 4] {
        let last = self.samples - 1;
        [
            self.position(0, 0),
            self.position(last, 0),
            self.position(last, last),
            self.position(0, last),
        ]
    }

    /// Bilinear lookup of position and normal at cell coordinates
    /// `(u, v)`, clamped to the unit square.
    #[must_use]
    pub fn sample(&self, u: f64, v: f64) -> (Point3<f64>, Vector3<f64>) {
        let last = self.samples - 1;
        let (i, s) = split_coordinate(u, last);
        let (j, t) = split_coordinate(v, last);

        let cells = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
        let w = bilinear_weights(s, t);
        let mut p = Vector3::zeros();
        let mut n = Vector3::zeros();
        for ((ci, cj), w) in cells.into_iter().zip(w) {
            p += self.position(ci, cj).coords * w;
            n += self.normal(ci, cj) * w;
        }
        let fallback = self.normal(i, j);
        (Point3::from(p), n.try_normalize(f64::EPSILON).unwrap_or(fallback))
    }

    /// Surface area of the triangulated grid.
    #[must_use]
    pub fn area(&self) -> f64 {
        let mut area = 0.0;
        for i in 0..self.samples - 1 {
            for j in 0..self.samples - 1 {
                let [a, b, c, d] = self.quad(i, j);
                area += 0.5 * (b - a).cross(&(c - a)).norm();
                area += 0.5 * (c - a).cross(&(d - a)).norm();
            }
        }
        area
    }

    /// Corners of grid quad `(i, j)` in counter-clockwise order.
    fn quad(&self, i: usize, j: usize) -> [Point3<f64>; 4] {
        [
            self.position(i, j),
            self.position(i + 1, j),
            self.position(i + 1, j + 1),
            self.position(i, j + 1),
        ]
    }

    /// Re-derive normals from the sampled positions by central differences
    /// (one-sided on the border). Normals keep the side of the old ones.
    pub fn recompute_normals(&mut self) {
        let last = self.samples - 1;
        for i in 0..self.samples {
            for j in 0..self.samples {
                let du = self.position((i + 1).min(last), j) - self.position(i.saturating_sub(1), j);
                let dv = self.position(i, (j + 1).min(last)) - self.position(i, j.saturating_sub(1));
                let old = self.normal(i, j);
                if let Some(mut n) = du.cross(&dv).try_normalize(f64::EPSILON) {
                    if n.dot(&old) < 0.0 {
                        n = -n;
                    }
                    let k = self.index(i, j);
                    self.normals[k] = n;
                }
            }
        }
    }
}

/// Weights of `c00, c10, c11, c01` at `(u, v)`.
fn bilinear_weights(u: f64, v: f64) -> [f64; 4] {
    [(1.0 - u) * (1.0 - v), u * (1.0 - v), u * v, (1.0 - u) * v]
}

/// Grid interval index and fraction for a coordinate in `[0, 1]`.
fn split_coordinate(x: f64, last: usize) -> (usize, f64) {
    let scaled = x.clamp(0.0, 1.0) * last as f64;
    let index = (scaled.floor() as usize).min(last - 1);
    (index, scaled - index as f64)
}

fn plane_normal(corners: &[Point3<f64>; 4]) -> Vector3<f64> {
    let n = (corners[2] - corners[0]).cross(&(corners[3] - corners[1]));
    n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z)
}
