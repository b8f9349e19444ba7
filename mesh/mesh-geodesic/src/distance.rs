//! Exported result of a march: per-vertex distance and front.

// Mesh indices are u32
#![allow(clippy::cast_possible_truncation)]

use std::cmp::Ordering;

/// Per-vertex geodesic distance and the source whose front reached it.
///
/// `f64::INFINITY` and `None` mark vertices no front reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    distances: Vec<f64>,
    fronts: Vec<Option<u32>>,
}

impl DistanceField {
    /// Field with every vertex unreached.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            distances: vec![f64::INFINITY; vertex_count],
            fronts: vec![None; vertex_count],
        }
    }

    /// Field from parallel distance and front vectors.
    ///
    /// Missing front entries are padded with `None`; extra ones are dropped.
    #[must_use]
    pub fn from_parts(distances: Vec<f64>, mut fronts: Vec<Option<u32>>) -> Self {
        fronts.resize(distances.len(), None);
        Self { distances, fronts }
    }

    /// Distance at a vertex; `INFINITY` if unreached or out of bounds.
    #[inline]
    #[must_use]
    pub fn distance(&self, vertex: u32) -> f64 {
        self.distances
            .get(vertex as usize)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Source whose front reached a vertex.
    #[inline]
    #[must_use]
    pub fn front(&self, vertex: u32) -> Option<u32> {
        self.fronts.get(vertex as usize).copied().flatten()
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether the field covers no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// All distances.
    #[inline]
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// All fronts.
    #[inline]
    #[must_use]
    pub fn fronts(&self) -> &[Option<u32>] {
        &self.fronts
    }

    /// Smallest strictly positive finite distance.
    #[must_use]
    pub fn min_distance(&self) -> f64 {
        self.distances
            .iter()
            .copied()
            .filter(|&d| d > 0.0 && d.is_finite())
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest finite distance; `NEG_INFINITY` when nothing was reached.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.distances
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of vertices with a finite distance.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Iterate over `(vertex, distance)` pairs with finite distance.
    pub fn iter_reachable(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(i, &d)| (i as u32, d))
    }

    /// Vertices whose closest source is `source`.
    pub fn region(&self, source: u32) -> impl Iterator<Item = u32> + '_ {
        self.fronts
            .iter()
            .enumerate()
            .filter(move |(_, f)| **f == Some(source))
            .map(|(i, _)| i as u32)
    }

    /// Reached vertex with the largest distance; ties go to the smaller index.
    #[must_use]
    pub fn farthest_vertex(&self) -> Option<(u32, f64)> {
        self.iter_reachable().max_by(|(va, da), (vb, db)| {
            da.total_cmp(db).then_with(|| vb.cmp(va))
        })
    }

    /// Distances scaled to `[0, 1]` by the largest finite distance.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max_distance();
        if max <= 0.0 || !max.is_finite() {
            return self.clone();
        }

        Self {
            distances: self
                .distances
                .iter()
                .map(|&d| if d.is_finite() { d / max } else { d })
                .collect(),
            fronts: self.fronts.clone(),
        }
    }

    /// Compare two vertices by distance, then index.
    #[must_use]
    pub fn compare(&self, a: u32, b: u32) -> Ordering {
        self.distance(a)
            .total_cmp(&self.distance(b))
            .then_with(|| a.cmp(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field() -> DistanceField {
        DistanceField::from_parts(
            vec![0.0, 1.0, f64::INFINITY, 2.0, 2.0],
            vec![Some(0), Some(0), None, Some(4), Some(0)],
        )
    }

    #[test]
    fn new_field_is_unreached() {
        let df = DistanceField::new(3);
        assert_eq!(df.len(), 3);
        assert!(df.distance(0).is_infinite());
        assert_eq!(df.front(2), None);
        assert_eq!(df.reachable_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_unreached() {
        let df = field();
        assert!(df.distance(10).is_infinite());
        assert_eq!(df.front(10), None);
    }

    #[test]
    fn min_max_and_farthest() {
        let df = field();
        assert_relative_eq!(df.min_distance(), 1.0, epsilon = f64::EPSILON);
        assert_relative_eq!(df.max_distance(), 2.0, epsilon = f64::EPSILON);
        // Tie between 3 and 4 resolves to the smaller index
        assert_eq!(df.farthest_vertex(), Some((3, 2.0)));
        assert_eq!(df.reachable_count(), 4);
    }

    #[test]
    fn region_collects_front_members() {
        let df = field();
        assert_eq!(df.region(0).collect::<Vec<_>>(), vec![0, 1, 4]);
        assert_eq!(df.region(4).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn normalized_keeps_fronts() {
        let norm = field().normalized();
        assert_relative_eq!(norm.distance(1), 0.5, epsilon = f64::EPSILON);
        assert!(norm.distance(2).is_infinite());
        assert_eq!(norm.front(3), Some(4));
    }

    #[test]
    fn padding_of_fronts() {
        let df = DistanceField::from_parts(vec![0.0, 1.0], vec![Some(0)]);
        assert_eq!(df.fronts(), &[Some(0), None]);
        assert_eq!(df.compare(0, 1), Ordering::Less);
    }
}
