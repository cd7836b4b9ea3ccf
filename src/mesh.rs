//! Triangle meshes with boundary edges and integer attributes.
use itertools::Itertools;
use nalgebra::{Point2, RealField, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod procedural;

/// Index-based triangle mesh in two dimensions, together with an explicit list of boundary edges.
///
/// Vertices, triangles and edges each carry an integer attribute (0 unless set otherwise).
/// Boundary conditions are selected by edge attribute.
///
/// Triangles are expected to be oriented counter-clockwise. Boundary edges are oriented as in
/// their adjacent triangle, so that the domain lies to the left of each edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangleMesh2d<T: Scalar> {
    vertices: Vec<Point2<T>>,
    triangles: Vec<[usize; 3]>,
    edges: Vec<[usize; 2]>,
    vertex_attributes: Vec<usize>,
    triangle_attributes: Vec<usize>,
    edge_attributes: Vec<usize>,
}

impl<T: Scalar> TriangleMesh2d<T> {
    /// Constructs a mesh from vertices, triangles and (boundary) edges. All attributes are zero.
    ///
    /// # Panics
    ///
    /// Panics if a triangle or an edge references a vertex index out of bounds.
    pub fn from_parts(vertices: Vec<Point2<T>>, triangles: Vec<[usize; 3]>, edges: Vec<[usize; 2]>) -> Self {
        let num_vertices = vertices.len();
        for (t, triangle) in triangles.iter().enumerate() {
            assert!(
                triangle.iter().all(|&v| v < num_vertices),
                "Triangle {} references vertex out of bounds (num vertices: {})",
                t,
                num_vertices
            );
        }
        for (e, edge) in edges.iter().enumerate() {
            assert!(
                edge.iter().all(|&v| v < num_vertices),
                "Edge {} references vertex out of bounds (num vertices: {})",
                e,
                num_vertices
            );
        }
        Self {
            vertex_attributes: vec![0; num_vertices],
            triangle_attributes: vec![0; triangles.len()],
            edge_attributes: vec![0; edges.len()],
            vertices,
            triangles,
            edges,
        }
    }

    /// Constructs a mesh from vertices and triangles, extracting the boundary edges.
    ///
    /// An edge is on the boundary if it belongs to exactly one triangle. Boundary edges keep the
    /// orientation they have in their triangle and are listed in order of first appearance.
    ///
    /// # Panics
    ///
    /// Panics if a triangle references a vertex index out of bounds.
    pub fn from_vertices_and_triangles(vertices: Vec<Point2<T>>, triangles: Vec<[usize; 3]>) -> Self {
        let local_edges = |[a, b, c]: [usize; 3]| [[a, b], [b, c], [c, a]];
        let sorted = |[a, b]: [usize; 2]| if a <= b { [a, b] } else { [b, a] };

        // BTreeMap keeps the extraction deterministic
        let mut edge_counts = BTreeMap::new();
        for triangle in &triangles {
            for edge in local_edges(*triangle) {
                *edge_counts.entry(sorted(edge)).or_insert(0usize) += 1;
            }
        }

        let edges = triangles
            .iter()
            .flat_map(|triangle| local_edges(*triangle))
            .filter(|edge| edge_counts.get(&sorted(*edge)) == Some(&1))
            .collect();

        Self::from_parts(vertices, triangles, edges)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    pub fn vertex(&self, vertex_index: usize) -> &Point2<T> {
        &self.vertices[vertex_index]
    }

    /// Global vertex indices of the given triangle.
    pub fn triangle_vertices(&self, triangle_index: usize) -> [usize; 3] {
        self.triangles[triangle_index]
    }

    /// Global vertex indices of the given edge.
    pub fn edge_vertices(&self, edge_index: usize) -> [usize; 2] {
        self.edges[edge_index]
    }

    /// Global index of local vertex `local_index` (0, 1 or 2) of the given triangle.
    pub fn triangle_vertex_index(&self, triangle_index: usize, local_index: usize) -> usize {
        assert!(local_index < 3, "Local triangle vertex index must be 0, 1 or 2");
        self.triangles[triangle_index][local_index]
    }

    /// Global index of local vertex `local_index` (0 or 1) of the given edge.
    pub fn edge_vertex_index(&self, edge_index: usize, local_index: usize) -> usize {
        assert!(local_index < 2, "Local edge vertex index must be 0 or 1");
        self.edges[edge_index][local_index]
    }

    pub fn vertex_attribute(&self, vertex_index: usize) -> usize {
        self.vertex_attributes[vertex_index]
    }

    pub fn triangle_attribute(&self, triangle_index: usize) -> usize {
        self.triangle_attributes[triangle_index]
    }

    pub fn edge_attribute(&self, edge_index: usize) -> usize {
        self.edge_attributes[edge_index]
    }

    pub fn edge_attributes(&self) -> &[usize] {
        &self.edge_attributes
    }

    pub fn set_vertex_attribute(&mut self, vertex_index: usize, attribute: usize) {
        self.vertex_attributes[vertex_index] = attribute;
    }

    pub fn set_triangle_attribute(&mut self, triangle_index: usize, attribute: usize) {
        self.triangle_attributes[triangle_index] = attribute;
    }

    pub fn set_edge_attribute(&mut self, edge_index: usize, attribute: usize) {
        self.edge_attributes[edge_index] = attribute;
    }

    /// Returns a sorted list of the vertices that belong to at least one edge.
    pub fn boundary_vertices(&self) -> Vec<usize> {
        self.edges
            .iter()
            .flatten()
            .copied()
            .sorted_unstable()
            .dedup()
            .collect()
    }
}

impl<T: RealField + Copy> TriangleMesh2d<T> {
    /// Sets the attribute of every vertex whose position satisfies the predicate.
    ///
    /// Returns the number of vertices that were updated.
    pub fn set_vertex_attributes_where(&mut self, predicate: impl Fn(&Point2<T>) -> bool, attribute: usize) -> usize {
        let mut count = 0;
        for (v, attr) in self.vertices.iter().zip(&mut self.vertex_attributes) {
            if predicate(v) {
                *attr = attribute;
                count += 1;
            }
        }
        count
    }

    /// Sets the attribute of every edge whose midpoint satisfies the predicate.
    ///
    /// Returns the number of edges that were updated.
    pub fn set_edge_attributes_where(&mut self, predicate: impl Fn(&Point2<T>) -> bool, attribute: usize) -> usize {
        let mut count = 0;
        for (&[a, b], attr) in self.edges.iter().zip(&mut self.edge_attributes) {
            let midpoint = nalgebra::center(&self.vertices[a], &self.vertices[b]);
            if predicate(&midpoint) {
                *attr = attribute;
                count += 1;
            }
        }
        count
    }

    /// Sets the attribute of every triangle whose centroid satisfies the predicate.
    ///
    /// Returns the number of triangles that were updated.
    pub fn set_triangle_attributes_where(&mut self, predicate: impl Fn(&Point2<T>) -> bool, attribute: usize) -> usize {
        let three = T::one() + T::one() + T::one();
        let mut count = 0;
        for (&[a, b, c], attr) in self.triangles.iter().zip(&mut self.triangle_attributes) {
            let [a, b, c] = [&self.vertices[a], &self.vertices[b], &self.vertices[c]];
            let centroid = Point2::from((a.coords + b.coords + c.coords) / three);
            if predicate(&centroid) {
                *attr = attribute;
                count += 1;
            }
        }
        count
    }
}
