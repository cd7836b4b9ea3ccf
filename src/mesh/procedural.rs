//! Basic procedural mesh generation routines.
use crate::mesh::TriangleMesh2d;
use nalgebra::{Point2, RealField, Vector2};

/// Attribute given to the boundary edges of procedurally generated meshes.
pub const BOUNDARY_ATTRIBUTE: usize = 1;

/// Uniform triangulation of the unit square `[0, 1]²` with `cells_per_dim` squares per
/// dimension, each split into two triangles.
pub fn create_unit_square_uniform_tri_mesh_2d<T>(cells_per_dim: usize) -> TriangleMesh2d<T>
where
    T: RealField + Copy,
{
    create_rectangular_uniform_tri_mesh_2d(
        &Point2::origin(),
        &Vector2::new(T::one(), T::one()),
        cells_per_dim,
        cells_per_dim,
    )
}

/// Uniform triangulation of the axis-aligned rectangle `origin + [0, extents.x] × [0, extents.y]`.
///
/// Each of the `cells_x × cells_y` rectangular cells is split along its diagonal into two
/// counter-clockwise triangles. Boundary edges are extracted and tagged with
/// [`BOUNDARY_ATTRIBUTE`], all other attributes are zero. If either cell count is zero, the
/// mesh is empty.
pub fn create_rectangular_uniform_tri_mesh_2d<T>(
    origin: &Point2<T>,
    extents: &Vector2<T>,
    cells_x: usize,
    cells_y: usize,
) -> TriangleMesh2d<T>
where
    T: RealField + Copy,
{
    if cells_x == 0 || cells_y == 0 {
        return TriangleMesh2d::from_parts(Vec::new(), Vec::new(), Vec::new());
    }

    let to_t = |n: usize| T::from_usize(n).expect("Must be able to fit usize in T");
    let hx = extents.x / to_t(cells_x);
    let hy = extents.y / to_t(cells_y);
    let to_global_vertex_index = |i: usize, j: usize| (cells_x + 1) * j + i;

    let mut vertices = Vec::with_capacity((cells_x + 1) * (cells_y + 1));
    for j in 0..=cells_y {
        for i in 0..=cells_x {
            vertices.push(origin + Vector2::new(to_t(i) * hx, to_t(j) * hy));
        }
    }

    let mut triangles = Vec::with_capacity(2 * cells_x * cells_y);
    for j in 0..cells_y {
        for i in 0..cells_x {
            let v00 = to_global_vertex_index(i, j);
            let v10 = to_global_vertex_index(i + 1, j);
            let v01 = to_global_vertex_index(i, j + 1);
            let v11 = to_global_vertex_index(i + 1, j + 1);
            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
        }
    }

    let mut mesh = TriangleMesh2d::from_vertices_and_triangles(vertices, triangles);
    mesh.set_edge_attributes_where(|_| true, BOUNDARY_ATTRIBUTE);
    mesh
}
