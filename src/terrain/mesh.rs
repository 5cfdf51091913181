//! Triangle mesh and collision surface built from an elevation grid.
//!
//! Vertex `(x, z)` sits at index `x * height + z`; every grid quad becomes two
//! triangles sharing its diagonal. Triangles wind clockwise seen from +Y, and
//! normals are taken so that flat ground points up.

use bytemuck::{Pod, Zeroable};

use super::grid::Grid;
use crate::error::{Result, TerrainError};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct TerrainMesh {
    width: usize,
    height: usize,
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

impl TerrainMesh {
    /// Build vertices at `(x, grid[x, z] * height_scale, z)` and triangulate every quad
    pub fn from_grid(grid: &Grid<f32>, height_scale: f32) -> Result<Self> {
        if !height_scale.is_finite() {
            return Err(TerrainError::InvalidParameter {
                name: "height_scale",
                value: height_scale as f64,
            });
        }
        let (width, height) = (grid.width(), grid.height());
        if width * height > u32::MAX as usize {
            return Err(TerrainError::InvalidDimension { width, height });
        }

        let mut vertices = Vec::with_capacity(width * height);
        for x in 0..width {
            for z in 0..height {
                vertices.push(TerrainVertex {
                    position: [x as f32, grid.get(x, z) * height_scale, z as f32],
                    normal: [0.0; 3],
                });
            }
        }

        let quads = width.saturating_sub(1) * height.saturating_sub(1);
        let mut indices = Vec::with_capacity(quads * 6);
        for x in 0..width.saturating_sub(1) {
            for z in 0..height.saturating_sub(1) {
                let top_left = (x * height + z) as u32;
                let top_right = ((x + 1) * height + z) as u32;
                let bottom_left = (x * height + z + 1) as u32;
                let bottom_right = ((x + 1) * height + z + 1) as u32;

                indices.extend_from_slice(&[top_left, top_right, bottom_left]);
                indices.extend_from_slice(&[top_right, bottom_right, bottom_left]);
            }
        }

        let mut mesh = Self {
            width,
            height,
            vertices,
            indices,
        };
        mesh.generate_normals();

        log::debug!(
            "terrain mesh: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Area-weighted vertex normals: sum un-normalized face normals, then normalize
    fn generate_normals(&mut self) {
        let mut sums = vec![[0.0f32; 3]; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let a = self.vertices[tri[0] as usize].position;
            let b = self.vertices[tri[1] as usize].position;
            let c = self.vertices[tri[2] as usize].position;
            let n = cross(sub(c, a), sub(b, a));
            for &i in tri {
                let sum = &mut sums[i as usize];
                sum[0] += n[0];
                sum[1] += n[1];
                sum[2] += n[2];
            }
        }

        for (vertex, n) in self.vertices.iter_mut().zip(sums) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            vertex.normal = if len > f32::EPSILON {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Three positions per triangle, in index order; the walkable collision surface
    pub fn collision_faces(&self) -> Vec<[f32; 3]> {
        self.indices
            .iter()
            .map(|&i| self.vertices[i as usize].position)
            .collect()
    }

    /// Translation that centres the surface on the origin in the XZ plane
    pub fn origin_offset(&self) -> [f32; 3] {
        [
            -((self.width / 2) as f32),
            0.0,
            -((self.height / 2) as f32),
        ]
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
