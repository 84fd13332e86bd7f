// crates/skyfire_shared/src/mesh.rs
//! CPU-side geometry handed to the graphics device for upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Indices per quad (two triangles).
pub const QUAD_INDEX_COUNT: u32 = 6;

const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];
const QUAD_CORNERS: [[f32; 2]; 4] = [[1.0, 1.0], [1.0, -1.0], [-1.0, -1.0], [-1.0, 1.0]];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub texcoord: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn textured(position: [f32; 2], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            texcoord,
            color: [1.0; 4],
        }
    }

    pub fn colored(position: [f32; 2], color: Vec4) -> Self {
        Self {
            position,
            texcoord: [0.0; 2],
            color: color.to_array(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    /// Closed outline; the last index repeats the first.
    LineLoop,
}

/// How often the data is expected to change after upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Static,
    Dynamic,
    Stream,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub topology: Topology,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Unit quad spanning [-1, 1] with the full texture mapped onto it.
pub fn textured_quad() -> Mesh {
    sprite_sheet(1)
}

/// Quad outline in a flat color, drawn as a line loop.
pub fn outline_quad(color: Vec4) -> Mesh {
    Mesh {
        vertices: QUAD_CORNERS
            .iter()
            .map(|&corner| Vertex::colored(corner, color))
            .collect(),
        indices: vec![0, 1, 2, 3, 0],
        topology: Topology::LineLoop,
    }
}

/// One quad per frame of a sprite sheet laid out left to right.
///
/// ```text
/// count=3:        texcoord (U,V)
/// (0,1) +-----+-----+-----+ (1,1)
///       |  0  |  1  |  2  |
/// (0,0) +-----+-----+-----+ (1,0)
/// ```
pub fn sprite_sheet(count: u32) -> Mesh {
    let width = 1.0 / count as f32;
    let mut vertices = Vec::with_capacity(4 * count as usize);
    let mut indices = Vec::with_capacity((QUAD_INDEX_COUNT * count) as usize);
    for i in 0..count {
        let u0 = i as f32 * width;
        let u1 = (i + 1) as f32 * width;
        vertices.push(Vertex::textured([1.0, 1.0], [u1, 1.0]));
        vertices.push(Vertex::textured([1.0, -1.0], [u1, 0.0]));
        vertices.push(Vertex::textured([-1.0, -1.0], [u0, 0.0]));
        vertices.push(Vertex::textured([-1.0, 1.0], [u0, 1.0]));
        indices.extend(QUAD_INDICES.iter().map(|&v| (4 * i) as u16 + v));
    }
    Mesh {
        vertices,
        indices,
        topology: Topology::Triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_frames_split_texture_horizontally() {
        let mesh = sprite_sheet(4);
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.index_count(), 24);
        // Second frame: u in [0.25, 0.5], indices offset by 4.
        assert_eq!(mesh.vertices[4].texcoord, [0.5, 1.0]);
        assert_eq!(mesh.vertices[6].texcoord, [0.25, 0.0]);
        assert_eq!(&mesh.indices[6..12], &[4, 5, 7, 5, 6, 7]);
    }

    #[test]
    fn outline_closes_the_loop() {
        let mesh = outline_quad(Vec4::ONE);
        assert_eq!(mesh.topology, Topology::LineLoop);
        assert_eq!(mesh.indices.first(), mesh.indices.last());
    }
}
