//! The coloured cube floating at the origin.
//!
//! Drawn as a flat list of 36 vertices from three separate streams.

use crate::{
    context::{BufferSpec, BufferUsage, GraphicsDevice, UpdateMode},
    errors::Result,
};

pub const VERTEX_COUNT: usize = 36;

const A: [f32; 4] = [-1.0, 1.0, 1.0, 1.0];
const B: [f32; 4] = [-1.0, -1.0, 1.0, 1.0];
const C: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const D: [f32; 4] = [1.0, -1.0, 1.0, 1.0];
const E: [f32; 4] = [-1.0, 1.0, -1.0, 1.0];
const F: [f32; 4] = [-1.0, -1.0, -1.0, 1.0];
const G: [f32; 4] = [1.0, 1.0, -1.0, 1.0];
const H: [f32; 4] = [1.0, -1.0, -1.0, 1.0];

#[rustfmt::skip]
pub const XYZW: [[f32; 4]; VERTEX_COUNT] = [
    A, B, D, A, D, C, // top
    E, F, H, E, H, G, // bottom
    C, G, H, C, H, D, // right
    A, E, F, A, F, B, // left
    A, E, G, A, G, C, // back
    B, F, H, B, H, D, // front
];

const UV00: [f32; 2] = [0.0, 0.0];
const UV01: [f32; 2] = [0.0, 1.0];
const UV10: [f32; 2] = [1.0, 0.0];
const UV11: [f32; 2] = [1.0, 1.0];
const FACE_UV: [[f32; 2]; 6] = [UV00, UV01, UV11, UV00, UV11, UV10];

pub const UV: [[f32; 2]; VERTEX_COUNT] = {
    let mut uv = [[0.0; 2]; VERTEX_COUNT];
    let mut i = 0;
    while i < VERTEX_COUNT {
        uv[i] = FACE_UV[i % 6];
        i += 1;
    }
    uv
};

/// One colour per face, in the order the faces appear in [`XYZW`].
const FACE_RGBA: [[f32; 4]; 6] = [
    [0.0, 0.0, 1.0, 1.0], // top
    [0.0, 1.0, 1.0, 1.0], // bottom
    [1.0, 0.0, 0.0, 1.0], // right
    [1.0, 0.0, 1.0, 1.0], // left
    [0.0, 1.0, 0.0, 1.0], // back
    [1.0, 1.0, 0.0, 1.0], // front
];

pub const RGBA: [[f32; 4]; VERTEX_COUNT] = {
    let mut rgba = [[0.0; 4]; VERTEX_COUNT];
    let mut i = 0;
    while i < VERTEX_COUNT {
        rgba[i] = FACE_RGBA[i / 6];
        i += 1;
    }
    rgba
};

pub struct CubeMesh<Buf> {
    rgba: Buf,
    uv: Buf,
    xyzw: Buf,
}

impl<Buf> CubeMesh<Buf> {
    pub fn new<D: GraphicsDevice<Buffer = Buf>>(device: &D) -> Result<Self> {
        let xyzw = device.new_buffer(&BufferSpec::with_contents(
            "cube xyzw",
            BufferUsage::Vertex,
            UpdateMode::Static,
            bytemuck::cast_slice(&XYZW),
        ))?;
        let uv = device.new_buffer(&BufferSpec::with_contents(
            "cube uv",
            BufferUsage::Vertex,
            UpdateMode::Static,
            bytemuck::cast_slice(&UV),
        ))?;
        let rgba = device.new_buffer(&BufferSpec::with_contents(
            "cube rgba",
            BufferUsage::Vertex,
            UpdateMode::Static,
            bytemuck::cast_slice(&RGBA),
        ))?;
        Ok(Self { rgba, uv, xyzw })
    }

    pub fn vertex_count(&self) -> u32 {
        VERTEX_COUNT as u32
    }

    /// Slots 0, 1 and 2 of the cube pipeline.
    pub fn vertex_buffers(&self) -> [&Buf; 3] {
        [&self.xyzw, &self.uv, &self.rgba]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_colour_each_face_uniformly() {
        for face in RGBA.chunks(6) {
            assert!(face.iter().all(|c| *c == face[0]));
        }
        assert_eq!(RGBA[0], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(RGBA[35], [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn should_keep_every_corner_on_the_unit_cube() {
        for v in XYZW {
            assert!(v[..3].iter().all(|c| c.abs() == 1.0));
            assert_eq!(v[3], 1.0);
        }
        assert_eq!(UV[5], UV10);
    }
}
