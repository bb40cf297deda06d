//! Engine data structures: geometry, uniforms, textures and growable arrays.
//!
//! - `cube` holds the procedural cube drawn in front of the cockpit
//! - `grow_buffer` is the length/capacity tracked array used while parsing
//! - `texture` wraps the depth attachment
//! - `uniform` contains the GPU-layout uniform blocks

pub mod cube;
pub mod grow_buffer;
pub mod texture;
pub mod uniform;
