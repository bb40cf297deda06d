//! popcorn
//!
//! A small flight demo: a coloured cube floats in a box and the viewer flies
//! around it from inside a cockpit. The interesting parts are the asset
//! ingestion path, which turns a glTF or text facet file into device buffers
//! without ever exposing a half-built model, and the per-frame attitude
//! integrator that steers the viewer.
//!
//! High-level modules
//! - `context`: GPU/window context and the `GraphicsDevice` buffer seam
//! - `data_structures`: cube geometry, uniforms, depth texture, growable arrays
//! - `errors`: ingestion error types
//! - `flight`: attitude and position integration, view and projection matrices
//! - `flow`: winit application loop
//! - `input`: input events, keyboard mapping and the exit gesture
//! - `pipelines`: cube and cockpit render pipelines
//! - `render`: per-frame composition
//! - `resources`: cockpit loading (glTF parts, text facets, buffer building)
//! - `settings`: runtime configuration
//! - `storage`: named-entry archives the assets are read from
//!

pub mod context;
pub mod data_structures;
pub mod errors;
pub mod flight;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod settings;
pub mod storage;
