//! Pulls drawable parts out of a glTF document.
//!
//! Only the parts of the format the cockpit needs are accepted: triangle lists
//! indexed with u16, with tightly packed f32 `POSITION` and `NORMAL` streams.
//! Primitives that are not indexed triangle lists are skipped, anything else
//! that does not fit is an error for the whole model.

use std::fmt;

use gltf::accessor::{DataType, Dimensions};

use crate::{
    errors::{AssetError, IngestError, Result},
    resources::mesh::{ElementKind, PartData, TypedSpan},
    storage::Archive,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Indices,
    Position,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Indices => "index",
            Attribute::Position => "POSITION",
            Attribute::Normal => "NORMAL",
        })
    }
}

/// A decoded document together with the bytes of every buffer it declares.
pub struct GltfSource {
    document: gltf::Document,
    buffers: Vec<Vec<u8>>,
}

impl GltfSource {
    /// Parse `bytes` (JSON or binary glTF) named `name`.
    ///
    /// Buffers stored in the binary chunk are taken from it. Buffers referenced
    /// by URI are read from `archive`, relative to the directory of `name`.
    pub fn open<A: Archive + ?Sized>(name: &str, bytes: &[u8], archive: &mut A) -> Result<Self> {
        let gltf::Gltf { document, mut blob } = gltf::Gltf::from_slice(bytes)
            .map_err(|e| IngestError::malformed(name, AssetError::Gltf(e)))?;

        let mut buffers = Vec::with_capacity(document.buffers().len());
        for buffer in document.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => blob
                    .take()
                    .ok_or_else(|| IngestError::malformed(name, AssetError::MissingBuffer(buffer.index())))?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                    return Err(IngestError::malformed(
                        name,
                        AssetError::EmbeddedBuffer(buffer.index()),
                    ));
                }
                gltf::buffer::Source::Uri(uri) => archive.read_entry(&sibling(name, uri))?,
            };
            log::debug!("{}: buffer {} holds {} bytes", name, buffer.index(), data.len());
            buffers.push(data);
        }

        Ok(Self { document, buffers })
    }

    /// Every indexed triangle list reachable from the default scene's nodes.
    pub fn extract_parts(&self) -> std::result::Result<Vec<PartData<'_>>, AssetError> {
        let scene = self.document.default_scene().ok_or(AssetError::MissingScene)?;

        let mut parts = Vec::new();
        for node in scene.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::debug!(
                        "skipping primitive {} of mesh {}: mode {:?}",
                        primitive.index(),
                        mesh.index(),
                        primitive.mode()
                    );
                    continue;
                }
                if primitive.indices().is_none() {
                    log::debug!(
                        "skipping primitive {} of mesh {}: not indexed",
                        primitive.index(),
                        mesh.index()
                    );
                    continue;
                }
                parts.push(self.part(&primitive)?);
            }
        }
        Ok(parts)
    }

    fn part(&self, primitive: &gltf::Primitive<'_>) -> std::result::Result<PartData<'_>, AssetError> {
        let indices = primitive
            .indices()
            .ok_or(AssetError::MissingAccessor(Attribute::Indices))?;
        let positions = primitive
            .get(&gltf::Semantic::Positions)
            .ok_or(AssetError::MissingAccessor(Attribute::Position))?;
        let normals = primitive
            .get(&gltf::Semantic::Normals)
            .ok_or(AssetError::MissingAccessor(Attribute::Normal))?;

        Ok(PartData {
            indices: self.span(Attribute::Indices, &indices)?,
            positions: self.span(Attribute::Position, &positions)?,
            normals: self.span(Attribute::Normal, &normals)?,
        })
    }

    fn span(
        &self,
        attribute: Attribute,
        accessor: &gltf::Accessor<'_>,
    ) -> std::result::Result<TypedSpan<'_>, AssetError> {
        let (data_type, dimensions, kind) = match attribute {
            Attribute::Indices => (DataType::U16, Dimensions::Scalar, ElementKind::U16),
            Attribute::Position | Attribute::Normal => {
                (DataType::F32, Dimensions::Vec3, ElementKind::Vec3F32)
            }
        };
        if accessor.data_type() != data_type {
            return Err(AssetError::ComponentType {
                attribute,
                found: accessor.data_type(),
                expected: data_type,
            });
        }
        if accessor.dimensions() != dimensions {
            return Err(AssetError::Dimensions {
                attribute,
                found: accessor.dimensions(),
                expected: dimensions,
            });
        }

        let view = accessor
            .view()
            .ok_or(AssetError::MissingBufferView(attribute))?;
        if let Some(stride) = view.stride().filter(|&s| s != 0) {
            return Err(AssetError::Interleaved { attribute, stride });
        }
        let index = view.buffer().index();
        let data = self
            .buffers
            .get(index)
            .filter(|b| !b.is_empty())
            .ok_or(AssetError::MissingBuffer(index))?;

        let len = accessor
            .count()
            .checked_mul(kind.size())
            .ok_or_else(|| AssetError::Layout {
                attribute,
                reason: format!("{} elements overflow the address space", accessor.count()),
            })?;
        let offset = view.offset().saturating_add(accessor.offset());
        let fits_view = accessor
            .offset()
            .checked_add(len)
            .is_some_and(|end| end <= view.length());
        let fits_buffer = view
            .offset()
            .checked_add(view.length())
            .is_some_and(|end| end <= data.len());
        if !fits_view || !fits_buffer {
            return Err(AssetError::OutOfBounds {
                attribute,
                offset,
                len,
            });
        }

        Ok(TypedSpan {
            bytes: &data[offset..offset + len],
            count: accessor.count(),
            kind,
        })
    }
}

/// Resolve `uri` against the directory `name` lives in.
fn sibling(name: &str, uri: &str) -> String {
    match name.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, uri),
        None => uri.to_string(),
    }
}
