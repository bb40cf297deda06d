//! Turning validated byte ranges into device buffers.
//!
//! Nothing built here is ever exposed half-finished. Every constructor either
//! returns a complete value or releases, newest first, whatever it had already
//! allocated and reports the failure.

use crate::{
    context::{BufferSpec, BufferUsage, GraphicsDevice, UpdateMode},
    data_structures::grow_buffer::GrowBuffer,
    errors::{AssetError, IngestError, Result},
    resources::{facet::FacetMesh, gltf_parts::Attribute},
};

/// Resources acquired in order and released in reverse order when dropped.
pub struct Acquired<T> {
    items: Vec<T>,
}

impl<T> Acquired<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for Acquired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Acquired<T> {
    fn drop(&mut self) {
        while let Some(item) = self.items.pop() {
            drop(item);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    U16,
    Vec3F32,
    Vec4F32,
}

impl ElementKind {
    pub const fn size(self) -> usize {
        match self {
            ElementKind::U16 => 2,
            ElementKind::Vec3F32 => 12,
            ElementKind::Vec4F32 => 16,
        }
    }
}

/// A tightly packed array of `count` elements of `kind`.
#[derive(Clone, Copy, Debug)]
pub struct TypedSpan<'a> {
    pub bytes: &'a [u8],
    pub count: usize,
    pub kind: ElementKind,
}

impl<'a> TypedSpan<'a> {
    fn check(&self, attribute: Attribute, expected: ElementKind) -> std::result::Result<(), AssetError> {
        if self.kind != expected {
            return Err(AssetError::Layout {
                attribute,
                reason: format!("element kind {:?}, expected {:?}", self.kind, expected),
            });
        }
        if self.count == 0 {
            return Err(AssetError::Layout {
                attribute,
                reason: "no elements".to_string(),
            });
        }
        if self.count.checked_mul(self.kind.size()) != Some(self.bytes.len()) {
            return Err(AssetError::Layout {
                attribute,
                reason: format!(
                    "{} bytes for {} elements of {} bytes",
                    self.bytes.len(),
                    self.count,
                    self.kind.size()
                ),
            });
        }
        Ok(())
    }
}

/// The three streams of one indexed triangle list.
#[derive(Clone, Copy, Debug)]
pub struct PartData<'a> {
    pub indices: TypedSpan<'a>,
    pub positions: TypedSpan<'a>,
    pub normals: TypedSpan<'a>,
}

/// One drawable sub-mesh: a u16 index buffer plus position and normal streams.
pub struct Part<B> {
    index_count: u32,
    // Fields drop in declaration order, which is the reverse of allocation.
    normals: B,
    positions: B,
    indices: B,
}

impl<B> Part<B> {
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn index_buffer(&self) -> &B {
        &self.indices
    }

    /// Positions at slot 0, normals at slot 1.
    pub fn vertex_buffers(&self) -> [&B; 2] {
        [&self.positions, &self.normals]
    }
}

/// The parts of one structured model, released newest first.
pub struct PartList<B> {
    parts: Acquired<Part<B>>,
}

impl<B> PartList<B> {
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part<B>> {
        self.parts.as_slice().iter()
    }
}

/// A flat, non-indexed triangle list with one position and one normal buffer.
pub struct FacetModel<B> {
    vertex_count: u32,
    normals: B,
    positions: B,
}

impl<B> FacetModel<B> {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Positions at slot 0, normals at slot 1.
    pub fn vertex_buffers(&self) -> [&B; 2] {
        [&self.positions, &self.normals]
    }
}

fn to_u32(name: &str, attribute: Attribute, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| {
        IngestError::malformed(
            name,
            AssetError::Layout {
                attribute,
                reason: format!("{} elements do not fit a draw call", count),
            },
        )
    })
}

pub fn build_part<D: GraphicsDevice>(
    device: &D,
    name: &str,
    data: &PartData<'_>,
) -> Result<Part<D::Buffer>> {
    let checks = [
        (Attribute::Indices, data.indices, ElementKind::U16),
        (Attribute::Position, data.positions, ElementKind::Vec3F32),
        (Attribute::Normal, data.normals, ElementKind::Vec3F32),
    ];
    for (attribute, span, kind) in checks {
        span.check(attribute, kind)
            .map_err(|source| IngestError::malformed(name, source))?;
    }
    let index_count = to_u32(name, Attribute::Indices, data.indices.count)?;

    let label = format!("{} index buffer", name);
    let indices = device.new_buffer(&BufferSpec::with_contents(
        &label,
        BufferUsage::Index,
        UpdateMode::Static,
        data.indices.bytes,
    ))?;
    let label = format!("{} position buffer", name);
    let positions = device.new_buffer(&BufferSpec::with_contents(
        &label,
        BufferUsage::Vertex,
        UpdateMode::Static,
        data.positions.bytes,
    ))?;
    let label = format!("{} normal buffer", name);
    let normals = device.new_buffer(&BufferSpec::with_contents(
        &label,
        BufferUsage::Vertex,
        UpdateMode::Static,
        data.normals.bytes,
    ))?;

    Ok(Part {
        index_count,
        normals,
        positions,
        indices,
    })
}

/// Build every part or none of them.
pub fn build_parts<D: GraphicsDevice>(
    device: &D,
    name: &str,
    parts: &[PartData<'_>],
) -> Result<PartList<D::Buffer>> {
    let mut acquired = Acquired::new();
    for (idx, data) in parts.iter().enumerate() {
        let part_name = format!("{}#{}", name, idx);
        acquired.push(build_part(device, &part_name, data)?);
    }
    Ok(PartList { parts: acquired })
}

fn facet_span<'a>(
    name: &str,
    attribute: Attribute,
    stream: &'a GrowBuffer<[f32; 4]>,
) -> Result<TypedSpan<'a>> {
    let span = TypedSpan {
        bytes: stream.as_bytes(),
        count: stream.len(),
        kind: ElementKind::Vec4F32,
    };
    span.check(attribute, ElementKind::Vec4F32)
        .map_err(|source| IngestError::malformed(name, source))?;
    Ok(span)
}

pub fn build_facet_model<D: GraphicsDevice>(
    device: &D,
    name: &str,
    mesh: &FacetMesh,
) -> Result<FacetModel<D::Buffer>> {
    if mesh.vertex_count() == 0 {
        return Err(IngestError::malformed(name, AssetError::NoVertices));
    }
    let positions = facet_span(name, Attribute::Position, &mesh.vertices)?;
    let normals = facet_span(name, Attribute::Normal, &mesh.normals)?;
    if positions.count != normals.count {
        return Err(IngestError::malformed(
            name,
            AssetError::Layout {
                attribute: Attribute::Normal,
                reason: format!("{} normals for {} vertices", normals.count, positions.count),
            },
        ));
    }
    let vertex_count = to_u32(name, Attribute::Position, positions.count)?;

    let label = format!("{} position buffer", name);
    let positions = device.new_buffer(&BufferSpec::with_contents(
        &label,
        BufferUsage::Vertex,
        UpdateMode::Static,
        positions.bytes,
    ))?;
    let label = format!("{} normal buffer", name);
    let normals = device.new_buffer(&BufferSpec::with_contents(
        &label,
        BufferUsage::Vertex,
        UpdateMode::Static,
        normals.bytes,
    ))?;

    Ok(FacetModel {
        vertex_count,
        normals,
        positions,
    })
}
