#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use popcorn::{
    context::{BufferSpec, BufferUsage, GraphicsDevice},
    errors::IngestError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Created(String),
    Released(String),
}

/// Shared log of every allocation and release, in order.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Op>>>);

impl Journal {
    pub fn ops(&self) -> Vec<Op> {
        self.0.borrow().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Created(label) => Some(label),
                Op::Released(_) => None,
            })
            .collect()
    }

    pub fn released(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Released(label) => Some(label),
                Op::Created(_) => None,
            })
            .collect()
    }

    pub fn live(&self) -> usize {
        self.created().len() - self.released().len()
    }

    fn push(&self, op: Op) {
        self.0.borrow_mut().push(op);
    }
}

pub struct MockBuffer {
    pub label: String,
    pub usage: BufferUsage,
    pub size: u64,
    pub contents: Vec<u8>,
    journal: Journal,
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        self.journal.push(Op::Released(self.label.clone()));
    }
}

/// A device that records what it allocates and can be told to fail.
pub struct RecordingDevice {
    journal: Journal,
    fail_at: Option<usize>,
    allocations: Cell<usize>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            journal: Journal::default(),
            fail_at: None,
            allocations: Cell::new(0),
        }
    }

    /// Allocation number `n` (0-based) fails, every other one succeeds.
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::new()
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = MockBuffer;

    fn new_buffer(&self, spec: &BufferSpec<'_>) -> Result<MockBuffer, IngestError> {
        let n = self.allocations.get();
        self.allocations.set(n + 1);
        if self.fail_at == Some(n) {
            return Err(IngestError::DeviceAllocation {
                label: spec.label.to_string(),
                reason: "out of memory".to_string(),
            });
        }
        self.journal.push(Op::Created(spec.label.to_string()));
        Ok(MockBuffer {
            label: spec.label.to_string(),
            usage: spec.usage,
            size: spec.size,
            contents: spec.contents.to_vec(),
            journal: self.journal.clone(),
        })
    }
}

pub const UNSIGNED_BYTE: u32 = 5121;
pub const UNSIGNED_SHORT: u32 = 5123;
pub const UNSIGNED_INT: u32 = 5125;
pub const FLOAT: u32 = 5126;

pub const POINTS: u32 = 0;
pub const TRIANGLES: u32 = 4;

/// One accessor and, unless removed, the buffer view behind it.
#[derive(Clone, Debug)]
pub struct Stream {
    pub bytes: Vec<u8>,
    pub component_type: u32,
    pub kind: &'static str,
    pub count: usize,
    pub byte_stride: Option<usize>,
    pub with_view: bool,
    pub bounds: Option<([f32; 3], [f32; 3])>,
}

impl Stream {
    pub fn u16_indices(indices: &[u16]) -> Self {
        Self {
            bytes: indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
            component_type: UNSIGNED_SHORT,
            kind: "SCALAR",
            count: indices.len(),
            byte_stride: None,
            with_view: true,
            bounds: None,
        }
    }

    pub fn u32_indices(indices: &[u32]) -> Self {
        Self {
            bytes: indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
            component_type: UNSIGNED_INT,
            ..Self::u16_indices(&[])
        }
        .counted(indices.len())
    }

    pub fn vec3(points: &[[f32; 3]]) -> Self {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Self {
            bytes: points.iter().flatten().flat_map(|c| c.to_le_bytes()).collect(),
            component_type: FLOAT,
            kind: "VEC3",
            count: points.len(),
            byte_stride: None,
            with_view: true,
            bounds: Some((min, max)),
        }
    }

    pub fn u8_vec3(points: &[[u8; 3]]) -> Self {
        Self {
            bytes: points.iter().flatten().copied().collect(),
            component_type: UNSIGNED_BYTE,
            kind: "VEC3",
            count: points.len(),
            byte_stride: None,
            with_view: true,
            bounds: None,
        }
    }

    pub fn counted(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn strided(mut self, stride: usize) -> Self {
        self.byte_stride = Some(stride);
        self
    }

    pub fn without_view(mut self) -> Self {
        self.with_view = false;
        self
    }
}

#[derive(Clone, Debug)]
pub struct PrimitiveSpec {
    pub indices: Option<Stream>,
    pub position: Option<Stream>,
    pub normal: Option<Stream>,
    pub mode: u32,
}

impl PrimitiveSpec {
    pub fn triangle() -> Self {
        Self {
            indices: Some(Stream::u16_indices(&[0, 1, 2])),
            position: Some(Stream::vec3(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])),
            normal: Some(Stream::vec3(&[[0.0, 0.0, 1.0]; 3])),
            mode: TRIANGLES,
        }
    }

    pub fn quad() -> Self {
        Self {
            indices: Some(Stream::u16_indices(&[0, 1, 2, 0, 2, 3])),
            position: Some(Stream::vec3(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ])),
            normal: Some(Stream::vec3(&[[0.0, 0.0, 1.0]; 4])),
            mode: TRIANGLES,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }
}

/// A glTF document as JSON text plus the bytes of its only buffer.
pub struct Document {
    pub json: String,
    pub bin: Vec<u8>,
}

#[derive(Clone, Copy, Debug)]
pub struct DocumentOptions<'a> {
    pub default_scene: bool,
    /// Reference the buffer by URI instead of the binary chunk.
    pub uri: Option<&'a str>,
}

impl Default for DocumentOptions<'_> {
    fn default() -> Self {
        Self {
            default_scene: true,
            uri: None,
        }
    }
}

pub fn document(primitives: &[PrimitiveSpec], options: DocumentOptions<'_>) -> Document {
    let mut bin: Vec<u8> = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut prims = Vec::new();

    let mut add = |stream: &Stream| -> usize {
        let mut accessor = format!(
            r#""componentType":{},"count":{},"type":"{}""#,
            stream.component_type, stream.count, stream.kind
        );
        if stream.with_view {
            while bin.len() % 4 != 0 {
                bin.push(0);
            }
            let mut view = format!(
                r#"{{"buffer":0,"byteOffset":{},"byteLength":{}"#,
                bin.len(),
                stream.bytes.len()
            );
            if let Some(stride) = stream.byte_stride {
                view.push_str(&format!(r#","byteStride":{}"#, stride));
            }
            view.push('}');
            bin.extend_from_slice(&stream.bytes);
            views.push(view);
            accessor = format!(r#""bufferView":{},{}"#, views.len() - 1, accessor);
        }
        if let Some((min, max)) = stream.bounds {
            accessor.push_str(&format!(
                r#","min":[{:?},{:?},{:?}],"max":[{:?},{:?},{:?}]"#,
                min[0], min[1], min[2], max[0], max[1], max[2]
            ));
        }
        accessors.push(format!("{{{}}}", accessor));
        accessors.len() - 1
    };

    for primitive in primitives {
        let mut attributes = Vec::new();
        if let Some(position) = &primitive.position {
            attributes.push(format!(r#""POSITION":{}"#, add(position)));
        }
        if let Some(normal) = &primitive.normal {
            attributes.push(format!(r#""NORMAL":{}"#, add(normal)));
        }
        let mut prim = format!(r#"{{"attributes":{{{}}}"#, attributes.join(","));
        if let Some(indices) = &primitive.indices {
            prim.push_str(&format!(r#","indices":{}"#, add(indices)));
        }
        prim.push_str(&format!(r#","mode":{}}}"#, primitive.mode));
        prims.push(prim);
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let buffer = match options.uri {
        Some(uri) => format!(r#"{{"byteLength":{},"uri":"{}"}}"#, bin.len(), uri),
        None => format!(r#"{{"byteLength":{}}}"#, bin.len()),
    };
    let scene = if options.default_scene { r#""scene":0,"# } else { "" };
    let json = format!(
        r#"{{"asset":{{"version":"2.0"}},{}"scenes":[{{"nodes":[0]}}],"nodes":[{{"mesh":0}}],"meshes":[{{"primitives":[{}]}}],"accessors":[{}],"bufferViews":[{}],"buffers":[{}]}}"#,
        scene,
        prims.join(","),
        accessors.join(","),
        views.join(","),
        buffer
    );
    Document { json, bin }
}

/// Pack a document into the binary container.
pub fn pack_glb(document: &Document) -> Vec<u8> {
    let mut json = document.json.clone().into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let total = 12 + 8 + json.len() + 8 + document.bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(document.bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&document.bin);
    out
}

pub fn glb(primitives: &[PrimitiveSpec]) -> Vec<u8> {
    pack_glb(&document(primitives, DocumentOptions::default()))
}

/// The `assets/` directory of this crate.
pub fn asset_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}
