//! Reader for the text facet format (ASCII STL).
//!
//! Input is processed line by line. Every `vertex` line appends one vertex and
//! carries the normal of the most recent `facet normal` line with it. Other
//! keywords are structure only and are ignored.

use crate::{data_structures::grow_buffer::GrowBuffer, errors::AssetError};

/// Longest accepted line, terminator excluded.
pub const DEFAULT_MAX_LINE_LEN: usize = 256;

/// Normal used until the first `facet normal` line.
pub const DEFAULT_NORMAL: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Parallel position and normal streams, both `[x, y, z, 1]`.
#[derive(Clone, Debug, Default)]
pub struct FacetMesh {
    pub vertices: GrowBuffer<[f32; 4]>,
    pub normals: GrowBuffer<[f32; 4]>,
}

impl FacetMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn push(&mut self, vertex: [f32; 3], normal: [f32; 4]) {
        self.vertices.push([vertex[0], vertex[1], vertex[2], 1.0]);
        self.normals.push(normal);
    }
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    FacetNormal(Option<[f32; 3]>),
    Vertex(Option<[f32; 3]>),
    /// `solid`, `endsolid`, `outer loop`, `endloop`, `endfacet`
    Structure,
    Unknown(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Line::Blank;
    };
    match keyword {
        "vertex" => Line::Vertex(xyz(tokens)),
        "facet" => match tokens.next() {
            Some("normal") => Line::FacetNormal(xyz(tokens)),
            _ => Line::Unknown(keyword),
        },
        "solid" | "endsolid" | "outer" | "endloop" | "endfacet" => Line::Structure,
        other => Line::Unknown(other),
    }
}

/// Exactly three finite numbers.
fn xyz<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<[f32; 3]> {
    let mut out = [0.0; 3];
    for slot in out.iter_mut() {
        let value: f32 = tokens.next()?.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    match tokens.next() {
        Some(_) => None,
        None => Some(out),
    }
}

/// Parse a whole facet-text document.
///
/// Malformed `vertex` and `facet normal` lines are logged and skipped. A line
/// longer than `max_line_len` aborts, as does non-empty input without a single
/// vertex.
pub fn ingest_facet_text(bytes: &[u8], max_line_len: usize) -> Result<FacetMesh, AssetError> {
    let mut mesh = FacetMesh::default();
    let mut normal = DEFAULT_NORMAL;

    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let number = idx + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.len() > max_line_len {
            return Err(AssetError::LineTooLong {
                line: number,
                max: max_line_len,
            });
        }
        let Ok(line) = std::str::from_utf8(raw) else {
            log::warn!("line {}: not valid UTF-8, skipped", number);
            continue;
        };

        match classify(line) {
            Line::Vertex(Some(v)) => mesh.push(v, normal),
            Line::FacetNormal(Some(n)) => normal = [n[0], n[1], n[2], 1.0],
            Line::Vertex(None) => log::warn!("line {}: malformed vertex `{}`", number, line.trim()),
            Line::FacetNormal(None) => {
                log::warn!("line {}: malformed facet normal `{}`", number, line.trim())
            }
            Line::Unknown(keyword) => log::trace!("line {}: ignoring `{}`", number, keyword),
            Line::Structure | Line::Blank => {}
        }
    }

    if mesh.vertex_count() == 0 && !bytes.is_empty() {
        return Err(AssetError::NoVertices);
    }
    log::debug!("parsed {} facet vertices", mesh.vertex_count());
    Ok(mesh)
}
