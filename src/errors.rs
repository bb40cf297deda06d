//! Error types for asset ingestion.
//!
//! Parsers report [`AssetError`], which only describes what is wrong with the
//! bytes they were handed. The loading layer in [`crate::resources`] attaches the
//! asset name and reports everything that can abort construction of a model as
//! an [`IngestError`].
//!
//! A single malformed `vertex` or `facet normal` line is not an error at all: it
//! is logged and skipped by the facet parser.

use thiserror::Error;

use crate::resources::gltf_parts::Attribute;

/// A defect in the contents of a model file.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The container could not be decoded at all.
    #[error(transparent)]
    Gltf(#[from] gltf::Error),

    #[error("the model has no default scene")]
    MissingScene,

    #[error("primitive has no {0} accessor")]
    MissingAccessor(Attribute),

    #[error("{0} accessor does not reference a buffer view")]
    MissingBufferView(Attribute),

    #[error("{attribute} accessor has component type {found:?}, expected {expected:?}")]
    ComponentType {
        attribute: Attribute,
        found: gltf::accessor::DataType,
        expected: gltf::accessor::DataType,
    },

    #[error("{attribute} accessor has dimensions {found:?}, expected {expected:?}")]
    Dimensions {
        attribute: Attribute,
        found: gltf::accessor::Dimensions,
        expected: gltf::accessor::Dimensions,
    },

    /// Interleaved vertex layouts cannot be uploaded as separate streams.
    #[error("{attribute} buffer view is interleaved (byteStride {stride})")]
    Interleaved { attribute: Attribute, stride: usize },

    #[error("{attribute} data ({len} bytes at offset {offset}) lies outside its buffer view")]
    OutOfBounds {
        attribute: Attribute,
        offset: usize,
        len: usize,
    },

    #[error("{attribute} data does not match its declared layout: {reason}")]
    Layout { attribute: Attribute, reason: String },

    #[error("buffer {0} has no data")]
    MissingBuffer(usize),

    /// Buffers must be binary chunks or separate files.
    #[error("buffer {0} is embedded as a data URI")]
    EmbeddedBuffer(usize),

    #[error("line {line} is longer than {max} bytes")]
    LineTooLong { line: usize, max: usize },

    #[error("no vertices were found")]
    NoVertices,
}

/// Why a model could not be constructed.
///
/// Every variant is fatal for the model being built. Whatever was allocated
/// for it before the failure has already been released when this is returned.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed asset `{name}`: {source}")]
    Malformed {
        name: String,
        #[source]
        source: AssetError,
    },

    #[error("resource `{name}` is unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("I/O error while reading `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("device allocation failed for {label}: {reason}")]
    DeviceAllocation { label: String, reason: String },
}

impl IngestError {
    pub fn malformed(name: &str, source: AssetError) -> Self {
        Self::Malformed {
            name: name.to_string(),
            source,
        }
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
