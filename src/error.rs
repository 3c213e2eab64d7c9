//! Error types for asset loading and rig configuration
//!
//! Format violations and I/O failures are fatal to a single asset import and
//! always carry the offending path. Programming errors (bad shape index,
//! unbalanced matrix stack, descriptor position assigned twice) are not
//! represented here; they panic at the call site.

use std::path::PathBuf;
use thiserror::Error;

/// A violation of the assumptions a loader makes about its input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("face {face} has {arity} vertices, only triangles are supported")]
    NonTriangleFace { face: usize, arity: u32 },
    #[error("index stream of length {0} is not a whole number of triangles")]
    IndexCountNotTriangles(usize),
    #[error("{attribute} array has {len} components, expected a multiple of {stride}")]
    MalformedAttributes {
        attribute: &'static str,
        len: usize,
        stride: usize,
    },
    #[error("file contains no vertex positions")]
    NoPositions,
    #[error("{attribute} index {index} is out of range ({len} available)")]
    AttributeIndexOutOfRange {
        attribute: &'static str,
        index: usize,
        len: usize,
    },
    #[error("{attribute} index stream has {found} entries, expected {expected}")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("mesh {mesh} primitive {primitive} uses {mode:?}, only triangle lists are supported")]
    UnsupportedPrimitiveMode {
        mesh: usize,
        primitive: usize,
        mode: gltf::mesh::Mode,
    },
    #[error("mesh {mesh} primitive {primitive} is missing the {attribute} attribute")]
    MissingAttribute {
        mesh: usize,
        primitive: usize,
        attribute: &'static str,
    },
    #[error("mesh {mesh} primitive {primitive} has no index accessor")]
    MissingIndices { mesh: usize, primitive: usize },
}

/// Failure to import one asset file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse OBJ file '{}'", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("failed to parse glTF file '{}'", path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("malformed asset '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("'{}' is not an OBJ or glTF file", .0.display())]
    UnsupportedExtension(PathBuf),
}

impl LoadError {
    /// Path of the asset that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Obj { path, .. }
            | LoadError::Gltf { path, .. }
            | LoadError::Format { path, .. } => path,
            LoadError::UnsupportedExtension(path) => path,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Inconsistent skeleton or pose program, detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("skeleton has {nodes} nodes but the geometry has {shapes} shapes")]
    ShapeCountMismatch { nodes: usize, shapes: usize },
    #[error("node {node} names parent {parent}, which is out of range")]
    ParentOutOfRange { node: usize, parent: usize },
    #[error("node {node} names child {child}, which is out of range")]
    ChildOutOfRange { node: usize, child: usize },
    #[error("node {child} is listed as a child of {parent} but its parent is {actual:?}")]
    InconsistentLink {
        parent: usize,
        child: usize,
        actual: Option<usize>,
    },
    #[error("node {0} is its own ancestor")]
    Cycle(usize),
    #[error("pose program references joint {joint}, skeleton has {len} nodes")]
    JointOutOfRange { joint: usize, len: usize },
    #[error("pose program nests joint {joint} under {found:?}, skeleton parent is {expected:?}")]
    TraversalMismatch {
        joint: usize,
        expected: Option<usize>,
        found: Option<usize>,
    },
    #[error("pose program writes joint {0} more than once")]
    DuplicateWrite(usize),
    #[error("pose program pops an empty stack at instruction {0}")]
    StackUnderflow(usize),
    #[error("pose program leaves {0} matrices pushed")]
    UnbalancedProgram(usize),
    #[error("pose program references snapshot slot {slot}, only {len} declared")]
    SnapshotOutOfRange { slot: usize, len: usize },
}

/// Misuse of the texture registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture '{0}' is already registered")]
    Duplicate(String),
    #[error("no texture registered under '{0}'")]
    Unknown(String),
}
