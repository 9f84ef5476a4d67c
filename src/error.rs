use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for map decoding and construction.
#[derive(Debug)]
pub enum MapError {
    /// File I/O error while reading a map file
    Io {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// JSON parse error
    Json {
        /// Path (or pseudo-path for in-memory strings) that failed to parse
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
    /// Unsupported file format (non-JSON)
    UnsupportedFormat(String),
    /// A layer's data length does not match width * height
    InvalidLayerSize {
        /// Name of the offending layer
        layer: String,
        /// width * height of the layer
        expected: usize,
        /// Actual data length
        actual: usize,
    },
    /// A tile layer references a GID outside every tileset's range
    InvalidTileGid {
        /// Name of the offending layer
        layer: String,
        /// The masked GID that failed to resolve
        gid: u32,
        /// Highest GID claimed by any tileset
        max_gid: u32,
    },
    /// A property record declared a type the loader does not understand
    UnsupportedPropertyType {
        /// Property name
        name: String,
        /// The declared type string
        kind: String,
    },
    /// Structurally invalid map data (overlapping tileset ranges, zero grid, ...)
    InvalidMap(String),
}

impl From<io::Error> for MapError {
    fn from(err: io::Error) -> Self {
        MapError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "JSON parse error in {}: {}", path.display(), source)
            }
            MapError::UnsupportedFormat(name) => write!(f, "Unsupported file format: {}", name),
            MapError::InvalidLayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid data length for layer '{}': expected {}, got {}",
                layer, expected, actual
            ),
            MapError::InvalidTileGid { layer, gid, max_gid } => write!(
                f,
                "Layer '{}' references GID {} but the highest known GID is {}",
                layer, gid, max_gid
            ),
            MapError::UnsupportedPropertyType { name, kind } => {
                write!(f, "Property '{}' has unsupported type '{}'", name, kind)
            }
            MapError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
