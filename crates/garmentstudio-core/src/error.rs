//! Error handling for GarmentStudio
//!
//! Provides error types for all layers of the engine:
//! - Decode errors (image upload/decoding)
//! - Geometry errors (placement/resize validation)
//! - Config errors (part layout loading)
//!
//! All error types use `thiserror` for ergonomic error handling. Everything
//! in this subsystem is recovered locally: a decode failure or a rejected
//! mutation leaves the prior valid state untouched, and the worst observable
//! symptom is a stale preview texture.

use thiserror::Error;

/// Image decode error type
///
/// Raised when uploaded bytes or a base texture cannot be turned into a
/// usable bitmap. Always non-fatal: the element in question is dropped and
/// the previous composite is retained.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The byte stream could not be decoded as an image
    #[error("Image data could not be decoded: {reason}")]
    InvalidImage {
        /// Decoder diagnostic.
        reason: String,
    },

    /// The image decoded but has no pixels
    #[error("Decoded image has zero width or height")]
    EmptyImage,

    /// A newer upload to the same slot replaced this one before it finished
    #[error("Upload superseded by a newer upload to the same slot")]
    Superseded,
}

/// Geometry validation error type
///
/// Raised when a proposed placement, resize, rotation, or opacity change
/// would violate an element invariant. The mutation is rejected with no
/// partial state committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite
    #[error("Non-finite value in {what}")]
    NonFinite {
        /// Which input carried the non-finite value.
        what: String,
    },

    /// Width or height was zero, negative, or above 1
    #[error("Size {width}x{height} outside (0, 1]")]
    InvalidSize {
        /// Proposed normalized width.
        width: f64,
        /// Proposed normalized height.
        height: f64,
    },

    /// Opacity outside the valid range
    #[error("Opacity {value} outside [0, 1]")]
    OpacityOutOfRange {
        /// Proposed opacity.
        value: f64,
    },

    /// A rectangle does not fit inside the unit square
    #[error("Rectangle ({x}, {y}) {width}x{height} extends outside the unit square")]
    OutsideUnitSquare {
        /// Rectangle origin X.
        x: f64,
        /// Rectangle origin Y.
        y: f64,
        /// Rectangle width.
        width: f64,
        /// Rectangle height.
        height: f64,
    },
}

/// Part layout configuration error type
///
/// Raised when a `PartLayout` fails validation at registry construction or
/// file load time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The layout defines no parts
    #[error("Part layout defines no parts")]
    EmptyLayout,

    /// Two parts share an id
    #[error("Duplicate part id: {id}")]
    DuplicatePart {
        /// The repeated part id.
        id: String,
    },

    /// A part id was not found in the registry
    #[error("Unknown part id: {id}")]
    UnknownPart {
        /// The missing part id.
        id: String,
    },

    /// A part carries an invalid region or placement rectangle
    #[error("Invalid geometry for part {id}: {reason}")]
    InvalidPart {
        /// The offending part id.
        id: String,
        /// The geometry violation.
        reason: GeometryError,
    },

    /// The layout file could not be read or written
    #[error("Part layout I/O failed: {reason}")]
    Io {
        /// Underlying I/O diagnostic.
        reason: String,
    },

    /// The layout file is not valid JSON for a layout
    #[error("Invalid part layout: {reason}")]
    Parse {
        /// Parser diagnostic.
        reason: String,
    },
}

/// Main error type for GarmentStudio
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Image decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Geometry validation error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Part layout configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a decode error
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a config error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
