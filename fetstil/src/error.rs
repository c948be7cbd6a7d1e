//! Errors produced while emboldening fonts or extracting widths.

use std::path::PathBuf;

use thiserror::Error;
use write_fonts::{
    read::ReadError,
    types::{GlyphId, Tag},
    BuilderError,
};

/// Any failure of the bolden or width extraction pipelines.
///
/// Every variant is fatal; the pipelines never produce partial output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{}' is not a readable font: {source}", path.display())]
    InvalidFont { path: PathBuf, source: ReadError },

    #[error("Error reading font data: {0}")]
    Read(#[from] ReadError),

    #[error("Font has no '{0}' table")]
    MissingTable(Tag),

    #[error("Variable fonts are not supported: outline points would no longer match 'gvar'")]
    VariableFont,

    #[error("Offset must be a positive number of units")]
    InvalidOffset,

    #[error("Glyph {glyph} ('{name}') could not be read: {source}")]
    GlyphData {
        glyph: GlyphId,
        name: String,
        source: ReadError,
    },

    #[error("Glyph {glyph} ('{name}') has no entry in 'hmtx'")]
    MissingMetrics { glyph: GlyphId, name: String },

    #[error("Glyph {glyph} ('{name}') has a malformed outline: {reason}")]
    MalformedOutline {
        glyph: GlyphId,
        name: String,
        reason: String,
    },

    #[error("Glyph {glyph} ('{name}'): advance {advance} + offset {offset} overflows")]
    AdvanceOverflow {
        glyph: GlyphId,
        name: String,
        advance: u16,
        offset: u16,
    },

    #[error("Glyph {glyph} ('{name}'): x extent {x_max} + offset {offset} overflows")]
    CoordinateOverflow {
        glyph: GlyphId,
        name: String,
        x_max: i16,
        offset: u16,
    },

    #[error("Failed to compile glyph {glyph} ('{name}'): {reason}")]
    CompileGlyph {
        glyph: GlyphId,
        name: String,
        reason: String,
    },

    #[error(transparent)]
    Build(#[from] BuilderError),

    #[error("Failed to serialize width table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert a table lookup result, naming the tag when the table is absent.
pub(crate) fn table<T>(result: Result<T, ReadError>) -> Result<T, Error> {
    result.map_err(|e| match e {
        ReadError::TableIsMissing(tag) => Error::MissingTable(tag),
        other => Error::Read(other),
    })
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
