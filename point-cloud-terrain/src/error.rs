/// Error types for loading, gridding and plotting a scan
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a scan into a height field.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// The input path does not reference an existing readable file.
    #[error("input not found or unreadable: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file opened but a read failed part way through.
    #[error("failed to read {} at line {line}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be split into the expected fields.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The grid cannot hold at least one cell per axis.
    #[error("invalid grid size: {0}")]
    InvalidGridSize(String),

    /// Region bounds are not finite or not ordered.
    #[error("invalid region of interest: {0}")]
    InvalidRegion(String),

    /// Cell values did not match the grid shape.
    #[error("height field shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// PNG encoding or saving failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// An output file or directory could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad configuration file or flag combination.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dds export failed: {0}")]
    Dds(#[from] ddsfile::Error),
}

impl TerrainError {
    /// Create an InvalidGridSize error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGridSize(msg.into())
    }

    /// Create an InvalidRegion error.
    pub fn invalid_region(msg: impl Into<String>) -> Self {
        Self::InvalidRegion(msg.into())
    }

    /// Create a MalformedRecord error.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a Write error for the given path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Aggregate,
    Render,
    Export,
}

impl Stage {
    /// Process exit code reported for a failure in this stage.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::Load => 2,
            Stage::Aggregate => 3,
            Stage::Render => 4,
            Stage::Export => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Aggregate => "aggregate",
            Stage::Render => "render",
            Stage::Export => "export",
        };
        f.write_str(name)
    }
}

/// A terrain error tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: TerrainError,
}

impl StageError {
    pub fn new(stage: Stage, source: TerrainError) -> Self {
        Self { stage, source }
    }
}

/// Result type for terrain operations.
pub type Result<T> = std::result::Result<T, TerrainError>;
