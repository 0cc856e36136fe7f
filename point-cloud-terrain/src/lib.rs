/// Point cloud scan gridding and terrain plotting
pub mod aggregator;
pub mod bounds;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod height_field;
pub mod labeled;
pub mod loader;
pub mod pipeline;
pub mod point;
mod progress;
pub mod render;

pub use aggregator::{AggregationStrategy, GridAggregator};
pub use bounds::{Extents, Region};
pub use config::PipelineConfig;
pub use error::{Result, Stage, StageError, TerrainError};
pub use grid::GridSpec;
pub use height_field::{HeightField, SurfaceMesh};
pub use labeled::{LabeledField, Profile};
pub use loader::{LoadStats, MalformedPolicy, PointCloudLoader};
pub use pipeline::{RunOutput, TerrainPipeline};
pub use point::{Point, PointSet};
