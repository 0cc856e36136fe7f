/// Run configuration: compiled defaults, optional JSON file, command line overrides
use crate::aggregator::AggregationStrategy;
use crate::bounds::Region;
use crate::error::{Result, TerrainError};
use crate::loader::MalformedPolicy;
use constants::grid::DEFAULT_CELL_SIZE;
use constants::render_settings::{PLOT_DIR, PROFILE_OFFSETS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Analysis window; points outside are dropped at load time.
    pub region: Region,
    /// Grid cell edge length in input units.
    pub cell_size: f64,
    /// Directory receiving plots and exports.
    pub output_dir: PathBuf,
    pub malformed_policy: MalformedPolicy,
    pub strategy: AggregationStrategy,
    /// Cross-section x offsets from the region centre.
    pub profile_offsets: Vec<f64>,
    /// Also write the R32F raster and JSON summary.
    pub export: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            cell_size: DEFAULT_CELL_SIZE,
            output_dir: PathBuf::from(PLOT_DIR),
            malformed_policy: MalformedPolicy::default(),
            strategy: AggregationStrategy::default(),
            profile_offsets: PROFILE_OFFSETS.to_vec(),
            export: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            TerrainError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|err| TerrainError::Config(format!("{}: {}", path.display(), err)))?;
        Ok(config)
    }
}
