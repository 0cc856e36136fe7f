/// End-to-end run orchestrating load, aggregation, plotting and export.
use crate::aggregator::GridAggregator;
use crate::config::PipelineConfig;
use crate::error::{Stage, StageError, TerrainError};
use crate::export::{HeightFieldSummary, write_heightfield_dds};
use crate::grid::GridSpec;
use crate::height_field::HeightField;
use crate::loader::{LoadStats, PointCloudLoader};
use crate::render::{PlotRenderer, RenderReport};
use constants::render_settings::{HEIGHTFIELD_DDS_FILE, HEIGHTFIELD_SUMMARY_FILE};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Result of a completed run. Plot failures are reported here rather than aborting.
#[derive(Debug)]
pub struct RunOutput {
    pub field: HeightField,
    pub load_stats: LoadStats,
    pub render: RenderReport,
    pub exports: Vec<PathBuf>,
}

/// Single-file scan processor.
pub struct TerrainPipeline {
    config: PipelineConfig,
}

impl TerrainPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every stage for `input`.
    /// The grid is validated before the file is read so a bad configuration fails fast.
    pub fn run(&self, input: &Path) -> Result<RunOutput, StageError> {
        let start = Instant::now();
        info!(input = %input.display(), cell_size = self.config.cell_size, "Starting terrain run");

        let grid = GridSpec::new(self.config.region, self.config.cell_size)
            .map_err(|e| StageError::new(Stage::Aggregate, e))?;

        let loader =
            PointCloudLoader::new(self.config.region).with_policy(self.config.malformed_policy);
        let (points, load_stats) = loader
            .load(input)
            .map_err(|e| StageError::new(Stage::Load, e))?;

        let field = GridAggregator::new(grid)
            .with_strategy(self.config.strategy)
            .aggregate(points)
            .map_err(|e| StageError::new(Stage::Aggregate, e))?;

        let renderer = PlotRenderer::new(&self.config.output_dir)
            .with_profile_offsets(self.config.profile_offsets.clone());
        let render = renderer.render_all(&field);

        let exports = if self.config.export {
            self.export(input, &field, &load_stats, &render.written)
                .map_err(|e| StageError::new(Stage::Export, e))?
        } else {
            Vec::new()
        };

        info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            plots = render.written.len(),
            failed_plots = render.failures.len(),
            "Terrain run finished"
        );

        Ok(RunOutput {
            field,
            load_stats,
            render,
            exports,
        })
    }

    fn export(
        &self,
        input: &Path,
        field: &HeightField,
        load_stats: &LoadStats,
        plots: &[PathBuf],
    ) -> Result<Vec<PathBuf>, TerrainError> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|source| TerrainError::write(dir, source))?;

        let dds_path = dir.join(HEIGHTFIELD_DDS_FILE);
        write_heightfield_dds(&dds_path, field)?;

        let summary_path = dir.join(HEIGHTFIELD_SUMMARY_FILE);
        HeightFieldSummary::new(input, field, load_stats, plots).write(&summary_path)?;

        Ok(vec![dds_path, summary_path])
    }
}
