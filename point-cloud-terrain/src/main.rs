/// Scan gridding and terrain plotting entry point
use clap::Parser;
use point_cloud_terrain::{
    AggregationStrategy, MalformedPolicy, PipelineConfig, Region, Stage, TerrainPipeline,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "point-cloud-terrain")]
#[command(about = "Bin an xyz scan onto a regular grid and plot the terrain")]
struct Args {
    /// Scan file with one `x y z r g b` record per line
    input: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid cell size
    #[arg(long)]
    cell_size: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Directory for plots and exports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Fail on lines with too few fields instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Cell matching strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Also write the height field raster and JSON summary
    #[arg(long)]
    export: bool,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Indexed,
    Naive,
}

impl From<StrategyArg> for AggregationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Indexed => AggregationStrategy::Indexed,
            StrategyArg::Naive => AggregationStrategy::Naive,
        }
    }
}

impl Args {
    /// Layer flags over the config file over compiled defaults
    fn resolve_config(&self) -> point_cloud_terrain::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        let base = config.region;
        config.region = Region::new(
            self.x_min.unwrap_or(base.min_x),
            self.x_max.unwrap_or(base.max_x),
            self.y_min.unwrap_or(base.min_y),
            self.y_max.unwrap_or(base.max_y),
        )?;
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.strict {
            config.malformed_policy = MalformedPolicy::Strict;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if self.export {
            config.export = true;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };

    match TerrainPipeline::new(config).run(&args.input) {
        Ok(output) if output.render.is_complete() => ExitCode::SUCCESS,
        Ok(output) => {
            for (kind, err) in &output.render.failures {
                eprintln!("error: {} stage failed for {kind}: {err}", Stage::Render);
            }
            ExitCode::from(Stage::Render.exit_code() as u8)
        }
        Err(err) => {
            error!(stage = %err.stage, error = %err.source, "Terrain run failed");
            eprintln!("error: {err}");
            ExitCode::from(err.stage.exit_code() as u8)
        }
    }
}
