use anyhow::{Context, Result};
use artist_rating::config::DEFAULT_CONFIG_FILE;
use artist_rating::metrics::rmse;
use artist_rating::{Config, DatasetBuilder, ModelPipeline};
use clap::Parser;
use std::path::PathBuf;

/// Build the rating dataset, fit the model and predict the test partition.
#[derive(Parser, Debug)]
#[command(name = "artist-rating", version, about)]
struct Cli {
    /// Directory holding train.csv, test.csv, words.csv and users.csv
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the predictions
    #[arg(short, long, default_value = "predictions.csv")]
    output: PathBuf,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let default = cli.data_dir.join(DEFAULT_CONFIG_FILE);
            if default.exists() {
                Config::load_from_file(&default)
                    .with_context(|| format!("loading config {}", default.display()))?
            } else {
                Config::default()
            }
        }
    };
    config
        .apply_environment_overrides()
        .context("applying environment overrides")?;
    Ok(config)
}

fn main() -> Result<()> {
    artist_rating::init()?;
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let dataset = DatasetBuilder::new(config.clone())?
        .build_from_dir(&cli.data_dir)
        .with_context(|| format!("building dataset from {}", cli.data_dir.display()))?;

    let model = ModelPipeline::new(&config.model)?
        .fit(&dataset.features, &dataset.target_vector)
        .context("fitting model")?;

    let fitted = model.predict(&dataset.features)?;
    log::info!(
        "Training RMSE: {:.4}",
        rmse(fitted.view(), dataset.target_vector.view())?
    );

    let predictions = model
        .predict(&dataset.target_features)
        .context("predicting target partition")?;

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    writer.write_record(["id", config.schema.rating_column.as_str()])?;
    for (id, prediction) in dataset.target_ids.iter().zip(predictions.iter()) {
        writer.write_record([id.as_str(), prediction.to_string().as_str()])?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} predictions to {}",
        predictions.len(),
        cli.output.display()
    );
    Ok(())
}
