//! `shelfcast-pipeline` trains the retail demand model from a sales history.
//!
//! ## The Big Picture
//!
//! The pipeline is a single linear pass over the workspace crates:
//!
//! 1. [`load_data`] reads the sales CSV into a [`SalesFrame`]
//! 2. [`build_features`] derives `month`, `day_of_week` and `is_weekend` from the date
//! 3. [`prepare`] selects the model inputs and the `sales` target as a numeric dataset
//! 4. [`split`] shuffles with a fixed seed and holds out a test partition
//! 5. [`train_model`] fits a random forest on the training partition
//! 6. [`evaluate`] reports RMSE and R² on the test partition
//! 7. [`save_model`] writes the forest to disk with bincode
//!
//! [`run`] executes all stages in order. The first failing stage aborts the run with a
//! [`PipelineError`] naming the stage, nothing is written after a failure. Progress is printed
//! to stdout, diagnostics go through `tracing`.
//!
//! ## Example
//!
//! ```no_run
//! use shelfcast_pipeline::{run, PipelineConfig};
//!
//! let report = run(&PipelineConfig::default()).unwrap();
//! println!("held out {} records", report.n_test);
//! ```
use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array1;
use rand::{rngs::StdRng, SeedableRng};
use shelfcast::prelude::*;
use shelfcast_datasets::{load_csv, SalesFrame};
use shelfcast_ensemble::RandomForestRegressor;
use shelfcast_preprocessing::{CalendarFeatures, FeatureSelection, PreprocessingError};
use tracing::{debug, info};

pub mod config;
pub mod error;
mod persist;

pub use config::PipelineConfig;
pub use error::{PersistError, PipelineError, Result, TrainingError};
pub use persist::{load_model, save_model};

/// The persisted demand model
pub type SalesModel = RandomForestRegressor<f64>;

/// Scores of a model on held-out data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rmse: f64,
    pub r2: f64,
}

/// Outcome of a successful [`run`]
#[derive(Debug, Clone)]
pub struct Report {
    /// Number of records in the input file
    pub records: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub evaluation: Evaluation,
    pub model: SalesModel,
    pub output: PathBuf,
}

/// Read the sales table and report its size
pub fn load_data<P: AsRef<Path>>(path: P) -> Result<SalesFrame> {
    let frame = load_csv(path).map_err(PipelineError::DataLoad)?;
    println!("Loaded {} records", frame.height());

    Ok(frame)
}

/// Append the calendar features to the table
pub fn build_features(frame: &SalesFrame) -> Result<SalesFrame> {
    CalendarFeatures::new()
        .transform(frame)
        .map_err(PipelineError::Feature)
}

/// Select the retail features and target as a numeric dataset
///
/// An absent column is a schema failure, a cell that is not a number fails training.
pub fn prepare(frame: &SalesFrame) -> Result<Dataset<f64, f64>> {
    FeatureSelection::retail()
        .select(frame)
        .map_err(|err| match err {
            PreprocessingError::MissingColumn(_) => PipelineError::Schema(err),
            err => TrainingError::from(err).into(),
        })
}

/// Shuffle with the configured seed and split off the test partition
pub fn split(
    dataset: Dataset<f64, f64>,
    config: &PipelineConfig,
) -> Result<(Dataset<f64, f64>, Dataset<f64, f64>)> {
    if !(0.0..=1.0).contains(&config.test_ratio) {
        return Err(TrainingError::TestRatio(config.test_ratio).into());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train, test) = dataset
        .shuffle(&mut rng)
        .split_with_test_ratio(config.test_ratio);
    info!(
        train = train.nsamples(),
        test = test.nsamples(),
        "partitioned records"
    );

    Ok((train, test))
}

/// Fit the random forest on the training partition
pub fn train_model(train: &Dataset<f64, f64>, config: &PipelineConfig) -> Result<SalesModel> {
    println!("Training model...");
    let start = Instant::now();

    let model = RandomForestRegressor::params()
        .n_trees(config.n_trees)
        .seed(config.seed)
        .fit(train)
        .map_err(TrainingError::Ensemble)?;

    info!(
        n_trees = model.n_trees(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "trained model"
    );
    for (name, importance) in model
        .feature_names()
        .iter()
        .zip(model.feature_importances())
    {
        debug!(feature = %name, importance, "feature importance");
    }

    Ok(model)
}

/// Predict the test partition and print RMSE and R²
pub fn evaluate(model: &SalesModel, test: &Dataset<f64, f64>) -> Result<Evaluation> {
    let prediction: Array1<f64> = model.predict(test);

    let rmse = prediction
        .root_mean_squared_error(test.targets())
        .map_err(TrainingError::Metrics)?;
    let r2 = prediction
        .r2(test.targets())
        .map_err(TrainingError::Metrics)?;

    println!("RMSE: {:.2}", rmse);
    println!("R2 Score: {:.4}", r2);

    Ok(Evaluation { rmse, r2 })
}

/// Execute all stages for `config`
pub fn run(config: &PipelineConfig) -> Result<Report> {
    let start = Instant::now();

    let frame = load_data(&config.data)?;
    let records = frame.height();
    let frame = build_features(&frame)?;
    let dataset = prepare(&frame)?;
    let (train, test) = split(dataset, config)?;

    let model = train_model(&train, config)?;
    let evaluation = evaluate(&model, &test)?;

    save_model(&model, &config.output)?;
    println!("Model saved to {}", config.output.display());

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline finished"
    );

    Ok(Report {
        records,
        n_train: train.nsamples(),
        n_test: test.nsamples(),
        evaluation,
        model,
        output: config.output.clone(),
    })
}
