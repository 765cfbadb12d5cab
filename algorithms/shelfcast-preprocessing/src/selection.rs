//! Selection of model inputs from a sales table
//!
use ndarray::{Array1, Array2};
use shelfcast::Dataset;
use shelfcast_datasets::{Cell, SalesFrame};

use crate::calendar::{DAY_OF_WEEK, IS_WEEKEND, MONTH};
use crate::error::{PreprocessingError, Result};

/// Model inputs of the retail demand model, in matrix column order
pub const RETAIL_FEATURES: [&str; 5] = [MONTH, DAY_OF_WEEK, IS_WEEKEND, "price", "promotion"];
/// Quantity the retail demand model learns to predict
pub const RETAIL_TARGET: &str = "sales";

/// Convert a single cell to a finite number
///
/// Integers are widened, booleans become `1.0` and `0.0`. Text must either parse as a number or
/// read `true`/`false` in any casing. Empty text, `NaN` and infinities are rejected.
pub fn coerce(cell: Cell<'_>) -> Option<f64> {
    match cell {
        Cell::Integer(x) => Some(x as f64),
        Cell::Boolean(x) => Some(if x { 1.0 } else { 0.0 }),
        Cell::Text(x) => {
            let x = x.trim();
            match x.parse::<f64>() {
                Ok(x) if x.is_finite() => Some(x),
                Ok(_) => None,
                Err(_) if x.eq_ignore_ascii_case("true") => Some(1.0),
                Err(_) if x.eq_ignore_ascii_case("false") => Some(0.0),
                Err(_) => None,
            }
        }
    }
}

/// Fixed selection of feature columns and a target column
///
/// Turns a sales table into a numeric [`Dataset`], with one record column per feature in the
/// order given and the feature names attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSelection {
    features: Vec<String>,
    target: String,
}

impl FeatureSelection {
    pub fn new<I, S, T>(features: I, target: T) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        T: Into<String>,
    {
        FeatureSelection {
            features: features.into_iter().map(Into::into).collect(),
            target: target.into(),
        }
    }

    /// The retail demand selection: calendar features, price and promotion predict sales
    pub fn retail() -> Self {
        Self::new(RETAIL_FEATURES.iter().copied(), RETAIL_TARGET)
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Check that every selected column is present
    ///
    /// Features are checked in order before the target, the first absent column is reported.
    pub fn check_schema(&self, frame: &SalesFrame) -> Result<()> {
        match self
            .features
            .iter()
            .chain(std::iter::once(&self.target))
            .find(|name| !frame.has_column(name))
        {
            Some(name) => Err(PreprocessingError::MissingColumn(name.clone())),
            None => Ok(()),
        }
    }

    /// Build the numeric dataset
    pub fn select(&self, frame: &SalesFrame) -> Result<Dataset<f64, f64>> {
        self.check_schema(frame)?;

        let mut records = Array2::zeros((frame.height(), self.features.len()));
        for (name, mut dst) in self.features.iter().zip(records.columns_mut()) {
            let values = numeric_column(frame, name)?;
            dst.assign(&values);
        }
        let targets = numeric_column(frame, &self.target)?;

        Ok(Dataset::new(records, targets).with_feature_names(self.features.clone()))
    }
}

fn numeric_column(frame: &SalesFrame, name: &str) -> Result<Array1<f64>> {
    frame
        .try_column(name)?
        .cells()
        .enumerate()
        .map(|(row, cell)| {
            coerce(cell).ok_or_else(|| PreprocessingError::NonNumeric {
                column: name.to_string(),
                row,
                value: cell.to_string(),
            })
        })
        .collect()
}
