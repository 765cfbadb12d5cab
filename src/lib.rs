//! `shelfcast` provides the building blocks for forecasting retail demand from
//! historical sales records.
//!
//! The crate is the common ground of the `shelfcast` workspace. It defines
//!
//! * the [`Dataset`] container pairing a feature matrix with its targets,
//! * the [`Fit`](traits::Fit), [`Predict`](traits::Predict) and
//!   [`Transformer`](traits::Transformer) traits implemented by the algorithm crates,
//! * the [`ParamGuard`] pattern for checked hyperparameters,
//! * regression metrics such as RMSE and R².
//!
//! Loading sales tables lives in `shelfcast-datasets`, calendar features in
//! `shelfcast-preprocessing` and the random forest in `shelfcast-ensemble`.
//! `shelfcast-pipeline` ties them together into the training command line tool.
//!
//! ## Example
//!
//! ```rust
//! use shelfcast::prelude::*;
//! use ndarray::array;
//!
//! let truth = array![3.0, -0.5, 2.0, 7.0];
//! let prediction = array![2.5, 0.0, 2.0, 8.0];
//!
//! let rmse = prediction.root_mean_squared_error(&truth).unwrap();
//! let r2 = prediction.r2(&truth).unwrap();
//! assert!(rmse >= 0.0 && r2 <= 1.0);
//! ```

pub mod dataset;
pub mod error;
mod metrics_regression;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, Float};
pub use param_guard::ParamGuard;

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::Regression;
}
