//!
//! # Tree ensembles
//! `shelfcast-ensemble` provides regression trees and random forests for the `shelfcast`
//! demand forecasting workspace.
//!
//! # The big picture
//!
//! A [`DecisionTreeRegressor`] is a CART tree that splits on the squared error criterion. Grown
//! to full depth it fits its training data closely, so a single tree has a high variance. A
//! [`RandomForestRegressor`] reduces that variance by averaging many trees, each fitted on a
//! bootstrap sample of the data and with its own random feature order.
//!
//! # Current state
//!
//! * regression trees with depth, split size, leaf size and feature count limits
//! * random forests with a seeded, thread-count independent parallel fit
//! * feature importances from the decrease in squared error
//! * `serde` support for fitted models and hyperparameters behind the `serde` feature
//!
//! # Example
//!
//! ```rust
//! use ndarray::{array, Array1};
//! use shelfcast::prelude::*;
//! use shelfcast_ensemble::RandomForestRegressor;
//!
//! let dataset = Dataset::new(
//!     array![[1., 0.], [2., 1.], [3., 0.], [10., 1.], [11., 0.], [12., 1.]],
//!     array![1., 1., 1., 5., 5., 5.],
//! );
//!
//! let forest = RandomForestRegressor::params().n_trees(50).fit(&dataset).unwrap();
//! let prediction: Array1<f64> = forest.predict(&array![[0., 0.], [20., 1.]]);
//!
//! assert!(prediction[0] < prediction[1]);
//! ```

mod decision_tree;
mod error;
mod random_forest;

pub use decision_tree::{
    DecisionTreeRegressor, DecisionTreeRegressorParams, DecisionTreeRegressorValidParams,
    NodeIter, TreeNode,
};
pub use error::{EnsembleError, Result};
pub use random_forest::*;
