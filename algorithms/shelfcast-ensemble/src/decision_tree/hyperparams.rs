use shelfcast::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{EnsembleError, Result};
use crate::DecisionTreeRegressor;

/// The set of hyperparameters that can be specified for fitting a
/// [regression tree](DecisionTreeRegressor).
///
/// ### Example
///
/// ```rust
/// use ndarray::{array, Array1};
/// use shelfcast::prelude::*;
/// use shelfcast_ensemble::DecisionTreeRegressor;
///
/// let dataset = Dataset::new(array![[1.], [2.], [10.], [11.]], array![1., 1., 5., 5.]);
///
/// let tree = DecisionTreeRegressor::params()
///     .max_depth(Some(1))
///     .fit(&dataset)
///     .unwrap();
///
/// let prediction: Array1<f64> = tree.predict(&array![[0.], [12.]]);
/// assert_eq!(prediction, array![1., 5.]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeRegressorValidParams<F> {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: Option<usize>,
    min_impurity_decrease: F,
    seed: u64,
}

impl<F: Float> DecisionTreeRegressorValidParams<F> {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    pub fn min_impurity_decrease(&self) -> F {
        self.min_impurity_decrease
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeRegressorParams<F>(DecisionTreeRegressorValidParams<F>);

impl<F: Float> DecisionTreeRegressorParams<F> {
    pub fn new() -> Self {
        Self(DecisionTreeRegressorValidParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            min_impurity_decrease: F::zero(),
            seed: 42,
        })
    }

    /// Sets the optional limit to the depth of the tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }

    /// Sets the minimum number of samples a split has to leave in each child
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.0.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Sets the number of features inspected at every node
    ///
    /// Features are visited in a random order per node and the first `max_features` of them are
    /// searched. `None` searches all features.
    pub fn max_features(mut self, max_features: Option<usize>) -> Self {
        self.0.max_features = max_features;
        self
    }

    /// Sets the minimum decrease in squared error a split needs to bring in order to be applied
    pub fn min_impurity_decrease(mut self, min_impurity_decrease: F) -> Self {
        self.0.min_impurity_decrease = min_impurity_decrease;
        self
    }

    /// Sets the seed of the random feature order
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float> Default for DecisionTreeRegressorParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> DecisionTreeRegressor<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = None`
    /// * `min_samples_split = 2`
    /// * `min_samples_leaf = 1`
    /// * `max_features = None`
    /// * `min_impurity_decrease = 0.0`
    /// * `seed = 42`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeRegressorParams<F> {
        DecisionTreeRegressorParams::new()
    }
}

impl<F: Float> ParamGuard for DecisionTreeRegressorParams<F> {
    type Checked = DecisionTreeRegressorValidParams<F>;
    type Error = EnsembleError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.min_samples_split < 2 {
            Err(EnsembleError::InvalidParams(format!(
                "min_samples_split should be at least 2, but was {}",
                self.0.min_samples_split
            )))
        } else if self.0.min_samples_leaf == 0 {
            Err(EnsembleError::InvalidParams(
                "min_samples_leaf should be at least 1".to_string(),
            ))
        } else if self.0.max_features == Some(0) {
            Err(EnsembleError::InvalidParams(
                "max_features should be at least 1".to_string(),
            ))
        } else if self.0.min_impurity_decrease < F::zero() {
            Err(EnsembleError::InvalidParams(format!(
                "min_impurity_decrease should not be negative, but was {}",
                self.0.min_impurity_decrease
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
