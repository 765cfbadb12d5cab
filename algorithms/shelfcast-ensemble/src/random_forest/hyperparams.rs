use shelfcast::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{EnsembleError, Result};
use crate::{DecisionTreeRegressorParams, RandomForestRegressor};

/// The set of hyperparameters that can be specified for fitting a
/// [random forest](RandomForestRegressor).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestRegressorValidParams<F> {
    n_trees: usize,
    bootstrap: bool,
    max_samples: Option<f32>,
    seed: u64,
    tree_params: DecisionTreeRegressorParams<F>,
}

impl<F: Float> RandomForestRegressorValidParams<F> {
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn bootstrap(&self) -> bool {
        self.bootstrap
    }

    pub fn max_samples(&self) -> Option<f32> {
        self.max_samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tree_params(&self) -> &DecisionTreeRegressorParams<F> {
        &self.tree_params
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestRegressorParams<F>(RandomForestRegressorValidParams<F>);

impl<F: Float> RandomForestRegressorParams<F> {
    pub fn new() -> Self {
        Self(RandomForestRegressorValidParams {
            n_trees: 100,
            bootstrap: true,
            max_samples: None,
            seed: 42,
            tree_params: DecisionTreeRegressorParams::new(),
        })
    }

    /// Sets the number of trees in the forest
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.0.n_trees = n_trees;
        self
    }

    /// Sets the seed of the master random number generator
    ///
    /// Every tree draws its bootstrap sample and feature order from its own generator, seeded
    /// from the master one. Equal seeds give identical forests.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Draw a bootstrap sample for every tree, otherwise every tree sees all observations
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.0.bootstrap = bootstrap;
        self
    }

    /// Sets the size of each bootstrap sample as a fraction of the training set
    ///
    /// `None` draws as many samples as there are observations. Ignored without bootstrapping.
    pub fn max_samples(mut self, max_samples: Option<f32>) -> Self {
        self.0.max_samples = max_samples;
        self
    }

    /// Sets the optional limit to the depth of every tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.tree_params = self.0.tree_params.max_depth(max_depth);
        self
    }

    /// Sets the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.tree_params = self.0.tree_params.min_samples_split(min_samples_split);
        self
    }

    /// Sets the minimum number of samples a split has to leave in each child
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.0.tree_params = self.0.tree_params.min_samples_leaf(min_samples_leaf);
        self
    }

    /// Sets the number of features inspected at every node, `None` for all
    pub fn max_features(mut self, max_features: Option<usize>) -> Self {
        self.0.tree_params = self.0.tree_params.max_features(max_features);
        self
    }

    /// Replace all tree hyperparameters at once
    pub fn tree_params(mut self, tree_params: DecisionTreeRegressorParams<F>) -> Self {
        self.0.tree_params = tree_params;
        self
    }
}

impl<F: Float> Default for RandomForestRegressorParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RandomForestRegressor<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_trees = 100`
    /// * `bootstrap = true`
    /// * `max_samples = None`
    /// * `seed = 42`
    /// * default [tree parameters](crate::DecisionTreeRegressor::params)
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RandomForestRegressorParams<F> {
        RandomForestRegressorParams::new()
    }
}

impl<F: Float> ParamGuard for RandomForestRegressorParams<F> {
    type Checked = RandomForestRegressorValidParams<F>;
    type Error = EnsembleError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_trees == 0 {
            return Err(EnsembleError::InvalidParams(
                "n_trees should be at least 1".to_string(),
            ));
        }
        if let Some(max_samples) = self.0.max_samples {
            if !(max_samples > 0.0 && max_samples <= 1.0) {
                return Err(EnsembleError::InvalidParams(format!(
                    "max_samples should be in range (0, 1], but was {}",
                    max_samples
                )));
            }
        }
        self.0.tree_params.check_ref()?;

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = RandomForestRegressor::<f64>::params().check().unwrap();

        assert_eq!(params.n_trees(), 100);
        assert!(params.bootstrap());
        assert_eq!(params.max_samples(), None);
        assert_eq!(params.seed(), 42);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let params = RandomForestRegressor::<f64>::params();

        assert!(params.n_trees(0).check().is_err());
        assert!(params.max_samples(Some(0.0)).check().is_err());
        assert!(params.max_samples(Some(1.5)).check().is_err());
        assert!(params.max_samples(Some(f32::NAN)).check().is_err());
        assert!(params.min_samples_split(1).check().is_err());
        assert!(params.min_samples_leaf(0).check().is_err());

        assert!(params.max_samples(Some(1.0)).check().is_ok());
    }
}
