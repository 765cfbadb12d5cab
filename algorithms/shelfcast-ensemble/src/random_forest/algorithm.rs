//! Random forest regression
//!
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use shelfcast::{
    dataset::{DatasetBase, Records},
    traits::*,
    Float, ParamGuard,
};
use tracing::debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::RandomForestRegressorValidParams;
use crate::decision_tree::check_dataset;
use crate::error::{EnsembleError, Result};
use crate::DecisionTreeRegressor;

/// A fitted random forest for regression
///
/// The forest is an ensemble of [regression trees](DecisionTreeRegressor), each fitted on a
/// bootstrap sample of the training set with its own random feature order. A prediction is the
/// mean of all tree predictions.
///
/// ### Reproducibility
///
/// Before any tree is fitted, one seed per tree is drawn from a master generator seeded with
/// [`seed`](crate::RandomForestRegressorParams::seed). The trees are then fitted in parallel,
/// but each only depends on its own seed, so the fitted forest does not depend on the number of
/// threads.
///
/// ### Example
///
/// ```rust
/// use ndarray::{Array1, Array2};
/// use shelfcast::prelude::*;
/// use shelfcast_ensemble::RandomForestRegressor;
///
/// let records = Array2::from_shape_fn((50, 1), |(i, _)| i as f64);
/// let targets = records.column(0).mapv(|x| 2. * x);
/// let dataset = Dataset::new(records, targets).with_feature_names(vec!["x"]);
///
/// let forest = RandomForestRegressor::params()
///     .n_trees(20)
///     .seed(42)
///     .fit(&dataset)
///     .unwrap();
///
/// let prediction: Array1<f64> = forest.predict(&dataset);
/// let rmse = prediction.root_mean_squared_error(&dataset.targets).unwrap();
/// assert!(rmse < 5.0);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor<F> {
    trees: Vec<DecisionTreeRegressor<F>>,
    feature_names: Vec<String>,
}

impl<F: Float> RandomForestRegressor<F> {
    /// The fitted trees, in the order of their seeds
    pub fn trees(&self) -> &[DecisionTreeRegressor<F>] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was fitted on
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Names of the features the forest was fitted on, in record column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature importance for each feature
    ///
    /// This is the mean over all trees of their relative decrease in squared error per feature.
    pub fn feature_importances(&self) -> Vec<F> {
        let mut importances = vec![F::zero(); self.num_features()];
        for tree in &self.trees {
            for (total, x) in importances.iter_mut().zip(tree.feature_importance()) {
                *total += x;
            }
        }

        let n_trees = F::cast(self.trees.len());
        importances.into_iter().map(|x| x / n_trees).collect()
    }
}

impl<F: Float> Fit<Array2<F>, Array1<F>, EnsembleError> for RandomForestRegressorValidParams<F> {
    type Object = RandomForestRegressor<F>;

    fn fit(&self, dataset: &DatasetBase<Array2<F>, Array1<F>>) -> Result<Self::Object> {
        let records = dataset.records();
        let targets = dataset.targets();
        check_dataset(records, targets)?;
        let tree_params = self.tree_params().check_ref()?;

        let nsamples = dataset.nsamples();
        let ndraws = match self.max_samples() {
            Some(ratio) => ((nsamples as f32 * ratio).round() as usize).max(1),
            None => nsamples,
        };

        let mut rng = StdRng::seed_from_u64(self.seed());
        let seeds = (0..self.n_trees())
            .map(|_| rng.gen::<u64>())
            .collect::<Vec<_>>();

        let trees = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let samples = if self.bootstrap() {
                    (0..ndraws)
                        .map(|_| rng.gen_range(0..nsamples))
                        .collect::<Vec<_>>()
                } else {
                    (0..nsamples).collect()
                };

                DecisionTreeRegressor::fit_samples(tree_params, records, targets, &samples, &mut rng)
            })
            .collect::<Vec<_>>();

        debug!(
            n_trees = trees.len(),
            nsamples,
            ndraws,
            nfeatures = dataset.nfeatures(),
            "fitted random forest"
        );

        Ok(RandomForestRegressor {
            trees,
            feature_names: dataset.feature_names(),
        })
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for RandomForestRegressor<F>
{
    /// Average the predictions of all trees for each row of `x`
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let mut tree_prediction = Array1::zeros(x.nrows());
        y.fill(F::zero());
        for tree in &self.trees {
            tree.predict_inplace(x, &mut tree_prediction);
            *y += &tree_prediction;
        }

        let n_trees = F::cast(self.trees.len());
        y.mapv_inplace(|sum| sum / n_trees);
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use shelfcast::Dataset;

    fn linear_dataset() -> Dataset<f64, f64> {
        let records = Array2::from_shape_fn((60, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                (i % 4) as f64
            }
        });
        let targets = records.column(0).mapv(|x| 3. * x + 1.);

        Dataset::new(records, targets).with_feature_names(vec!["trend", "noise"])
    }

    #[test]
    fn prediction_is_mean_of_trees() {
        let dataset = linear_dataset();
        let forest = RandomForestRegressor::params()
            .n_trees(7)
            .fit(&dataset)
            .unwrap();

        let x = array![[3.5, 1.], [40., 0.]];
        let prediction: Array1<f64> = forest.predict(&x);

        let mut expected = Array1::<f64>::zeros(2);
        for tree in forest.trees() {
            let tree_prediction: Array1<f64> = tree.predict(&x);
            expected += &tree_prediction;
        }
        expected /= 7.;

        assert_eq!(forest.n_trees(), 7);
        assert_abs_diff_eq!(prediction, expected, epsilon = 1e-12);
    }

    #[test]
    fn same_seed_same_forest() {
        let dataset = linear_dataset();
        let params = RandomForestRegressor::params().n_trees(10).seed(5);

        let a = params.fit(&dataset).unwrap();
        let b = params.fit(&dataset).unwrap();
        let c = params.seed(6).fit(&dataset).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn without_bootstrap_trees_see_all_samples() {
        let dataset = linear_dataset();

        let forest = RandomForestRegressor::params()
            .n_trees(3)
            .bootstrap(false)
            .fit(&dataset)
            .unwrap();

        for tree in forest.trees() {
            assert_eq!(tree.root_node().n_samples(), 60);
        }
        let prediction: Array1<f64> = forest.predict(&dataset);
        assert_abs_diff_eq!(prediction, dataset.targets, epsilon = 1e-9);
    }

    #[test]
    fn max_samples_shrinks_bootstrap() {
        let dataset = linear_dataset();

        let forest = RandomForestRegressor::params()
            .n_trees(3)
            .max_samples(Some(0.5))
            .fit(&dataset)
            .unwrap();

        for tree in forest.trees() {
            assert_eq!(tree.root_node().n_samples(), 30);
        }
    }

    #[test]
    fn importances_follow_the_signal() {
        let dataset = linear_dataset();

        let forest = RandomForestRegressor::params()
            .n_trees(20)
            .fit(&dataset)
            .unwrap();

        let importances = forest.feature_importances();
        assert_eq!(forest.feature_names(), &["trend", "noise"]);
        assert_abs_diff_eq!(importances.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(importances[0] > 0.9);
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 3)), Array1::<f64>::zeros(0));

        let res = RandomForestRegressor::params().fit(&dataset);

        assert!(matches!(res, Err(EnsembleError::EmptyTrainingSet)));
    }

    #[test]
    fn invalid_params_are_rejected_before_fitting() {
        let dataset = linear_dataset();

        let res = RandomForestRegressor::params().n_trees(0).fit(&dataset);

        assert!(matches!(res, Err(EnsembleError::InvalidParams(_))));
    }
}
