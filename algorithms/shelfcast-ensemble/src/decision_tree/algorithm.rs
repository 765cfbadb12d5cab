//! Regression trees
//!
use std::cmp::Ordering;

use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use shelfcast::{
    dataset::{DatasetBase, Records},
    error::Error,
    traits::*,
    Float,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{DecisionTreeRegressorValidParams, NodeIter};
use crate::error::{EnsembleError, Result};

/// Values closer than this are never separated by a split
const FEATURE_THRESHOLD: f64 = 1e-7;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
/// A node in the regression tree
pub struct TreeNode<F> {
    feature_idx: usize,
    split_value: F,
    impurity_decrease: F,
    left_child: Option<Box<TreeNode<F>>>,
    right_child: Option<Box<TreeNode<F>>>,
    prediction: F,
    n_samples: usize,
    depth: usize,
}

impl<F: Float> TreeNode<F> {
    fn leaf(prediction: F, n_samples: usize, depth: usize) -> Self {
        TreeNode {
            feature_idx: 0,
            split_value: F::zero(),
            impurity_decrease: F::zero(),
            left_child: None,
            right_child: None,
            prediction,
            n_samples,
            depth,
        }
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.left_child.is_none() || self.right_child.is_none()
    }

    /// Returns the depth of the node in the tree
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of training samples that reached this node, bootstrap duplicates included
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<F> {
        if self.is_leaf() {
            Some(self.prediction)
        } else {
            None
        }
    }

    /// Returns both children, first left then right
    pub fn children(&self) -> Vec<&Option<Box<TreeNode<F>>>> {
        vec![&self.left_child, &self.right_child]
    }

    /// Return the split (feature index, value) and its decrease in squared error
    pub fn split(&self) -> (usize, F, F) {
        (self.feature_idx, self.split_value, self.impurity_decrease)
    }
}

struct Split<F> {
    feature_idx: usize,
    split_value: F,
    proxy: F,
}

/// Recursive tree construction over a set of sample indices
///
/// Indices may repeat, a bootstrap sample is fitted without copying any rows.
struct TreeBuilder<'a, F: Float, D: Data<Elem = F>, T: Data<Elem = F>> {
    records: &'a ArrayBase<D, Ix2>,
    targets: &'a ArrayBase<T, Ix1>,
    params: &'a DecisionTreeRegressorValidParams<F>,
}

impl<'a, F: Float, D: Data<Elem = F>, T: Data<Elem = F>> TreeBuilder<'a, F, D, T> {
    fn fit_node<R: Rng>(&self, samples: &[usize], depth: usize, rng: &mut R) -> TreeNode<F> {
        let n = samples.len();
        let n_float = F::cast(n);
        let sum = samples.iter().map(|&i| self.targets[i]).sum::<F>();
        let mean = sum / n_float;
        let squared_error = samples
            .iter()
            .map(|&i| (self.targets[i] - mean) * (self.targets[i] - mean))
            .sum::<F>();

        if n < self.params.min_samples_split()
            || n < 2 * self.params.min_samples_leaf()
            || self
                .params
                .max_depth()
                .map(|max_depth| depth >= max_depth)
                .unwrap_or(false)
            || squared_error / n_float <= F::epsilon()
        {
            return TreeNode::leaf(mean, n, depth);
        }

        let best = match self.find_split(samples, sum, rng) {
            Some(best) => best,
            None => return TreeNode::leaf(mean, n, depth),
        };

        // squared error of the parent minus the summed squared error of both children
        let impurity_decrease = best.proxy - sum * sum / n_float;
        if impurity_decrease + F::epsilon() < self.params.min_impurity_decrease() {
            return TreeNode::leaf(mean, n, depth);
        }

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&i| self.records[(i, best.feature_idx)] <= best.split_value);

        let left_child = self.fit_node(&left, depth + 1, rng);
        let right_child = self.fit_node(&right, depth + 1, rng);

        TreeNode {
            feature_idx: best.feature_idx,
            split_value: best.split_value,
            impurity_decrease,
            left_child: Some(Box::new(left_child)),
            right_child: Some(Box::new(right_child)),
            prediction: mean,
            n_samples: n,
            depth,
        }
    }

    /// Search the split with the largest decrease in squared error
    ///
    /// Minimising the children's squared error is equivalent to maximising the proxy
    /// `sum_left² / n_left + sum_right² / n_right`, which is updated in a single sweep over
    /// the samples sorted by feature value. Ties keep the first split found, so the random
    /// feature order decides between equally good features.
    fn find_split<R: Rng>(&self, samples: &[usize], sum: F, rng: &mut R) -> Option<Split<F>> {
        let n = samples.len();
        let min_samples_leaf = self.params.min_samples_leaf();

        let mut features = (0..self.records.ncols()).collect::<Vec<_>>();
        features.shuffle(rng);
        let n_features = self
            .params
            .max_features()
            .map(|k| k.min(features.len()))
            .unwrap_or_else(|| features.len());

        let mut best: Option<Split<F>> = None;
        let mut sorted = Vec::with_capacity(n);
        for &feature_idx in &features[..n_features] {
            sorted.clear();
            sorted.extend(
                samples
                    .iter()
                    .map(|&i| (self.records[(i, feature_idx)], self.targets[i])),
            );
            sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut sum_left = F::zero();
            for i in 0..n - 1 {
                let (value, target) = sorted[i];
                let next = sorted[i + 1].0;
                sum_left += target;

                if next <= value + F::cast(FEATURE_THRESHOLD) {
                    continue;
                }

                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_samples_leaf || n_right < min_samples_leaf {
                    continue;
                }

                let sum_right = sum - sum_left;
                let proxy =
                    sum_left * sum_left / F::cast(n_left) + sum_right * sum_right / F::cast(n_right);

                if best.as_ref().map(|b| proxy > b.proxy).unwrap_or(true) {
                    // midpoint between both values, unless it rounds up onto the larger one
                    let mut split_value = (value + next) / F::cast(2.0);
                    if split_value >= next || !split_value.is_finite() {
                        split_value = value;
                    }

                    best = Some(Split {
                        feature_idx,
                        split_value,
                        proxy,
                    });
                }
            }
        }

        best
    }
}

/// Reject empty, misshaped or non-finite training data
pub(crate) fn check_dataset<F: Float>(
    records: &ArrayBase<impl Data<Elem = F>, Ix2>,
    targets: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> Result<()> {
    if records.nrows() != targets.len() {
        return Err(Error::MismatchedShapes {
            records: records.nrows(),
            targets: targets.len(),
        }
        .into());
    }
    if records.nrows() == 0 {
        return Err(EnsembleError::EmptyTrainingSet);
    }
    if let Some(((row, feature), _)) = records.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(EnsembleError::NonFiniteRecord { row, feature });
    }
    if let Some((row, _)) = targets.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(EnsembleError::NonFiniteTarget { row });
    }

    Ok(())
}

/// A fitted regression tree
///
/// ### Structure
/// The tree is binary. Every internal node holds a feature and a split value, observations with
/// `feature <= split_value` fall into the left subtree and all others into the right one. Every
/// leaf predicts the mean target of the training samples that reached it.
///
/// ### Algorithm
///
/// Starting from the root, each node is fitted by
///
/// * visiting the features in a random order and sorting the node's samples by each of them,
/// * selecting the split that decreases the squared error the most, with the threshold placed
///   midway between two distinct consecutive values,
/// * recursing into both children until a node is pure, too small to split or at maximal depth.
///
/// ### Predictions
///
/// A sample walks from the root to a leaf and receives the leaf's mean.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeRegressor<F> {
    root_node: TreeNode<F>,
    num_features: usize,
}

impl<F: Float> DecisionTreeRegressor<F> {
    /// Fit a tree on the given sample indices of `records` and `targets`
    ///
    /// The data must have passed `check_dataset` and `samples` must not be empty.
    pub(crate) fn fit_samples<R: Rng>(
        params: &DecisionTreeRegressorValidParams<F>,
        records: &ArrayBase<impl Data<Elem = F>, Ix2>,
        targets: &ArrayBase<impl Data<Elem = F>, Ix1>,
        samples: &[usize],
        rng: &mut R,
    ) -> Self {
        let builder = TreeBuilder {
            records,
            targets,
            params,
        };

        DecisionTreeRegressor {
            root_node: builder.fit_node(samples, 0, rng),
            num_features: records.ncols(),
        }
    }

    /// Create a depth-first node iterator
    pub fn iter_nodes(&self) -> NodeIter<'_, F> {
        NodeIter::new(vec![&self.root_node])
    }

    /// Return the total decrease in squared error for each feature
    pub fn impurity_decrease(&self) -> Vec<F> {
        let mut decrease = vec![F::zero(); self.num_features];
        for node in self.iter_nodes().filter(|node| !node.is_leaf()) {
            decrease[node.feature_idx] += node.impurity_decrease;
        }

        decrease
    }

    /// Return the feature importance, i.e. the relative decrease in squared error per feature
    ///
    /// A tree without any split has no importances, all values are zero then.
    pub fn feature_importance(&self) -> Vec<F> {
        let decrease = self.impurity_decrease();
        let total = decrease.iter().copied().sum::<F>();

        if total > F::zero() {
            decrease.into_iter().map(|x| x / total).collect()
        } else {
            decrease
        }
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F> {
        &self.root_node
    }

    /// Number of features the tree was fitted on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return max depth of the tree
    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth))
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for DecisionTreeRegressor<F>
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the fitted tree."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = make_prediction(&row, &self.root_node);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, EnsembleError>
    for DecisionTreeRegressorValidParams<F>
where
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    type Object = DecisionTreeRegressor<F>;

    /// Fit a regression tree on all observations of the dataset
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>) -> Result<Self::Object> {
        check_dataset(dataset.records(), dataset.targets())?;

        let samples = (0..dataset.nsamples()).collect::<Vec<_>>();
        let mut rng = StdRng::seed_from_u64(self.seed());

        Ok(DecisionTreeRegressor::fit_samples(
            self,
            dataset.records(),
            dataset.targets(),
            &samples,
            &mut rng,
        ))
    }
}

/// Walk the tree from `node` down to a leaf for sample `x`
fn make_prediction<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix1>, node: &TreeNode<F>) -> F {
    match (&node.left_child, &node.right_child) {
        (Some(left), Some(right)) => {
            if x[node.feature_idx] <= node.split_value {
                make_prediction(x, left)
            } else {
                make_prediction(x, right)
            }
        }
        _ => node.prediction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use shelfcast::{Dataset, ParamGuard};

    #[test]
    fn step_function_is_learned_exactly() {
        let records = array![[1.], [2.], [3.], [10.], [11.], [12.]];
        let targets = array![1., 1., 1., 5., 5., 5.];
        let dataset = Dataset::new(records, targets);

        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.max_depth(), 1);
        let (feature, split_value, decrease) = tree.root_node().split();
        assert_eq!(feature, 0);
        assert_abs_diff_eq!(split_value, 6.5);
        // 6 samples with variance 4
        assert_abs_diff_eq!(decrease, 24.0, epsilon = 1e-9);

        let prediction: Array1<f64> = tree.predict(&array![[0.], [6.5], [6.6], [100.]]);
        assert_abs_diff_eq!(prediction, array![1., 1., 5., 5.]);
    }

    #[test]
    fn unbounded_tree_interpolates_training_data() {
        let records = array![[1., 0.], [2., 1.], [3., 0.], [4., 1.], [5., 0.]];
        let targets = array![3., -1., 4., 1., 5.];
        let dataset = Dataset::new(records.clone(), targets.clone());

        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        let prediction: Array1<f64> = tree.predict(&records);
        assert_abs_diff_eq!(prediction, targets, epsilon = 1e-12);
        assert_eq!(tree.num_leaves(), 5);
    }

    #[test]
    fn constant_target_gives_single_leaf() {
        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![7., 7., 7.]);

        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.root_node().prediction(), Some(7.));
        assert_eq!(tree.feature_importance(), vec![0.]);
    }

    #[test]
    fn equal_values_stay_together() {
        // the only possible split separates 1 from 2
        let dataset = Dataset::new(array![[1.], [1.], [2.]], array![0., 1., 2.]);

        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        let prediction: Array1<f64> = tree.predict(&array![[1.], [2.]]);
        assert_abs_diff_eq!(prediction, array![0.5, 2.]);
    }

    #[test]
    fn node_iterator_visits_every_node() {
        let dataset = Dataset::new(array![[1.], [2.], [10.], [11.]], array![1., 1., 5., 5.]);
        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        let mut depths = tree.iter_nodes().map(TreeNode::depth).collect::<Vec<_>>();
        depths.sort_unstable();

        assert_eq!(depths, vec![0, 1, 1]);
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.max_depth(), 1);
        assert_eq!(tree.iter_nodes().next().map(TreeNode::n_samples), Some(4));
    }

    #[test]
    fn min_samples_leaf_limits_splits() {
        let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![0., 0., 0., 9.]);

        let tree = DecisionTreeRegressor::params()
            .min_samples_leaf(2)
            .fit(&dataset)
            .unwrap();

        for node in tree.iter_nodes().filter(|node| node.is_leaf()) {
            assert!(node.n_samples() >= 2);
        }
        let prediction: Array1<f64> = tree.predict(&array![[4.]]);
        assert_abs_diff_eq!(prediction, array![4.5]);
    }

    #[test]
    fn informative_feature_is_most_important() {
        let records = Array2::from_shape_fn((40, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                ((i * 7) % 5) as f64
            }
        });
        let targets = records.column(0).mapv(|x| if x < 20. { 0. } else { 10. });
        let dataset = Dataset::new(records, targets);

        let tree = DecisionTreeRegressor::params().fit(&dataset).unwrap();

        let importance = tree.feature_importance();
        assert_abs_diff_eq!(importance.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(importance[0] > importance[1]);
    }

    #[test]
    fn fixed_seed_gives_identical_trees() {
        let records = Array2::from_shape_fn((30, 3), |(i, j)| ((i * (j + 3)) % 7) as f64);
        let targets = records.rows().into_iter().map(|r| r.sum()).collect::<Array1<_>>();
        let dataset = Dataset::new(records, targets);

        let params = DecisionTreeRegressor::params().seed(3);
        let a = params.fit(&dataset).unwrap();
        let b = params.fit(&dataset).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn invalid_data_is_rejected() {
        let params = DecisionTreeRegressor::<f64>::params().check().unwrap();

        let empty = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::<f64>::zeros(0));
        assert!(matches!(params.fit(&empty), Err(EnsembleError::EmptyTrainingSet)));

        let nan = Dataset::new(array![[1., 2.], [f64::NAN, 0.]], array![1., 2.]);
        assert!(matches!(
            params.fit(&nan),
            Err(EnsembleError::NonFiniteRecord { row: 1, feature: 0 })
        ));

        let inf = Dataset::new(array![[1.], [2.]], array![1., f64::INFINITY]);
        assert!(matches!(
            params.fit(&inf),
            Err(EnsembleError::NonFiniteTarget { row: 1 })
        ));

        let ragged = Dataset::new(array![[1.], [2.]], array![1.]);
        assert!(matches!(
            params.fit(&ragged),
            Err(EnsembleError::BaseError(Error::MismatchedShapes { .. }))
        ));
    }
}
