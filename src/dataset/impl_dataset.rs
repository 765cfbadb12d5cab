use super::{DatasetBase, Float, Records};
use crate::traits::{Predict, PredictInplace};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use rand::{seq::SliceRandom, Rng};

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation of datasets and access to their
/// records, targets and feature names.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Return references to the records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Return references to the targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// feature importances of a random forest.
    ///
    /// If no names were set, `feature-{idx}` is returned for every column.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }
}

impl<F: Float, R: Records<Elem = F>, T> Records for DatasetBase<R, T> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<F: Float, T: Clone> DatasetBase<Array2<F>, Array1<T>> {
    /// Select the given observations
    ///
    /// Indices may repeat, which is how bootstrap samples are drawn.
    pub fn select(&self, indices: &[usize]) -> Self {
        if indices.is_empty() {
            return DatasetBase {
                records: Array2::zeros((0, self.records.ncols())),
                targets: Array1::from(Vec::new()),
                feature_names: self.feature_names.clone(),
            };
        }

        DatasetBase {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Apply a random permutation to the observations of the dataset
    pub fn shuffle<R: Rng>(&self, rng: &mut R) -> Self {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        self.select(&indices)
    }

    /// Split the dataset into a training and a test part
    ///
    /// The test part holds the last `ceil(nsamples * test_ratio)` observations, the training part
    /// everything before. Shuffle first to obtain a random partition.
    ///
    /// # Panics
    ///
    /// If `test_ratio` is not in the range `[0, 1]`
    pub fn split_with_test_ratio(self, test_ratio: f64) -> (Self, Self) {
        assert!(
            (0.0..=1.0).contains(&test_ratio),
            "test ratio should be in range [0, 1], but is {}",
            test_ratio
        );

        let nsamples = self.nsamples();
        let ntest = ((nsamples as f64) * test_ratio).ceil() as usize;
        let ntest = ntest.min(nsamples);
        let ntrain = nsamples - ntest;

        let indices = (0..nsamples).collect::<Vec<_>>();
        let (train, test) = indices.split_at(ntrain);

        (self.select(train), self.select(test))
    }
}

/// Predict targets for a matrix of records
impl<'a, F, D, T, O> Predict<&'a ArrayBase<D, Ix2>, T> for O
where
    F: Float,
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

/// Predict targets for the records of a dataset, ignoring its own targets
impl<'a, F, D, S, T, O> Predict<&'a DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>, T> for O
where
    F: Float,
    D: Data<Elem = F>,
    S: Data,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, ds: &'a DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>) -> T {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        targets
    }
}
