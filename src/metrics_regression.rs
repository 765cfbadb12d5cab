//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables.

use ndarray::{Array1, ArrayBase, Data, Ix1, Zip};

use crate::{
    error::{Error, Result},
    Float,
};

/// Regression metrices trait
///
/// Implemented for one-dimensional arrays of predictions. Every metric compares `self` (the
/// prediction) against the ground truth passed as `compare_to`, and fails when the two arrays
/// differ in length or are empty.
pub trait Regression<F: Float> {
    /// Maximal error between two continuous variables
    fn max_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean error between two continuous variables
    fn mean_absolute_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Mean squared error between two continuous variables
    fn mean_squared_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Square root of the mean squared error, in the unit of the target
    fn root_mean_squared_error<D: Data<Elem = F>>(
        &self,
        compare_to: &ArrayBase<D, Ix1>,
    ) -> Result<F> {
        self.mean_squared_error(compare_to).map(|mse| mse.sqrt())
    }
    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// To evaluate the accuracy of a prediction, use
    /// ```ignore
    /// prediction.r2(&ground_truth)
    /// ```
    ///
    /// A constant ground truth has no variance to explain: the score is then one for a perfect
    /// prediction and zero otherwise.
    fn r2<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
    /// Same as R-Squared but with biased variance
    fn explained_variance<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F>;
}

/// Element-wise `prediction - truth`, checking that both are non-empty and of equal length
fn residuals<F: Float, S: Data<Elem = F>, D: Data<Elem = F>>(
    prediction: &ArrayBase<S, Ix1>,
    truth: &ArrayBase<D, Ix1>,
) -> Result<Array1<F>> {
    if prediction.len() != truth.len() {
        return Err(Error::MismatchedShapes {
            records: prediction.len(),
            targets: truth.len(),
        });
    }
    if prediction.is_empty() {
        return Err(Error::NotEnoughSamples {
            expected: 1,
            actual: 0,
        });
    }

    Ok(Zip::from(prediction)
        .and(truth)
        .map_collect(|&pred, &truth| pred - truth))
}

impl<F: Float, S: Data<Elem = F>> Regression<F> for ArrayBase<S, Ix1> {
    fn max_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let residuals = residuals(self, compare_to)?;

        Ok(residuals
            .iter()
            .map(|x| x.abs())
            .fold(F::neg_infinity(), F::max))
    }

    fn mean_absolute_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let residuals = residuals(self, compare_to)?;

        Ok(residuals.mapv(|x| x.abs()).sum() / F::cast(residuals.len()))
    }

    fn mean_squared_error<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let residuals = residuals(self, compare_to)?;

        Ok(residuals.mapv(|x| x * x).sum() / F::cast(residuals.len()))
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // the mean is taken over `compare_to`, the ground truth
    fn r2<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let residuals = residuals(self, compare_to)?;
        let mean = compare_to.sum() / F::cast(compare_to.len());

        let ss_res = residuals.mapv(|x| x * x).sum();
        let ss_tot = compare_to.mapv(|x| (x - mean) * (x - mean)).sum();

        if ss_tot == F::zero() {
            return Ok(if ss_res == F::zero() {
                F::one()
            } else {
                F::zero()
            });
        }

        Ok(F::one() - ss_res / ss_tot)
    }

    fn explained_variance<D: Data<Elem = F>>(&self, compare_to: &ArrayBase<D, Ix1>) -> Result<F> {
        let residuals = residuals(self, compare_to)?;
        let n = F::cast(residuals.len());

        let mean = compare_to.sum() / n;
        let mean_error = residuals.sum() / n;

        let var_res = residuals
            .mapv(|x| (x - mean_error) * (x - mean_error))
            .sum();
        let var_tot = compare_to.mapv(|x| (x - mean) * (x - mean)).sum();

        if var_tot == F::zero() {
            return Ok(if var_res == F::zero() {
                F::one()
            } else {
                F::zero()
            });
        }

        Ok(F::one() - var_res / var_tot)
    }
}

#[cfg(test)]
mod tests {
    use super::Regression;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn test_same() {
        let a: Array1<f32> = Array1::ones(100);

        assert_abs_diff_eq!(a.max_error(&a).unwrap(), 0.0f32);
        assert_abs_diff_eq!(a.mean_absolute_error(&a).unwrap(), 0.0f32);
        assert_abs_diff_eq!(a.mean_squared_error(&a).unwrap(), 0.0f32);
        assert_abs_diff_eq!(a.root_mean_squared_error(&a).unwrap(), 0.0f32);
        // constant ground truth, perfect prediction
        assert_abs_diff_eq!(a.r2(&a).unwrap(), 1.0f32);
        assert_abs_diff_eq!(a.explained_variance(&a).unwrap(), 1.0f32);
    }

    #[test]
    fn test_max_error() {
        let a = array![0.0, 0.1, 0.2, 0.3, 0.4];
        let b = array![0.1, 0.3, 0.2, 0.5, 0.7];

        assert_abs_diff_eq!(a.max_error(&b).unwrap(), 0.3, epsilon = 1e-5);
    }

    #[test]
    fn test_mean_absolute_error() {
        // sklearn: mean_absolute_error([3, -0.5, 2, 7], [2.5, 0.0, 2, 8]) == 0.5
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        assert_abs_diff_eq!(y_pred.mean_absolute_error(&y_true).unwrap(), 0.5);
    }

    #[test]
    fn test_mean_squared_error() {
        // sklearn: mean_squared_error([3, -0.5, 2, 7], [2.5, 0.0, 2, 8]) == 0.375
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        assert_abs_diff_eq!(y_pred.mean_squared_error(&y_true).unwrap(), 0.375);
        assert_abs_diff_eq!(
            y_pred.root_mean_squared_error(&y_true).unwrap(),
            0.375f64.sqrt()
        );
    }

    #[test]
    fn test_r2() {
        // sklearn: r2_score([3, -0.5, 2, 7], [2.5, 0.0, 2, 8]) == 0.948...
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        assert_abs_diff_eq!(
            y_pred.r2(&y_true).unwrap(),
            0.948_608_137_044_967_9,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_r2_constant_truth_with_errors_is_zero() {
        let y_true = array![2.0, 2.0, 2.0];
        let y_pred = array![1.0, 2.0, 3.0];

        assert_abs_diff_eq!(y_pred.r2(&y_true).unwrap(), 0.0);
    }

    #[test]
    fn test_explained_variance() {
        // sklearn: explained_variance_score([3, -0.5, 2, 7], [2.5, 0.0, 2, 8]) == 0.957...
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        assert_abs_diff_eq!(
            y_pred.explained_variance(&y_true).unwrap(),
            0.957_173_447_537_473_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rmse_non_negative_and_r2_bounded() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let y_true = Array1::from_shape_fn(30, |_| rng.gen_range(-50.0..50.0));
            let y_pred = Array1::from_shape_fn(30, |_| rng.gen_range(-50.0..50.0));

            assert!(y_pred.root_mean_squared_error(&y_true).unwrap() >= 0.0);
            assert!(y_pred.r2(&y_true).unwrap() <= 1.0);
        }
    }

    #[test]
    fn test_mismatched_and_empty() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        let empty: Array1<f64> = Array1::zeros(0);

        assert!(matches!(
            a.mean_squared_error(&b),
            Err(Error::MismatchedShapes { .. })
        ));
        assert!(matches!(
            empty.r2(&empty),
            Err(Error::NotEnoughSamples { .. })
        ));
    }
}
