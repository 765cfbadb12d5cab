mod algorithm;
mod hyperparams;
mod iter;

pub(crate) use algorithm::check_dataset;
pub use algorithm::{DecisionTreeRegressor, TreeNode};
pub use hyperparams::*;
pub use iter::*;
