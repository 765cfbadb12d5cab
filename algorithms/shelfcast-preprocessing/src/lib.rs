//! # Preprocessing
//!
//! `shelfcast-preprocessing` turns a raw sales table into model inputs. It is a crate of the
//! `shelfcast` workspace.
//!
//! * [`CalendarFeatures`] parses the sale date and derives `month`, `day_of_week` and
//!   `is_weekend`
//! * [`FeatureSelection`] picks feature and target columns and converts them into a numeric
//!   [`Dataset`](shelfcast::Dataset)
//!
//! ## Example
//!
//! ```rust
//! use shelfcast::traits::Transformer;
//! use shelfcast_datasets::read_csv;
//! use shelfcast_preprocessing::{CalendarFeatures, FeatureSelection};
//!
//! let frame = read_csv("date,price,promotion,sales\n2024-01-06,19.99,1,120\n".as_bytes()).unwrap();
//! let frame = CalendarFeatures::new().transform(&frame).unwrap();
//! let dataset = FeatureSelection::retail().select(&frame).unwrap();
//!
//! assert_eq!(dataset.records.shape(), &[1, 5]);
//! ```

mod calendar;
pub mod error;
mod selection;

pub use calendar::{parse_date, CalendarFeatures, DAY_OF_WEEK, IS_WEEKEND, MONTH};
pub use error::{PreprocessingError, Result};
pub use selection::{coerce, FeatureSelection, RETAIL_FEATURES, RETAIL_TARGET};
