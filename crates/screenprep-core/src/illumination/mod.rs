pub mod config;
pub mod correct;
pub mod estimate;
pub mod field;
pub mod quantile_filter;

pub use config::{Aggregation, CorrectionParams, IlluminationParams};
pub use correct::correct_illumination;
pub use estimate::{estimate_illumination, local_background, FieldAccumulator};
pub use field::IlluminationField;
pub use quantile_filter::quantile_filter;
