mod work_thresholds;
pub use work_thresholds::{WorkThresholds, WORK_THRESHOLDS_STUB};
