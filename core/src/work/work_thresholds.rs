use crate::{Root, StateBlock};
use blake2::{
    digest::{Update, VariableOutput},
    Blake2bVar,
};
use once_cell::sync::Lazy;

/// Accepts every work value
pub static WORK_THRESHOLDS_STUB: Lazy<WorkThresholds> = Lazy::new(|| WorkThresholds::new(0));

static PUBLISH_FULL: Lazy<WorkThresholds> = Lazy::new(|| WorkThresholds::new(0xfffffe0000000000));

static PUBLISH_DEV: Lazy<WorkThresholds> = Lazy::new(|| {
    WorkThresholds::new(get_env_threshold_or_default(
        "RSDAG_DEV_WORK_THRESHOLD",
        0xfe00000000000000, // Very low for tests
    ))
});

fn get_env_threshold_or_default(variable_name: &str, default_value: u64) -> u64 {
    match std::env::var(variable_name) {
        Ok(value) => parse_hex_u64(value).unwrap_or(default_value),
        Err(_) => default_value,
    }
}

fn parse_hex_u64(value: impl AsRef<str>) -> Result<u64, std::num::ParseIntError> {
    let s = value.as_ref();
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkThresholds {
    pub threshold: u64,
}

impl WorkThresholds {
    pub const fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn publish_full() -> &'static WorkThresholds {
        &PUBLISH_FULL
    }

    pub fn publish_dev() -> &'static WorkThresholds {
        &PUBLISH_DEV
    }

    /// blake2b-64 over the little endian work value followed by the root
    pub fn difficulty(root: &Root, work: u64) -> u64 {
        let mut hasher = Blake2bVar::new(8).unwrap();
        hasher.update(&work.to_le_bytes());
        hasher.update(root.as_bytes());
        let mut result = [0u8; 8];
        hasher.finalize_variable(&mut result).unwrap();
        u64::from_le_bytes(result)
    }

    pub fn validate(&self, root: &Root, work: u64) -> bool {
        Self::difficulty(root, work) >= self.threshold
    }

    pub fn is_valid_pow(&self, block: &StateBlock) -> bool {
        self.validate(&block.root(), block.work())
    }

    /// Brute force search, only meant for low thresholds
    pub fn generate(&self, root: &Root) -> Option<u64> {
        (0..u64::MAX).find(|work| self.validate(root, *work))
    }
}
