mod cleared_sample_policy;
mod detector_config;

pub use cleared_sample_policy::ClearedSamplePolicy;
pub use detector_config::DetectorConfig;
