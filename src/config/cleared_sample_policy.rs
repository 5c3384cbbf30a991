use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// What `expand` does once an estimator's sample has been cleared.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ClearedSamplePolicy {
    /// Fail with `EstimatorError::SampleCleared`; the caller must rebuild.
    #[default]
    Reject,
    /// Treat the new data as a fresh sample and refit on it alone.
    Replace,
}
