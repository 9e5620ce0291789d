use serde::{Deserialize, Serialize};

use crate::grading::GradingConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Records file (defaults to ~/.config/marksheet/records.json)
    #[serde(default)]
    pub records: Option<String>,

    /// Tracing filter used when RUST_LOG is unset (e.g. "warn", "marksheet=debug")
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub grading: Option<GradingConfig>,
}
