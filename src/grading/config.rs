use serde::{Deserialize, Serialize};

/// Grade policy configuration.
///
/// Maps overall marks to grade points through a table of bands. A mark
/// falls into the band with the highest `min_mark` it reaches.
///
/// Example YAML:
/// ```yaml
/// grading:
///   bands:
///     - { grade: "A", min_mark: 80, points: 5.0 }
///     - { grade: "B", min_mark: 65, points: 3.5 }
///     - { grade: "F", min_mark: 0, points: 0.0 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradingConfig {
    /// Mark bands. Must start at 0 and award non-decreasing points.
    #[serde(default)]
    pub bands: Option<Vec<GradeBand>>,
}

impl GradingConfig {
    /// Configured bands, or the default table when none are given.
    pub fn effective_bands(&self) -> Vec<GradeBand> {
        self.bands.clone().unwrap_or_else(default_bands)
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            bands: Some(default_bands()),
        }
    }
}

/// One step of the grade-point function.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradeBand {
    /// Letter grade shown on transcripts (e.g., "A-")
    pub grade: String,

    /// Lowest overall mark (inclusive) that earns this band
    pub min_mark: f64,

    /// Grade points awarded
    pub points: f64,
}

impl GradeBand {
    pub fn new(grade: impl Into<String>, min_mark: f64, points: f64) -> Self {
        Self {
            grade: grade.into(),
            min_mark,
            points,
        }
    }
}

/// Five-point table used when the config leaves `grading.bands` unset.
pub fn default_bands() -> Vec<GradeBand> {
    vec![
        GradeBand::new("A+", 85.0, 5.0),
        GradeBand::new("A", 80.0, 5.0),
        GradeBand::new("A-", 75.0, 4.5),
        GradeBand::new("B+", 70.0, 4.0),
        GradeBand::new("B", 65.0, 3.5),
        GradeBand::new("B-", 60.0, 3.0),
        GradeBand::new("C+", 55.0, 2.5),
        GradeBand::new("C", 50.0, 2.0),
        GradeBand::new("D+", 45.0, 1.5),
        GradeBand::new("D", 40.0, 1.0),
        GradeBand::new("F", 0.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grading_config() {
        let config = GradingConfig::default();
        let bands = config.bands.unwrap();
        assert_eq!(bands.len(), 11);
        assert_eq!(bands.last().map(|b| b.min_mark), Some(0.0));
    }

    #[test]
    fn test_grading_config_serde_roundtrip() {
        let config = GradingConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: GradingConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_custom_bands_parse() {
        let yaml = r#"
bands:
  - grade: "Pass"
    min_mark: 50
    points: 1.0
  - grade: "Fail"
    min_mark: 0
    points: 0.0
"#;
        let config: GradingConfig = serde_saphyr::from_str(yaml).unwrap();
        let bands = config.effective_bands();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].grade, "Pass");
        assert_eq!(bands[0].min_mark, 50.0);
    }

    #[test]
    fn test_empty_grading_config_uses_defaults() {
        let config: GradingConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.bands.is_none());
        assert_eq!(config.effective_bands(), default_bands());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
bands:
  - grade: "A"
    min_mark: 0
    points: 5.0
    colour: "green"
"#;
        assert!(serde_saphyr::from_str::<GradingConfig>(yaml).is_err());
    }
}
