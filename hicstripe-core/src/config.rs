use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_BATCH_SIZE, DEFAULT_OE_LOG_THRESHOLD};
use crate::errors::{ConfigError, ConfigResult};
use crate::models::Normalization;

/// How the intensity-gated label grid decides that a pixel inside a feature footprint is
/// enriched.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentThreshold {
    /// Enriched when above the mean of the footprint's own pixels.
    #[default]
    FootprintMean,
    /// Enriched when above a fixed value.
    Fixed(f64),
}

///
/// Parameters of a stripe window scan. Built once, then shared read-only by every task.
///
/// Window half-dimensions and the diagonal offset are in bins; resolutions in base pairs per
/// bin.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub x: usize,
    pub y: usize,
    pub resolutions: BTreeSet<u32>,
    pub offset_from_diagonal: u32,
    pub stride: u32,
    #[serde(default)]
    pub use_observed_over_expected: bool,
    #[serde(default)]
    pub ignore_orientation: bool,
    #[serde(default)]
    pub only_positive_examples: bool,
    #[serde(default)]
    pub use_intensity_labeling: bool,
    #[serde(default)]
    pub normalization: Normalization,
    #[serde(default)]
    pub enrichment: EnrichmentThreshold,
    #[serde(default = "default_oe_log_threshold")]
    pub oe_log_threshold: f64,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub show_progress: bool,
}

fn default_oe_log_threshold() -> f64 {
    DEFAULT_OE_LOG_THRESHOLD
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

impl ScanConfig {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            resolutions: BTreeSet::new(),
            offset_from_diagonal: 0,
            stride: 1,
            use_observed_over_expected: false,
            ignore_orientation: false,
            only_positive_examples: false,
            use_intensity_labeling: false,
            normalization: Normalization::default(),
            enrichment: EnrichmentThreshold::default(),
            oe_log_threshold: DEFAULT_OE_LOG_THRESHOLD,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            threads: None,
            show_progress: false,
        }
    }

    pub fn with_resolutions(mut self, resolutions: impl IntoIterator<Item = u32>) -> Self {
        self.resolutions = resolutions.into_iter().collect();
        self
    }

    pub fn with_offset_from_diagonal(mut self, offset: u32) -> Self {
        self.offset_from_diagonal = offset;
        self
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_observed_over_expected(mut self, enabled: bool) -> Self {
        self.use_observed_over_expected = enabled;
        self
    }

    pub fn with_ignore_orientation(mut self, enabled: bool) -> Self {
        self.ignore_orientation = enabled;
        self
    }

    pub fn with_only_positive_examples(mut self, enabled: bool) -> Self {
        self.only_positive_examples = enabled;
        self
    }

    pub fn with_intensity_labeling(mut self, enabled: bool) -> Self {
        self.use_intensity_labeling = enabled;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_enrichment(mut self, enrichment: EnrichmentThreshold) -> Self {
        self.enrichment = enrichment;
        self
    }

    pub fn with_oe_log_threshold(mut self, threshold: f64) -> Self {
        self.oe_log_threshold = threshold;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Square windows are scanned in one pass only.
    pub fn is_square(&self) -> bool {
        self.x == self.y
    }

    /// Worker threads to use: the configured count, or the available hardware parallelism.
    pub fn thread_count(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    ///
    /// Check the invariants a scan relies on.
    ///
    pub fn validate(&self) -> ConfigResult<()> {
        if self.x == 0 || self.y == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "window dimensions must be positive, got x={} y={}",
                self.x, self.y
            )));
        }
        if self.stride == 0 {
            return Err(ConfigError::InvalidValue("stride must be positive".to_string()));
        }
        if self.resolutions.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one resolution is required".to_string(),
            ));
        }
        if self.resolutions.contains(&0) {
            return Err(ConfigError::InvalidValue(
                "resolutions must be positive".to_string(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::InvalidValue(
                "max_batch_size must be positive".to_string(),
            ));
        }
        if !self.oe_log_threshold.is_finite() || self.oe_log_threshold <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "oe_log_threshold must be a positive number, got {}",
                self.oe_log_threshold
            )));
        }
        if let EnrichmentThreshold::Fixed(t) = self.enrichment {
            if !t.is_finite() {
                return Err(ConfigError::InvalidValue(format!(
                    "fixed enrichment threshold must be finite, got {}",
                    t
                )));
            }
        }
        Ok(())
    }

    ///
    /// Load and validate a scan config from a `yaml`/`yml` or `toml` file.
    ///
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let contents = read_to_string(path)?;
        let config: ScanConfig = match path.extension().and_then(OsStr::to_str) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            Some("toml") => toml::from_str(&contents)?,
            _ => return Err(ConfigError::InvalidFileType),
        };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Path> for ScanConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        ScanConfig::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use std::path::PathBuf;

    fn base_config() -> ScanConfig {
        ScanConfig::new(50, 50)
            .with_resolutions([5000])
            .with_offset_from_diagonal(10)
            .with_stride(5)
    }

    #[fixture]
    fn valid_config() -> ScanConfig {
        base_config()
    }

    #[fixture]
    fn path_to_yaml_config() -> PathBuf {
        PathBuf::from("tests/data/scan.yaml")
    }

    #[fixture]
    fn path_to_toml_config() -> PathBuf {
        PathBuf::from("tests/data/scan.toml")
    }

    #[rstest]
    fn test_defaults(valid_config: ScanConfig) {
        assert_eq!(valid_config.max_batch_size, 10_000);
        assert_eq!(valid_config.oe_log_threshold, 2.0);
        assert_eq!(valid_config.normalization, Normalization::None);
        assert_eq!(valid_config.enrichment, EnrichmentThreshold::FootprintMean);
        assert!(valid_config.validate().is_ok());
        assert!(valid_config.is_square());
    }

    #[rstest]
    #[case(base_config().with_stride(0))]
    #[case(ScanConfig::new(0, 50).with_resolutions([5000]))]
    #[case(ScanConfig::new(50, 0).with_resolutions([5000]))]
    #[case(ScanConfig::new(50, 50))]
    #[case(base_config().with_resolutions([0, 5000]))]
    #[case(base_config().with_max_batch_size(0))]
    #[case(base_config().with_oe_log_threshold(0.0))]
    #[case(base_config().with_oe_log_threshold(f64::NAN))]
    #[case(base_config().with_enrichment(EnrichmentThreshold::Fixed(f64::INFINITY)))]
    fn test_validate_rejects(#[case] config: ScanConfig) {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[rstest]
    fn test_thread_count() {
        let config = ScanConfig::new(10, 10).with_threads(3);
        assert_eq!(config.thread_count(), 3);
        assert!(ScanConfig::new(10, 10).thread_count() >= 1);
    }

    #[rstest]
    fn test_from_yaml(path_to_yaml_config: PathBuf) {
        let config = ScanConfig::from_path(&path_to_yaml_config).unwrap();
        assert_eq!(config.x, 40);
        assert_eq!(config.y, 60);
        assert_eq!(config.resolutions.iter().copied().collect::<Vec<_>>(), vec![5000, 10000]);
        assert_eq!(config.offset_from_diagonal, 10);
        assert_eq!(config.stride, 5);
        assert!(config.use_observed_over_expected);
        assert!(config.use_intensity_labeling);
        assert_eq!(config.normalization, Normalization::VcSqrt);
        assert_eq!(config.enrichment, EnrichmentThreshold::Fixed(1.5));
        // unspecified fields fall back to defaults
        assert_eq!(config.max_batch_size, 10_000);
        assert!(!config.only_positive_examples);
    }

    #[rstest]
    fn test_from_toml(path_to_toml_config: PathBuf) {
        let config = ScanConfig::try_from(path_to_toml_config.as_path()).unwrap();
        assert_eq!(config.x, 50);
        assert_eq!(config.y, 50);
        assert!(config.only_positive_examples);
        assert!(config.ignore_orientation);
        assert_eq!(config.max_batch_size, 500);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.enrichment, EnrichmentThreshold::FootprintMean);
    }

    #[rstest]
    fn test_from_path_invalid_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            ScanConfig::from_path(&path),
            Err(ConfigError::InvalidFileType)
        ));
    }

    #[rstest]
    fn test_from_path_runs_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "x: 50\ny: 50\nresolutions: [5000]\noffset_from_diagonal: 10\nstride: 0"
        )
        .unwrap();

        assert!(matches!(
            ScanConfig::from_path(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[rstest]
    fn test_yaml_round_trip_keeps_enrichment(valid_config: ScanConfig) {
        let config = valid_config.with_enrichment(EnrichmentThreshold::Fixed(0.25));
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ScanConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
