//! Configuration types for the matching pipeline.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use docmatch_extract::ExtractConfig;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::requirements::RequirementSet;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Comma- or space-separated requirement keywords.
    pub requirements: String,
    /// Concurrency knobs.
    pub pipeline: PipelineConfig,
    /// Extraction settings.
    pub extract: ExtractSettings,
}

/// Concurrency and batching knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum documents being extracted (or awaiting batching) at once.
    pub admission_limit: usize,
    /// Records per batch handed to the scoring stage.
    pub batch_size: usize,
    /// Batches the transfer channel holds before the producer waits.
    pub queue_capacity: usize,
    /// Scoring worker count. `None` uses the available parallelism.
    pub workers: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            admission_limit: 2,
            batch_size: 10,
            queue_capacity: 10,
            workers: None,
        }
    }
}

impl PipelineConfig {
    /// Worker count after resolving `None` against the host.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    /// Rejects zero-sized knobs.
    pub fn validate(&self) -> Result<()> {
        if self.admission_limit == 0 {
            return Err(MatchError::Config(
                "admission_limit must be greater than 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(MatchError::Config("batch_size must be greater than 0".into()));
        }
        if self.queue_capacity == 0 {
            return Err(MatchError::Config(
                "queue_capacity must be greater than 0".into(),
            ));
        }
        if self.workers == Some(0) {
            return Err(MatchError::Config("workers must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Serializable mirror of [`ExtractConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Explicit tesseract binary.
    pub tesseract_path: Option<PathBuf>,
    /// Tesseract language pack(s).
    pub ocr_language: String,
    /// Per-call OCR time limit.
    pub ocr_timeout_seconds: u64,
    /// Render width for scanned PDF pages.
    pub pdf_render_width: u32,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        let base = ExtractConfig::default();
        Self {
            tesseract_path: base.tesseract_path,
            ocr_language: base.ocr_language,
            ocr_timeout_seconds: base.ocr_timeout_seconds,
            pdf_render_width: base.pdf_render_width,
        }
    }
}

impl From<&ExtractSettings> for ExtractConfig {
    fn from(settings: &ExtractSettings) -> Self {
        Self {
            tesseract_path: settings.tesseract_path.clone(),
            ocr_language: settings.ocr_language.clone(),
            ocr_timeout_seconds: settings.ocr_timeout_seconds,
            pdf_render_width: settings.pdf_render_width,
        }
    }
}

impl MatchConfig {
    /// Config with the given requirement string and default knobs.
    pub fn with_requirements(requirements: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
            ..Self::default()
        }
    }

    /// Validates the whole configuration and parses the requirement set.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] for an empty requirement set, a
    /// zero-sized pipeline knob, or invalid extraction settings.
    pub fn validate(&self) -> Result<RequirementSet> {
        let requirements = RequirementSet::parse(&self.requirements)?;
        self.pipeline.validate()?;
        self.extract_config()
            .validate()
            .map_err(|e| MatchError::Config(e.to_string()))?;
        Ok(requirements)
    }

    /// Extraction config for [`docmatch_extract::DocumentExtractor`].
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::from(&self.extract)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MatchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MatchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/docmatch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("docmatch")
            .join("config.toml")
    }
}
