//! Tesseract OCR runner.
//!
//! OCR is delegated to the `tesseract` command-line tool. [`TesseractOcr`]
//! locates the binary once and then runs one subprocess per recognition,
//! reading the recognised text from stdout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ExtractConfig;
use crate::error::ExtractionError;

/// Well-known install locations probed after `PATH`.
const WELL_KNOWN_LOCATIONS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
];

/// A located tesseract binary plus recognition settings.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    language: String,
    timeout: Duration,
}

impl TesseractOcr {
    /// Locate the tesseract binary.
    ///
    /// Probes locations in this order:
    /// 1. `config.tesseract_path` (if provided)
    /// 2. `PATH` lookup via [`which::which`]
    /// 3. [`WELL_KNOWN_LOCATIONS`]
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::OcrUnavailable`] if no candidate exists.
    pub fn discover(config: &ExtractConfig) -> Result<Self, ExtractionError> {
        let candidates = build_candidate_list(config.tesseract_path.as_deref());
        let binary = candidates
            .iter()
            .find(|candidate| candidate.is_file())
            .cloned()
            .ok_or_else(|| {
                ExtractionError::OcrUnavailable(format!(
                    "tesseract not found; searched {} location(s): {}",
                    candidates.len(),
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        tracing::debug!(binary = %binary.display(), "using tesseract");
        Ok(Self::with_binary(binary, config))
    }

    /// Use a specific binary without probing.
    pub fn with_binary(binary: PathBuf, config: &ExtractConfig) -> Self {
        Self {
            binary,
            language: config.ocr_language.clone(),
            timeout: Duration::from_secs(config.ocr_timeout_seconds),
        }
    }

    /// Path of the binary in use.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Recognise the text of an image file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Ocr`] if tesseract cannot be started or
    /// exits unsuccessfully, and [`ExtractionError::Timeout`] if it runs past
    /// the configured limit.
    pub async fn recognize_file(&self, image: &Path) -> Result<String, ExtractionError> {
        let mut command = Command::new(&self.binary);
        command.arg(image);
        self.run(command, None).await
    }

    /// Recognise the text of an encoded image held in memory (fed on stdin).
    ///
    /// # Errors
    ///
    /// Same as [`TesseractOcr::recognize_file`].
    pub async fn recognize_bytes(&self, encoded: &[u8]) -> Result<String, ExtractionError> {
        let mut command = Command::new(&self.binary);
        command.arg("stdin");
        self.run(command, Some(encoded)).await
    }

    async fn run(
        &self,
        mut command: Command,
        input: Option<&[u8]>,
    ) -> Result<String, ExtractionError> {
        command
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            ExtractionError::Ocr(format!("failed to execute {}: {e}", self.binary.display()))
        })?;

        if let Some(bytes) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(bytes)
                    .await
                    .map_err(|e| ExtractionError::Ocr(format!("failed to feed tesseract: {e}")))?;
                // Dropping stdin closes the pipe so tesseract sees EOF.
            }
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ExtractionError::Timeout(format!(
                    "tesseract exceeded {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ExtractionError::Ocr(format!("tesseract did not finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Build the ordered list of candidate paths to probe.
fn build_candidate_list(explicit_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(WELL_KNOWN_LOCATIONS.len() + 2);

    if let Some(p) = explicit_path {
        candidates.push(p.to_path_buf());
    }

    if let Ok(found) = which::which("tesseract") {
        candidates.push(found);
    }

    candidates.extend(WELL_KNOWN_LOCATIONS.iter().map(PathBuf::from));
    candidates
}
